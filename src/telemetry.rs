use crate::config::LoggingSettings;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': {source}")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over the configured level. Format is one of `json`,
/// `pretty`, `compact`; anything else gets the default full format.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|source| TelemetryError::Filter {
            value: settings.level.clone(),
            source,
        })?,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let installed = match settings.format.as_str() {
        "json" => subscriber.json().try_init(),
        "pretty" => subscriber.pretty().try_init(),
        "compact" => subscriber.compact().try_init(),
        _ => subscriber.try_init(),
    };

    installed.map_err(|err| TelemetryError::Install(err.to_string()))
}
