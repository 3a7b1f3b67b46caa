use crate::models::Side;
use thiserror::Error;

/// Errors raised while turning roster rows into a validated participant set.
///
/// Any of these is fatal for the roster: no matching runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("participant identity is blank")]
    BlankIdentity,

    #[error("duplicate participant identity: {0}")]
    DuplicateIdentity(String),

    #[error("participant {0} has no side")]
    MissingSide(String),

    #[error("participant {id} has unrecognized side '{value}'")]
    UnrecognizedSide { id: String, value: String },

    #[error("participant {id} has unrecognized {field} value '{value}'")]
    UnrecognizedFlag {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("invalid roster row '{row}': {source}")]
    InvalidRow {
        row: String,
        #[source]
        source: validator::ValidationErrors,
    },
}

/// Errors surfaced by the matcher.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// One side of the roster is empty. `Matcher::run` treats this as a
    /// no-op and returns an empty result.
    #[error("no {side} participants in roster")]
    EmptyInput { side: Side },

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),
}
