use crate::error::ValidationError;
use crate::models::domain::{LabelSet, Participant, Roster, Side};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default separator for multi-valued roster fields
pub const DEFAULT_LIST_DELIMITER: char = ';';

/// One roster row as handed over by the ingestion layer.
///
/// Multi-valued fields are still delimiter-joined strings here; missing
/// columns deserialize to `None` or empty.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RosterRow {
    #[validate(length(min = 1))]
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "age", alias = "Age")]
    pub side: Option<String>,
    #[serde(default)]
    pub teach: String,
    #[serde(default)]
    pub learn: String,
    #[serde(default)]
    pub tutoring: Option<String>,
    #[serde(default)]
    pub subjects: Option<String>,
    #[serde(default, alias = "Group")]
    pub group: Option<String>,
}

impl RosterRow {
    /// Validate and normalize this row into a participant
    pub fn into_participant(self, delimiter: char) -> Result<Participant, ValidationError> {
        if let Err(source) = self.validate() {
            return Err(ValidationError::InvalidRow {
                row: self.name,
                source,
            });
        }

        let id = self.name.trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::BlankIdentity);
        }

        let side = match self.side.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingSide(id)),
            Some(raw) => Side::parse(raw).ok_or_else(|| ValidationError::UnrecognizedSide {
                id: id.clone(),
                value: raw.to_string(),
            })?,
        };

        let wants_tutoring = parse_flag(&id, "tutoring", self.tutoring.as_deref())?;
        let wants_group = parse_flag(&id, "group", self.group.as_deref())?;

        Ok(Participant {
            teach: LabelSet::parse(&self.teach, delimiter),
            learn: LabelSet::parse(&self.learn, delimiter),
            subjects: self.subjects.as_deref().map(|raw| LabelSet::parse(raw, delimiter)),
            wants_tutoring,
            wants_group,
            side,
            id,
        })
    }
}

impl Roster {
    /// Normalize every row and validate the resulting roster
    pub fn from_rows(rows: Vec<RosterRow>, delimiter: char) -> Result<Self, ValidationError> {
        let participants = rows
            .into_iter()
            .map(|row| row.into_participant(delimiter))
            .collect::<Result<Vec<_>, _>>()?;
        Roster::new(participants)
    }
}

fn parse_flag(id: &str, field: &'static str, value: Option<&str>) -> Result<bool, ValidationError> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "no" | "n" | "false" | "0" => Ok(false),
        "yes" | "y" | "true" | "1" => Ok(true),
        _ => Err(ValidationError::UnrecognizedFlag {
            id: id.to_string(),
            field,
            value: raw.to_string(),
        }),
    }
}
