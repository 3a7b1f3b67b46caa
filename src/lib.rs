//! Bridge Match - two-stage stable matching for youth/elder skill exchange
//!
//! This library pairs youth with elders by deferred acceptance over
//! skill-exchange compatibility scores, then clusters opted-in pairs into
//! groups with a second, same-pool matching round.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{Matcher, MatcherOptions, Scorer, SkillExchangeScorer};
pub use crate::error::{MatchError, ValidationError};
pub use crate::models::{Participant, Roster, RosterRow, Side, MatchResult, Matching, Group, Suggestion, SuggestionList};
