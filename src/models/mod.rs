// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Side, LabelSet, Participant, Roster, ScoreEntry, ScoreMap, PreferenceList, MatchedPair, Matching, Pair, Group};
pub use requests::{RosterRow, DEFAULT_LIST_DELIMITER};
pub use responses::{MatchResult, MatchSummary, Suggestion, SuggestionList};
