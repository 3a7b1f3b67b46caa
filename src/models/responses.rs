use serde::Serialize;
use crate::models::domain::{Group, Matching};

/// Outcome of a full matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub pairs: Matching,
    pub groups: Vec<Group>,
    pub summary: MatchSummary,
}

/// Roster and outcome counts for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    #[serde(rename = "totalParticipants")]
    pub total_participants: usize,
    #[serde(rename = "youthCount")]
    pub youth_count: usize,
    #[serde(rename = "elderCount")]
    pub elder_count: usize,
    #[serde(rename = "successfulMatches")]
    pub successful_matches: usize,
    #[serde(rename = "groupCount")]
    pub group_count: usize,
}

/// One ranked candidate for a single seeker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "compatibilityScore")]
    pub score: u32,
    #[serde(rename = "sharedInterests")]
    pub matched_interests: Vec<String>,
    #[serde(rename = "matchPercentage")]
    pub match_percentage: f64,
}

/// Ranked suggestions for one seeker
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionList {
    pub suggestions: Vec<Suggestion>,
    /// Positively scored candidates before `limit` was applied
    #[serde(rename = "totalPotentialMatches")]
    pub total_potential_matches: usize,
}
