use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Which side of the program a participant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Youth,
    Elder,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Youth => Side::Elder,
            Side::Elder => Side::Youth,
        }
    }

    /// Parse a roster side label. Accepts the "Elderly" spelling the sign-up
    /// form uses.
    pub fn parse(value: &str) -> Option<Side> {
        match value.trim().to_ascii_lowercase().as_str() {
            "youth" => Some(Side::Youth),
            "elder" | "elderly" => Some(Side::Elder),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Youth => write!(f, "youth"),
            Side::Elder => write!(f, "elder"),
        }
    }
}

/// Ordered set of trimmed, non-empty labels (skills or subjects).
///
/// Iteration order is first-occurrence order, which keeps
/// `matched_interests` reproducible across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Split a delimiter-joined roster field. An empty string yields an
    /// empty set.
    pub fn parse(raw: &str, delimiter: char) -> Self {
        raw.split(delimiter).collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels: Vec<String> = Vec::new();
        for label in iter {
            let label = label.as_ref().trim();
            if !label.is_empty() && !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        Self(labels)
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(value: LabelSet) -> Self {
        value.0
    }
}

/// Normalized program participant. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub side: Side,
    #[serde(default)]
    pub teach: LabelSet,
    #[serde(default)]
    pub learn: LabelSet,
    /// `None` when the roster had no subject field for this person, which
    /// disables tutoring overlap against them.
    #[serde(default)]
    pub subjects: Option<LabelSet>,
    #[serde(rename = "wantsTutoring", default)]
    pub wants_tutoring: bool,
    #[serde(rename = "wantsGroup", default)]
    pub wants_group: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, side: Side) -> Self {
        Self {
            id: id.into(),
            side,
            teach: LabelSet::default(),
            learn: LabelSet::default(),
            subjects: None,
            wants_tutoring: false,
            wants_group: false,
        }
    }

    pub fn teaching<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.teach = skills.iter().collect();
        self
    }

    pub fn learning<S: AsRef<str>>(mut self, skills: &[S]) -> Self {
        self.learn = skills.iter().collect();
        self
    }

    pub fn tutoring<S: AsRef<str>>(mut self, subjects: &[S]) -> Self {
        self.wants_tutoring = true;
        self.subjects = Some(subjects.iter().collect());
        self
    }

    pub fn with_subjects<S: AsRef<str>>(mut self, subjects: &[S]) -> Self {
        self.subjects = Some(subjects.iter().collect());
        self
    }

    pub fn grouping(mut self) -> Self {
        self.wants_group = true;
        self
    }
}

/// Validated participant snapshot for a single run.
///
/// Preserves input order; that order drives proposer queue order and
/// preference tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(participants.len());
        for participant in &participants {
            if participant.id.trim().is_empty() {
                return Err(ValidationError::BlankIdentity);
            }
            if !seen.insert(participant.id.as_str()) {
                return Err(ValidationError::DuplicateIdentity(participant.id.clone()));
            }
        }
        Ok(Self { participants })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn side(&self, side: Side) -> Vec<&Participant> {
        self.participants.iter().filter(|p| p.side == side).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Directional compatibility of a seeker towards one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "seekerId")]
    pub seeker_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub score: u32,
    /// Every label that earned a point, in evaluation order. Not deduplicated.
    #[serde(rename = "matchedInterests")]
    pub matched_interests: Vec<String>,
}

/// One seeker's scores over every candidate, in candidate roster order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMap {
    pub seeker_id: String,
    pub entries: Vec<ScoreEntry>,
}

impl ScoreMap {
    pub fn get(&self, candidate_id: &str) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.candidate_id == candidate_id)
    }
}

/// A person's ranked candidates, most preferred first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceList {
    #[serde(rename = "personId")]
    pub person_id: String,
    pub candidates: Vec<String>,
}

impl PreferenceList {
    /// Position of `candidate_id` in this list; `None` means never preferred.
    pub fn rank_of(&self, candidate_id: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c == candidate_id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Stage-one youth/elder pair, scored from the youth's side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub youth: String,
    pub elder: String,
    #[serde(rename = "compatibilityScore")]
    pub score: u32,
    #[serde(rename = "sharedInterests")]
    pub matched_interests: Vec<String>,
}

/// Symmetric, injective youth/elder assignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matching {
    pairs: Vec<MatchedPair>,
    #[serde(skip)]
    partners: HashMap<String, String>,
}

impl Matching {
    pub fn from_pairs(pairs: Vec<MatchedPair>) -> Self {
        let mut partners = HashMap::with_capacity(pairs.len() * 2);
        for pair in &pairs {
            partners.insert(pair.youth.clone(), pair.elder.clone());
            partners.insert(pair.elder.clone(), pair.youth.clone());
        }
        Self { pairs, partners }
    }

    /// Partner of `id`, looked up from either side
    pub fn partner(&self, id: &str) -> Option<&str> {
        self.partners.get(id).map(String::as_str)
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A stage-one pair taking part in group formation.
///
/// `key()` is the canonical `(youth, elder)` ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub youth: String,
    pub elder: String,
    /// The elder's stage-one matched interests with this youth
    #[serde(rename = "matchedInterests")]
    pub matched_interests: Vec<String>,
}

impl Pair {
    pub fn key(&self) -> (&str, &str) {
        (self.youth.as_str(), self.elder.as_str())
    }
}

/// Two stage-one pairs grouped together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub youth1: String,
    pub elder1: String,
    pub youth2: String,
    pub elder2: String,
}
