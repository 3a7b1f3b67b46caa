use crate::models::{PreferenceList, ScoreMap};

/// Rank candidates by descending score, dropping non-positive scores.
///
/// Equal scores keep their input order (stable sort), so the result is
/// reproducible for a fixed input order.
pub fn rank_by<K>(scored: impl IntoIterator<Item = (K, u32)>) -> Vec<K> {
    let mut positive: Vec<(K, u32)> = scored.into_iter().filter(|(_, score)| *score > 0).collect();
    positive.sort_by(|a, b| b.1.cmp(&a.1));
    positive.into_iter().map(|(key, _)| key).collect()
}

/// Build `person_id`'s preference list from their score map
pub fn rank(person_id: &str, scores: &ScoreMap) -> PreferenceList {
    PreferenceList {
        person_id: person_id.to_string(),
        candidates: rank_by(
            scores
                .entries
                .iter()
                .map(|entry| (entry.candidate_id.clone(), entry.score)),
        ),
    }
}
