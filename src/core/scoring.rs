use crate::models::{Participant, ScoreEntry, ScoreMap};

/// Directional compatibility between a seeker and a candidate.
///
/// Implementations must be pure: the scoring pass may call them in any
/// order and from several threads.
pub trait Scorer: Send + Sync {
    fn score(&self, seeker: &Participant, candidate: &Participant) -> ScoreEntry;
}

/// Additive skill-exchange scoring, one point per overlapping label
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillExchangeScorer;

impl Scorer for SkillExchangeScorer {
    fn score(&self, seeker: &Participant, candidate: &Participant) -> ScoreEntry {
        calculate_compatibility(seeker, candidate)
    }
}

/// Score `candidate` from `seeker`'s point of view
///
/// score = (
///     |seeker.teach ∩ candidate.learn| +
///     |seeker.learn ∩ candidate.teach| +
///     |seeker.subjects ∩ candidate.subjects|   # only if seeker wants tutoring
/// )
///
/// Labels are appended to `matched_interests` in that evaluation order.
pub fn calculate_compatibility(seeker: &Participant, candidate: &Participant) -> ScoreEntry {
    let mut matched_interests = Vec::new();

    for skill in seeker.teach.iter() {
        if candidate.learn.contains(skill) {
            matched_interests.push(skill.to_string());
        }
    }

    for skill in seeker.learn.iter() {
        if candidate.teach.contains(skill) {
            matched_interests.push(skill.to_string());
        }
    }

    // Tutoring overlap needs a subject field on the candidate
    if seeker.wants_tutoring {
        if let (Some(wanted), Some(offered)) = (&seeker.subjects, &candidate.subjects) {
            for subject in wanted.iter() {
                if offered.contains(subject) {
                    matched_interests.push(subject.to_string());
                }
            }
        }
    }

    ScoreEntry {
        seeker_id: seeker.id.clone(),
        candidate_id: candidate.id.clone(),
        score: matched_interests.len() as u32,
        matched_interests,
    }
}

/// Score every seeker against every candidate.
///
/// Output is one `ScoreMap` per seeker in seeker order, each holding entries
/// in candidate order, whichever path computed it.
pub fn score_all<S: Scorer>(
    scorer: &S,
    seekers: &[&Participant],
    candidates: &[&Participant],
    parallel_threshold: usize,
) -> Vec<ScoreMap> {
    let score_one = |seeker: &&Participant| ScoreMap {
        seeker_id: seeker.id.clone(),
        entries: candidates
            .iter()
            .map(|candidate| scorer.score(seeker, candidate))
            .collect(),
    };

    #[cfg(feature = "parallel")]
    {
        if seekers.len() >= parallel_threshold {
            use rayon::prelude::*;
            tracing::debug!("Scoring {} seekers in parallel", seekers.len());
            return seekers.par_iter().map(score_one).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel_threshold;

    seekers.iter().map(score_one).collect()
}
