use crate::config::Settings;
use crate::core::{
    groups::{eligible_pairs, form_groups},
    ranking::rank,
    scoring::{score_all, Scorer, SkillExchangeScorer},
    stable::deferred_acceptance,
};
use crate::error::MatchError;
use crate::models::{
    MatchResult, MatchSummary, MatchedPair, Matching, Participant, PreferenceList, Roster, ScoreMap, Side,
    Suggestion, SuggestionList,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Engine knobs, usually derived from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Run the second (pair-to-pair) round
    pub form_groups: bool,
    /// Minimum seeker count before the scoring pass goes parallel
    pub parallel_threshold: usize,
    /// Score treated as a 100% match in suggestions
    pub full_score: u32,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            form_groups: true,
            parallel_threshold: 64,
            full_score: 5,
        }
    }
}

impl From<&Settings> for MatcherOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            form_groups: settings.matching.form_groups,
            parallel_threshold: settings.scoring.parallel_threshold,
            full_score: settings.suggestions.full_score,
        }
    }
}

/// Both sides' preference lists, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub youth: Vec<PreferenceList>,
    pub elder: Vec<PreferenceList>,
}

/// Both directions of a scoring pass, with the preference lists ranked from them
struct Scored {
    preferences: Preferences,
    youth_scores: Vec<ScoreMap>,
    elder_scores: Vec<ScoreMap>,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Roster validation
/// 2. Compatibility scoring in both directions
/// 3. Preference ranking
/// 4. Youth-proposing stable matching
/// 5. Group formation over opted-in pairs
#[derive(Debug, Clone)]
pub struct Matcher<S = SkillExchangeScorer> {
    scorer: S,
    options: MatcherOptions,
}

impl Matcher {
    pub fn new(options: MatcherOptions) -> Self {
        Self {
            scorer: SkillExchangeScorer,
            options,
        }
    }

    pub fn with_default_options() -> Self {
        Self::new(MatcherOptions::default())
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_options()
    }
}

impl<S: Scorer> Matcher<S> {
    /// Use a custom scoring function
    pub fn with_scorer(scorer: S, options: MatcherOptions) -> Self {
        Self { scorer, options }
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    /// Validate `participants` and compute the full two-stage matching
    ///
    /// # Returns
    /// An empty result (not an error) when either side has no participants.
    pub fn run(&self, participants: Vec<Participant>) -> Result<MatchResult, MatchError> {
        let roster = Roster::new(participants)?;
        Ok(self.run_roster(&roster))
    }

    /// Compute the full two-stage matching for an already validated roster
    pub fn run_roster(&self, roster: &Roster) -> MatchResult {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("matching_run", run_id = %run_id);
        let _entered = span.enter();

        let youth = roster.side(Side::Youth);
        let elders = roster.side(Side::Elder);

        let mut summary = MatchSummary {
            total_participants: roster.len(),
            youth_count: youth.len(),
            elder_count: elders.len(),
            ..MatchSummary::default()
        };

        if let Err(err) = ensure_both_sides(roster) {
            warn!("{}, returning empty result", err);
            return MatchResult {
                summary,
                ..MatchResult::default()
            };
        }

        info!(
            "Matching {} youth with {} elders",
            summary.youth_count, summary.elder_count
        );

        let scored = self.score_and_rank(&youth, &elders);

        let outcome = deferred_acceptance(&scored.preferences.youth, &scored.preferences.elder);
        debug!(
            "Stage one: {} proposals, {} displacements",
            outcome.proposals,
            outcome.displacements.len()
        );

        let youth_scores: HashMap<&str, &ScoreMap> = scored
            .youth_scores
            .iter()
            .map(|scores| (scores.seeker_id.as_str(), scores))
            .collect();

        let pairs = Matching::from_pairs(
            outcome
                .pairs
                .into_iter()
                .map(|(youth, elder)| {
                    let entry = youth_scores.get(youth.as_str()).and_then(|scores| scores.get(&elder));
                    MatchedPair {
                        score: entry.map_or(0, |e| e.score),
                        matched_interests: entry.map(|e| e.matched_interests.clone()).unwrap_or_default(),
                        youth,
                        elder,
                    }
                })
                .collect(),
        );

        let groups = if self.options.form_groups {
            form_groups(&eligible_pairs(&pairs, roster, &scored.elder_scores))
        } else {
            Vec::new()
        };

        summary.successful_matches = pairs.len();
        summary.group_count = groups.len();

        info!(
            "Matched {} pairs and {} groups from {} participants",
            summary.successful_matches, summary.group_count, summary.total_participants
        );

        MatchResult {
            pairs,
            groups,
            summary,
        }
    }

    /// Preference lists for both sides of `roster`
    pub fn preferences(&self, roster: &Roster) -> Preferences {
        self.score_and_rank(&roster.side(Side::Youth), &roster.side(Side::Elder))
            .preferences
    }

    /// Top `limit` candidates for one participant, best first
    ///
    /// Only positively scored candidates from the opposite side are returned;
    /// `total_potential_matches` counts all of them before the limit.
    pub fn suggest(&self, roster: &Roster, seeker_id: &str, limit: usize) -> Result<SuggestionList, MatchError> {
        let seeker = roster
            .get(seeker_id)
            .ok_or_else(|| MatchError::UnknownParticipant(seeker_id.to_string()))?;
        let candidates = roster.side(seeker.side.opposite());

        let Some(scores) = score_all(&self.scorer, &[seeker], &candidates, usize::MAX)
            .into_iter()
            .next()
        else {
            return Ok(SuggestionList::default());
        };

        let ranked = rank(&seeker.id, &scores);
        let suggestions = ranked
            .candidates
            .iter()
            .take(limit)
            .filter_map(|candidate_id| scores.get(candidate_id))
            .map(|entry| Suggestion {
                candidate_id: entry.candidate_id.clone(),
                score: entry.score,
                matched_interests: entry.matched_interests.clone(),
                match_percentage: match_percentage(entry.score, self.options.full_score),
            })
            .collect::<Vec<_>>();

        debug!(
            "Suggesting {} of {} candidates for {}",
            suggestions.len(),
            ranked.len(),
            seeker_id
        );

        Ok(SuggestionList {
            suggestions,
            total_potential_matches: ranked.len(),
        })
    }

    fn score_and_rank(&self, youth: &[&Participant], elders: &[&Participant]) -> Scored {
        let threshold = self.options.parallel_threshold;
        let youth_scores = score_all(&self.scorer, youth, elders, threshold);
        let elder_scores = score_all(&self.scorer, elders, youth, threshold);

        let preferences = Preferences {
            youth: youth_scores.iter().map(|s| rank(&s.seeker_id, s)).collect(),
            elder: elder_scores.iter().map(|s| rank(&s.seeker_id, s)).collect(),
        };

        Scored {
            preferences,
            youth_scores,
            elder_scores,
        }
    }
}

/// Fail with `EmptyInput` if either side of the roster has nobody
pub fn ensure_both_sides(roster: &Roster) -> Result<(), MatchError> {
    for side in [Side::Youth, Side::Elder] {
        if !roster.participants().iter().any(|p| p.side == side) {
            return Err(MatchError::EmptyInput { side });
        }
    }
    Ok(())
}

#[inline]
fn match_percentage(score: u32, full_score: u32) -> f64 {
    if full_score == 0 {
        return if score > 0 { 100.0 } else { 0.0 };
    }
    (score as f64 * 100.0 / full_score as f64).min(100.0)
}
