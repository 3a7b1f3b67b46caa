// Core algorithm exports
pub mod filters;
pub mod groups;
pub mod matcher;
pub mod ranking;
pub mod scoring;
pub mod stable;

pub use filters::is_group_eligible;
pub use groups::{eligible_pairs, form_groups, pair_compatibility, pair_preferences, roommate_match};
pub use matcher::{ensure_both_sides, Matcher, MatcherOptions, Preferences};
pub use ranking::{rank, rank_by};
pub use scoring::{calculate_compatibility, score_all, Scorer, SkillExchangeScorer};
pub use stable::{deferred_acceptance, Displacement, StableOutcome};
