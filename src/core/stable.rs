use crate::models::PreferenceList;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// A receiver dropping its current partner for a better proposer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Displacement {
    pub receiver: String,
    pub displaced: String,
    /// Rank of the displaced proposer in the receiver's list (`None` = unranked)
    #[serde(rename = "displacedRank")]
    pub displaced_rank: Option<usize>,
    pub proposer: String,
    #[serde(rename = "proposerRank")]
    pub proposer_rank: usize,
}

/// Result of one deferred-acceptance round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StableOutcome {
    /// `(proposer, receiver)` pairs in proposer input order
    pub pairs: Vec<(String, String)>,
    pub displacements: Vec<Displacement>,
    pub proposals: usize,
}

/// `true` if `candidate` ranks strictly better than `current`.
/// An unranked proposer is never preferred.
#[inline]
pub(crate) fn strictly_prefers(candidate: Option<usize>, current: Option<usize>) -> bool {
    match (candidate, current) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Proposer-proposes deferred acceptance (Gale–Shapley).
///
/// Proposers are queued in input order when their list is non-empty. Each
/// proposer walks its own list from where it last stopped; a free receiver
/// accepts outright, a matched receiver switches only for a strictly better
/// ranked proposer and the displaced partner goes to the back of the queue.
/// A proposer whose list runs out stays free. Every proposal advances a
/// cursor, so the loop makes at most `Σ|proposer lists|` proposals.
///
/// Receiver ids not referenced by any proposer are never matched; candidate
/// ids that are not receivers are ignored.
pub fn deferred_acceptance(proposers: &[PreferenceList], receivers: &[PreferenceList]) -> StableOutcome {
    let receiver_index: HashMap<&str, usize> = receivers
        .iter()
        .enumerate()
        .map(|(i, r)| (r.person_id.as_str(), i))
        .collect();
    let proposer_index: HashMap<&str, usize> = proposers
        .iter()
        .enumerate()
        .map(|(i, p)| (p.person_id.as_str(), i))
        .collect();

    let prefs: Vec<Vec<usize>> = proposers
        .iter()
        .map(|p| {
            p.candidates
                .iter()
                .filter_map(|c| receiver_index.get(c.as_str()).copied())
                .collect()
        })
        .collect();

    // rank_table[r][p] = position of proposer p in receiver r's list
    let rank_table: Vec<HashMap<usize, usize>> = receivers
        .iter()
        .map(|r| {
            let mut ranks = HashMap::with_capacity(r.candidates.len());
            for (rank, c) in r.candidates.iter().enumerate() {
                if let Some(&p) = proposer_index.get(c.as_str()) {
                    ranks.entry(p).or_insert(rank);
                }
            }
            ranks
        })
        .collect();

    let mut next = vec![0usize; proposers.len()];
    let mut proposer_partner: Vec<Option<usize>> = vec![None; proposers.len()];
    let mut receiver_partner: Vec<Option<usize>> = vec![None; receivers.len()];
    let mut free: VecDeque<usize> = (0..proposers.len()).filter(|&p| !prefs[p].is_empty()).collect();
    let mut outcome = StableOutcome::default();

    while let Some(p) = free.pop_front() {
        while next[p] < prefs[p].len() {
            let r = prefs[p][next[p]];
            next[p] += 1;
            outcome.proposals += 1;

            match receiver_partner[r] {
                None => {
                    tracing::trace!(
                        "{} accepted by free {}",
                        proposers[p].person_id,
                        receivers[r].person_id
                    );
                    receiver_partner[r] = Some(p);
                    proposer_partner[p] = Some(r);
                    break;
                }
                Some(current) => {
                    let Some(proposer_rank) = rank_table[r].get(&p).copied() else {
                        continue;
                    };
                    let current_rank = rank_table[r].get(&current).copied();

                    if strictly_prefers(Some(proposer_rank), current_rank) {
                        tracing::debug!(
                            "{} displaces {} at {} (rank {} over {:?})",
                            proposers[p].person_id,
                            proposers[current].person_id,
                            receivers[r].person_id,
                            proposer_rank,
                            current_rank
                        );
                        outcome.displacements.push(Displacement {
                            receiver: receivers[r].person_id.clone(),
                            displaced: proposers[current].person_id.clone(),
                            displaced_rank: current_rank,
                            proposer: proposers[p].person_id.clone(),
                            proposer_rank,
                        });
                        proposer_partner[current] = None;
                        receiver_partner[r] = Some(p);
                        proposer_partner[p] = Some(r);
                        free.push_back(current);
                        break;
                    }
                }
            }
        }

        if proposer_partner[p].is_none() {
            tracing::trace!("{} exhausted its preferences", proposers[p].person_id);
        }
    }

    outcome.pairs = proposer_partner
        .iter()
        .enumerate()
        .filter_map(|(p, r)| {
            r.map(|r| (proposers[p].person_id.clone(), receivers[r].person_id.clone()))
        })
        .collect();

    outcome
}
