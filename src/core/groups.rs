//! Second matching round: clustering stage-one pairs into groups.
//!
//! Pairs are matched against other pairs from the same pool, so this is a
//! roommate-style variant of deferred acceptance. Unlike the bipartite
//! round it can leave compatible pairs unmatched and does not guarantee a
//! stable result.

use crate::core::{filters::is_group_eligible, ranking::rank_by, stable::strictly_prefers};
use crate::models::{Group, Matching, Pair, Roster, ScoreMap};
use std::collections::{HashMap, HashSet, VecDeque};

/// Collect the stage-one pairs whose members both opted into grouping.
///
/// Each pair carries the elder's matched interests with that youth.
pub fn eligible_pairs(matching: &Matching, roster: &Roster, elder_scores: &[ScoreMap]) -> Vec<Pair> {
    let by_elder: HashMap<&str, &ScoreMap> = elder_scores
        .iter()
        .map(|scores| (scores.seeker_id.as_str(), scores))
        .collect();

    matching
        .pairs()
        .iter()
        .filter_map(|matched| {
            let youth = roster.get(&matched.youth)?;
            let elder = roster.get(&matched.elder)?;
            if !is_group_eligible(youth, elder) {
                return None;
            }
            let matched_interests = by_elder
                .get(elder.id.as_str())
                .and_then(|scores| scores.get(&youth.id))
                .map(|entry| entry.matched_interests.clone())
                .unwrap_or_default();
            Some(Pair {
                youth: youth.id.clone(),
                elder: elder.id.clone(),
                matched_interests,
            })
        })
        .collect()
}

/// Number of distinct interests two pairs share
pub fn pair_compatibility(x: &Pair, y: &Pair) -> u32 {
    let ours: HashSet<&str> = x.matched_interests.iter().map(String::as_str).collect();
    let theirs: HashSet<&str> = y.matched_interests.iter().map(String::as_str).collect();
    ours.intersection(&theirs).count() as u32
}

/// Each pair's ranked list of other pairs, as indices into `pairs`
pub fn pair_preferences(pairs: &[Pair]) -> Vec<Vec<usize>> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            rank_by(
                pairs
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(j, other)| (j, pair_compatibility(pair, other))),
            )
        })
        .collect()
}

/// Same-pool deferred acceptance over index preference lists.
///
/// A proposal is only considered if the target ranks the proposer. A
/// matched target switches only to a strictly better proposer, re-queueing
/// its old partner. Returns each node's partner.
pub fn roommate_match(prefs: &[Vec<usize>]) -> Vec<Option<usize>> {
    let rank_table: Vec<HashMap<usize, usize>> = prefs
        .iter()
        .map(|list| {
            let mut ranks = HashMap::with_capacity(list.len());
            for (rank, &other) in list.iter().enumerate() {
                ranks.entry(other).or_insert(rank);
            }
            ranks
        })
        .collect();

    let mut partner: Vec<Option<usize>> = vec![None; prefs.len()];
    let mut next = vec![0usize; prefs.len()];
    let mut free: VecDeque<usize> = (0..prefs.len()).filter(|&i| !prefs[i].is_empty()).collect();

    while let Some(p) = free.pop_front() {
        // Accepted someone else's proposal while queued
        if partner[p].is_some() {
            continue;
        }

        while next[p] < prefs[p].len() {
            let target = prefs[p][next[p]];
            next[p] += 1;

            if target == p {
                continue;
            }
            let Some(&proposer_rank) = rank_table[target].get(&p) else {
                continue;
            };

            match partner[target] {
                None => {
                    partner[target] = Some(p);
                    partner[p] = Some(target);
                    break;
                }
                Some(current) => {
                    let current_rank = rank_table[target].get(&current).copied();
                    if strictly_prefers(Some(proposer_rank), current_rank) {
                        partner[current] = None;
                        partner[target] = Some(p);
                        partner[p] = Some(target);
                        free.push_back(current);
                        break;
                    }
                }
            }
        }
    }

    partner
}

/// Group eligible pairs, one group per matched edge.
///
/// Each edge is emitted once with the lower-sorting pair key first, and
/// groups come out in ascending key order.
pub fn form_groups(pairs: &[Pair]) -> Vec<Group> {
    let partners = roommate_match(&pair_preferences(pairs));

    let mut edges: Vec<(usize, usize)> = partners
        .iter()
        .enumerate()
        .filter_map(|(i, partner)| partner.map(|j| (i, j)))
        .filter(|&(i, j)| pairs[i].key() < pairs[j].key())
        .collect();
    edges.sort_by(|a, b| pairs[a.0].key().cmp(&pairs[b.0].key()));

    tracing::debug!("Formed {} groups from {} eligible pairs", edges.len(), pairs.len());

    edges
        .into_iter()
        .map(|(i, j)| Group {
            youth1: pairs[i].youth.clone(),
            elder1: pairs[i].elder.clone(),
            youth2: pairs[j].youth.clone(),
            elder2: pairs[j].elder.clone(),
        })
        .collect()
}
