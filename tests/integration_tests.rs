// Integration tests for Bridge Match

use bridge_match::core::{deferred_acceptance, Matcher, MatcherOptions, Scorer};
use bridge_match::models::{
    Group, Participant, PreferenceList, Roster, RosterRow, ScoreEntry, Side, DEFAULT_LIST_DELIMITER,
};
use bridge_match::{MatchError, ValidationError};
use std::collections::{HashMap, HashSet};

fn tutor(participant: Participant) -> Participant {
    Participant {
        wants_tutoring: true,
        ..participant
    }
}

/// Two youths and three elders from the program's sample sign-up sheet
fn sample_roster() -> Vec<Participant> {
    vec![
        tutor(
            Participant::new("Alice", Side::Elder)
                .teaching(&["Coding", "Web Development"])
                .learning(&["Cooking"]),
        ),
        Participant::new("Bob", Side::Youth)
            .teaching(&["Photography"])
            .learning(&["Coding", "Music"]),
        tutor(
            Participant::new("Charlie", Side::Elder)
                .teaching(&["Writing", "Music"])
                .learning(&["Coding"]),
        ),
        Participant::new("Diana", Side::Youth)
            .teaching(&["Cooking", "Gardening"])
            .learning(&["Coding", "Financial Literacy"]),
        tutor(
            Participant::new("Edward", Side::Elder)
                .teaching(&["Coding", "Web Development", "Mentoring"])
                .learning(&["Woodworking"]),
        ),
    ]
}

const SKILLS: [&str; 8] = [
    "Coding", "Cooking", "Music", "Gardening", "Chess", "Writing", "Photography", "Knitting",
];

fn pick(i: usize, stride: usize, count: usize) -> Vec<&'static str> {
    (0..count).map(|k| SKILLS[(i * stride + k * 3) % SKILLS.len()]).collect()
}

/// A larger deterministic roster with plenty of contention
fn generated_roster(youth: usize, elders: usize) -> Vec<Participant> {
    let mut participants = Vec::new();
    for i in 0..youth {
        participants.push(
            Participant::new(format!("Y{:02}", i), Side::Youth)
                .teaching(&pick(i, 5, 1 + i % 3))
                .learning(&pick(i + 1, 3, 1 + i % 2))
                .grouping(),
        );
    }
    for i in 0..elders {
        participants.push(
            Participant::new(format!("E{:02}", i), Side::Elder)
                .teaching(&pick(i + 2, 7, 1 + i % 3))
                .learning(&pick(i, 3, 1 + (i + 1) % 2))
                .grouping(),
        );
    }
    participants
}

fn better(candidate: Option<usize>, current: Option<usize>) -> bool {
    match (candidate, current) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

fn rank_in(prefs: &[PreferenceList], person: &str, candidate: Option<&str>) -> Option<usize> {
    let list = prefs.iter().find(|p| p.person_id == person)?;
    candidate.and_then(|c| list.rank_of(c))
}

#[test]
fn test_sample_roster_end_to_end() {
    let matcher = Matcher::with_default_options();
    let roster = Roster::new(sample_roster()).unwrap();

    let bob = matcher.suggest(&roster, "Bob", 5).unwrap();
    let charlie = bob.suggestions.iter().find(|s| s.candidate_id == "Charlie").unwrap();
    assert_eq!(charlie.score, 1);
    assert_eq!(charlie.matched_interests, vec!["Music"]);
    assert_eq!(bob.total_potential_matches, 3);

    let diana = matcher.suggest(&roster, "Diana", 1).unwrap();
    assert_eq!(diana.suggestions.len(), 1);
    assert_eq!(diana.suggestions[0].candidate_id, "Alice");
    assert!(diana.suggestions[0].matched_interests.contains(&"Cooking".to_string()));
    // Alice and Edward; Charlie shares nothing with Diana
    assert_eq!(diana.total_potential_matches, 2);

    let result = matcher.run_roster(&roster);

    assert_eq!(result.pairs.partner("Bob"), Some("Charlie"));
    assert_eq!(result.pairs.partner("Diana"), Some("Alice"));
    assert_eq!(result.pairs.partner("Edward"), None);
    assert_eq!(result.summary.total_participants, 5);
    assert_eq!(result.summary.youth_count, 2);
    assert_eq!(result.summary.elder_count, 3);
    assert_eq!(result.summary.successful_matches, 2);

    let scored: Vec<_> = result
        .pairs
        .pairs()
        .iter()
        .map(|p| (p.youth.as_str(), p.elder.as_str(), p.score, p.matched_interests.clone()))
        .collect();
    assert_eq!(
        scored,
        vec![
            ("Bob", "Charlie", 1, vec!["Music".to_string()]),
            ("Diana", "Alice", 2, vec!["Cooking".to_string(), "Coding".to_string()]),
        ]
    );
    // Nobody opted into groups
    assert!(result.groups.is_empty());
}

#[test]
fn test_sample_roster_displacement_improves_receiver() {
    let matcher = Matcher::with_default_options();
    let roster = Roster::new(sample_roster()).unwrap();
    let prefs = matcher.preferences(&roster);

    let outcome = deferred_acceptance(&prefs.youth, &prefs.elder);

    assert_eq!(outcome.displacements.len(), 1);
    let d = &outcome.displacements[0];
    assert_eq!(d.receiver, "Alice");
    assert_eq!(d.displaced, "Bob");
    assert_eq!(d.proposer, "Diana");
    assert!(better(Some(d.proposer_rank), d.displaced_rank));
}

#[test]
fn test_matching_is_injective_and_symmetric() {
    let matcher = Matcher::with_default_options();
    let result = matcher.run(generated_roster(12, 10)).unwrap();

    let mut seen = HashSet::new();
    for pair in result.pairs.pairs() {
        assert!(seen.insert(pair.youth.clone()), "{} matched twice", pair.youth);
        assert!(seen.insert(pair.elder.clone()), "{} matched twice", pair.elder);
        assert_eq!(result.pairs.partner(&pair.youth), Some(pair.elder.as_str()));
        assert_eq!(result.pairs.partner(&pair.elder), Some(pair.youth.as_str()));
        let back = result.pairs.partner(&pair.youth).and_then(|p| result.pairs.partner(p));
        assert_eq!(back, Some(pair.youth.as_str()));
    }
    assert!(!result.pairs.is_empty());
}

#[test]
fn test_stage_one_is_stable() {
    let matcher = Matcher::with_default_options();
    let roster = Roster::new(generated_roster(12, 10)).unwrap();
    let prefs = matcher.preferences(&roster);
    let result = matcher.run_roster(&roster);

    for youth in roster.side(Side::Youth) {
        for elder in roster.side(Side::Elder) {
            if result.pairs.partner(&youth.id) == Some(elder.id.as_str()) {
                continue;
            }
            let youth_prefers = better(
                rank_in(&prefs.youth, &youth.id, Some(&elder.id)),
                rank_in(&prefs.youth, &youth.id, result.pairs.partner(&youth.id)),
            );
            let elder_prefers = better(
                rank_in(&prefs.elder, &elder.id, Some(&youth.id)),
                rank_in(&prefs.elder, &elder.id, result.pairs.partner(&elder.id)),
            );
            assert!(
                !(youth_prefers && elder_prefers),
                "blocking pair {} / {}",
                youth.id,
                elder.id
            );
        }
    }
}

#[test]
fn test_receiver_rank_strictly_improves_on_each_displacement() {
    let matcher = Matcher::with_default_options();
    let roster = Roster::new(generated_roster(16, 8)).unwrap();
    let prefs = matcher.preferences(&roster);

    let outcome = deferred_acceptance(&prefs.youth, &prefs.elder);

    let mut last_rank: HashMap<&str, Option<usize>> = HashMap::new();
    for d in &outcome.displacements {
        assert!(better(Some(d.proposer_rank), d.displaced_rank));
        if let Some(previous) = last_rank.get(d.receiver.as_str()) {
            assert!(better(Some(d.proposer_rank), *previous));
        }
        last_rank.insert(d.receiver.as_str(), Some(d.proposer_rank));
    }

    let total: usize = prefs.youth.iter().map(|p| p.len()).sum();
    assert!(outcome.proposals <= total);
}

#[test]
fn test_runs_are_byte_identical() {
    let matcher = Matcher::with_default_options();

    let first = matcher.run(generated_roster(12, 10)).unwrap();
    let second = matcher.run(generated_roster(12, 10)).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_scoring_gives_identical_results() {
    let parallel = Matcher::new(MatcherOptions {
        parallel_threshold: 1,
        ..MatcherOptions::default()
    });
    let sequential = Matcher::new(MatcherOptions {
        parallel_threshold: usize::MAX,
        ..MatcherOptions::default()
    });

    let first = parallel.run(generated_roster(40, 35)).unwrap();
    let second = sequential.run(generated_roster(40, 35)).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_groups_form_from_shared_interests() {
    let participants = vec![
        Participant::new("Y1", Side::Youth).teaching(&["Chess"]).grouping(),
        Participant::new("Y2", Side::Youth).teaching(&["Chess"]).grouping(),
        Participant::new("Y3", Side::Youth).teaching(&["Chess"]),
        Participant::new("E1", Side::Elder).learning(&["Chess"]).grouping(),
        Participant::new("E2", Side::Elder).learning(&["Chess"]).grouping(),
        Participant::new("E3", Side::Elder).learning(&["Chess"]).grouping(),
    ];

    let result = Matcher::with_default_options().run(participants).unwrap();

    assert_eq!(result.summary.successful_matches, 3);
    // Y3 did not opt in, so only two pairs are eligible
    assert_eq!(
        result.groups,
        vec![Group {
            youth1: "Y1".to_string(),
            elder1: "E1".to_string(),
            youth2: "Y2".to_string(),
            elder2: "E2".to_string(),
        }]
    );
}

#[test]
fn test_group_members_come_from_stage_one_pairs() {
    let result = Matcher::with_default_options().run(generated_roster(12, 10)).unwrap();

    let mut grouped = HashSet::new();
    for group in &result.groups {
        assert_eq!(result.pairs.partner(&group.youth1), Some(group.elder1.as_str()));
        assert_eq!(result.pairs.partner(&group.youth2), Some(group.elder2.as_str()));
        assert!((group.youth1.as_str(), group.elder1.as_str()) < (group.youth2.as_str(), group.elder2.as_str()));
        assert!(grouped.insert(group.youth1.clone()));
        assert!(grouped.insert(group.youth2.clone()));
    }
}

#[test]
fn test_roster_rows_feed_the_matcher() {
    let rows = vec![
        RosterRow {
            name: "Diana".to_string(),
            side: Some("Youth".to_string()),
            teach: "Cooking;Gardening".to_string(),
            learn: "Coding".to_string(),
            tutoring: Some("No".to_string()),
            subjects: None,
            group: Some("Yes".to_string()),
        },
        RosterRow {
            name: "Alice".to_string(),
            side: Some("Elderly".to_string()),
            teach: "Coding; Web Development".to_string(),
            learn: "Cooking".to_string(),
            tutoring: Some("Yes".to_string()),
            subjects: Some(String::new()),
            group: Some("Yes".to_string()),
        },
    ];

    let roster = Roster::from_rows(rows, DEFAULT_LIST_DELIMITER).unwrap();
    let result = Matcher::with_default_options().run_roster(&roster);

    assert_eq!(result.pairs.partner("Alice"), Some("Diana"));
}

#[test]
fn test_duplicate_identity_is_fatal() {
    let participants = vec![
        Participant::new("Sam", Side::Youth),
        Participant::new("Sam", Side::Elder),
    ];

    let err = Matcher::with_default_options().run(participants).unwrap_err();

    assert!(matches!(
        err,
        MatchError::Validation(ValidationError::DuplicateIdentity(id)) if id == "Sam"
    ));
}

#[test]
fn test_no_positive_scores_means_no_pairs() {
    let participants = vec![
        Participant::new("Y1", Side::Youth).teaching(&["Chess"]),
        Participant::new("E1", Side::Elder).teaching(&["Chess"]),
    ];

    let result = Matcher::with_default_options().run(participants).unwrap();

    assert!(result.pairs.is_empty());
    assert_eq!(result.summary.youth_count, 1);
    assert_eq!(result.summary.elder_count, 1);
}

/// Everyone likes everyone equally
struct FlatScorer;

impl Scorer for FlatScorer {
    fn score(&self, seeker: &Participant, candidate: &Participant) -> ScoreEntry {
        ScoreEntry {
            seeker_id: seeker.id.clone(),
            candidate_id: candidate.id.clone(),
            score: 1,
            matched_interests: vec!["Anything".to_string()],
        }
    }
}

#[test]
fn test_custom_scorer_falls_back_to_roster_order() {
    let participants = vec![
        Participant::new("Y1", Side::Youth),
        Participant::new("Y2", Side::Youth),
        Participant::new("E1", Side::Elder),
        Participant::new("E2", Side::Elder),
    ];
    let matcher = Matcher::with_scorer(FlatScorer, MatcherOptions::default());

    let result = matcher.run(participants).unwrap();

    assert_eq!(result.pairs.partner("Y1"), Some("E1"));
    assert_eq!(result.pairs.partner("Y2"), Some("E2"));
    // Nobody opted in
    assert!(result.groups.is_empty());
}
