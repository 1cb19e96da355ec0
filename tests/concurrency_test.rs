//! Concurrency tests: admission under racing casts must never lose or
//! double-count a vote

use ballotbox::{
    CastOutcome, ElectionLedger, ElectionRegistry, RejectReason, TallyStore, VoteAdmission,
    types::{Candidate, Election, Voter},
};
use chrono::Utc;
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

fn setup(election_id: Uuid, voters: usize) -> (Arc<VoteAdmission>, TallyStore, Arc<ElectionLedger>) {
    let registry = Arc::new(ElectionRegistry::new());
    let ledger = Arc::new(ElectionLedger::new());

    let now = Utc::now().timestamp();
    registry
        .insert_election(Election {
            id: election_id,
            title: "Student Council 2026".to_string(),
            description: None,
            start_time: now - 3600,
            end_time: now + 3600,
            active: true,
            created_at: Utc::now(),
        })
        .unwrap();

    for id in ["c5", "c6"] {
        registry
            .insert_candidate(Candidate {
                id: id.to_string(),
                election_id,
                name: format!("Candidate {id}"),
                description: None,
                approved: true,
            })
            .unwrap();
    }

    for i in 0..voters {
        registry
            .insert_voter(Voter {
                id: format!("v{i}"),
                name: format!("Voter {i}"),
                approved: true,
                registered_at: Utc::now(),
            })
            .unwrap();
    }

    let admission = Arc::new(VoteAdmission::new(Arc::clone(&registry), Arc::clone(&ledger)));
    let tally = TallyStore::new(registry, Arc::clone(&ledger));
    (admission, tally, ledger)
}

#[test]
fn test_fifty_distinct_voters_one_candidate() {
    let election_id = Uuid::new_v4();
    let (admission, tally, ledger) = setup(election_id, 50);

    let barrier = Arc::new(Barrier::new(50));
    let handles: Vec<_> = (0..50)
        .map(|i| {
            let admission = Arc::clone(&admission);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                admission.cast_vote(&format!("v{i}"), "c5", &election_id)
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.join().unwrap().unwrap();
        assert!(outcome.is_accepted());
    }

    // All 50 accepted, tally exactly 50, counter agrees with a recount
    assert_eq!(tally.tally("c5").unwrap(), 50);
    assert_eq!(tally.total_votes(&election_id).unwrap(), 50);
    assert_eq!(ledger.recount_candidate("c5").unwrap(), 50);
    assert!(tally.verify(&election_id).unwrap().is_consistent());
}

#[test]
fn test_same_voter_race_single_acceptance() {
    let election_id = Uuid::new_v4();
    let (admission, tally, _ledger) = setup(election_id, 1);

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let admission = Arc::clone(&admission);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                admission.cast_vote("v0", "c5", &election_id)
            })
        })
        .collect();

    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.join().unwrap().unwrap() {
            CastOutcome::Accepted(_) => accepted += 1,
            CastOutcome::Rejected(RejectReason::DuplicateVote { .. }) => duplicates += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    // Exactly one acceptance, and exactly one tally increment
    assert_eq!(accepted, 1);
    assert_eq!(duplicates, threads - 1);
    assert_eq!(tally.tally("c5").unwrap(), 1);
    assert_eq!(tally.total_votes(&election_id).unwrap(), 1);
}

#[test]
fn test_mixed_race_tallies_match_ledger() {
    let election_id = Uuid::new_v4();
    let voters = 40;
    let (admission, tally, ledger) = setup(election_id, voters);

    // Every voter submits twice, concurrently, split across two candidates
    let barrier = Arc::new(Barrier::new(voters * 2));
    let handles: Vec<_> = (0..voters * 2)
        .map(|n| {
            let admission = Arc::clone(&admission);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let voter = n % voters;
                let candidate = if voter % 2 == 0 { "c5" } else { "c6" };
                barrier.wait();
                admission.cast_vote(&format!("v{voter}"), candidate, &election_id)
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.join().unwrap().unwrap().is_accepted() {
            accepted += 1;
        }
    }

    // One acceptance per voter, no lost tally increments anywhere
    assert_eq!(accepted, voters);
    assert_eq!(tally.total_votes(&election_id).unwrap(), voters as u64);
    assert_eq!(tally.tally("c5").unwrap(), 20);
    assert_eq!(tally.tally("c6").unwrap(), 20);
    assert_eq!(
        ledger.count_by_candidate("c5").unwrap(),
        ledger.recount_candidate("c5").unwrap()
    );
    assert_eq!(
        ledger.count_by_candidate("c6").unwrap(),
        ledger.recount_candidate("c6").unwrap()
    );
    assert!(tally.verify(&election_id).unwrap().is_consistent());
}

#[test]
fn test_retry_after_success_is_idempotent() {
    let election_id = Uuid::new_v4();
    let (admission, tally, _ledger) = setup(election_id, 1);

    assert!(admission.cast_vote("v0", "c5", &election_id).unwrap().is_accepted());

    // Caller retries the "same" request several times; the tally never moves
    for _ in 0..5 {
        let outcome = admission
            .cast_vote_with_retry("v0", "c5", &election_id)
            .unwrap();
        assert!(matches!(
            outcome,
            CastOutcome::Rejected(RejectReason::DuplicateVote { .. })
        ));
    }

    assert_eq!(tally.tally("c5").unwrap(), 1);
}
