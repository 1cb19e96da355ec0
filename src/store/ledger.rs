//! Append-only election ledger
//!
//! The ledger is the sole source of truth for accepted votes. It enforces
//! the "at most one vote per (voter, election)" invariant inside its own
//! critical section, so concurrent appends for the same voter can never
//! both land, and it maintains per-candidate and per-election counters in
//! that same critical section, so the counters can never drift from the
//! entries they summarize.

use crate::types::Vote;
use crate::{Result, storage_error};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Uniqueness key for ledger entries: one ballot per voter per election
type BallotKey = (String, Uuid);

/// Internal ledger state, guarded by a single lock.
///
/// `entries` only ever grows, so the indices stored in `by_ballot` stay
/// valid for the lifetime of the ledger.
#[derive(Default)]
struct LedgerState {
    /// All accepted votes in acceptance order
    entries: Vec<Vote>,
    /// (voter, election) -> index into `entries`
    by_ballot: HashMap<BallotKey, usize>,
    /// Per-candidate vote counters
    candidate_counts: HashMap<String, u64>,
    /// Per-election vote counters
    election_counts: HashMap<Uuid, u64>,
}

/// Append-only record of accepted votes with consistent counters
pub struct ElectionLedger {
    state: RwLock<LedgerState>,
}

impl ElectionLedger {
    /// Create a new, empty ledger
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Append a vote for (voter, election), enforcing uniqueness.
    ///
    /// The duplicate check, the append, and both counter bumps happen under
    /// one write lock: either all of them commit or none do. Returns the
    /// recorded [`Vote`] on success and [`Error::DuplicateVote`] if a ledger
    /// entry already exists for this voter and election.
    ///
    /// [`Error::DuplicateVote`]: crate::Error::DuplicateVote
    pub fn append(&self, voter_id: &str, candidate_id: &str, election_id: &Uuid) -> Result<Vote> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        let key = (voter_id.to_string(), *election_id);
        if state.by_ballot.contains_key(&key) {
            return Err(crate::Error::duplicate_vote(voter_id, *election_id));
        }

        let vote = Vote::new(voter_id, candidate_id, *election_id);

        let index = state.entries.len();
        state.entries.push(vote.clone());
        state.by_ballot.insert(key, index);
        *state
            .candidate_counts
            .entry(candidate_id.to_string())
            .or_insert(0) += 1;
        *state.election_counts.entry(*election_id).or_insert(0) += 1;

        tracing::debug!(
            "Ledger entry appended: vote={}, voter={}, candidate={}, election={}",
            vote.vote_id,
            voter_id,
            candidate_id,
            election_id
        );

        Ok(vote)
    }

    /// Look up the ballot a voter cast in an election, if any
    pub fn ballot_for(&self, voter_id: &str, election_id: &Uuid) -> Result<Option<Vote>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        let key = (voter_id.to_string(), *election_id);
        Ok(state
            .by_ballot
            .get(&key)
            .map(|&index| state.entries[index].clone()))
    }

    /// Check whether a voter has a ledger entry for an election
    pub fn has_voted(&self, voter_id: &str, election_id: &Uuid) -> Result<bool> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        let key = (voter_id.to_string(), *election_id);
        Ok(state.by_ballot.contains_key(&key))
    }

    /// All votes for an election, most recent first
    pub fn list_by_election(&self, election_id: &Uuid) -> Result<Vec<Vote>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        Ok(state
            .entries
            .iter()
            .rev()
            .filter(|vote| vote.election_id == *election_id)
            .cloned()
            .collect())
    }

    /// All votes across all elections, most recent first
    pub fn list_all(&self) -> Result<Vec<Vote>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        Ok(state.entries.iter().rev().cloned().collect())
    }

    /// Number of votes recorded for a candidate
    pub fn count_by_candidate(&self, candidate_id: &str) -> Result<u64> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        Ok(state
            .candidate_counts
            .get(candidate_id)
            .copied()
            .unwrap_or(0))
    }

    /// Number of votes recorded in an election
    pub fn count_by_election(&self, election_id: &Uuid) -> Result<u64> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        Ok(state.election_counts.get(election_id).copied().unwrap_or(0))
    }

    /// Recount a candidate's votes directly from the entries.
    ///
    /// Used by tally verification to cross-check the maintained counter
    /// against the entries themselves.
    pub fn recount_candidate(&self, candidate_id: &str) -> Result<u64> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        Ok(state
            .entries
            .iter()
            .filter(|vote| vote.candidate_id == candidate_id)
            .count() as u64)
    }

    /// Total number of ledger entries
    pub fn total_entries(&self) -> Result<usize> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Ledger state poisoned"))?;

        Ok(state.entries.len())
    }
}

impl Default for ElectionLedger {
    fn default() -> Self {
        Self::new()
    }
}
