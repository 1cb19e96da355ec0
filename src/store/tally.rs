//! Tally reads over the election ledger
//!
//! Tallies are served from the counters the ledger maintains inside its own
//! append critical section, so a read here can never observe a vote without
//! its increment or vice versa. `verify` cross-checks those counters against
//! a recount of the raw entries for audit purposes.

use crate::store::{ElectionLedger, ElectionRegistry};
use crate::types::CandidateTally;
use crate::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Divergence between a maintained counter and a recount of the entries
#[derive(Debug, Clone, PartialEq)]
pub struct TallyMismatch {
    pub candidate_id: String,
    pub counter: u64,
    pub recount: u64,
}

/// Result of a tally verification pass
#[derive(Debug, Clone)]
pub struct TallyAudit {
    /// Number of candidates checked
    pub checked: usize,
    /// Counter/recount divergences found (empty when consistent)
    pub mismatches: Vec<TallyMismatch>,
}

impl TallyAudit {
    /// Whether every counter matched its recount
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Read-side tally store over a registry and a ledger
pub struct TallyStore {
    registry: Arc<ElectionRegistry>,
    ledger: Arc<ElectionLedger>,
}

impl TallyStore {
    /// Create a tally store over the given registry and ledger
    pub fn new(registry: Arc<ElectionRegistry>, ledger: Arc<ElectionLedger>) -> Self {
        Self { registry, ledger }
    }

    /// Current vote count for a candidate
    pub fn tally(&self, candidate_id: &str) -> Result<u64> {
        self.ledger.count_by_candidate(candidate_id)
    }

    /// Total votes cast in an election
    pub fn total_votes(&self, election_id: &Uuid) -> Result<u64> {
        self.ledger.count_by_election(election_id)
    }

    /// Per-candidate results for an election, highest tally first.
    ///
    /// Covers the election's approved candidates; percentages are relative
    /// to the election's total and 0.0 when no votes have been cast.
    pub fn results(&self, election_id: &Uuid) -> Result<Vec<CandidateTally>> {
        let candidates = self.registry.approved_candidates(election_id)?;
        let total = self.ledger.count_by_election(election_id)?;

        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let vote_count = self.ledger.count_by_candidate(&candidate.id)?;
            let percentage = if total > 0 {
                (vote_count as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            results.push(CandidateTally {
                candidate_id: candidate.id,
                candidate_name: Some(candidate.name),
                vote_count,
                percentage,
            });
        }

        results.sort_by(|a, b| {
            b.vote_count
                .cmp(&a.vote_count)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });

        Ok(results)
    }

    /// Cross-check maintained counters against a recount of the entries.
    ///
    /// Checks every candidate registered for the election, approved or not;
    /// an unapproved candidate must always recount to its counter too.
    pub fn verify(&self, election_id: &Uuid) -> Result<TallyAudit> {
        let candidates = self.registry.candidates_for(election_id)?;

        let mut mismatches = Vec::new();
        for candidate in &candidates {
            let counter = self.ledger.count_by_candidate(&candidate.id)?;
            let recount = self.ledger.recount_candidate(&candidate.id)?;
            if counter != recount {
                mismatches.push(TallyMismatch {
                    candidate_id: candidate.id.clone(),
                    counter,
                    recount,
                });
            }
        }

        if !mismatches.is_empty() {
            tracing::error!(
                "Tally verification failed for election {}: {} mismatches",
                election_id,
                mismatches.len()
            );
        }

        Ok(TallyAudit {
            checked: candidates.len(),
            mismatches,
        })
    }
}
