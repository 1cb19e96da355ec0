//! Vote admission control
//!
//! The single mutation path into the ledger. Admission checks eligibility,
//! re-checks the duplicate condition against the ledger itself (never a
//! cached flag), and then hands off to the ledger append, whose critical
//! section commits the entry and the tally counters as one unit. Concurrent
//! casts for the same (voter, election) therefore resolve to exactly one
//! `Accepted` and the rest `Rejected(DuplicateVote)`.
//!
//! Rejections are values, not errors: `Err(_)` is reserved for storage and
//! internal failures, which callers may retry because admission re-checks
//! the duplicate condition on every attempt.

use crate::config::StoreConfig;
use crate::store::{ElectionLedger, ElectionRegistry};
use crate::types::Vote;
use crate::{Error, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Why a cast was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Voter already has a ledger entry for this election
    DuplicateVote { existing: Vote },

    /// Voter is unknown or not approved
    IneligibleVoter { reason: String },

    /// Candidate is unknown, not approved, or belongs to another election
    IneligibleCandidate { reason: String },

    /// Election is unknown, closed, or outside its voting window
    ElectionNotActive,
}

/// Outcome of a cast-vote request
#[derive(Debug, Clone, PartialEq)]
pub enum CastOutcome {
    /// Vote accepted and recorded in the ledger
    Accepted(Vote),

    /// Vote rejected with no observable side effects
    Rejected(RejectReason),
}

impl CastOutcome {
    /// Check whether the vote was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Eligibility snapshot for one (voter, election) pair
#[derive(Debug, Clone)]
pub struct VotingStatus {
    /// Whether the voter is registered at all
    pub registered: bool,
    /// Whether the voter has been approved
    pub approved: bool,
    /// Whether the election is currently accepting votes
    pub election_open: bool,
    /// The ballot already cast in this election, if any
    pub ballot: Option<Vote>,
}

impl VotingStatus {
    /// Check if the voter can still cast a vote in this election
    pub fn can_vote(&self) -> bool {
        self.registered && self.approved && self.election_open && self.ballot.is_none()
    }

    /// Human-readable reason why voting is blocked, if it is
    pub fn blocking_reason(&self) -> Option<String> {
        if let Some(ballot) = &self.ballot {
            Some(format!("Already voted at {}", ballot.cast_at))
        } else if !self.registered {
            Some("Voter is not registered".to_string())
        } else if !self.approved {
            Some("Voter is not approved".to_string())
        } else if !self.election_open {
            Some("Election is not accepting votes".to_string())
        } else {
            None
        }
    }
}

/// Admission control over a registry and a ledger
///
/// Both collaborators are explicit dependencies; nothing else in the crate
/// writes the ledger.
pub struct VoteAdmission {
    registry: Arc<ElectionRegistry>,
    ledger: Arc<ElectionLedger>,
    config: StoreConfig,
}

impl VoteAdmission {
    /// Create admission control with default store configuration
    pub fn new(registry: Arc<ElectionRegistry>, ledger: Arc<ElectionLedger>) -> Self {
        Self::with_config(registry, ledger, StoreConfig::default())
    }

    /// Create admission control with explicit store configuration
    pub fn with_config(
        registry: Arc<ElectionRegistry>,
        ledger: Arc<ElectionLedger>,
        config: StoreConfig,
    ) -> Self {
        Self {
            registry,
            ledger,
            config,
        }
    }

    /// Attempt to cast a vote.
    ///
    /// Admission flow:
    /// 1. Voter must exist and be approved
    /// 2. Election must be accepting votes
    /// 3. Candidate must exist, be approved, and belong to the election
    /// 4. Voter must not already have a ledger entry for this election
    /// 5. Ledger append commits the entry and the tally bump together
    ///
    /// Step 4 is advisory; the append in step 5 re-checks it under the
    /// ledger's write lock, which is what actually closes the race between
    /// check and write.
    pub fn cast_vote(
        &self,
        voter_id: &str,
        candidate_id: &str,
        election_id: &Uuid,
    ) -> Result<CastOutcome> {
        let voter = match self.registry.voter(voter_id)? {
            Some(voter) => voter,
            None => {
                return Ok(Self::reject(RejectReason::IneligibleVoter {
                    reason: format!("Voter {voter_id} is not registered"),
                }));
            }
        };
        if !voter.approved {
            return Ok(Self::reject(RejectReason::IneligibleVoter {
                reason: format!("Voter {voter_id} is not approved"),
            }));
        }

        let election = match self.registry.election(election_id)? {
            Some(election) => election,
            None => return Ok(Self::reject(RejectReason::ElectionNotActive)),
        };
        if !election.is_accepting_votes() {
            return Ok(Self::reject(RejectReason::ElectionNotActive));
        }

        let candidate = match self.registry.candidate(candidate_id)? {
            Some(candidate) => candidate,
            None => {
                return Ok(Self::reject(RejectReason::IneligibleCandidate {
                    reason: format!("Candidate {candidate_id} is not registered"),
                }));
            }
        };
        if candidate.election_id != *election_id {
            return Ok(Self::reject(RejectReason::IneligibleCandidate {
                reason: format!(
                    "Candidate {candidate_id} belongs to election {}",
                    candidate.election_id
                ),
            }));
        }
        if !candidate.approved {
            return Ok(Self::reject(RejectReason::IneligibleCandidate {
                reason: format!("Candidate {candidate_id} is not approved"),
            }));
        }

        if let Some(existing) = self.ledger.ballot_for(voter_id, election_id)? {
            return Ok(Self::reject(RejectReason::DuplicateVote { existing }));
        }

        match self.ledger.append(voter_id, candidate_id, election_id) {
            Ok(vote) => {
                tracing::info!(
                    "Vote accepted: voter={}, candidate={}, election={}",
                    voter_id,
                    candidate_id,
                    election_id
                );
                Ok(CastOutcome::Accepted(vote))
            }
            // Lost the race against a concurrent cast for the same voter
            Err(Error::DuplicateVote { .. }) => {
                let existing = self
                    .ledger
                    .ballot_for(voter_id, election_id)?
                    .ok_or_else(|| Error::internal("Duplicate reported but ballot missing"))?;
                Ok(Self::reject(RejectReason::DuplicateVote { existing }))
            }
            Err(other) => Err(other),
        }
    }

    /// Cast a vote, retrying transient storage failures.
    ///
    /// Retries only errors flagged retryable, up to the configured attempt
    /// count. Safe because every attempt re-runs the full admission flow,
    /// so a cast that already landed resolves to `Rejected(DuplicateVote)`.
    pub fn cast_vote_with_retry(
        &self,
        voter_id: &str,
        candidate_id: &str,
        election_id: &Uuid,
    ) -> Result<CastOutcome> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.cast_vote(voter_id, candidate_id, election_id) {
                Err(error) if error.is_retryable() && attempt < self.config.max_retry_attempts => {
                    tracing::warn!(
                        "Transient storage failure on attempt {}/{}: {}",
                        attempt,
                        self.config.max_retry_attempts,
                        error
                    );
                    std::thread::sleep(std::time::Duration::from_millis(
                        self.config.retry_backoff_ms,
                    ));
                }
                result => return result,
            }
        }
    }

    /// Eligibility snapshot for a voter in an election
    pub fn voting_status(&self, voter_id: &str, election_id: &Uuid) -> Result<VotingStatus> {
        let voter = self.registry.voter(voter_id)?;
        let election_open = self
            .registry
            .election(election_id)?
            .map(|election| election.is_accepting_votes())
            .unwrap_or(false);
        let ballot = self.ledger.ballot_for(voter_id, election_id)?;

        Ok(VotingStatus {
            registered: voter.is_some(),
            approved: voter.map(|voter| voter.approved).unwrap_or(false),
            election_open,
            ballot,
        })
    }

    fn reject(reason: RejectReason) -> CastOutcome {
        tracing::info!("Vote rejected: {:?}", reason);
        CastOutcome::Rejected(reason)
    }
}
