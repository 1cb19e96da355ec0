//! # Core Types for the Election Store
//!
//! Fundamental data structures shared by the ledger, tally store, and
//! admission control.
//!
//! ## Entity Categories
//!
//! - [`Election`]: election metadata, timing window, and lifecycle status
//! - [`Candidate`]: ballot options with an approval flag and owning election
//! - [`Voter`]: registered voters with an approval flag
//! - [`Vote`]: one accepted ledger entry, append-only once written
//! - [`CandidateTally`]: aggregated per-candidate results
//!
//! Whether a voter has already voted is deliberately *not* a field on
//! [`Voter`]: it is derived from the ledger per (voter, election), so a
//! voter can participate in any number of independent elections.
//!
//! ## Usage Example
//!
//! ```rust
//! use ballotbox::types::Election;
//! use chrono::Utc;
//! use uuid::Uuid;
//!
//! let now = Utc::now().timestamp();
//! let election = Election {
//!     id: Uuid::new_v4(),
//!     title: "Student Council 2026".to_string(),
//!     description: None,
//!     start_time: now - 3600,
//!     end_time: now + 3600,
//!     active: true,
//!     created_at: Utc::now(),
//! };
//!
//! assert!(election.is_accepting_votes());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unix timestamp (seconds since epoch, UTC) for election time windows
pub type Timestamp = i64;

/// Election metadata and lifecycle state
///
/// An election accepts votes only while it is administratively active *and*
/// the current time falls inside its `[start_time, end_time]` window. The
/// `active` flag is the emergency stop: flipping it closes the election
/// regardless of timing. Elections are never deleted while votes reference
/// them; closing is the only terminal transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Election {
    /// Unique election identifier
    pub id: Uuid,

    /// Human-readable election title
    pub title: String,

    /// Optional detailed election description
    pub description: Option<String>,

    /// Voting window start (Unix timestamp)
    pub start_time: Timestamp,

    /// Voting window end (Unix timestamp)
    pub end_time: Timestamp,

    /// Whether the election is administratively active
    pub active: bool,

    /// When this election record was created
    pub created_at: DateTime<Utc>,
}

impl Election {
    /// Check if the election is currently accepting votes
    ///
    /// Returns `true` only when the election is active and the current time
    /// is inside the voting window.
    pub fn is_accepting_votes(&self) -> bool {
        let now = Utc::now().timestamp();
        self.active && now >= self.start_time && now <= self.end_time
    }

    /// Check if the election is scheduled for the future
    pub fn is_future(&self) -> bool {
        let now = Utc::now().timestamp();
        now < self.start_time
    }

    /// Check if the election window has ended
    pub fn has_ended(&self) -> bool {
        let now = Utc::now().timestamp();
        now > self.end_time
    }
}

/// A ballot option within a single election
///
/// Each candidate belongs to exactly one election and may only receive
/// votes after approval. The denormalized vote counter lives in the ledger
/// (updated in the same critical section as the append), not here, so a
/// `Candidate` value can never go stale against the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Unique candidate identifier within the election
    pub id: String,

    /// ID of the election this candidate participates in
    pub election_id: Uuid,

    /// Candidate's display name
    pub name: String,

    /// Optional candidate description or platform
    pub description: Option<String>,

    /// Whether the candidate has been approved to receive votes
    pub approved: bool,
}

impl Candidate {
    /// Check whether this candidate may receive votes in the given election
    pub fn is_votable_in(&self, election_id: &Uuid) -> bool {
        self.approved && self.election_id == *election_id
    }
}

/// A registered voter
///
/// Registration and approval workflows live upstream; admission control
/// trusts the `approved` flag once set. Note the absence of a `has_voted`
/// field: that state belongs to the ledger, per (voter, election).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Voter {
    /// Unique voter identifier (e.g. a roll number)
    pub id: String,

    /// Voter's display name
    pub name: String,

    /// Whether the voter has been approved to vote
    pub approved: bool,

    /// When this voter record was created
    pub registered_at: DateTime<Utc>,
}

/// One accepted vote, as recorded in the election ledger
///
/// Append-only: once written a `Vote` is never updated or deleted. At most
/// one entry may exist per (voter, election); the ledger enforces this
/// inside its own critical section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    /// Unique vote identifier
    pub vote_id: Uuid,

    /// ID of the voter who cast this vote
    pub voter_id: String,

    /// ID of the candidate this vote was cast for
    pub candidate_id: String,

    /// ID of the election this vote belongs to
    pub election_id: Uuid,

    /// When the vote was accepted
    pub cast_at: DateTime<Utc>,
}

impl Vote {
    /// Create a new vote record with a fresh id and the current time
    pub fn new(voter_id: impl Into<String>, candidate_id: impl Into<String>, election_id: Uuid) -> Self {
        Self {
            vote_id: Uuid::new_v4(),
            voter_id: voter_id.into(),
            candidate_id: candidate_id.into(),
            election_id,
            cast_at: Utc::now(),
        }
    }
}

/// Aggregated result line for one candidate
///
/// Computed from the ledger; `percentage` is relative to all votes cast in
/// the candidate's election and is 0.0 when the election has no votes yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTally {
    /// Unique identifier of the candidate
    pub candidate_id: String,

    /// Candidate name for display purposes
    pub candidate_name: Option<String>,

    /// Total number of votes received by this candidate
    pub vote_count: u64,

    /// Percentage of all votes cast in the election
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_election_timing() {
        let now = Utc::now().timestamp();

        // Future election
        let future_election = Election {
            id: Uuid::new_v4(),
            title: "Future Election".to_string(),
            description: None,
            start_time: now + 3600,
            end_time: now + 7200,
            active: true,
            created_at: Utc::now(),
        };

        assert!(future_election.is_future());
        assert!(!future_election.is_accepting_votes());
        assert!(!future_election.has_ended());

        // Active election
        let active_election = Election {
            start_time: now - 3600,
            end_time: now + 3600,
            ..future_election.clone()
        };

        assert!(!active_election.is_future());
        assert!(active_election.is_accepting_votes());
        assert!(!active_election.has_ended());

        // Ended election
        let ended_election = Election {
            start_time: now - 7200,
            end_time: now - 3600,
            ..future_election.clone()
        };

        assert!(!ended_election.is_future());
        assert!(!ended_election.is_accepting_votes());
        assert!(ended_election.has_ended());

        // Administratively stopped election inside its window
        let stopped_election = Election {
            start_time: now - 3600,
            end_time: now + 3600,
            active: false,
            ..future_election
        };

        assert!(!stopped_election.is_accepting_votes());
    }

    #[test]
    fn test_candidate_votability() {
        let election_id = Uuid::new_v4();
        let candidate = Candidate {
            id: "c5".to_string(),
            election_id,
            name: "Alice Smith".to_string(),
            description: None,
            approved: true,
        };

        assert!(candidate.is_votable_in(&election_id));
        assert!(!candidate.is_votable_in(&Uuid::new_v4()));

        let pending = Candidate {
            approved: false,
            ..candidate
        };
        assert!(!pending.is_votable_in(&election_id));
    }

    #[test]
    fn test_vote_construction() {
        let election_id = Uuid::new_v4();
        let vote = Vote::new("v101", "c5", election_id);

        assert_eq!(vote.voter_id, "v101");
        assert_eq!(vote.candidate_id, "c5");
        assert_eq!(vote.election_id, election_id);

        let other = Vote::new("v101", "c5", election_id);
        assert_ne!(vote.vote_id, other.vote_id);
    }
}
