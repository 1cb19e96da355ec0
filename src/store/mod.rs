//! Election store: ledger, tallies, eligibility directory, and admission
//!
//! All vote mutation flows through [`VoteAdmission`]; the ledger is the
//! single source of truth and the only component holding vote state.

pub mod admission;
pub mod ledger;
pub mod registry;
pub mod tally;

// Re-export ledger types
pub use ledger::ElectionLedger;

// Re-export eligibility directory
pub use registry::ElectionRegistry;

// Re-export admission types
pub use admission::{CastOutcome, RejectReason, VoteAdmission, VotingStatus};

// Re-export tally types
pub use tally::{TallyAudit, TallyMismatch, TallyStore};
