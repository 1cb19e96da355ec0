//! Campus election vote ledger with admission control
//!
//! Records at most one vote per voter per election and keeps per-candidate
//! tallies exactly equal to the ledger, under arbitrary concurrency.

pub mod config;
pub mod errors;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};
pub use store::{CastOutcome, ElectionLedger, ElectionRegistry, RejectReason, TallyStore, VoteAdmission};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the election store with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ballotbox=info".into()),
        )
        .init();

    tracing::info!("🗳️  ballotbox v{} initialized", VERSION);
    Ok(())
}
