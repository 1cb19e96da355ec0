//! Eligibility directory for elections, candidates, and voters
//!
//! Admission control reads this directory to decide who may vote for whom.
//! Registration and approval workflows proper live upstream; the directory
//! only offers the minimal population and approval surface a host needs to
//! load it, and trusts `approved` once asserted.

use crate::types::{Candidate, Election, Voter};
use crate::{Error, Result, storage_error, validation_error};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct RegistryState {
    elections: HashMap<Uuid, Election>,
    candidates: HashMap<String, Candidate>,
    voters: HashMap<String, Voter>,
}

/// In-process directory of elections, candidates, and voters
pub struct ElectionRegistry {
    state: RwLock<RegistryState>,
}

impl ElectionRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Register an election
    pub fn insert_election(&self, election: Election) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        if state.elections.contains_key(&election.id) {
            return Err(validation_error!("Election {} already registered", election.id));
        }

        tracing::debug!("Election registered: {} ({})", election.id, election.title);
        state.elections.insert(election.id, election);
        Ok(())
    }

    /// Register a candidate; the owning election must already exist
    pub fn insert_candidate(&self, candidate: Candidate) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        if !state.elections.contains_key(&candidate.election_id) {
            return Err(validation_error!(
                "Candidate {} references unknown election {}",
                candidate.id,
                candidate.election_id
            ));
        }
        if state.candidates.contains_key(&candidate.id) {
            return Err(validation_error!("Candidate {} already registered", candidate.id));
        }

        state.candidates.insert(candidate.id.clone(), candidate);
        Ok(())
    }

    /// Register a voter
    pub fn insert_voter(&self, voter: Voter) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        if state.voters.contains_key(&voter.id) {
            return Err(validation_error!("Voter {} already registered", voter.id));
        }

        state.voters.insert(voter.id.clone(), voter);
        Ok(())
    }

    /// Approve a registered candidate
    pub fn approve_candidate(&self, candidate_id: &str) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        let candidate = state
            .candidates
            .get_mut(candidate_id)
            .ok_or_else(|| Error::not_found("candidate", candidate_id))?;
        candidate.approved = true;
        Ok(())
    }

    /// Approve a registered voter
    pub fn approve_voter(&self, voter_id: &str) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        let voter = state
            .voters
            .get_mut(voter_id)
            .ok_or_else(|| Error::not_found("voter", voter_id))?;
        voter.approved = true;
        Ok(())
    }

    /// Close an election (active -> closed); the terminal transition
    pub fn close_election(&self, election_id: &Uuid) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        let election = state
            .elections
            .get_mut(election_id)
            .ok_or_else(|| Error::not_found("election", election_id.to_string()))?;
        election.active = false;

        tracing::info!("Election closed: {} ({})", election.id, election.title);
        Ok(())
    }

    /// Look up an election by id
    pub fn election(&self, election_id: &Uuid) -> Result<Option<Election>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        Ok(state.elections.get(election_id).cloned())
    }

    /// Look up a candidate by id
    pub fn candidate(&self, candidate_id: &str) -> Result<Option<Candidate>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        Ok(state.candidates.get(candidate_id).cloned())
    }

    /// Look up a voter by id
    pub fn voter(&self, voter_id: &str) -> Result<Option<Voter>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        Ok(state.voters.get(voter_id).cloned())
    }

    /// All candidates registered for an election, approved or not
    pub fn candidates_for(&self, election_id: &Uuid) -> Result<Vec<Candidate>> {
        let state = self
            .state
            .read()
            .map_err(|_| storage_error!("Registry state poisoned"))?;

        let mut candidates: Vec<Candidate> = state
            .candidates
            .values()
            .filter(|candidate| candidate.election_id == *election_id)
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(candidates)
    }

    /// Approved candidates for an election
    pub fn approved_candidates(&self, election_id: &Uuid) -> Result<Vec<Candidate>> {
        Ok(self
            .candidates_for(election_id)?
            .into_iter()
            .filter(|candidate| candidate.approved)
            .collect())
    }
}

impl Default for ElectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
