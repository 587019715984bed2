//! Governor: proposal registry and voting orchestration.
//!
//! The governor owns proposal records, tallies votes against the ledger
//! snapshot taken at proposal creation, and drives the timelock for queuing
//! and execution. Proposal state is a pure function of the stored record and
//! the current block/time.

use std::collections::HashMap;

use covenant_ledger::VotingLedger;
use covenant_timelock::{Call, TargetRegistry, Timelock};
use covenant_types::{Address, GovernanceConfig, Hash};

use crate::error::GovernorError;
use crate::proposal::{Proposal, ProposalState, VoteCast, VoteSupport};

/// Token-weighted governor with timelocked execution.
#[derive(Debug)]
pub struct Governor {
    /// The governor's own identity; it schedules on the timelock as this
    address: Address,
    voting_delay: u64,
    voting_period: u64,
    quorum_percent: u8,
    grace_period: u64,
    proposals: HashMap<Hash, Proposal>,
}

impl Governor {
    /// Create a governor with the given parameters.
    ///
    /// The config must pass [`GovernanceConfig::validate`]; in particular
    /// `voting_delay >= 1`, which keeps the snapshot strictly historical by
    /// the time voting opens.
    pub fn new(address: Address, config: &GovernanceConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid governance config");
        Self {
            address,
            voting_delay: config.voting_delay,
            voting_period: config.voting_period,
            quorum_percent: config.quorum_percent,
            grace_period: config.grace_period,
            proposals: HashMap::new(),
        }
    }

    /// The governor's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Proposal identifier: blake3 over the canonical encoding of
    /// (calls, description hash).
    pub fn hash_proposal(calls: &[Call], description_hash: Hash) -> Hash {
        let encoded = borsh::to_vec(&(calls.to_vec(), description_hash))
            .expect("borsh encoding of in-memory calls cannot fail");
        Hash::compute(&encoded)
    }

    /// Hash of a proposal description.
    pub fn hash_description(description: &str) -> Hash {
        Hash::compute(description.as_bytes())
    }

    /// Create a proposal. Open to any account; the snapshot index is the
    /// current block, and voting opens `voting_delay` blocks later.
    pub fn propose(
        &mut self,
        proposer: Address,
        calls: Vec<Call>,
        description: &str,
        current_block: u64,
    ) -> Result<Hash, GovernorError> {
        if calls.is_empty() {
            return Err(GovernorError::EmptyProposal);
        }

        let description_hash = Self::hash_description(description);
        let id = Self::hash_proposal(&calls, description_hash);
        if self.proposals.contains_key(&id) {
            return Err(GovernorError::DuplicateProposal(id));
        }

        let proposal = Proposal::new(
            id,
            proposer,
            calls,
            description_hash,
            current_block,
            self.voting_delay,
            self.voting_period,
        );
        tracing::info!(
            proposal = %id,
            proposer = %proposer,
            snapshot = proposal.snapshot,
            vote_start = proposal.vote_start,
            vote_end = proposal.vote_end,
            "proposal created"
        );
        self.proposals.insert(id, proposal);
        Ok(id)
    }

    /// Look up a proposal record.
    pub fn proposal(&self, id: &Hash) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    /// Snapshot block of a proposal.
    pub fn proposal_snapshot(&self, id: &Hash) -> Result<u64, GovernorError> {
        Ok(self.get(id)?.snapshot)
    }

    /// Last block of a proposal's voting window.
    pub fn proposal_deadline(&self, id: &Hash) -> Result<u64, GovernorError> {
        Ok(self.get(id)?.vote_end)
    }

    /// Number of proposals ever created.
    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Minimum participating power for a proposal snapshotted at `snapshot`:
    /// `quorum_percent` of the total supply at that block.
    pub fn quorum(
        &self,
        snapshot: u64,
        ledger: &VotingLedger,
        current_block: u64,
    ) -> Result<u128, GovernorError> {
        let supply = ledger.past_total_supply(snapshot, current_block)?;
        Ok(supply * self.quorum_percent as u128 / 100)
    }

    /// Derived proposal state at the given block and time.
    pub fn state(
        &self,
        id: &Hash,
        ledger: &VotingLedger,
        current_block: u64,
        now: u64,
    ) -> Result<ProposalState, GovernorError> {
        let proposal = self.get(id)?;

        if proposal.executed {
            return Ok(ProposalState::Executed);
        }
        if proposal.canceled {
            return Ok(ProposalState::Canceled);
        }
        if current_block < proposal.vote_start {
            return Ok(ProposalState::Pending);
        }
        if current_block < proposal.vote_end {
            return Ok(ProposalState::Active);
        }

        // Voting is over; a queued proposal only waits on the timelock
        if let Some(eta) = proposal.eta {
            return Ok(if now > eta + self.grace_period {
                ProposalState::Expired
            } else {
                ProposalState::Queued
            });
        }

        let quorum = self.quorum(proposal.snapshot, ledger, current_block)?;
        if proposal.vote_succeeded() && proposal.participation() >= quorum {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }

    /// Cast a vote with the voter's power at the proposal snapshot.
    pub fn cast_vote(
        &mut self,
        voter: Address,
        id: &Hash,
        support: VoteSupport,
        ledger: &VotingLedger,
        current_block: u64,
    ) -> Result<VoteCast, GovernorError> {
        self.vote(voter, id, support, None, ledger, current_block)
    }

    /// Cast a vote carrying a human-readable reason.
    pub fn cast_vote_with_reason(
        &mut self,
        voter: Address,
        id: &Hash,
        support: VoteSupport,
        reason: impl Into<String>,
        ledger: &VotingLedger,
        current_block: u64,
    ) -> Result<VoteCast, GovernorError> {
        self.vote(voter, id, support, Some(reason.into()), ledger, current_block)
    }

    fn vote(
        &mut self,
        voter: Address,
        id: &Hash,
        support: VoteSupport,
        reason: Option<String>,
        ledger: &VotingLedger,
        current_block: u64,
    ) -> Result<VoteCast, GovernorError> {
        // Voting state only depends on the block, not on queue timing
        let state = self.state(id, ledger, current_block, 0)?;
        if state != ProposalState::Active {
            return Err(GovernorError::NotActive(state));
        }

        let proposal = self.get(id)?;
        if proposal.has_voted(&voter) {
            return Err(GovernorError::AlreadyVoted(voter));
        }

        let weight = ledger.past_votes(&voter, proposal.snapshot, current_block)?;
        if weight == 0 {
            return Err(GovernorError::ZeroWeight(voter));
        }

        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernorError::ProposalNotFound(*id))?;
        proposal.record_vote(voter, support, weight);

        let event = VoteCast {
            voter,
            proposal: *id,
            support,
            weight,
            reason,
        };
        tracing::info!(
            proposal = %id,
            voter = %voter,
            support = ?support,
            weight,
            reason = event.reason.as_deref().unwrap_or(""),
            "vote cast"
        );
        Ok(event)
    }

    /// Cancel a proposal. Only the original proposer may cancel, and only
    /// while the proposal is still pending.
    pub fn cancel(
        &mut self,
        caller: Address,
        calls: &[Call],
        description_hash: Hash,
        ledger: &VotingLedger,
        current_block: u64,
        now: u64,
    ) -> Result<Hash, GovernorError> {
        let id = Self::hash_proposal(calls, description_hash);

        let proposal = self.get(&id)?;
        if caller != proposal.proposer {
            return Err(GovernorError::Unauthorized(
                "only the proposer can cancel".to_string(),
            ));
        }

        let state = self.state(&id, ledger, current_block, now)?;
        if state != ProposalState::Pending {
            return Err(GovernorError::WrongState {
                expected: ProposalState::Pending,
                actual: state,
            });
        }

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernorError::ProposalNotFound(id))?;
        proposal.canceled = true;
        tracing::info!(proposal = %id, "proposal cancelled");
        Ok(id)
    }

    /// Queue a succeeded proposal on the timelock. Open to any account.
    pub fn queue(
        &mut self,
        calls: &[Call],
        description_hash: Hash,
        ledger: &VotingLedger,
        timelock: &mut Timelock,
        current_block: u64,
        now: u64,
    ) -> Result<Hash, GovernorError> {
        let id = Self::hash_proposal(calls, description_hash);

        let state = self.state(&id, ledger, current_block, now)?;
        if state != ProposalState::Succeeded {
            return Err(GovernorError::WrongState {
                expected: ProposalState::Succeeded,
                actual: state,
            });
        }

        let delay = timelock.min_delay();
        timelock.schedule(
            self.address,
            calls,
            Hash::ZERO,
            description_hash,
            delay,
            now,
        )?;

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernorError::ProposalNotFound(id))?;
        proposal.eta = Some(now + delay);
        tracing::info!(proposal = %id, eta = now + delay, "proposal queued");
        Ok(id)
    }

    /// Execute a queued proposal through the timelock. The caller identity
    /// is passed through for the executor-role check, so an open executor
    /// role makes this permissionless.
    pub fn execute(
        &mut self,
        caller: Address,
        calls: &[Call],
        description_hash: Hash,
        ledger: &VotingLedger,
        timelock: &mut Timelock,
        registry: &mut TargetRegistry,
        current_block: u64,
        now: u64,
    ) -> Result<Hash, GovernorError> {
        let id = Self::hash_proposal(calls, description_hash);

        let state = self.state(&id, ledger, current_block, now)?;
        if state != ProposalState::Queued {
            return Err(GovernorError::WrongState {
                expected: ProposalState::Queued,
                actual: state,
            });
        }

        timelock.execute(caller, calls, Hash::ZERO, description_hash, now, registry)?;

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernorError::ProposalNotFound(id))?;
        proposal.executed = true;
        tracing::info!(proposal = %id, "proposal executed");
        Ok(id)
    }

    fn get(&self, id: &Hash) -> Result<&Proposal, GovernorError> {
        self.proposals
            .get(id)
            .ok_or(GovernorError::ProposalNotFound(*id))
    }
}
