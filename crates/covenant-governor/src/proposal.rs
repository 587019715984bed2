//! Proposal records and their derived lifecycle.
//!
//! A proposal is an immutable append-only record (calls, description hash,
//! window boundaries) plus a handful of mutable tally fields. Its state is
//! never stored: the governor derives it from the record and the current
//! block/time on every query.

use std::collections::HashSet;

use covenant_timelock::Call;
use covenant_types::{Address, Hash};

/// Derived proposal lifecycle state.
///
/// `Pending -> Active -> {Canceled | Defeated | Succeeded}`;
/// `Succeeded -> Queued -> {Executed | Expired}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalState {
    /// Created, voting not yet open
    Pending,
    /// Voting window open
    Active,
    /// Cancelled by the proposer before voting opened
    Canceled,
    /// Voting closed without majority or quorum
    Defeated,
    /// Voting closed with majority and quorum, not yet queued
    Succeeded,
    /// Scheduled on the timelock, waiting out the delay
    Queued,
    /// Queued but not executed within the grace window
    Expired,
    /// Executed through the timelock
    Executed,
}

/// Vote options. The discriminants match the wire convention
/// (0 = against, 1 = for, 2 = abstain).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSupport {
    Against = 0,
    For = 1,
    Abstain = 2,
}

/// Observable record of a cast vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCast {
    pub voter: Address,
    pub proposal: Hash,
    pub support: VoteSupport,
    pub weight: u128,
    pub reason: Option<String>,
}

/// A governance proposal.
#[derive(Debug, Clone)]
pub struct Proposal {
    /// Identifier: hash of (calls, description hash)
    pub id: Hash,
    /// Account that created the proposal
    pub proposer: Address,
    /// Call batch forwarded to the timelock on execution
    pub calls: Vec<Call>,
    /// Hash of the human-readable description
    pub description_hash: Hash,
    /// Ledger index at creation; all vote weights are read here
    pub snapshot: u64,
    /// First block of the voting window
    pub vote_start: u64,
    /// First block after the voting window
    pub vote_end: u64,
    /// Weighted tallies
    pub against_votes: u128,
    pub for_votes: u128,
    pub abstain_votes: u128,
    /// Accounts that have voted
    voters: HashSet<Address>,
    /// Set by a proposer cancellation while pending
    pub canceled: bool,
    /// Timelock ready-time once queued
    pub eta: Option<u64>,
    /// Set once executed through the timelock
    pub executed: bool,
}

impl Proposal {
    /// Create a proposal record. The snapshot is the creation block; voting
    /// runs over `[vote_start, vote_end)`.
    pub fn new(
        id: Hash,
        proposer: Address,
        calls: Vec<Call>,
        description_hash: Hash,
        created: u64,
        voting_delay: u64,
        voting_period: u64,
    ) -> Self {
        let vote_start = created + voting_delay;
        Self {
            id,
            proposer,
            calls,
            description_hash,
            snapshot: created,
            vote_start,
            vote_end: vote_start + voting_period,
            against_votes: 0,
            for_votes: 0,
            abstain_votes: 0,
            voters: HashSet::new(),
            canceled: false,
            eta: None,
            executed: false,
        }
    }

    /// Whether an account has already voted.
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains(voter)
    }

    /// Add a validated vote to the tallies.
    pub fn record_vote(&mut self, voter: Address, support: VoteSupport, weight: u128) {
        match support {
            VoteSupport::Against => self.against_votes = self.against_votes.saturating_add(weight),
            VoteSupport::For => self.for_votes = self.for_votes.saturating_add(weight),
            VoteSupport::Abstain => self.abstain_votes = self.abstain_votes.saturating_add(weight),
        }
        self.voters.insert(voter);
    }

    /// Total participating power across all three buckets.
    pub fn participation(&self) -> u128 {
        self.for_votes
            .saturating_add(self.against_votes)
            .saturating_add(self.abstain_votes)
    }

    /// Strict-majority check: a tie is a defeat.
    pub fn vote_succeeded(&self) -> bool {
        self.for_votes > self.against_votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(n: u8) -> Address {
        let mut addr = [0u8; 20];
        addr[19] = n;
        Address::from_bytes(addr)
    }

    fn test_proposal() -> Proposal {
        Proposal::new(
            Hash::compute(b"prop"),
            test_address(1),
            vec![Call::new(test_address(9), vec![1])],
            Hash::compute(b"desc"),
            10,
            1,
            50,
        )
    }

    #[test]
    fn test_window_boundaries() {
        let proposal = test_proposal();
        assert_eq!(proposal.snapshot, 10);
        assert_eq!(proposal.vote_start, 11);
        assert_eq!(proposal.vote_end, 61);
    }

    #[test]
    fn test_tallies_and_voters() {
        let mut proposal = test_proposal();
        let alice = test_address(2);
        let bob = test_address(3);

        proposal.record_vote(alice, VoteSupport::For, 100);
        proposal.record_vote(bob, VoteSupport::Abstain, 40);

        assert_eq!(proposal.for_votes, 100);
        assert_eq!(proposal.abstain_votes, 40);
        assert_eq!(proposal.participation(), 140);
        assert!(proposal.has_voted(&alice));
        assert!(!proposal.has_voted(&test_address(4)));
    }

    #[test]
    fn test_tie_is_not_success() {
        let mut proposal = test_proposal();
        proposal.record_vote(test_address(2), VoteSupport::For, 50);
        proposal.record_vote(test_address(3), VoteSupport::Against, 50);
        assert!(!proposal.vote_succeeded());

        proposal.record_vote(test_address(4), VoteSupport::For, 1);
        assert!(proposal.vote_succeeded());
    }

    #[test]
    fn test_abstain_counts_toward_participation_only() {
        let mut proposal = test_proposal();
        proposal.record_vote(test_address(2), VoteSupport::Abstain, 500);
        assert_eq!(proposal.participation(), 500);
        assert!(!proposal.vote_succeeded());
    }
}
