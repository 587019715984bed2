//! Full governance lifecycle over a bootstrapped deployment.

use covenant_governor::{GovernorError, ProposalState, VoteSupport};
use covenant_node::{bootstrap, Dao, NodeError};
use covenant_timelock::TimelockError;
use covenant_types::{Address, GovernanceConfig};

fn addr(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::from_bytes(bytes)
}

/// Bootstrap with the local config and hand `amount` tokens, self-delegated,
/// to each of the given accounts.
fn deployment_with_holders(holders: &[(Address, u128)]) -> Dao {
    let deployer = addr(1);
    let mut dao = bootstrap(GovernanceConfig::local(), deployer).unwrap();
    for (account, amount) in holders {
        dao.transfer(deployer, *account, *amount).unwrap();
        dao.delegate(*account, *account);
    }
    dao
}

#[test]
fn test_proposal_passes_and_executes() {
    let alice = addr(10);
    // 6% of supply, comfortably over the 4% quorum
    let mut dao = deployment_with_holders(&[(alice, 60_000)]);

    let calls = dao.store_calls(42);
    let id = dao.propose(alice, calls.clone(), "raise stored value").unwrap();
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Active);

    dao.vote(alice, &id, VoteSupport::For).unwrap();

    // Ride out the voting period
    dao.mine(dao.config.voting_period);
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Succeeded);

    dao.queue(&calls, "raise stored value").unwrap();
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Queued);

    // The timelock delay has not elapsed yet
    let stranger = addr(99);
    let err = dao
        .execute(stranger, &calls, "raise stored value")
        .unwrap_err();
    assert!(matches!(
        err,
        NodeError::Governor(GovernorError::Timelock(TimelockError::NotReady { .. }))
    ));
    assert_eq!(dao.retrieve(), 0);

    // After the delay, any account can execute: the executor role is open
    dao.warp(dao.config.min_delay);
    dao.execute(stranger, &calls, "raise stored value").unwrap();
    assert_eq!(dao.retrieve(), 42);
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Executed);
}

#[test]
fn test_proposal_below_quorum_is_defeated() {
    let bob = addr(11);
    // 1% of supply, under the 4% quorum
    let mut dao = deployment_with_holders(&[(bob, 10_000)]);

    let calls = dao.store_calls(7);
    let id = dao.propose(bob, calls.clone(), "sneak a value in").unwrap();
    dao.vote(bob, &id, VoteSupport::For).unwrap();

    dao.mine(dao.config.voting_period);
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Defeated);

    let err = dao.queue(&calls, "sneak a value in").unwrap_err();
    assert!(matches!(
        err,
        NodeError::Governor(GovernorError::WrongState {
            expected: ProposalState::Succeeded,
            actual: ProposalState::Defeated,
        })
    ));
    assert_eq!(dao.retrieve(), 0);
}

#[test]
fn test_proposer_cancels_before_voting_opens() {
    let alice = addr(10);
    let deployer = addr(1);
    // Stretch the delay so the proposal is still pending one block later
    let mut config = GovernanceConfig::local();
    config.voting_delay = 5;
    let mut dao = bootstrap(config, deployer).unwrap();
    dao.transfer(deployer, alice, 60_000).unwrap();
    dao.delegate(alice, alice);

    let calls = dao.store_calls(13);
    let id = dao.propose(alice, calls.clone(), "changed my mind").unwrap();
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Pending);

    // Only the proposer may cancel
    let err = dao.cancel(deployer, &calls, "changed my mind").unwrap_err();
    assert!(matches!(
        err,
        NodeError::Governor(GovernorError::Unauthorized(_))
    ));

    dao.cancel(alice, &calls, "changed my mind").unwrap();
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Canceled);

    // A canceled proposal accepts no votes even inside its window
    dao.mine(10);
    let err = dao.vote(alice, &id, VoteSupport::For).unwrap_err();
    assert!(matches!(
        err,
        NodeError::Governor(GovernorError::NotActive(ProposalState::Canceled))
    ));
}

#[test]
fn test_vote_weight_fixed_at_snapshot() {
    let alice = addr(10);
    let carol = addr(12);
    let mut dao = deployment_with_holders(&[(alice, 60_000), (carol, 50_000)]);

    let calls = dao.store_calls(1);
    let id = dao.propose(alice, calls, "weights are historical").unwrap();

    // Selling everything after the snapshot does not reduce alice's weight
    dao.transfer(alice, carol, 60_000).unwrap();
    assert_eq!(dao.ledger.votes(&alice), 0);

    let cast = dao.vote(alice, &id, VoteSupport::For).unwrap();
    assert_eq!(cast.weight, 60_000);

    // And carol's vote does not count the tokens received after it
    let cast = dao.vote(carol, &id, VoteSupport::Against).unwrap();
    assert_eq!(cast.weight, 50_000);
}

#[test]
fn test_tied_vote_is_defeated() {
    let alice = addr(10);
    let bob = addr(11);
    let mut dao = deployment_with_holders(&[(alice, 50_000), (bob, 50_000)]);

    let calls = dao.store_calls(5);
    let id = dao.propose(alice, calls, "split the room").unwrap();
    dao.vote(alice, &id, VoteSupport::For).unwrap();
    dao.vote(bob, &id, VoteSupport::Against).unwrap();

    dao.mine(dao.config.voting_period);
    // Participation clears quorum but there is no strict majority
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Defeated);
}

#[test]
fn test_queued_proposal_expires_after_grace_period() {
    let alice = addr(10);
    let mut dao = deployment_with_holders(&[(alice, 60_000)]);

    let calls = dao.store_calls(3);
    let id = dao.propose(alice, calls.clone(), "left on the shelf").unwrap();
    dao.vote(alice, &id, VoteSupport::For).unwrap();
    dao.mine(dao.config.voting_period);

    dao.queue(&calls, "left on the shelf").unwrap();

    dao.warp(dao.config.min_delay + dao.config.grace_period + 1);
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Expired);

    let err = dao.execute(alice, &calls, "left on the shelf").unwrap_err();
    assert!(matches!(
        err,
        NodeError::Governor(GovernorError::WrongState {
            actual: ProposalState::Expired,
            ..
        })
    ));
}

#[test]
fn test_abstain_counts_toward_quorum() {
    let alice = addr(10);
    let bob = addr(11);
    // Alice alone is under quorum; bob's abstention pushes participation over
    let mut dao = deployment_with_holders(&[(alice, 20_000), (bob, 30_000)]);

    let calls = dao.store_calls(8);
    let id = dao
        .propose(alice, calls.clone(), "abstentions still count")
        .unwrap();
    dao.vote(alice, &id, VoteSupport::For).unwrap();
    dao.vote_with_reason(bob, &id, VoteSupport::Abstain, "no strong view")
        .unwrap();

    dao.mine(dao.config.voting_period);
    assert_eq!(dao.proposal_state(&id).unwrap(), ProposalState::Succeeded);
}
