//! Bootstrap protocol and the assembled DAO handle.
//!
//! The deployment order is load-bearing: roles are wired and the admin role
//! renounced before the governed resource changes hands, so that once
//! bootstrap returns no single account can alter roles or bypass the
//! governance cycle.

use covenant_governor::{Governor, ProposalState, VoteCast, VoteSupport};
use covenant_ledger::VotingLedger;
use covenant_timelock::{Call, Role, TargetRegistry, Timelock};
use covenant_types::{Address, GovernanceConfig, Hash};

use crate::clock::BlockClock;
use crate::error::NodeError;
use crate::value_store::ValueStore;

/// A fully wired governance deployment.
#[derive(Debug)]
pub struct Dao {
    pub clock: BlockClock,
    pub config: GovernanceConfig,
    pub ledger: VotingLedger,
    pub timelock: Timelock,
    pub governor: Governor,
    pub registry: TargetRegistry,
    /// Identity that performed the bootstrap
    pub deployer: Address,
    /// Address of the governed [`ValueStore`]
    pub value_store: Address,
}

/// Run the bootstrap protocol:
///
/// 1. Ledger with the full initial supply credited to the deployer.
/// 2. Timelock with empty proposer/executor sets, admin = deployer.
/// 3. Governor bound to the ledger and timelock.
/// 4. Proposer role to the governor, executor role to the zero address
///    (everyone), then the deployer renounces the admin role.
/// 5. Value store owned by the deployer, ownership transferred to the
///    timelock.
pub fn bootstrap(config: GovernanceConfig, deployer: Address) -> Result<Dao, NodeError> {
    config.validate()?;
    let mut clock = BlockClock::new();

    let mut ledger = VotingLedger::new(config.token_name.clone(), config.token_symbol.clone());
    ledger.mint(deployer, u128::from(config.initial_supply), clock.block)?;
    clock.tick();

    let timelock_address = Address::derive("covenant/timelock");
    let mut timelock = Timelock::new(timelock_address, config.min_delay, &[], &[], deployer);

    let governor_address = Address::derive("covenant/governor");
    let governor = Governor::new(governor_address, &config);

    timelock.grant_role(deployer, Role::Proposer, governor_address)?;
    timelock.grant_role(deployer, Role::Executor, Address::ZERO)?;
    timelock.renounce_role(deployer, Role::Admin, deployer)?;

    let value_store_address = Address::derive("covenant/value-store");
    let mut value_store = ValueStore::new(deployer);
    value_store.transfer_ownership(deployer, timelock_address)?;

    let mut registry = TargetRegistry::new();
    registry.register(value_store_address, Box::new(value_store));

    tracing::info!(
        deployer = %deployer,
        timelock = %timelock_address,
        governor = %governor_address,
        value_store = %value_store_address,
        "bootstrap complete"
    );

    Ok(Dao {
        clock,
        config,
        ledger,
        timelock,
        governor,
        registry,
        deployer,
        value_store: value_store_address,
    })
}

impl Dao {
    /// Advance `n` blocks.
    pub fn mine(&mut self, n: u64) {
        self.clock.mine(n);
    }

    /// Advance wall time by `secs`.
    pub fn warp(&mut self, secs: u64) {
        self.clock.warp(secs);
    }

    /// Transfer tokens; advances the sequence index by one.
    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<(), NodeError> {
        self.ledger.transfer(from, to, amount, self.clock.block)?;
        self.clock.tick();
        Ok(())
    }

    /// Delegate voting power; advances the sequence index by one.
    pub fn delegate(&mut self, account: Address, delegatee: Address) {
        self.ledger.delegate(account, delegatee, self.clock.block);
        self.clock.tick();
    }

    /// Create a proposal; advances the sequence index by one.
    pub fn propose(
        &mut self,
        proposer: Address,
        calls: Vec<Call>,
        description: &str,
    ) -> Result<Hash, NodeError> {
        let id = self
            .governor
            .propose(proposer, calls, description, self.clock.block)?;
        self.clock.tick();
        Ok(id)
    }

    /// Cast a vote; advances the sequence index by one.
    pub fn vote(
        &mut self,
        voter: Address,
        id: &Hash,
        support: VoteSupport,
    ) -> Result<VoteCast, NodeError> {
        let event = self
            .governor
            .cast_vote(voter, id, support, &self.ledger, self.clock.block)?;
        self.clock.tick();
        Ok(event)
    }

    /// Cast a vote with a reason; advances the sequence index by one.
    pub fn vote_with_reason(
        &mut self,
        voter: Address,
        id: &Hash,
        support: VoteSupport,
        reason: &str,
    ) -> Result<VoteCast, NodeError> {
        let event = self.governor.cast_vote_with_reason(
            voter,
            id,
            support,
            reason,
            &self.ledger,
            self.clock.block,
        )?;
        self.clock.tick();
        Ok(event)
    }

    /// Cancel a pending proposal as its proposer.
    pub fn cancel(
        &mut self,
        caller: Address,
        calls: &[Call],
        description: &str,
    ) -> Result<Hash, NodeError> {
        let id = self.governor.cancel(
            caller,
            calls,
            Governor::hash_description(description),
            &self.ledger,
            self.clock.block,
            self.clock.time,
        )?;
        self.clock.tick();
        Ok(id)
    }

    /// Queue a succeeded proposal on the timelock.
    pub fn queue(&mut self, calls: &[Call], description: &str) -> Result<Hash, NodeError> {
        let id = self.governor.queue(
            calls,
            Governor::hash_description(description),
            &self.ledger,
            &mut self.timelock,
            self.clock.block,
            self.clock.time,
        )?;
        self.clock.tick();
        Ok(id)
    }

    /// Execute a queued proposal through the timelock.
    pub fn execute(
        &mut self,
        caller: Address,
        calls: &[Call],
        description: &str,
    ) -> Result<Hash, NodeError> {
        let id = self.governor.execute(
            caller,
            calls,
            Governor::hash_description(description),
            &self.ledger,
            &mut self.timelock,
            &mut self.registry,
            self.clock.block,
            self.clock.time,
        )?;
        self.clock.tick();
        Ok(id)
    }

    /// Derived state of a proposal at the current clock.
    pub fn proposal_state(&self, id: &Hash) -> Result<ProposalState, NodeError> {
        Ok(self
            .governor
            .state(id, &self.ledger, self.clock.block, self.clock.time)?)
    }

    /// Read the governed value store.
    pub fn retrieve(&self) -> u128 {
        self.registry
            .get::<ValueStore>(&self.value_store)
            .map(|s| s.retrieve())
            .unwrap_or(0)
    }

    /// Build the call batch that stores `value` in the governed store.
    pub fn store_calls(&self, value: u128) -> Vec<Call> {
        vec![ValueStore::store_call(self.value_store, value)]
    }
}
