//! Token balances and delegated voting power.
//!
//! Balances never count as voting power on their own: an account must
//! delegate (possibly to itself) before its balance backs any votes. Power
//! changes are checkpointed per delegatee so proposals can query power at a
//! historical block.

use std::collections::HashMap;

use covenant_types::Address;

use crate::checkpoint::Checkpoints;
use crate::error::LedgerError;

/// Checkpointed voting-power ledger.
///
/// Callers supply the current block explicitly. Block numbers must be
/// non-decreasing across mutating calls ([`mint`](Self::mint),
/// [`transfer`](Self::transfer), [`delegate`](Self::delegate)); the
/// checkpoint histories rely on that ordering for their binary search.
#[derive(Debug)]
pub struct VotingLedger {
    name: String,
    symbol: String,
    /// Token balances
    balances: HashMap<Address, u128>,
    /// account -> delegatee; absent until the first explicit delegate call
    delegatees: HashMap<Address, Address>,
    /// Voting-power history per delegatee
    checkpoints: HashMap<Address, Checkpoints>,
    /// Total-supply history, for historical quorum evaluation
    supply_history: Checkpoints,
    total_supply: u128,
}

impl VotingLedger {
    /// Create an empty ledger.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            balances: HashMap::new(),
            delegatees: HashMap::new(),
            checkpoints: HashMap::new(),
            supply_history: Checkpoints::new(),
            total_supply: 0,
        }
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Current balance of an account.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Current total supply.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// The account's delegatee, if it has ever delegated.
    pub fn delegatee(&self, account: &Address) -> Option<Address> {
        self.delegatees.get(account).copied()
    }

    /// Issue new tokens to `to` at `block`.
    pub fn mint(&mut self, to: Address, amount: u128, block: u64) -> Result<(), LedgerError> {
        let balance = self.balance_of(&to);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.balances.insert(to, new_balance);
        self.supply_history.push(block, self.total_supply);
        self.move_voting_power(None, self.delegatee(&to), amount, block);

        tracing::debug!(to = %to, amount, block, "minted tokens");
        Ok(())
    }

    /// Transfer tokens between accounts at `block`.
    ///
    /// If either party has a delegatee, that delegatee's checkpointed power
    /// is adjusted by the transferred amount at the same block.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u128,
        block: u64,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                balance: from_balance,
                needed: amount,
            });
        }
        // A self-transfer changes nothing; writing both sides would let the
        // credit clobber the debit
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.balances.insert(from, from_balance - amount);
        self.balances.insert(to, to_balance);
        self.move_voting_power(self.delegatee(&from), self.delegatee(&to), amount, block);

        tracing::debug!(from = %from, to = %to, amount, block, "transfer");
        Ok(())
    }

    /// Delegate the account's balance-derived voting power to `delegatee`.
    ///
    /// Idempotent: re-delegating to the current delegatee changes nothing.
    /// Before the first call the account's balance backs no voting power.
    pub fn delegate(&mut self, account: Address, delegatee: Address, block: u64) {
        let previous = self.delegatee(&account);
        let balance = self.balance_of(&account);

        self.delegatees.insert(account, delegatee);
        self.move_voting_power(previous, Some(delegatee), balance, block);

        tracing::info!(account = %account, delegatee = %delegatee, block, "delegation changed");
    }

    /// Current voting power of an account (latest checkpoint).
    pub fn votes(&self, account: &Address) -> u128 {
        self.checkpoints
            .get(account)
            .map(|h| h.latest())
            .unwrap_or(0)
    }

    /// Voting power of an account at a strictly historical block.
    pub fn past_votes(
        &self,
        account: &Address,
        index: u64,
        current_block: u64,
    ) -> Result<u128, LedgerError> {
        if index >= current_block {
            return Err(LedgerError::FutureLookup {
                index,
                current: current_block,
            });
        }
        Ok(self
            .checkpoints
            .get(account)
            .map(|h| h.lookup(index))
            .unwrap_or(0))
    }

    /// Total supply at a strictly historical block.
    pub fn past_total_supply(&self, index: u64, current_block: u64) -> Result<u128, LedgerError> {
        if index >= current_block {
            return Err(LedgerError::FutureLookup {
                index,
                current: current_block,
            });
        }
        Ok(self.supply_history.lookup(index))
    }

    /// Move `amount` of checkpointed power between delegatees at `block`.
    /// `None` on either side means the balance was (or becomes) undelegated
    /// and contributes nothing.
    fn move_voting_power(
        &mut self,
        from: Option<Address>,
        to: Option<Address>,
        amount: u128,
        block: u64,
    ) {
        if amount == 0 || from == to {
            return;
        }

        if let Some(from) = from {
            let history = self.checkpoints.entry(from).or_default();
            let current = history.latest();
            history.push(block, current.saturating_sub(amount));
        }
        if let Some(to) = to {
            let history = self.checkpoints.entry(to).or_default();
            let current = history.latest();
            history.push(block, current.saturating_add(amount));
        }
    }
}
