//! Deterministic block and time sequencer.
//!
//! The core never reads an ambient clock: every operation takes the current
//! block index and timestamp explicitly. `BlockClock` is the single source
//! of both, advanced by the embedding environment one step per discrete
//! ledger event.

/// Seconds of wall clock represented by one block step.
pub const BLOCK_TIME_SECS: u64 = 12;

/// Monotonic (block, time) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockClock {
    /// Current ledger sequence index
    pub block: u64,
    /// Current timestamp in seconds
    pub time: u64,
}

impl BlockClock {
    /// Start at block 1 so that block 0 is always strictly historical.
    pub fn new() -> Self {
        Self {
            block: 1,
            time: 1_700_000_000,
        }
    }

    /// Advance by one block.
    pub fn tick(&mut self) {
        self.block += 1;
        self.time += BLOCK_TIME_SECS;
    }

    /// Advance by `n` blocks.
    pub fn mine(&mut self, n: u64) {
        self.block += n;
        self.time += n * BLOCK_TIME_SECS;
    }

    /// Advance wall time by `secs`, moving the block forward accordingly.
    pub fn warp(&mut self, secs: u64) {
        self.time += secs;
        self.block += secs / BLOCK_TIME_SECS;
    }
}

impl Default for BlockClock {
    fn default() -> Self {
        Self::new()
    }
}
