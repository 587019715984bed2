//! Voting-power checkpoint history.
//!
//! Each account's power over time is a step function recorded as an
//! append-only list of (block, votes) pairs with strictly increasing block
//! numbers. Historical queries binary-search for the last checkpoint at or
//! before the requested block.

/// A single (block, votes) snapshot marking a step change in voting power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Block at which the power changed
    pub block: u64,
    /// Voting power from this block onward
    pub votes: u128,
}

/// Append-only checkpoint history for one account (or the total supply).
#[derive(Debug, Clone, Default)]
pub struct Checkpoints {
    entries: Vec<Checkpoint>,
}

impl Checkpoints {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Power at the latest checkpoint, or zero if no checkpoint exists.
    pub fn latest(&self) -> u128 {
        self.entries.last().map(|c| c.votes).unwrap_or(0)
    }

    /// Record a new power value at `block`.
    ///
    /// Blocks must be written in non-decreasing order. Writing at the same
    /// block as the most recent checkpoint overwrites it, collapsing
    /// multiple changes within one indivisible step into a single entry.
    pub fn push(&mut self, block: u64, votes: u128) {
        match self.entries.last_mut() {
            Some(last) if last.block == block => last.votes = votes,
            Some(last) => {
                debug_assert!(last.block < block, "checkpoint blocks must increase");
                self.entries.push(Checkpoint { block, votes });
            }
            None => self.entries.push(Checkpoint { block, votes }),
        }
    }

    /// Power at `block`: the value of the last checkpoint with
    /// `checkpoint.block <= block`, or zero before the first checkpoint.
    pub fn lookup(&self, block: u64) -> u128 {
        let idx = self.entries.partition_point(|c| c.block <= block);
        if idx == 0 {
            0
        } else {
            self.entries[idx - 1].votes
        }
    }

    /// Number of recorded checkpoints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any checkpoint has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_history() {
        let history = Checkpoints::new();
        assert_eq!(history.latest(), 0);
        assert_eq!(history.lookup(0), 0);
        assert_eq!(history.lookup(u64::MAX), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn test_step_function() {
        let mut history = Checkpoints::new();
        history.push(5, 100);
        history.push(10, 250);
        history.push(20, 75);

        // Before the first checkpoint
        assert_eq!(history.lookup(4), 0);
        // At and between checkpoints
        assert_eq!(history.lookup(5), 100);
        assert_eq!(history.lookup(9), 100);
        assert_eq!(history.lookup(10), 250);
        assert_eq!(history.lookup(19), 250);
        assert_eq!(history.lookup(20), 75);
        assert_eq!(history.lookup(1000), 75);

        assert_eq!(history.latest(), 75);
        assert_eq!(history.len(), 3);
    }

    #[test]
    #[should_panic(expected = "checkpoint blocks must increase")]
    fn test_push_rejects_decreasing_block() {
        let mut history = Checkpoints::new();
        history.push(10, 100);
        history.push(5, 50);
    }

    #[test]
    fn test_same_block_overwrites() {
        let mut history = Checkpoints::new();
        history.push(7, 10);
        history.push(7, 30);
        history.push(7, 20);

        assert_eq!(history.len(), 1);
        assert_eq!(history.lookup(7), 20);
        assert_eq!(history.lookup(6), 0);
    }

    proptest! {
        /// lookup must agree with a naive linear scan over any history.
        #[test]
        fn prop_lookup_matches_linear_scan(
            steps in proptest::collection::vec((1u64..50, 0u128..1_000_000), 1..40),
            query in 0u64..2_000,
        ) {
            let mut history = Checkpoints::new();
            let mut block = 0u64;
            let mut naive: Vec<(u64, u128)> = Vec::new();

            for (gap, votes) in steps {
                block += gap;
                history.push(block, votes);
                naive.push((block, votes));
            }

            let expected = naive
                .iter()
                .rev()
                .find(|(b, _)| *b <= query)
                .map(|(_, v)| *v)
                .unwrap_or(0);

            prop_assert_eq!(history.lookup(query), expected);
        }
    }
}
