//! Shared configuration and result types for the brute-force searches.

use std::fmt;

use crate::candidates::{count_up_to_length, MAX_CANDIDATE_LEN};
use crate::error::{InputError, Result};

/// How a search spreads its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Walk the candidates one by one on the calling thread.
    Sequential,
    /// Hand fixed-size batches of ranks to the rayon thread pool.
    #[default]
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Parallel => write!(f, "parallel"),
        }
    }
}

/// Limits and execution mode for [`find_second_preimage_with_config`] and
/// [`find_collision_with_config`].
///
/// Both strategies produce the same answer, down to the iteration count.
///
/// ```rust
/// use trunc_md5::{SearchConfig, Strategy};
///
/// let config = SearchConfig::default()
///     .max_iterations(1 << 20)
///     .strategy(Strategy::Sequential);
/// assert_eq!(config.budget().unwrap(), 1 << 20);
/// ```
///
/// [`find_second_preimage_with_config`]: crate::find_second_preimage_with_config
/// [`find_collision_with_config`]: crate::find_collision_with_config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_iterations: u64,
    pub max_length: usize,
    pub strategy: Strategy,
}

impl SearchConfig {
    pub const DEFAULT_MAX_ITERATIONS: u64 = 1 << 32;

    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Number of candidates a search may examine: the iteration budget,
    /// capped by the number of candidates within the length limit.
    pub fn budget(&self) -> Result<u64> {
        self.budget_from(0)
    }

    /// Like [`budget`](Self::budget), for a search that starts at
    /// `first_rank` instead of the empty message.
    pub(crate) fn budget_from(&self, first_rank: u64) -> Result<u64> {
        if self.max_length > MAX_CANDIDATE_LEN {
            return Err(InputError::MaxLengthOutOfRange {
                max_length: self.max_length,
            }
            .into());
        }
        let available = match count_up_to_length(self.max_length) {
            // saturated: more candidates than any u64 budget
            u64::MAX => u64::MAX,
            count => count.saturating_sub(first_rank),
        };
        Ok(self.max_iterations.min(available))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            max_length: MAX_CANDIDATE_LEN,
            strategy: Strategy::default(),
        }
    }
}

/// Ranks handed to the worker pool per round.
pub(crate) const BATCH_SIZE: u64 = 1 << 14;

/// Split the `limit` ranks starting at `first_rank` into consecutive batches
/// of at most [`BATCH_SIZE`] ranks.
pub(crate) fn batches(
    first_rank: u64,
    limit: u64,
) -> impl DoubleEndedIterator<Item = (u64, usize)> {
    (0..limit.div_ceil(BATCH_SIZE)).map(move |index| {
        let done = index * BATCH_SIZE;
        let len = (limit - done).min(BATCH_SIZE) as usize;
        (first_rank + done, len)
    })
}

/// A message different from the target that hashes to the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondPreimage {
    pub message: String,
    /// Candidates examined, including the one returned.
    pub iterations: u64,
}

/// Two distinct messages with the same truncated hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The earlier of the two in enumeration order.
    pub first: String,
    pub second: String,
    /// Candidates examined, including `second`.
    pub iterations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, Strategy::Parallel);
        assert_eq!(config.budget().unwrap(), SearchConfig::DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_budget_capped_by_length() {
        let config = SearchConfig::default().max_length(1);
        assert_eq!(config.budget().unwrap(), 257);

        let config = SearchConfig::default().max_length(1).max_iterations(10);
        assert_eq!(config.budget().unwrap(), 10);
    }

    #[test]
    fn test_budget_from_later_rank() {
        let config = SearchConfig::default().max_length(1);
        assert_eq!(config.budget_from(1).unwrap(), 256);
        assert_eq!(config.max_length(0).budget_from(1).unwrap(), 0);
        assert_eq!(
            SearchConfig::default()
                .max_iterations(u64::MAX)
                .budget_from(1)
                .unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn test_budget_rejects_long_candidates() {
        let err = SearchConfig::default().max_length(9).budget().unwrap_err();
        assert!(err.is_input());
    }

    #[test]
    fn test_batches_cover_range() {
        let all: Vec<_> = batches(0, 2 * BATCH_SIZE + 3).collect();
        assert_eq!(
            all,
            vec![
                (0, BATCH_SIZE as usize),
                (BATCH_SIZE, BATCH_SIZE as usize),
                (2 * BATCH_SIZE, 3)
            ]
        );
        assert_eq!(batches(0, 0).count(), 0);
    }

    #[test]
    fn test_batches_from_offset() {
        let all: Vec<_> = batches(1, BATCH_SIZE + 1).collect();
        assert_eq!(all, vec![(1, BATCH_SIZE as usize), (BATCH_SIZE + 1, 1)]);

        let (last, len) = batches(1, u64::MAX).next_back().unwrap();
        assert_eq!(last + (len as u64 - 1), u64::MAX);
    }
}
