//! Error types for hashing and search operations.
//!
//! Three outcomes are kept apart on purpose: a caller handing in bad input,
//! a broken invariant inside the hash pipeline, and a search that ran out of
//! budget without finding anything.

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a hash or search call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The caller passed an argument outside the accepted domain.
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    /// A length or width computation inside the pipeline went wrong.
    /// This is a bug in the crate, never a user mistake.
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantError),
    /// A brute-force search used up its budget without success.
    #[error("search exhausted after {iterations} candidates")]
    SearchExhausted { iterations: u64 },
}

impl Error {
    /// Whether the caller supplied an invalid argument.
    pub fn is_input(&self) -> bool {
        matches!(self, Error::Input(_))
    }

    /// Whether an internal pipeline check failed.
    pub fn is_invariant(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }

    /// Whether a search gave up without finding a result.
    pub fn is_search_exhausted(&self) -> bool {
        matches!(self, Error::SearchExhausted { .. })
    }
}

/// Arguments rejected before any work is done.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Hash width outside `1..=128`.
    #[error("num_bits must be in 1..=128, got {num_bits}")]
    NumBitsOutOfRange { num_bits: u32 },
    /// A message character above U+00FF.
    #[error("character {character:?} at position {position} does not fit in 8 bits")]
    Encoding { character: char, position: usize },
    /// A signed bit length below zero.
    #[error("message length cannot be negative, got {length}")]
    NegativeLength { length: i128 },
    /// Rotation amount not strictly between 0 and the word width.
    #[error("rotation by {shift} is outside 1..{base}")]
    ShiftOutOfRange { shift: u32, base: u32 },
    /// Rotation word width outside `2..=64`.
    #[error("rotation width must be in 2..=64, got {base}")]
    BaseOutOfRange { base: u32 },
    /// Candidate length limit above [`MAX_CANDIDATE_LEN`](crate::candidates::MAX_CANDIDATE_LEN).
    #[error("candidate length limit must be at most 8, got {max_length}")]
    MaxLengthOutOfRange { max_length: usize },
}

/// Length checks between pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("padded message is {bit_len} bits, expected 448 mod 512")]
    Padding { bit_len: u64 },
    #[error("extended message is {bit_len} bits, expected a multiple of 512")]
    Extension { bit_len: u64 },
    #[error("compression input is {bit_len} bits, expected whole 512-bit blocks")]
    BlockAlignment { bit_len: u64 },
}
