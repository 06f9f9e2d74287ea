//! Round primitives: the four mixing functions, the sine-derived constant
//! table, the shift table and circular rotation.

use once_cell::sync::Lazy;

use crate::error::{InputError, Result};

/// Per-round left-rotation amounts. Each 16-round group cycles through four
/// values.
pub const SHIFT_AMOUNTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Additive round constants, `K[i] = floor(2^32 * |sin(i + 1)|)`.
///
/// Built once on first use and never mutated afterwards.
pub static ROUND_CONSTANTS: Lazy<[u32; 64]> = Lazy::new(|| {
    let mut table = [0u32; 64];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = constant(i as u32);
    }
    table
});

/// Generate the additive constant for a 0-indexed round.
///
/// The sine is evaluated at `round + 1` radians. The product with 2^32 is
/// always below 2^32 since `|sin|` never reaches 1 at an integer argument, so
/// the float-to-int cast only floors.
pub fn constant(round: u32) -> u32 {
    let radians = f64::from(round) + 1.0;
    // 2^32 = 4294967296
    (4294967296.0 * radians.sin().abs()) as u32
}

/// The nonlinear mixing function applied in one 16-round group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundFunction {
    /// F(X,Y,Z) = (X ∧ Y) ∨ (¬X ∧ Z), a bitwise "if X then Y else Z".
    F,
    /// G(X,Y,Z) = (X ∧ Z) ∨ (Y ∧ ¬Z)
    G,
    /// H(X,Y,Z) = X ⊕ Y ⊕ Z
    H,
    /// I(X,Y,Z) = Y ⊕ (X ∨ ¬Z)
    I,
}

impl RoundFunction {
    /// Function used by round `round` (0..64).
    pub const fn for_round(round: usize) -> Self {
        match round / 16 {
            0 => RoundFunction::F,
            1 => RoundFunction::G,
            2 => RoundFunction::H,
            _ => RoundFunction::I,
        }
    }

    /// Index of the block word consumed by round `round`.
    pub const fn word_index(self, round: usize) -> usize {
        match self {
            RoundFunction::F => round % 16,
            RoundFunction::G => (5 * round + 1) % 16,
            RoundFunction::H => (3 * round + 5) % 16,
            RoundFunction::I => (7 * round) % 16,
        }
    }

    #[inline(always)]
    pub fn apply(self, x: u32, y: u32, z: u32) -> u32 {
        match self {
            RoundFunction::F => (x & y) | (!x & z),
            RoundFunction::G => (x & z) | (y & !z),
            RoundFunction::H => x ^ y ^ z,
            RoundFunction::I => y ^ (x | !z),
        }
    }
}

/// Everything the compression loop needs to know about one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundStep {
    pub function: RoundFunction,
    pub word_index: usize,
    pub shift: u32,
}

/// Round schedule for all 64 rounds, resolved at compile time.
pub const ROUND_SCHEDULE: [RoundStep; 64] = build_schedule();

const fn build_schedule() -> [RoundStep; 64] {
    let mut schedule = [RoundStep {
        function: RoundFunction::F,
        word_index: 0,
        shift: 0,
    }; 64];
    let mut round = 0;
    while round < 64 {
        let function = RoundFunction::for_round(round);
        schedule[round] = RoundStep {
            function,
            word_index: function.word_index(round),
            shift: SHIFT_AMOUNTS[round],
        };
        round += 1;
    }
    schedule
}

/// Rotate the low `base` bits of `number` left by `shift` positions.
///
/// Bits of `number` above `base` are discarded before rotating, and the
/// result never has more than `base` significant bits. `shift` must satisfy
/// `1 <= shift < base` and `base` must be in `2..=64`.
pub fn rotl(number: u64, shift: u32, base: u32) -> Result<u64> {
    if !(2..=64).contains(&base) {
        return Err(InputError::BaseOutOfRange { base }.into());
    }
    if shift == 0 || shift >= base {
        return Err(InputError::ShiftOutOfRange { shift, base }.into());
    }
    let mask = u64::MAX >> (64 - base);
    let number = number & mask;
    Ok(((number << shift) | (number >> (base - shift))) & mask)
}
