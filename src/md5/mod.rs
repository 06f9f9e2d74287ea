//! The truncated MD5 pipeline.
//!
//! A message goes through five stages:
//!
//! 1. **Encoding**: every character becomes one byte (8 bits, most
//!    significant bit first). Characters above U+00FF are rejected.
//! 2. **Padding**: a single `1` bit and then `0` bits until the length is
//!    448 mod 512.
//! 3. **Extension**: the original bit length as a 64-bit little-endian value.
//! 4. **Compression**: 64 rounds per 512-bit block over the four state words.
//! 5. **Truncation**: the state is serialized little-endian into 128 bits and
//!    the first `num_bits` of them are read as a big-endian integer.
//!
//! Bit sequences are always whole bytes here, so they are stored as `Vec<u8>`
//! and read most-significant-bit first.

use std::fmt;

use crate::error::{Error, InputError, InvariantError, Result};

pub mod primitives;

use primitives::{ROUND_CONSTANTS, ROUND_SCHEDULE};

/// Size of one compression block in bytes (512 bits).
pub const BLOCK_BYTES: usize = 64;

/// Widest truncation accepted by [`hash`].
pub const MAX_BITS: u32 = 128;

/// Convert a text message into its bit sequence, one byte per character.
///
/// The output always holds exactly one byte per character.
pub fn encode(message: &str) -> Result<Vec<u8>> {
    message
        .chars()
        .enumerate()
        .map(|(position, character)| {
            u8::try_from(character)
                .map_err(|_| Error::from(InputError::Encoding { character, position }))
        })
        .collect()
}

/// Append the `1` bit and enough `0` bits to reach 448 mod 512 bits.
pub fn pad(mut bits: Vec<u8>) -> Result<Vec<u8>> {
    // 0x80 = 10000000
    bits.push(0x80);
    while (bits.len() * 8) % 512 != 448 {
        bits.push(0x00);
    }

    let bit_len = bit_length(&bits);
    if bit_len % 512 != 448 {
        return Err(InvariantError::Padding { bit_len }.into());
    }
    Ok(bits)
}

/// Append the original message length, in bits, as 64 little-endian bits.
pub fn extend(mut padded: Vec<u8>, original_bit_len: u64) -> Result<Vec<u8>> {
    let padded_len = bit_length(&padded);
    if padded_len % 512 != 448 {
        return Err(InvariantError::Padding { bit_len: padded_len }.into());
    }

    padded.extend_from_slice(&original_bit_len.to_le_bytes());

    let bit_len = bit_length(&padded);
    if bit_len % 512 != 0 {
        return Err(InvariantError::Extension { bit_len }.into());
    }
    Ok(padded)
}

/// [`extend`] for callers holding a signed length.
///
/// Negative lengths are rejected; lengths of 2^64 bits or more are reduced
/// modulo 2^64.
pub fn extend_signed(padded: Vec<u8>, original_bit_len: i128) -> Result<Vec<u8>> {
    if original_bit_len < 0 {
        return Err(InputError::NegativeLength { length: original_bit_len }.into());
    }
    extend(padded, original_bit_len as u64)
}

fn bit_length(bits: &[u8]) -> u64 {
    (bits.len() as u64).wrapping_mul(8)
}

/// The four 32-bit chaining words carried from block to block.
///
/// `State` is `Copy`, so the compression loop works on a snapshot and adds it
/// back at the end of each block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl State {
    /// Standard MD5 initial chaining values.
    pub const INITIAL: Self = Self {
        a: 0x67452301,
        b: 0xefcdab89,
        c: 0x98badcfe,
        d: 0x10325476,
    };

    /// Run the 64 rounds over one block and fold the result back into the
    /// chaining words.
    pub fn compress_block(&mut self, block: &[u8; BLOCK_BYTES]) {
        let mut words = [0u32; 16];
        for (word, bytes) in words.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        let constants = &*ROUND_CONSTANTS;
        let State {
            mut a,
            mut b,
            mut c,
            mut d,
        } = *self;

        for (round, step) in ROUND_SCHEDULE.iter().enumerate() {
            let f = step
                .function
                .apply(b, c, d)
                .wrapping_add(a)
                .wrapping_add(constants[round])
                .wrapping_add(words[step.word_index]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(f.rotate_left(step.shift));
        }

        self.a = self.a.wrapping_add(a);
        self.b = self.b.wrapping_add(b);
        self.c = self.c.wrapping_add(c);
        self.d = self.d.wrapping_add(d);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Process every block of an extended message, starting from
/// [`State::INITIAL`].
pub fn compress(extended: &[u8]) -> Result<State> {
    if extended.len() % BLOCK_BYTES != 0 {
        return Err(InvariantError::BlockAlignment {
            bit_len: bit_length(extended),
        }
        .into());
    }

    let mut state = State::INITIAL;
    for block in extended.chunks_exact(BLOCK_BYTES) {
        let block: &[u8; BLOCK_BYTES] = block.try_into().map_err(|_| {
            InvariantError::BlockAlignment {
                bit_len: bit_length(block),
            }
        })?;
        state.compress_block(block);
    }
    Ok(state)
}

/// Full 128-bit output of the pipeline: `D<<96 | C<<64 | B<<32 | A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(u128);

impl Digest {
    /// Pack the chaining words, `d` in the high bits and `a` in the low bits.
    pub fn from_state(state: State) -> Self {
        Digest(
            (u128::from(state.d) << 96)
                | (u128::from(state.c) << 64)
                | (u128::from(state.b) << 32)
                | u128::from(state.a),
        )
    }

    /// The packed state words. This is not the conventional hex digest; use
    /// `truncate(128)` for that.
    pub fn value(self) -> u128 {
        self.0
    }

    /// Little-endian serialization, the byte string truncation reads from.
    pub fn to_le_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }

    /// Keep the first `num_bits` bits of the little-endian serialization.
    pub fn truncate(self, num_bits: u32) -> Result<TruncatedHash> {
        check_num_bits(num_bits)?;
        let serialized = u128::from_be_bytes(self.to_le_bytes());
        Ok(TruncatedHash {
            value: serialized >> (MAX_BITS - num_bits),
            num_bits,
        })
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// A digest cut down to `num_bits` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TruncatedHash {
    value: u128,
    num_bits: u32,
}

impl TruncatedHash {
    /// The leading `num_bits` bits of the MD5 digest, as an integer.
    pub fn value(self) -> u128 {
        self.value
    }

    pub fn num_bits(self) -> u32 {
        self.num_bits
    }
}

impl From<TruncatedHash> for u128 {
    fn from(hash: TruncatedHash) -> Self {
        hash.value
    }
}

impl fmt::Display for TruncatedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::LowerHex for TruncatedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

pub(crate) fn check_num_bits(num_bits: u32) -> Result<()> {
    if !(1..=MAX_BITS).contains(&num_bits) {
        return Err(InputError::NumBitsOutOfRange { num_bits }.into());
    }
    Ok(())
}

/// Full digest of an already encoded message.
pub fn digest_bytes(bytes: &[u8]) -> Result<Digest> {
    let bit_len = bit_length(bytes);
    let extended = extend(pad(bytes.to_vec())?, bit_len)?;
    compress(&extended).map(Digest::from_state)
}

/// Full 128-bit digest of a text message.
pub fn digest(message: &str) -> Result<Digest> {
    digest_bytes(&encode(message)?)
}

/// Truncated hash of an already encoded message.
pub fn hash_bytes(bytes: &[u8], num_bits: u32) -> Result<TruncatedHash> {
    check_num_bits(num_bits)?;
    digest_bytes(bytes)?.truncate(num_bits)
}

/// Compute the first `num_bits` bits of the hash of `message`.
///
/// # Errors
///
/// * [`InputError::NumBitsOutOfRange`] if `num_bits` is not in `1..=128`.
/// * [`InputError::Encoding`] if a character does not fit in one byte.
///
/// # Example
///
/// ```rust
/// use trunc_md5::hash;
///
/// let h = hash("hola", 100).unwrap();
/// assert_eq!(h.value(), 381757249806289069081790873225);
/// assert!(hash("hola", 0).unwrap_err().is_input());
/// ```
pub fn hash(message: &str, num_bits: u32) -> Result<TruncatedHash> {
    check_num_bits(num_bits)?;
    digest(message)?.truncate(num_bits)
}

/// Format a 128-bit value as 32 lowercase hex digits, zero padded.
pub fn to_hex(digest: u128) -> String {
    format!("{:032x}", digest)
}
