//! Enumeration of candidate messages for the brute-force searches.
//!
//! Candidates are byte strings over all 256 byte values, ordered by length
//! (shortest first, starting with the empty message) and lexicographically
//! within a length. Every candidate has a `u64` rank in that order, so a
//! worker can jump straight to any slice of the space with [`candidate_at`].

/// Longest candidate any `u64` rank can decode to.
///
/// There are `(256^9 - 1) / 255 > 2^64` candidates of length at most 8.
pub const MAX_CANDIDATE_LEN: usize = 8;

/// Number of candidates with exactly `len` bytes, or `None` if it does not
/// fit in a `u64`.
pub fn count_of_length(len: usize) -> Option<u64> {
    256u64.checked_pow(u32::try_from(len).ok()?)
}

/// Number of candidates with at most `max_len` bytes, saturating at
/// `u64::MAX`.
pub fn count_up_to_length(max_len: usize) -> u64 {
    (0..=max_len).fold(0u64, |total, len| {
        count_of_length(len).map_or(u64::MAX, |count| total.saturating_add(count))
    })
}

/// Decode a rank into its candidate message.
pub fn candidate_at(rank: u64) -> Vec<u8> {
    let mut offset = u128::from(rank);
    let mut span: u128 = 1;
    let mut len = 0usize;
    while offset >= span {
        offset -= span;
        span <<= 8;
        len += 1;
    }
    offset.to_be_bytes()[16 - len..].to_vec()
}

/// Interpret a candidate's bytes as text, one character per byte.
pub fn to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Sequential walk through the candidate space.
///
/// Yields the same sequence as `candidate_at(0)`, `candidate_at(1)`, … but
/// steps an odometer instead of decoding each rank.
#[derive(Debug, Clone)]
pub struct Candidates {
    current: Vec<u8>,
    max_len: usize,
    started: bool,
}

impl Candidates {
    /// Every candidate up to `max_len` bytes, starting with the empty message.
    pub fn new(max_len: usize) -> Self {
        Self {
            current: Vec::new(),
            max_len,
            started: false,
        }
    }

    fn advance(&mut self) -> bool {
        for byte in self.current.iter_mut().rev() {
            if *byte == u8::MAX {
                *byte = 0;
            } else {
                *byte += 1;
                return true;
            }
        }
        // every position rolled over: move on to the next length
        if self.current.len() >= self.max_len {
            return false;
        }
        self.current.push(0);
        true
    }
}

impl Iterator for Candidates {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.current.clone());
        }
        if self.advance() {
            Some(self.current.clone())
        } else {
            // park on an exhausted state so later calls keep returning None
            self.max_len = 0;
            self.current.clear();
            self.current.push(u8::MAX);
            None
        }
    }
}
