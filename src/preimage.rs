//! Brute-force second-preimage search.

use log::{debug, trace};
use rayon::prelude::*;

use crate::candidates::{candidate_at, to_text, Candidates};
use crate::error::{Error, Result};
use crate::md5::{encode, hash_bytes, TruncatedHash};
use crate::search::{batches, SearchConfig, SecondPreimage, Strategy};

/// Find a message other than `message` with the same `num_bits`-bit hash,
/// using [`SearchConfig::default`].
pub fn find_second_preimage(message: &str, num_bits: u32) -> Result<SecondPreimage> {
    find_second_preimage_with_config(message, num_bits, &SearchConfig::default())
}

/// Find a message other than `message` with the same `num_bits`-bit hash.
///
/// Candidates are tried in enumeration order, skipping the empty message; the
/// first match wins and the returned iteration count is its 1-based position
/// among the candidates tried.
///
/// # Errors
///
/// * [`Error::Input`] for an invalid `num_bits`, an unencodable `message` or
///   a bad configuration. These are reported before any candidate is tried.
/// * [`Error::SearchExhausted`] if no match is found within the budget.
pub fn find_second_preimage_with_config(
    message: &str,
    num_bits: u32,
    config: &SearchConfig,
) -> Result<SecondPreimage> {
    let original = encode(message)?;
    let target = hash_bytes(&original, num_bits)?;
    let limit = config.budget_from(FIRST_RANK)?;

    debug!(
        "second preimage search: num_bits={} strategy={} budget={}",
        num_bits, config.strategy, limit
    );

    let found = match config.strategy {
        Strategy::Sequential => search_sequential(&original, target, config.max_length, limit)?,
        Strategy::Parallel => search_parallel(&original, target, limit)?,
    };

    match found {
        Some((candidate, iterations)) => {
            debug!("second preimage found after {} iterations", iterations);
            Ok(SecondPreimage {
                message: to_text(&candidate),
                iterations,
            })
        }
        None => {
            debug!("second preimage search exhausted after {} iterations", limit);
            Err(Error::SearchExhausted { iterations: limit })
        }
    }
}

/// Rank of the first candidate tried. The empty message is never returned.
const FIRST_RANK: u64 = 1;

/// Position of `rank` among the candidates tried, counting from 1.
fn iterations_at(rank: u64) -> u64 {
    rank - FIRST_RANK + 1
}

fn is_match(original: &[u8], target: TruncatedHash, candidate: &[u8]) -> Result<bool> {
    Ok(candidate != original && hash_bytes(candidate, target.num_bits())? == target)
}

fn search_sequential(
    original: &[u8],
    target: TruncatedHash,
    max_length: usize,
    limit: u64,
) -> Result<Option<(Vec<u8>, u64)>> {
    let candidates = Candidates::new(max_length).skip(FIRST_RANK as usize);
    for (candidate, offset) in candidates.zip(0..limit) {
        if is_match(original, target, &candidate)? {
            return Ok(Some((candidate, iterations_at(FIRST_RANK + offset))));
        }
    }
    Ok(None)
}

fn search_parallel(
    original: &[u8],
    target: TruncatedHash,
    limit: u64,
) -> Result<Option<(Vec<u8>, u64)>> {
    for (start, len) in batches(FIRST_RANK, limit) {
        trace!("second preimage batch: {} ranks from {}", len, start);

        // find_map_first keeps the lowest-ranked hit, so the answer does not
        // depend on scheduling; workers past an earlier hit stop early.
        let hit = (0..len).into_par_iter().find_map_first(|offset| {
            let rank = start + offset as u64;
            let candidate = candidate_at(rank);
            match is_match(original, target, &candidate) {
                Ok(true) => Some(Ok((candidate, iterations_at(rank)))),
                Ok(false) => None,
                Err(err) => Some(Err(err)),
            }
        });

        if let Some(hit) = hit {
            return hit.map(Some);
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md5::hash;

    #[test]
    fn test_finds_preimage_for_small_widths() {
        for num_bits in 1..=8 {
            let found = find_second_preimage("hola", num_bits).unwrap();
            assert_ne!(found.message, "hola");
            assert_eq!(
                hash(&found.message, num_bits).unwrap(),
                hash("hola", num_bits).unwrap()
            );
        }
    }

    #[test]
    fn test_skips_the_original_message() {
        let found = find_second_preimage("", 4).unwrap();
        assert_ne!(found.message, "");
        assert_eq!(found.iterations, 14);
    }

    #[test]
    fn test_never_returns_the_empty_message() {
        // "\u{2}" and "" share their 1-bit hash
        assert_eq!(hash("\u{2}", 1).unwrap(), hash("", 1).unwrap());
        let found = find_second_preimage("\u{2}", 1).unwrap();
        assert_eq!(found.message, "\u{0}");
        assert_eq!(found.iterations, 1);
    }

    #[test]
    fn test_strategies_agree() {
        let sequential = SearchConfig::default().strategy(Strategy::Sequential);
        let parallel = SearchConfig::default().strategy(Strategy::Parallel);
        for num_bits in [1, 5, 10] {
            assert_eq!(
                find_second_preimage_with_config("abc", num_bits, &sequential).unwrap(),
                find_second_preimage_with_config("abc", num_bits, &parallel).unwrap()
            );
        }
    }

    #[test]
    fn test_iterations_match_rank() {
        let found = find_second_preimage("abc", 6).unwrap();
        assert_eq!(to_text(&candidate_at(found.iterations)), found.message);
    }

    #[test]
    fn test_exhausted_budget() {
        let config = SearchConfig::default().max_iterations(1);
        let err = find_second_preimage_with_config("", 64, &config).unwrap_err();
        assert_eq!(err, Error::SearchExhausted { iterations: 1 });
    }

    #[test]
    fn test_input_errors_come_first() {
        let config = SearchConfig::default().max_iterations(0);
        assert!(find_second_preimage_with_config("abc", 0, &config)
            .unwrap_err()
            .is_input());
        assert!(find_second_preimage_with_config("\u{263a}", 4, &config)
            .unwrap_err()
            .is_input());
    }
}
