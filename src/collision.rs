//! Brute-force collision search.
//!
//! Every candidate's truncated hash goes into a map from hash value to the
//! rank of the first candidate that produced it. The first candidate whose
//! hash is already in the map closes the search. With `n`-bit hashes this
//! takes on the order of `2^(n/2)` candidates.

use std::collections::HashMap;

use log::{debug, trace};
use rayon::prelude::*;

use crate::candidates::{candidate_at, to_text, Candidates};
use crate::error::{Error, Result};
use crate::md5::{check_num_bits, hash_bytes};
use crate::search::{batches, Collision, SearchConfig, Strategy};

/// Find two distinct messages sharing a `num_bits`-bit hash, using
/// [`SearchConfig::default`].
pub fn find_collision(num_bits: u32) -> Result<Collision> {
    find_collision_with_config(num_bits, &SearchConfig::default())
}

/// Find two distinct messages sharing a `num_bits`-bit hash.
///
/// # Errors
///
/// * [`Error::Input`] for an invalid `num_bits` or configuration.
/// * [`Error::SearchExhausted`] if the budget runs out first.
pub fn find_collision_with_config(num_bits: u32, config: &SearchConfig) -> Result<Collision> {
    check_num_bits(num_bits)?;
    let limit = config.budget()?;

    debug!(
        "collision search: num_bits={} strategy={} budget={}",
        num_bits, config.strategy, limit
    );

    let mut seen = FirstSeen::default();
    let found = match config.strategy {
        Strategy::Sequential => {
            search_sequential(&mut seen, num_bits, config.max_length, limit)?
        }
        Strategy::Parallel => search_parallel(&mut seen, num_bits, limit)?,
    };

    match found {
        Some((first, second)) => {
            let collision = Collision {
                first: to_text(&candidate_at(first)),
                second: to_text(&candidate_at(second)),
                iterations: second + 1,
            };
            debug!(
                "collision found after {} iterations ({} hashes stored)",
                collision.iterations,
                seen.len()
            );
            Ok(collision)
        }
        None => {
            debug!("collision search exhausted after {} iterations", limit);
            Err(Error::SearchExhausted { iterations: limit })
        }
    }
}

/// Hash value to the rank of the first candidate that produced it.
#[derive(Debug, Default)]
struct FirstSeen {
    ranks: HashMap<u128, u64>,
}

impl FirstSeen {
    /// Record `rank` under `hash`, or return the earlier rank if the hash was
    /// already claimed by a different candidate.
    fn insert(&mut self, hash: u128, rank: u64) -> Option<u64> {
        match self.ranks.get(&hash) {
            Some(&earlier) if earlier != rank => Some(earlier),
            Some(_) => None,
            None => {
                self.ranks.insert(hash, rank);
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.ranks.len()
    }
}

fn search_sequential(
    seen: &mut FirstSeen,
    num_bits: u32,
    max_length: usize,
    limit: u64,
) -> Result<Option<(u64, u64)>> {
    for (candidate, rank) in Candidates::new(max_length).zip(0..limit) {
        let hash = hash_bytes(&candidate, num_bits)?;
        if let Some(earlier) = seen.insert(hash.value(), rank) {
            return Ok(Some((earlier, rank)));
        }
    }
    Ok(None)
}

/// Hash each batch on the worker pool, then merge it into the map on this
/// thread in rank order. Only the merge touches the map, so "first seen"
/// always means lowest rank.
fn search_parallel(
    seen: &mut FirstSeen,
    num_bits: u32,
    limit: u64,
) -> Result<Option<(u64, u64)>> {
    for (start, len) in batches(0, limit) {
        trace!("collision batch: {} ranks from {}", len, start);

        let hashes = (0..len)
            .into_par_iter()
            .map(|offset| hash_bytes(&candidate_at(start + offset as u64), num_bits))
            .collect::<Result<Vec<_>>>()?;

        for (offset, hash) in hashes.into_iter().enumerate() {
            let rank = start + offset as u64;
            if let Some(earlier) = seen.insert(hash.value(), rank) {
                return Ok(Some((earlier, rank)));
            }
        }
    }
    Ok(None)
}
