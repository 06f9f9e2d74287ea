//! # Truncated MD5 and brute-force search
//!
//! Hashing with a configurable output width, plus exhaustive searches that
//! show how quickly short digests fall apart.
//!
//! ## Modules
//!
//! - **md5**: the hash pipeline (encoding, padding, compression, truncation)
//! - **candidates**: the shared enumeration of messages tried by the searches
//! - **preimage**: second-preimage search against a target message
//! - **collision**: birthday-style collision search
//! - **search**: search limits, execution strategy and result types
//!
//! Messages are text whose characters all fit in one byte (U+0000 to
//! U+00FF); each character is hashed as that byte.
//!
//! ## Security Warning
//!
//! MD5 is cryptographically broken, and a truncated MD5 even more so. This
//! crate exists to measure that, not to protect anything.
//!
//! ## Examples
//!
//! ```rust
//! use trunc_md5::{find_collision, hash, to_hex};
//!
//! let full = hash("Alexandria", 128).unwrap();
//! assert_eq!(to_hex(full.value()), "a6bc8f85a33112c5beea4d357caad4cd");
//!
//! let collision = find_collision(8).unwrap();
//! assert_eq!(
//!     hash(&collision.first, 8).unwrap(),
//!     hash(&collision.second, 8).unwrap()
//! );
//! ```

pub mod candidates;
pub mod collision;
pub mod error;
pub mod md5;
pub mod preimage;
pub mod search;

// Re-export commonly used items
pub use collision::{find_collision, find_collision_with_config};
pub use error::{Error, InputError, InvariantError, Result};
pub use md5::{digest, hash, to_hex, Digest, TruncatedHash};
pub use preimage::{find_second_preimage, find_second_preimage_with_config};
pub use search::{Collision, SearchConfig, SecondPreimage, Strategy};
