use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use trunc_md5::{
    find_collision_with_config, find_second_preimage_with_config, hash, to_hex, Error,
    SearchConfig, Strategy,
};

/// Truncated MD5 hashing and brute-force attacks on short digests.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Hash a message and print the truncated value.
    Hash {
        message: String,
        /// Output width in bits (1-128).
        #[arg(short, long, default_value_t = 128)]
        bits: u32,
    },
    /// Search for a different message with the same truncated hash.
    Preimage {
        message: String,
        #[arg(short, long)]
        bits: u32,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Search for any two messages with the same truncated hash.
    Collision {
        #[arg(short, long)]
        bits: u32,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    /// Give up after this many candidates.
    #[arg(long, default_value_t = SearchConfig::DEFAULT_MAX_ITERATIONS)]
    max_iterations: u64,
    /// Longest candidate message to try (at most 8).
    #[arg(long, default_value_t = 8)]
    max_length: usize,
    /// Run on the current thread instead of the rayon pool.
    #[arg(long)]
    sequential: bool,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        let strategy = if self.sequential {
            Strategy::Sequential
        } else {
            Strategy::Parallel
        };
        SearchConfig::default()
            .max_iterations(self.max_iterations)
            .max_length(self.max_length)
            .strategy(strategy)
    }
}

/// The untruncated digest in conventional MD5 hex.
fn full_hex(message: &str) -> Result<String, Error> {
    Ok(to_hex(hash(message, 128)?.value()))
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Hash { message, bits } => {
            let truncated = hash(&message, bits)?;
            println!("hash({:?}, {}) = {}", message, bits, truncated);
            println!("md5 = {}", full_hex(&message)?);
        }
        Command::Preimage {
            message,
            bits,
            search,
        } => {
            let start = Instant::now();
            let found = find_second_preimage_with_config(&message, bits, &search.config())?;
            println!("target:     {:?}", message);
            println!("preimage:   {:?}", found.message);
            println!("hash:       {}", hash(&found.message, bits)?);
            println!("iterations: {}", found.iterations);
            println!("time:       {:.3} s", start.elapsed().as_secs_f64());
        }
        Command::Collision { bits, search } => {
            let start = Instant::now();
            let found = find_collision_with_config(bits, &search.config())?;
            println!("first:      {:?}", found.first);
            println!("second:     {:?}", found.second);
            println!("hash:       {}", hash(&found.first, bits)?);
            println!("iterations: {}", found.iterations);
            println!("time:       {:.3} s", start.elapsed().as_secs_f64());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_hex_is_conventional_md5() {
        assert_eq!(full_hex("").unwrap(), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            full_hex("Alexandria").unwrap(),
            "a6bc8f85a33112c5beea4d357caad4cd"
        );
    }

    #[test]
    fn test_full_hex_rejects_wide_characters() {
        assert!(full_hex("\u{263a}").unwrap_err().is_input());
    }

    #[test]
    fn test_cli_parses_search_flags() {
        let cli = Cli::parse_from([
            "trunc-md5",
            "preimage",
            "hola",
            "--bits",
            "12",
            "--max-length",
            "2",
            "--sequential",
        ]);
        match cli.command {
            Command::Preimage { message, bits, search } => {
                assert_eq!(message, "hola");
                assert_eq!(bits, 12);
                let config = search.config();
                assert_eq!(config.max_length, 2);
                assert_eq!(config.strategy, Strategy::Sequential);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
