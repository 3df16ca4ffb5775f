//! Command-line argument parsing
//!
//! Workload shape comes from three positional arguments; everything
//! else is an option with a sensible default. Range validation lives
//! in the parsers so a bad invocation dies with a usage message before
//! any connection is attempted.

use clap::Parser;

/// Concurrent GET-latency benchmark for key-value cache servers
#[derive(Parser, Debug, Clone)]
#[command(name = "cache-latency-benchmark")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct CliArgs {
    /// Print help information
    #[arg(long = "help", action = clap::ArgAction::Help)]
    help: (),

    // ===== Workload Shape (positional) =====
    /// Number of concurrent worker threads
    #[arg(value_name = "THREADS", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Size in bytes of the value stored under the benchmark key
    #[arg(value_name = "OBJECT_SIZE", value_parser = clap::value_parser!(u64).range(1..))]
    pub object_size: u64,

    /// Number of timed GET requests each worker issues
    #[arg(value_name = "REQUESTS", value_parser = clap::value_parser!(u64).range(1..))]
    pub requests: u64,

    // ===== Connection Options =====
    /// Cache server hostname
    #[arg(short = 'h', long = "host", default_value = "127.0.0.1")]
    pub host: String,

    /// Cache server port
    #[arg(short = 'p', long = "port", default_value_t = 6379)]
    pub port: u16,

    /// Session establishment timeout in milliseconds
    #[arg(long = "connect-timeout", default_value_t = 5000)]
    pub connect_timeout_ms: u64,

    // ===== Workload Options =====
    /// Key every worker reads; seeded with a random value before the run
    #[arg(long = "key", default_value = "latbench:testkey")]
    pub key: String,

    // ===== Output Options =====
    /// Only log errors (stdout still carries the sample lines)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse CLI arguments from the command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
