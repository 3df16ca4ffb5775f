//! Resolved benchmark configuration
//!
//! One immutable value built from CLI arguments at startup and shared
//! read-only for the rest of the run.

use std::time::Duration;

use super::cli::CliArgs;

#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Worker thread count, one session each.
    pub workers: u32,
    /// Value size in bytes for the pre-run seed.
    pub object_size: usize,
    /// Timed GET requests per worker.
    pub requests: u64,
    /// Key every worker reads.
    pub key: String,
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
}

impl BenchConfig {
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            workers: args.threads,
            object_size: args.object_size as usize,
            requests: args.requests,
            key: args.key.clone(),
            host: args.host.clone(),
            port: args.port,
            connect_timeout: Duration::from_millis(args.connect_timeout_ms),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli_carries_workload_shape() {
        let args = CliArgs::parse_from(["test", "8", "512", "20000"]);
        let config = BenchConfig::from_cli(&args);
        assert_eq!(config.workers, 8);
        assert_eq!(config.object_size, 512);
        assert_eq!(config.requests, 20000);
    }

    #[test]
    fn test_connect_timeout_is_milliseconds() {
        let args = CliArgs::parse_from(["test", "1", "1", "1", "--connect-timeout", "250"]);
        let config = BenchConfig::from_cli(&args);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_endpoint_format() {
        let args = CliArgs::parse_from(["test", "1", "1", "1", "-h", "cache.local", "-p", "7000"]);
        let config = BenchConfig::from_cli(&args);
        assert_eq!(config.endpoint(), "cache.local:7000");
    }
}
