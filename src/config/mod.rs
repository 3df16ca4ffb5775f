//! Configuration module

pub mod bench_config;
pub mod cli;

pub use bench_config::BenchConfig;
pub use cli::CliArgs;
