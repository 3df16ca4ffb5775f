//! cache-latency-benchmark - per-request GET latency for key-value caches
//!
//! Spawns one worker thread per requested client, opens the timed
//! window for all of them at once, and prints each worker's raw
//! nanosecond samples as one line on stdout. Anything else the tool
//! has to say goes to stderr.

use std::io::{self, Write};

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cache_latency_benchmark::benchmark::{write_samples, Harness};
use cache_latency_benchmark::client::{CacheClient, RespConnector};
use cache_latency_benchmark::config::{BenchConfig, CliArgs};
use cache_latency_benchmark::utils::BenchError;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout is reserved for the sample lines; all logging goes to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Build the object stored under the benchmark key. Reserved fallibly
/// so an oversized request dies with a clean error instead of an abort.
fn test_value(size: usize) -> Result<Vec<u8>, BenchError> {
    let mut value = Vec::new();
    value
        .try_reserve_exact(size)
        .map_err(|source| BenchError::Allocation {
            what: "test value",
            source,
        })?;
    value.extend(std::iter::repeat_with(|| fastrand::alphanumeric() as u8).take(size));
    Ok(value)
}

/// Store the benchmark value under the shared key, on a dedicated
/// session, before any worker launches.
fn seed_test_key(connector: &RespConnector, config: &BenchConfig) -> Result<(), BenchError> {
    let value = test_value(config.object_size)?;
    let mut client = connector.session()?;
    client.set(&config.key, &value)?;
    info!("Seeded key {:?} with {} bytes", config.key, value.len());
    Ok(())
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();
    setup_logging(args.verbose, args.quiet);

    let config = BenchConfig::from_cli(&args);
    info!(
        "cache-latency-benchmark v{} -> {}",
        env!("CARGO_PKG_VERSION"),
        config.endpoint()
    );
    info!(
        "Workers: {}, object size: {} B, requests per worker: {}",
        config.workers, config.object_size, config.requests
    );

    let connector = RespConnector::new(
        config.host.clone(),
        config.port,
        config.connect_timeout,
    );
    seed_test_key(&connector, &config)?;

    let harness = Harness::new(config, connector);
    let reports = harness.run()?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    write_samples(&mut out, &reports)?;
    out.flush()?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
