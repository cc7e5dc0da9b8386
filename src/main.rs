//! Byte LRU - replay a command script against a byte-budgeted cache
//!
//! Usage: `byte_lru [SCRIPT]`. Reads from stdin when no script is given.
//! The byte budget comes from `CACHE_CAPACITY_BYTES`.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use byte_lru::replay::Replayer;
use byte_lru::{BoundedLruCache, CacheConfig};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var.
    // Logs go to stderr so stdout carries only command results.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "byte_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = CacheConfig::from_env();
    info!("Configuration loaded: capacity_bytes={}", config.capacity_bytes);

    let cache = BoundedLruCache::from_config(&config).context("invalid cache configuration")?;
    let mut replayer = Replayer::new(cache);
    let stdout = io::stdout().lock();

    let summary = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open {path}"))?;
            info!("Replaying script {}", path);
            replayer.run(BufReader::new(file), stdout)?
        }
        None => {
            info!("Replaying script from stdin");
            replayer.run(io::stdin().lock(), stdout)?
        }
    };

    let stats = replayer.cache().stats();
    info!(
        "Replay complete: commands={}, failures={}, parse_errors={}, evictions={}, hit_rate={:.2}, bytes={}/{}",
        summary.commands,
        summary.failures,
        summary.parse_errors,
        stats.evictions,
        stats.hit_rate(),
        stats.current_bytes,
        stats.capacity_bytes
    );

    Ok(())
}
