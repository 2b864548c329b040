//! Memocache demo
//!
//! Wraps `add_one` with the environment-configured policy and calls it three
//! times: a miss, a hit, then a recompute once the single reuse is spent.
//!
//! `memocache flush` deletes every persisted snapshot in the cache directory.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memocache::{CacheError, CallArgs, Config, Memoized, PersistenceAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memocache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_dir={}, expiry={}s, max_reuse={}, persistent={}",
        config.cache_dir.display(),
        config.expiry_secs,
        config.max_reuse,
        config.persistent
    );

    if std::env::args().nth(1).as_deref() == Some("flush") {
        let removed = PersistenceAdapter::new(&config.cache_dir)
            .flush()
            .await
            .context("flushing cache directory")?;
        info!("Removed {} cache snapshots", removed);
        return Ok(());
    }

    let add_one = Memoized::wrap("add_one", config.policy(), |args: CallArgs| async move {
        println!("add_one body runs");
        Ok::<i64, CacheError>(args.get::<i64>(0)? + 1)
    })
    .await;

    for _ in 0..3 {
        let result = add_one.call(CallArgs::new().arg(5).kwarg("_check", true)).await?;
        println!("Result: {}", result);
    }

    let stats = add_one.stats().await;
    info!(
        "Stats: hits={}, misses={}, stale={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.stale,
        stats.hit_rate()
    );

    Ok(())
}
