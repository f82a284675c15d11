mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use procpulse_collector::report;
use procpulse_collector::store::SampleStore;
use procpulse_collector::{ProcSource, SnapshotSource};
use procpulse_shipper::backlog::{self, BacklogSender};
use procpulse_shipper::{ConsoleMirror, Shipper};
use tokio::signal;
use tokio::time::interval;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("procpulse=info".parse()?))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => config::AgentConfig::load(&path)?,
        None => config::AgentConfig::default(),
    };
    let period = Duration::from_secs(config.interval_secs);

    tracing::info!(
        collector = %format!("{}:{}", config.collector_host, config.collector_port),
        interval_secs = config.interval_secs,
        backlog = config.backlog_capacity,
        "procpulse-agent starting"
    );

    let store = Arc::new(SampleStore::new());
    let source = ProcSource::new(&config.proc_path);
    let (backlog_tx, backlog_rx) = backlog::bounded(config.backlog_capacity);

    let mut shipper = Shipper::new(
        config.collector_host.clone(),
        config.collector_port,
        Duration::from_millis(config.socket_timeout_ms),
    );
    if config.console_output {
        shipper = shipper.with_mirror(Box::new(ConsoleMirror));
    }

    // Sampler: one snapshot per tick. A failed capture skips the cycle and
    // leaves the last good pair visible to the derive loop.
    let sampler = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let mut tick = interval(period);
            loop {
                tick.tick().await;
                match source.capture() {
                    Ok(snapshot) => store.publish(snapshot).await,
                    Err(e) => {
                        tracing::warn!(source = source.name(), error = %e, "Snapshot capture failed, cycle skipped");
                    }
                }
            }
        })
    };

    let shipping = tokio::spawn(async move { shipper.drain(backlog_rx).await });
    let deriving = tokio::spawn(derive_loop(Arc::clone(&store), backlog_tx, period));

    // Shutdown is abrupt: backlogged reports are not drained.
    let result = tokio::select! {
        res = shipping => match res {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Shipper failed fatally");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        },
        res = deriving => match res {
            Ok(outcome) => outcome,
            Err(e) => Err(e.into()),
        },
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    };

    sampler.abort();
    result
}

/// Derive-serialize-enqueue cycle. Suspends on the sample store's readiness
/// gate only during warm-up and on the backlog when it is full.
async fn derive_loop(
    store: Arc<SampleStore>,
    backlog: BacklogSender,
    period: Duration,
) -> Result<()> {
    let mut tick = interval(period);
    loop {
        tick.tick().await;
        let pair = store.read_pair().await;
        let report = report::build(&pair);
        // A report that cannot be serialized can never be shipped; that is
        // an unrecoverable bug, not a skippable cycle.
        let payload = serde_json::to_string(&report)?;
        if backlog.push(payload).await.is_err() {
            anyhow::bail!("event backlog closed");
        }
    }
}
