use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use synthmon::{
    config::read_config_file,
    fingerprint::fingerprint,
    reporter::{ReporterHandle, SymonReporter},
    store::{LogStore, sqlite::SqliteStore},
};
use tracing::{debug, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: String,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("synthmon", LevelFilter::TRACE),
        ("agent", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    let Some(symon) = config.symon.clone() else {
        anyhow::bail!("no symon section in configuration, nothing to report to");
    };

    let config_version = fingerprint(&config);
    debug!("active config fingerprint: {config_version}");

    let storage = config.storage.clone().unwrap_or_default();
    let store = Arc::new(SqliteStore::open(&storage.path).await?);

    let reporter = SymonReporter::new(
        &symon.url,
        &symon.api_key,
        &symon.instance_id,
        &config_version,
        store.clone(),
    );

    // Handshake failure at startup is fatal; the operator decides whether
    // to restart without reporting
    reporter.handshake().await?;

    let handle = ReporterHandle::spawn(reporter, Duration::from_secs(symon.report_interval));
    info!(
        "reporting history to {} every {}s",
        symon.url, symon.report_interval
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    handle.shutdown().await;
    store.close().await?;

    Ok(())
}
