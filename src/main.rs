mod core;
mod features;
mod shared;

use crate::core::cli::Args;
use crate::core::config::Config;
use crate::core::database;
use crate::core::error::AppError;
use crate::features::output_details::{
    OutputDetailService, OutputDetailSynchronizer, SiskeudesClient,
};
use crate::features::regions::RegionService;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Regions are processed strictly one at a time; a single thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded (provider={}, request_delay={}s)",
        config.siskeudes.api_url,
        config.sync.request_delay.as_secs()
    );

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    let region_service = Arc::new(RegionService::new(pool.clone()));
    let output_detail_service = Arc::new(OutputDetailService::new(pool.clone()));
    let siskeudes_client = Arc::new(SiskeudesClient::new(
        config.siskeudes.clone(),
        args.fiscal_year.clone(),
    )?);
    tracing::info!("Services initialized");

    // Ctrl-C stops the run after rolling back the region in flight
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Shutdown signal received, stopping synchronization...");
                cancel.cancel();
            }
        });
    }

    let synchronizer = OutputDetailSynchronizer::new(
        region_service,
        siskeudes_client,
        output_detail_service,
        config.sync.request_delay,
        cancel,
    );

    let result = synchronizer
        .synchronize(&args.province_filter(), args.resume_from())
        .await;

    pool.close().await;

    match result {
        Ok(report) => {
            tracing::info!(
                "Done: {} of {} regions stored",
                report.stored_regions(),
                report.outcomes.len()
            );
            Ok(())
        }
        Err(AppError::Cancelled {
            resume_from,
            province,
        }) => {
            match (resume_from, province) {
                (Some(code), Some(province)) => tracing::warn!(
                    "Run interrupted in province {}; restart with --resume-from {}",
                    province,
                    code
                ),
                (Some(code), None) => {
                    tracing::warn!("Run interrupted; restart with --resume-from {}", code)
                }
                (None, _) => tracing::warn!("Run interrupted before any region was processed"),
            }
            Err(anyhow::anyhow!("synchronization cancelled"))
        }
        Err(e) => {
            tracing::error!("Synchronization failed: {}", e);
            Err(e.into())
        }
    }
}
