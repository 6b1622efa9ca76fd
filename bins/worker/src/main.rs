//! Edgevest background worker.
//!
//! Runs the notification worker and the scheduled maturity batch. Deploy a
//! single instance: in-process single-flight prevents overlapping batch
//! runs, cross-process exclusion is up to the deployment.
//!
//! Usage:
//!   worker            - run the scheduler loop
//!   worker run-once   - run one maturity batch and exit (admin trigger)

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edgevest_db::InvestmentRepository;
use edgevest_jobs::{MaturityProcessor, Scheduler, notification_channel};
use edgevest_shared::{AppConfig, EmailService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edgevest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = edgevest_db::connect(&config.database.url).await?;
    info!("Connected to database");

    // Notification pipeline
    let email_service = EmailService::new(config.email.clone());
    let (notifier, notification_worker) =
        notification_channel(config.worker.notification_queue_size, email_service);
    tokio::spawn(notification_worker.run());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Notification worker started"
    );

    let processor = Arc::new(MaturityProcessor::new(InvestmentRepository::new(db), notifier));

    // Manual trigger mode for admins: one batch, then exit.
    if std::env::args().nth(1).as_deref() == Some("run-once") {
        let report = processor.run_batch(Utc::now()).await?;
        info!(
            processed = report.processed,
            total_payout = %report.total_payout,
            "manual maturity batch complete"
        );
        return Ok(());
    }

    let period = Duration::from_secs(config.worker.maturity_interval_secs);
    info!(period_secs = config.worker.maturity_interval_secs, "Maturity scheduler started");

    Scheduler::new(period)
        .run("maturity-batch", move || {
            let processor = Arc::clone(&processor);
            async move {
                if let Err(err) = processor.run_batch(Utc::now()).await {
                    tracing::error!("maturity batch failed: {err}");
                }
            }
        })
        .await
}
