//! Maturity processor: pays out investments whose term has elapsed.
//!
//! Each investment is processed in its own atomic unit of work, so one bad
//! row cannot block the rest of the batch. The store's `status = active`
//! guard makes re-runs no-ops: an investment is paid out exactly once no
//! matter how often the batch fires.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

use edgevest_db::{InvestmentRepository, StoreError};
use edgevest_shared::NotificationEvent;

use crate::notifier::NotificationSender;

/// Outcome of paying out one investment.
#[derive(Debug, Clone)]
pub struct PayoutOutcome {
    /// Principal + profit credited.
    pub payout: Decimal,
    /// Event for the notification worker.
    pub event: NotificationEvent,
}

/// Store surface the processor needs; implemented by
/// `InvestmentRepository`, stubbed in tests.
#[async_trait]
pub trait MaturityStore: Send + Sync {
    /// Ids of active investments past their end date.
    async fn matured_investments(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, StoreError>;

    /// Pays out one investment; `None` when it no longer qualifies.
    async fn pay_out(
        &self,
        investment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<PayoutOutcome>, StoreError>;
}

#[async_trait]
impl MaturityStore for InvestmentRepository {
    async fn matured_investments(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .find_matured(now)
            .await?
            .into_iter()
            .map(|investment| investment.id)
            .collect())
    }

    async fn pay_out(
        &self,
        investment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<PayoutOutcome>, StoreError> {
        Ok(self
            .complete_matured(investment_id, now)
            .await?
            .map(|paid| PayoutOutcome {
                payout: paid.payout,
                event: paid.event,
            }))
    }
}

/// Result of one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaturityReport {
    /// Investments paid out in this run.
    pub processed: u64,
    /// Investments that failed and were skipped.
    pub failed: u64,
    /// Investments that no longer qualified when re-checked under lock.
    pub skipped: u64,
    /// Sum of all payouts in this run.
    pub total_payout: Decimal,
}

/// The scheduled batch job.
pub struct MaturityProcessor<S> {
    store: S,
    notifier: NotificationSender,
}

impl<S: MaturityStore> MaturityProcessor<S> {
    /// Creates a processor over a store and a notification sender.
    pub const fn new(store: S, notifier: NotificationSender) -> Self {
        Self { store, notifier }
    }

    /// Runs one batch: finds matured investments and pays each out
    /// independently. Per-investment failures are logged and skipped; the
    /// batch itself only fails if the matured query does.
    ///
    /// # Errors
    ///
    /// Returns an error if the matured-investments query fails.
    pub async fn run_batch(&self, now: DateTime<Utc>) -> Result<MaturityReport, StoreError> {
        let matured = self.store.matured_investments(now).await?;
        if matured.is_empty() {
            info!("no matured investments to process");
            return Ok(MaturityReport::default());
        }

        info!(count = matured.len(), "processing matured investments");
        let mut report = MaturityReport::default();

        for investment_id in matured {
            match self.store.pay_out(investment_id, now).await {
                Ok(Some(outcome)) => {
                    report.processed += 1;
                    report.total_payout += outcome.payout;
                    self.notifier.send(outcome.event);
                }
                Ok(None) => {
                    // Completed or cancelled since the query; nothing to do.
                    report.skipped += 1;
                }
                Err(err) => {
                    // One bad row must not halt the batch.
                    error!(investment_id = %investment_id, "failed to pay out investment: {err}");
                    report.failed += 1;
                }
            }
        }

        info!(
            processed = report.processed,
            failed = report.failed,
            skipped = report.skipped,
            total_payout = %report.total_payout,
            "maturity batch finished"
        );
        Ok(report)
    }
}
