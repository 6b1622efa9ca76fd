//! Post-commit notification delivery.
//!
//! Repositories return `NotificationEvent`s from committed units of work;
//! the sender half hands them to this worker over a bounded channel. The
//! worker delivers them best-effort: a failed or dropped send is logged and
//! never surfaces to the operation that produced the event.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use edgevest_shared::{EmailService, NotificationEvent};

/// Producer handle for notification events.
///
/// Sending never blocks and never fails the caller: when the queue is full
/// or the worker is gone, the event is dropped with a warning.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    tx: mpsc::Sender<NotificationEvent>,
}

impl NotificationSender {
    /// Queues an event for delivery.
    pub fn send(&self, event: NotificationEvent) {
        if let Err(err) = self.tx.try_send(event) {
            let event = match &err {
                mpsc::error::TrySendError::Full(event)
                | mpsc::error::TrySendError::Closed(event) => event,
            };
            warn!(kind = event.kind(), recipient = event.recipient(), "notification dropped: {err}");
        }
    }

    /// Queues every event from a committed unit of work.
    pub fn send_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = NotificationEvent>,
    {
        for event in events {
            self.send(event);
        }
    }
}

/// Consumer half: delivers queued events via email.
pub struct NotificationWorker {
    rx: mpsc::Receiver<NotificationEvent>,
    email: EmailService,
}

impl NotificationWorker {
    /// Runs until every sender is dropped.
    pub async fn run(mut self) {
        info!("notification worker started");
        while let Some(event) = self.rx.recv().await {
            if let Err(err) = self.email.send_notification(&event).await {
                error!(
                    kind = event.kind(),
                    recipient = event.recipient(),
                    "failed to deliver notification: {err}"
                );
            }
        }
        info!("notification worker stopped");
    }
}

/// Creates a bounded notification channel.
#[must_use]
pub fn notification_channel(
    capacity: usize,
    email: EmailService,
) -> (NotificationSender, NotificationWorker) {
    let (tx, rx) = mpsc::channel(capacity);
    (NotificationSender { tx }, NotificationWorker { rx, email })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgevest_shared::config::EmailConfig;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn event() -> NotificationEvent {
        NotificationEvent::DepositConfirmed {
            email: "user@example.com".to_string(),
            first_name: "Ada".to_string(),
            amount: dec!(100),
            transaction_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn send_does_not_fail_when_queue_full() {
        let (sender, _worker) = notification_channel(1, EmailService::new(EmailConfig::default()));
        sender.send(event());
        // Queue is full; this drops with a warning instead of blocking.
        sender.send(event());
    }

    #[tokio::test]
    async fn send_does_not_fail_when_worker_gone() {
        let (sender, worker) = notification_channel(4, EmailService::new(EmailConfig::default()));
        drop(worker);
        sender.send(event());
    }
}
