//! Background jobs for Edgevest.
//!
//! - `scheduler` - interval-driven task runner with structural single-flight
//! - `maturity` - the batch job that pays out matured investments
//! - `notifier` - post-commit notification delivery over a channel

pub mod maturity;
pub mod notifier;
pub mod scheduler;

pub use maturity::{MaturityProcessor, MaturityReport, MaturityStore};
pub use notifier::{NotificationSender, NotificationWorker, notification_channel};
pub use scheduler::Scheduler;
