//! Shared types, errors, and configuration for Edgevest.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error taxonomy
//! - Configuration management
//! - Transactional email delivery
//! - Post-commit notification events
//! - Webhook signature verification
//! - Pagination types for list queries

pub mod config;
pub mod email;
pub mod error;
pub mod notification;
pub mod types;
pub mod webhook;

pub use config::AppConfig;
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use notification::NotificationEvent;
