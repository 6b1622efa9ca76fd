//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. All sends are best-effort: callers live
//! outside any atomic unit of work and log failures instead of propagating
//! them.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;
use crate::notification::NotificationEvent;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    /// Renders and sends the email for a notification event.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_notification(&self, event: &NotificationEvent) -> Result<(), EmailError> {
        let (subject, body) = render(event);
        self.send_email(event.recipient(), &subject, &body).await
    }

    /// Sends a generic email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Renders the subject and plain-text body for an event.
fn render(event: &NotificationEvent) -> (String, String) {
    match event {
        NotificationEvent::DepositConfirmed {
            first_name,
            amount,
            transaction_id,
            ..
        } => (
            "Your deposit has been confirmed - Edgevest".to_string(),
            format!(
                r"Hi {first_name},

Your deposit of ${amount} has been confirmed and credited to your account
balance.

Reference: {transaction_id}

Best regards,
The Edgevest Team"
            ),
        ),
        NotificationEvent::WithdrawalRequested {
            first_name,
            amount,
            fee,
            payment_method,
            transaction_id,
            ..
        } => (
            "Withdrawal request received - Edgevest".to_string(),
            format!(
                r"Hi {first_name},

We received your withdrawal request of ${amount} via {payment_method}.
A fee of ${fee} applies. The funds have been reserved and will be released
once the withdrawal is processed.

Reference: {transaction_id}

Best regards,
The Edgevest Team"
            ),
        ),
        NotificationEvent::InvestmentOpened {
            first_name,
            package_name,
            amount,
            expected_return,
            end_date,
            ..
        } => (
            "Investment confirmation - Edgevest".to_string(),
            format!(
                r"Hi {first_name},

Your investment of ${amount} in {package_name} is now active.
Expected return: ${expected_return}, maturing on {}.

Best regards,
The Edgevest Team",
                end_date.format("%Y-%m-%d")
            ),
        ),
        NotificationEvent::InvestmentMatured {
            first_name,
            package_name,
            payout,
            investment_id,
            ..
        } => (
            "Your investment has matured - Edgevest".to_string(),
            format!(
                r"Hi {first_name},

Your investment in {package_name} has completed. A payout of ${payout}
(principal plus profit) has been credited to your account balance.

Reference: {investment_id}

Best regards,
The Edgevest Team"
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
    }

    #[test]
    fn test_render_deposit_confirmed() {
        let event = NotificationEvent::DepositConfirmed {
            email: "user@example.com".to_string(),
            first_name: "Ada".to_string(),
            amount: dec!(1000),
            transaction_id: Uuid::new_v4(),
        };
        let (subject, body) = render(&event);
        assert!(subject.contains("deposit"));
        assert!(body.contains("Hi Ada"));
        assert!(body.contains("$1000"));
    }

    #[test]
    fn test_render_investment_opened_includes_maturity_date() {
        let end_date = Utc::now();
        let event = NotificationEvent::InvestmentOpened {
            email: "user@example.com".to_string(),
            first_name: "Grace".to_string(),
            package_name: "Growth Fund".to_string(),
            amount: dec!(500),
            expected_return: dec!(50),
            end_date,
        };
        let (_, body) = render(&event);
        assert!(body.contains("Growth Fund"));
        assert!(body.contains(&end_date.format("%Y-%m-%d").to_string()));
    }
}
