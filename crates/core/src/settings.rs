//! Runtime platform settings.
//!
//! Operational knobs (minimums, fee and bonus percentages, webhook
//! confirmation thresholds) are stored as string key/value pairs in the
//! `system_settings` table and changed by administrators at runtime. The
//! store layer fetches the rows; parsing and defaults live here so each
//! operation receives a typed value instead of reading global state.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Setting key for the minimum deposit amount.
pub const MIN_DEPOSIT_AMOUNT: &str = "min_deposit_amount";
/// Setting key for the minimum withdrawal amount.
pub const MIN_WITHDRAWAL_AMOUNT: &str = "min_withdrawal_amount";
/// Setting key for the withdrawal fee percentage.
pub const WITHDRAWAL_FEE_PERCENTAGE: &str = "withdrawal_fee_percentage";
/// Setting key for the referral bonus percentage.
pub const REFERRAL_BONUS_PERCENTAGE: &str = "referral_bonus_percentage";
/// Setting key for the minimum crypto confirmations.
pub const MIN_CRYPTO_CONFIRMATIONS: &str = "min_crypto_confirmations";
/// Setting key for the webhook HMAC secret.
pub const WEBHOOK_SECRET: &str = "crypto_webhook_secret";

/// Typed view of the runtime platform settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    /// Minimum accepted deposit amount.
    pub min_deposit_amount: Decimal,
    /// Minimum accepted withdrawal amount.
    pub min_withdrawal_amount: Decimal,
    /// Fee charged on withdrawals, in percent.
    pub withdrawal_fee_percentage: Decimal,
    /// Bonus awarded to referrers, in percent. Zero disables the bonus.
    pub referral_bonus_percentage: Decimal,
    /// Confirmations required before a crypto deposit is credited.
    pub min_crypto_confirmations: i64,
    /// Shared secret for webhook signature verification.
    pub webhook_secret: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            min_deposit_amount: Decimal::new(100, 0),
            min_withdrawal_amount: Decimal::new(50, 0),
            withdrawal_fee_percentage: Decimal::new(5, 1), // 0.5%
            referral_bonus_percentage: Decimal::new(5, 0),
            min_crypto_confirmations: 3,
            webhook_secret: edgevest_shared::webhook::UNCONFIGURED_SECRET.to_string(),
        }
    }
}

impl PlatformSettings {
    /// Builds typed settings from raw key/value rows.
    ///
    /// Unknown keys are ignored; missing or malformed values keep their
    /// defaults so a bad admin edit cannot take the platform down.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                MIN_DEPOSIT_AMOUNT => {
                    parse_decimal_into(value, &mut settings.min_deposit_amount);
                }
                MIN_WITHDRAWAL_AMOUNT => {
                    parse_decimal_into(value, &mut settings.min_withdrawal_amount);
                }
                WITHDRAWAL_FEE_PERCENTAGE => {
                    parse_decimal_into(value, &mut settings.withdrawal_fee_percentage);
                }
                REFERRAL_BONUS_PERCENTAGE => {
                    parse_decimal_into(value, &mut settings.referral_bonus_percentage);
                }
                MIN_CRYPTO_CONFIRMATIONS => {
                    if let Ok(parsed) = value.trim().parse::<i64>() {
                        settings.min_crypto_confirmations = parsed;
                    }
                }
                WEBHOOK_SECRET => {
                    if !value.trim().is_empty() {
                        settings.webhook_secret = value.trim().to_string();
                    }
                }
                _ => {}
            }
        }
        settings
    }
}

fn parse_decimal_into(value: &str, target: &mut Decimal) {
    if let Ok(parsed) = Decimal::from_str(value.trim()) {
        *target = parsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let settings = PlatformSettings::default();
        assert_eq!(settings.min_deposit_amount, dec!(100));
        assert_eq!(settings.min_withdrawal_amount, dec!(50));
        assert_eq!(settings.withdrawal_fee_percentage, dec!(0.5));
        assert_eq!(settings.referral_bonus_percentage, dec!(5));
        assert_eq!(settings.min_crypto_confirmations, 3);
    }

    #[test]
    fn test_from_pairs_overrides() {
        let settings = PlatformSettings::from_pairs([
            (MIN_WITHDRAWAL_AMOUNT, "25"),
            (WITHDRAWAL_FEE_PERCENTAGE, "1.25"),
            (REFERRAL_BONUS_PERCENTAGE, "10"),
            (MIN_CRYPTO_CONFIRMATIONS, "6"),
            (WEBHOOK_SECRET, "s3cret"),
        ]);
        assert_eq!(settings.min_withdrawal_amount, dec!(25));
        assert_eq!(settings.withdrawal_fee_percentage, dec!(1.25));
        assert_eq!(settings.referral_bonus_percentage, dec!(10));
        assert_eq!(settings.min_crypto_confirmations, 6);
        assert_eq!(settings.webhook_secret, "s3cret");
    }

    #[test]
    fn test_malformed_values_keep_defaults() {
        let settings = PlatformSettings::from_pairs([
            (MIN_WITHDRAWAL_AMOUNT, "not-a-number"),
            (MIN_CRYPTO_CONFIRMATIONS, "3.5"),
            (WEBHOOK_SECRET, "   "),
        ]);
        assert_eq!(settings, PlatformSettings::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let settings = PlatformSettings::from_pairs([("maintenance_mode", "1")]);
        assert_eq!(settings, PlatformSettings::default());
    }
}
