//! Caller-supplied payment configuration.

use std::collections::HashMap;

use masking::{ApiKey, Secret};
use serde::{Deserialize, Serialize};

/// Immutable per-submission configuration supplied by the host application.
///
/// A config is validated when the sheet is constructed; an invalid one never
/// reaches the network layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Amount in the smallest unit of `currency`.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Payment description shown on the dashboard and statements.
    pub description: String,
    /// Merchant publishable API key.
    pub publishable_key: Secret<String, ApiKey>,
    /// Gateway base URL.
    pub base_url: String,
    /// Authorize now, capture later.
    pub manual: bool,
    /// Ask the gateway to keep the card on file.
    pub save_card: bool,
    /// Arbitrary merchant metadata forwarded with the payment.
    pub metadata: HashMap<String, String>,
}

impl PaymentConfig {
    /// Build a config with the required fields; flags default to off.
    pub fn new(
        amount: i64,
        currency: impl Into<String>,
        description: impl Into<String>,
        publishable_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: currency.into(),
            description: description.into(),
            publishable_key: Secret::new(publishable_key.into()),
            base_url: base_url.into(),
            manual: false,
            save_card: false,
            metadata: HashMap::new(),
        }
    }

    /// Enable manual capture.
    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Enable saving the card on file.
    pub fn with_save_card(mut self, save_card: bool) -> Self {
        self.save_card = save_card;
        self
    }

    /// Attach merchant metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Check the config, collecting every violation rather than stopping at
    /// the first.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        use masking::PeekInterface;

        let mut violations = Vec::new();

        if self.amount <= 0 {
            violations.push("amount must be a positive integer".to_string());
        }
        if self.currency.trim().len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            violations.push("currency must be a three-letter ISO code".to_string());
        }
        if self.description.trim().is_empty() {
            violations.push("description is required".to_string());
        }
        if self.publishable_key.peek().trim().is_empty() {
            violations.push("publishable key is required".to_string());
        }
        if url::Url::parse(&self.base_url).is_err() {
            violations.push("base url must be a valid url".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvalidConfigError { violations })
        }
    }
}

/// Construction-time configuration failure listing every violated field.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid payment config: {}", violations.join(", "))]
pub struct InvalidConfigError {
    /// One entry per violated field.
    pub violations: Vec<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn valid_config() -> PaymentConfig {
        PaymentConfig::new(
            1000,
            "SAR",
            "Order #1520",
            "pk_test_123",
            "https://api.example.com/",
        )
    }

    #[test]
    fn accepts_a_well_formed_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let config = PaymentConfig::new(0, "riyal", "  ", "", "not a url");
        let error = config.validate().unwrap_err();
        assert_eq!(5, error.violations.len());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let mut config = valid_config();
        config.amount = -5;
        let error = config.validate().unwrap_err();
        assert_eq!(
            vec!["amount must be a positive integer".to_string()],
            error.violations
        );
    }

    #[test]
    fn publishable_key_stays_masked_in_debug_output() {
        let rendered = format!("{:?}", valid_config());
        assert!(!rendered.contains("pk_test_123"));
    }
}
