use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Gateway-assigned payment record.
///
/// Created from the create-payment response, owned by the submission state
/// machine until terminal. The status is deliberately free-text: the SDK
/// only interprets `"initiated"`, every other value is terminal and handed
/// to the host verbatim.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Gateway payment identifier.
    pub id: String,
    /// Free-text payment status.
    pub status: String,
    /// Amount in the smallest currency unit.
    #[serde(default)]
    pub amount: i64,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: String,
    /// Merchant-supplied description.
    #[serde(default)]
    pub description: Option<String>,
    /// Merchant metadata echoed back by the gateway.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Payment source attributes. For card payments this carries the
    /// 3-D Secure `transaction_url` and, after reconciliation, the
    /// authentication `message`.
    #[serde(default)]
    pub source: HashMap<String, String>,
}

impl Payment {
    /// Bank-provided 3-D Secure challenge URL, when one was issued.
    pub fn card_transaction_url(&self) -> Option<&str> {
        self.source
            .get(consts::SOURCE_TRANSACTION_URL)
            .map(String::as_str)
    }

    /// Whether the gateway asked for a step-up challenge.
    pub fn requires_authentication(&self) -> bool {
        self.status.eq_ignore_ascii_case(consts::STATUS_INITIATED)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn status_comparison_is_case_insensitive() {
        let mut payment: Payment = serde_json::from_value(serde_json::json!({
            "id": "pay_1",
            "status": "INITIATED",
        }))
        .unwrap();
        assert!(payment.requires_authentication());

        payment.status = "paid".to_string();
        assert!(!payment.requires_authentication());
    }

    #[test]
    fn transaction_url_comes_from_the_source() {
        let payment: Payment = serde_json::from_value(serde_json::json!({
            "id": "pay_1",
            "status": "initiated",
            "source": { "transaction_url": "https://bank.example/3ds/1" },
        }))
        .unwrap();
        assert_eq!(
            Some("https://bank.example/3ds/1"),
            payment.card_transaction_url()
        );
    }
}
