use serde::{Deserialize, Serialize};

/// Gateway-assigned card token from the save-only flow.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Gateway token identifier.
    pub id: String,
    /// Free-text token status.
    pub status: String,
    /// Card brand reported by the gateway.
    #[serde(default)]
    pub brand: Option<String>,
}
