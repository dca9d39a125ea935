//! Constants shared across the SDK.

/// Host of the SDK-owned 3-D Secure return endpoint. Issuing banks redirect
/// here when a challenge finishes; changing it breaks deployed redirect
/// pages.
pub const RETURN_HOST: &str = "sdk.paysheet.io";

/// Full return URL sent to the gateway as the payment callback.
pub const RETURN_URL: &str = "https://sdk.paysheet.io/payment/return";

/// Gateway payment status meaning "accepted, bank wants a challenge".
pub const STATUS_INITIATED: &str = "initiated";

/// Source type tag for card payments on the wire.
pub const SOURCE_TYPE_CREDITCARD: &str = "creditcard";

/// Key under which a card payment source carries its challenge URL.
pub const SOURCE_TRANSACTION_URL: &str = "transaction_url";

/// Key under which reconciliation attaches the authentication message.
pub const SOURCE_MESSAGE: &str = "message";

/// Gateway request timeout.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
