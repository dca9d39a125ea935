//! Error types for the payment sheet.

use serde::{Deserialize, Serialize};

/// Shorthand for results carrying an `error_stack` report.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// API-level error returned by the gateway for a non-success response.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("gateway returned {status_code}: {message}")]
pub struct ApiErrorResponse {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Gateway error classification, when the body carried one.
    pub error_type: Option<String>,
    /// Human-readable message from the gateway.
    pub message: String,
}

/// Failures raised by the gateway client. Single attempt, no retries; every
/// variant is terminal for the current submission.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum GatewayError {
    /// The configured base URL or a derived endpoint failed to parse.
    #[error("invalid gateway url")]
    UrlParsingFailed,
    /// The request could not be sent at all.
    #[error("failed to reach the payment gateway: {0}")]
    RequestNotSent(String),
    /// The request timed out.
    #[error("request to the payment gateway timed out")]
    Timeout,
    /// A success response arrived but its body did not decode.
    #[error("failed to decode the gateway response")]
    ResponseDecodingFailed,
    /// The gateway rejected the request.
    #[error(transparent)]
    Api(ApiErrorResponse),
}

/// Input that no longer parses when the payment request is assembled.
///
/// Field validity is enforced by the submission state machine before the
/// builder runs, so hitting this means the two disagreed.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// An invalid value was provided.
    #[error("{message}")]
    InvalidValue {
        /// Description of the failed check.
        message: String,
    },
}

/// Terminal, host-facing failure carried in
/// [`crate::PaymentResult::Failed`]. Serializable so it can ride the sheet
/// status stream across UI reconstruction. User cancellation is not an
/// error and has its own result variant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum PaymentError {
    /// Transport or API failure while talking to the gateway.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// Card data failed to assemble into a request.
    #[error("invalid card data: {message}")]
    InvalidCardData {
        /// Description of the failed field.
        message: String,
    },
    /// The 3-D Secure challenge reported a failure.
    #[error("3-D Secure challenge failed: {message}")]
    Authentication {
        /// Description from the challenge surface, when one was given.
        message: String,
    },
    /// The challenge outcome referenced a different payment than the one
    /// submitted. Protocol-integrity failure, never coerced to success.
    #[error("authentication returned id {received} for payment {expected}")]
    AuthenticationIdMismatch {
        /// Identifier of the submitted payment.
        expected: String,
        /// Identifier the return redirect carried.
        received: String,
    },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn payment_error_round_trips_through_serde() {
        let error = PaymentError::Gateway(GatewayError::Api(ApiErrorResponse {
            status_code: 400,
            error_type: Some("invalid_request_error".to_string()),
            message: "amount is missing".to_string(),
        }));
        let json = serde_json::to_string(&error).unwrap();
        let back: PaymentError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, back);
    }

    #[test]
    fn mismatch_error_names_both_ids() {
        let error = PaymentError::AuthenticationIdMismatch {
            expected: "pay_1".to_string(),
            received: "pay_2".to_string(),
        };
        assert_eq!(
            "authentication returned id pay_2 for payment pay_1",
            error.to_string()
        );
    }
}
