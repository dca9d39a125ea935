//! Terminal outcome handed to the host application.

use serde::{Deserialize, Serialize};

use crate::{
    errors::PaymentError,
    models::{Payment, Token},
};

/// Exactly one of these is produced per submission attempt.
///
/// Cancellation is a first-class outcome, not an error; the host alone
/// decides how to present failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PaymentResult {
    /// The payment reached a terminal gateway status.
    Completed(Payment),
    /// The save-only token flow finished.
    CompletedToken(Token),
    /// The attempt failed; see the carried error.
    Failed(PaymentError),
    /// The user abandoned the 3-D Secure challenge.
    Canceled,
}
