//! Merge a 3-D Secure outcome back onto the payment it belongs to.

use paysheet_env::logger;

use crate::{auth::AuthResult, consts, errors::PaymentError, models::Payment, result::PaymentResult};

/// Reconcile the challenge outcome with the original payment record.
///
/// Pure and total over [`AuthResult`]: a completed challenge whose `id` does
/// not match the submitted payment is a protocol-integrity failure and is
/// reported, never silently accepted. On a match the payment takes the
/// authenticated status and the message is attached to its source, after
/// which the record is terminal.
pub fn reconcile(mut payment: Payment, outcome: AuthResult) -> PaymentResult {
    match outcome {
        AuthResult::Completed {
            id,
            status,
            message,
        } => {
            if id != payment.id {
                logger::error!(
                    expected = %payment.id,
                    received = %id,
                    "authentication outcome references a different payment"
                );
                return PaymentResult::Failed(PaymentError::AuthenticationIdMismatch {
                    expected: payment.id,
                    received: id,
                });
            }

            payment.status = status;
            payment
                .source
                .insert(consts::SOURCE_MESSAGE.to_string(), message);
            PaymentResult::Completed(payment)
        }
        AuthResult::Failed { error } => PaymentResult::Failed(PaymentError::Authentication {
            message: error.unwrap_or_else(|| "3-D Secure challenge failed".to_string()),
        }),
        AuthResult::Canceled => PaymentResult::Canceled,
    }
}
