//! Wire models exchanged with the payment gateway.

mod payment;
mod request;
mod token;

pub use payment::Payment;
pub use request::{CardPaymentSource, PaymentRequest, TokenRequest};
pub use token::Token;
