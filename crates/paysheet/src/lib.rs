#![forbid(unsafe_code)]

//! Payment sheet SDK core.
//!
//! Host applications construct a [`PaymentSheet`] with a validated
//! [`PaymentConfig`] and a gateway client, feed card field edits into it,
//! and receive exactly one [`PaymentResult`] per submission attempt. When
//! the issuing bank demands a 3-D Secure challenge, the sheet hands an
//! [`auth::AuthSession`] to whatever web surface the host embeds and
//! reconciles the challenge outcome into the final result.
//!
//! Rendering is entirely the host's concern: field errors and sheet status
//! are published as plain observable values (`tokio::sync::watch`), never
//! as UI types.

pub mod auth;
pub mod config;
pub mod consts;
pub mod errors;
pub mod fields;
pub mod gateway;
pub mod models;
pub mod reconcile;
pub mod result;
pub mod sheet;

pub use auth::{AuthResult, AuthSession, ChallengeSurface, NavigationDirective, SurfaceEvent};
pub use config::{InvalidConfigError, PaymentConfig};
pub use errors::{ApiErrorResponse, GatewayError, PaymentError};
pub use fields::{CardForm, FieldKind, FieldValidator};
pub use gateway::{ApiClient, PaymentGateway};
pub use models::{Payment, PaymentRequest, Token, TokenRequest};
pub use result::PaymentResult;
pub use sheet::{PaymentSheet, SheetStatus};
