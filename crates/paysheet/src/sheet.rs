//! Payment submission state machine.
//!
//! Owns the lifecycle `Reset → Loading → {Completed | PaymentAuth3dSecure |
//! Error}`. `PaymentAuth3dSecure` is the only non-terminal branch: the sheet
//! hands the payment to the 3-D Secure supervisor and folds its outcome back
//! in through [`complete_authentication`](PaymentSheet::complete_authentication).
//! A submission is single-flight; duplicate submits while one is pending are
//! no-ops.

use std::sync::atomic::{AtomicBool, Ordering};

use paysheet_env::logger;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
    auth::{AuthResult, AuthSession},
    config::{InvalidConfigError, PaymentConfig},
    errors::PaymentError,
    fields::{CardForm, FieldKind},
    gateway::PaymentGateway,
    models::{Payment, PaymentRequest, TokenRequest},
    reconcile::reconcile,
    result::PaymentResult,
};

/// Observable sheet status.
///
/// Serializable so the last-known state survives UI reconstruction; a
/// resumed sheet picks up exactly where the stream left off, in-flight
/// payment included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SheetStatus {
    /// Nothing submitted yet.
    Reset,
    /// Request in flight.
    Loading,
    /// Gateway accepted the payment and the bank wants a challenge.
    PaymentAuth3dSecure {
        /// The pending payment; its source carries the challenge URL.
        payment: Payment,
    },
    /// Terminal: the gateway returned a non-`initiated` status.
    Completed {
        /// The finished payment.
        payment: Payment,
    },
    /// Terminal: the attempt failed.
    Error {
        /// What went wrong.
        error: PaymentError,
    },
}

/// The payment sheet: validated card form, gateway client and status
/// stream, bound to one submission attempt.
pub struct PaymentSheet<G> {
    config: PaymentConfig,
    gateway: G,
    form: CardForm,
    status: watch::Sender<SheetStatus>,
    in_flight: AtomicBool,
}

impl<G: PaymentGateway> PaymentSheet<G> {
    /// Build a sheet. The config is validated here; an invalid one never
    /// reaches the network layer.
    pub fn new(config: PaymentConfig, gateway: G) -> Result<Self, InvalidConfigError> {
        Self::resume(config, gateway, SheetStatus::Reset)
    }

    /// Rebuild a sheet from a persisted status snapshot.
    ///
    /// A snapshot taken while a challenge was pending re-arms the
    /// single-flight guard so a stray submit cannot race the outstanding
    /// authentication; `complete_authentication` releases it. A `Loading`
    /// snapshot resumes as `Reset`: the interrupted network call died with
    /// the old process, so that attempt is over and the sheet must accept a
    /// fresh submission.
    pub fn resume(
        config: PaymentConfig,
        gateway: G,
        status: SheetStatus,
    ) -> Result<Self, InvalidConfigError> {
        config.validate()?;
        let status = match status {
            SheetStatus::Loading => SheetStatus::Reset,
            other => other,
        };
        let in_flight = matches!(status, SheetStatus::PaymentAuth3dSecure { .. });
        let (status, _) = watch::channel(status);
        Ok(Self {
            config,
            gateway,
            form: CardForm::new(),
            status,
            in_flight: AtomicBool::new(in_flight),
        })
    }

    /// Subscribe to status transitions. Fires on every change.
    pub fn status(&self) -> watch::Receiver<SheetStatus> {
        self.status.subscribe()
    }

    /// Last published status.
    pub fn current_status(&self) -> SheetStatus {
        self.status.borrow().clone()
    }

    /// Record a field edit through the validation pipeline.
    pub fn input(&mut self, kind: FieldKind, text: impl Into<String>) -> Option<String> {
        self.form.set_value(kind, text)
    }

    /// Forward a focus transition to the field's validator.
    pub fn focus_changed(&self, kind: FieldKind, has_focus: bool) {
        self.form.focus_changed(kind, has_focus);
    }

    /// Read access to the form, for error slots and current values.
    pub fn form(&self) -> &CardForm {
        &self.form
    }

    /// Submit the card payment.
    ///
    /// No-op while a submission (or its authentication) is pending, and
    /// refused without a network call while any field is invalid. Publishes
    /// `Loading` and then exactly one follow-up status.
    pub async fn submit(&self) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            logger::debug!("submit ignored, a submission is already in flight");
            return;
        }

        if !self.form.is_valid() {
            logger::debug!("submit refused, card form has validation errors");
            self.in_flight.store(false, Ordering::Release);
            return;
        }

        self.status.send_replace(SheetStatus::Loading);
        let next = self.create_payment().await;
        let auth_pending = matches!(next, SheetStatus::PaymentAuth3dSecure { .. });
        self.status.send_replace(next);

        // The guard stays held through a pending challenge and is released
        // by complete_authentication.
        if !auth_pending {
            self.in_flight.store(false, Ordering::Release);
        }
    }

    async fn create_payment(&self) -> SheetStatus {
        let request = match PaymentRequest::build(&self.config, &self.form) {
            Ok(request) => request,
            Err(report) => {
                logger::error!(?report, "failed to assemble the payment request");
                return SheetStatus::Error {
                    error: PaymentError::InvalidCardData {
                        message: report.current_context().to_string(),
                    },
                };
            }
        };

        match self.gateway.create_payment(&request).await {
            Ok(payment) if payment.requires_authentication() => {
                logger::info!(payment_id = %payment.id, "bank requested a 3ds challenge");
                SheetStatus::PaymentAuth3dSecure { payment }
            }
            Ok(payment) => {
                logger::info!(payment_id = %payment.id, status = %payment.status, "payment completed");
                SheetStatus::Completed { payment }
            }
            Err(report) => {
                logger::error!(?report, "payment creation failed");
                SheetStatus::Error {
                    error: PaymentError::Gateway(report.current_context().clone()),
                }
            }
        }
    }

    /// Tokenize-only flow: save the card without charging it.
    ///
    /// Shares the single-flight guard with [`PaymentSheet::submit`] and
    /// returns `None` when busy or when the form is invalid; otherwise the
    /// terminal result, without touching the payment status stream.
    pub async fn submit_token(&self) -> Option<PaymentResult> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            logger::debug!("token request ignored, a submission is already in flight");
            return None;
        }

        let result = if self.form.is_valid() {
            match TokenRequest::build(&self.form) {
                Ok(request) => match self.gateway.create_token(&request).await {
                    Ok(token) => Some(PaymentResult::CompletedToken(token)),
                    Err(report) => {
                        logger::error!(?report, "token creation failed");
                        Some(PaymentResult::Failed(PaymentError::Gateway(
                            report.current_context().clone(),
                        )))
                    }
                },
                Err(report) => {
                    logger::error!(?report, "failed to assemble the token request");
                    Some(PaymentResult::Failed(PaymentError::InvalidCardData {
                        message: report.current_context().to_string(),
                    }))
                }
            }
        } else {
            logger::debug!("token request refused, card form has validation errors");
            None
        };

        self.in_flight.store(false, Ordering::Release);
        result
    }

    /// Open an authentication session for the pending challenge, if any.
    ///
    /// The payment crosses into the session by value; the web surface may
    /// outlive this sheet and reconcile through a resumed one.
    pub fn authentication_session(&self) -> Option<AuthSession> {
        match &*self.status.borrow() {
            SheetStatus::PaymentAuth3dSecure { payment } => Some(AuthSession::new(payment)),
            _ => None,
        }
    }

    /// Fold the challenge outcome back into the sheet.
    ///
    /// Returns `None` when no challenge is pending. Otherwise reconciles
    /// the outcome with the pending payment, publishes the follow-up status
    /// (`Completed`, `Error`, or back to `Reset` on cancellation) and
    /// releases the single-flight guard.
    pub fn complete_authentication(&self, outcome: AuthResult) -> Option<PaymentResult> {
        let payment = match &*self.status.borrow() {
            SheetStatus::PaymentAuth3dSecure { payment } => payment.clone(),
            _ => {
                logger::warn!("authentication outcome arrived with no pending challenge");
                return None;
            }
        };

        let result = reconcile(payment, outcome);
        match &result {
            PaymentResult::Completed(payment) => {
                self.status.send_replace(SheetStatus::Completed {
                    payment: payment.clone(),
                });
            }
            PaymentResult::Failed(error) => {
                self.status.send_replace(SheetStatus::Error {
                    error: error.clone(),
                });
            }
            // Cancellation is not an error: the attempt is simply over and
            // the sheet returns to rest.
            PaymentResult::Canceled => {
                self.status.send_replace(SheetStatus::Reset);
            }
            // reconcile never produces a token.
            PaymentResult::CompletedToken(_) => {}
        }

        self.in_flight.store(false, Ordering::Release);
        Some(result)
    }

    /// Terminal result of the submission, once one exists.
    pub fn payment_result(&self) -> Option<PaymentResult> {
        match &*self.status.borrow() {
            SheetStatus::Completed { payment } => Some(PaymentResult::Completed(payment.clone())),
            SheetStatus::Error { error } => Some(PaymentResult::Failed(error.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn status_round_trips_through_serde() {
        let status = SheetStatus::Error {
            error: PaymentError::Authentication {
                message: "challenge failed".to_string(),
            },
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: SheetStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, back);
    }

    #[test]
    fn reset_is_the_initial_state() {
        let json = serde_json::to_string(&SheetStatus::Reset).unwrap();
        assert_eq!(r#"{"state":"reset"}"#, json);
    }
}
