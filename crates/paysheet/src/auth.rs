//! 3-D Secure authentication supervisor.
//!
//! The bank's challenge page runs in whatever web surface the host embeds;
//! the SDK only needs the surface to report navigation attempts BEFORE they
//! load, terminal page errors and user dismissal. [`AuthSession`] watches
//! every attempt for the SDK's fixed return endpoint, intercepts it, and
//! produces exactly one [`AuthResult`].

use async_trait::async_trait;
use paysheet_env::logger;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{consts, models::Payment};

/// Outcome of one 3-D Secure challenge. Produced exactly once per session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AuthResult {
    /// The bank redirected to the return endpoint.
    Completed {
        /// `id` query parameter, empty when absent.
        id: String,
        /// `status` query parameter, empty when absent.
        status: String,
        /// `message` query parameter, empty when absent.
        message: String,
    },
    /// The challenge page failed to load or reported an error.
    Failed {
        /// Error description from the surface, when one was given.
        error: Option<String>,
    },
    /// The user backed out of the challenge.
    Canceled,
}

/// What the web surface should do with an intercepted navigation attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NavigationDirective {
    /// Not the return endpoint; let the navigation proceed.
    Allow,
    /// Return endpoint reached; do NOT load it, the challenge is over.
    Finish(AuthResult),
}

/// State of one challenge, built from the serialized payment record.
///
/// The payment crosses this boundary by value through JSON because the web
/// surface may outlive the process that started the submission; a restarted
/// surface rebuilds the session from the persisted string.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthSession {
    payment: Payment,
    finished: bool,
}

impl AuthSession {
    /// Open a session for a payment, serializing it for the transfer.
    pub fn new(payment: &Payment) -> Self {
        Self {
            payment: payment.clone(),
            finished: false,
        }
    }

    /// Rebuild a session from its persisted JSON form.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Persist the session across a surface restart.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Identifier of the payment under authentication.
    pub fn payment_id(&self) -> &str {
        &self.payment.id
    }

    /// The payment record this session carries.
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    /// Bank challenge URL to load, when the gateway issued one.
    pub fn challenge_url(&self) -> Option<&str> {
        self.payment.card_transaction_url()
    }

    /// Begin the challenge. Returns the terminal result immediately when
    /// there is no URL to navigate to.
    pub fn start(&mut self) -> Option<AuthResult> {
        match self.challenge_url() {
            Some(url) if !url.trim().is_empty() => None,
            _ => {
                logger::error!(payment_id = %self.payment.id, "payment has no 3ds challenge url");
                Some(self.finish(AuthResult::Failed {
                    error: Some("missing 3-D Secure challenge URL".to_string()),
                }))
            }
        }
    }

    /// Inspect a navigation attempt before it loads.
    ///
    /// Once a result has been produced every further attempt is allowed
    /// through untouched.
    pub fn on_navigation(&mut self, url: &str) -> NavigationDirective {
        if self.finished {
            return NavigationDirective::Allow;
        }

        let Ok(parsed) = Url::parse(url) else {
            return NavigationDirective::Allow;
        };
        if parsed.host_str() != Some(consts::RETURN_HOST) {
            return NavigationDirective::Allow;
        }

        let query = |name: &str| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default()
        };

        let result = AuthResult::Completed {
            id: query("id"),
            status: query("status"),
            message: query("message"),
        };
        logger::info!(payment_id = %self.payment.id, "3ds return endpoint reached");
        NavigationDirective::Finish(self.finish(result))
    }

    /// Terminal page or network error reported by the surface.
    pub fn on_load_error(&mut self, description: &str) -> Option<AuthResult> {
        if self.finished {
            return None;
        }
        logger::error!(payment_id = %self.payment.id, error = %description, "3ds challenge failed to load");
        Some(self.finish(AuthResult::Failed {
            error: Some(description.to_string()),
        }))
    }

    /// User-initiated abandonment of the challenge surface.
    pub fn cancel(&mut self) -> Option<AuthResult> {
        if self.finished {
            return None;
        }
        Some(self.finish(AuthResult::Canceled))
    }

    fn finish(&mut self, result: AuthResult) -> AuthResult {
        self.finished = true;
        result
    }
}

/// Event reported by the host's web surface.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SurfaceEvent {
    /// A navigation is about to happen; it is held until allowed.
    NavigationAttempt(String),
    /// The page failed terminally after loading was allowed.
    LoadError(String),
    /// The user dismissed the surface.
    Dismissed,
}

/// Minimal capability the SDK needs from an embedded web renderer.
///
/// `load` both starts the initial challenge URL and releases a held
/// navigation the supervisor allowed.
#[async_trait]
pub trait ChallengeSurface: Send {
    /// Navigate to (or proceed with) the given URL.
    async fn load(&mut self, url: &str);

    /// Wait for the next surface event.
    async fn next_event(&mut self) -> SurfaceEvent;
}

/// Drive a challenge on the given surface to its single [`AuthResult`].
pub async fn supervise<S: ChallengeSurface>(
    surface: &mut S,
    session: &mut AuthSession,
) -> AuthResult {
    if let Some(early) = session.start() {
        return early;
    }
    let challenge_url = session.challenge_url().unwrap_or_default().to_string();
    surface.load(&challenge_url).await;

    loop {
        match surface.next_event().await {
            SurfaceEvent::NavigationAttempt(url) => match session.on_navigation(&url) {
                NavigationDirective::Allow => surface.load(&url).await,
                NavigationDirective::Finish(result) => return result,
            },
            SurfaceEvent::LoadError(description) => {
                if let Some(result) = session.on_load_error(&description) {
                    return result;
                }
            }
            SurfaceEvent::Dismissed => {
                if let Some(result) = session.cancel() {
                    return result;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn payment_with_url(url: Option<&str>) -> Payment {
        let mut source = std::collections::HashMap::new();
        if let Some(url) = url {
            source.insert(consts::SOURCE_TRANSACTION_URL.to_string(), url.to_string());
        }
        Payment {
            id: "pay_1".to_string(),
            status: consts::STATUS_INITIATED.to_string(),
            amount: 1000,
            currency: "SAR".to_string(),
            description: None,
            metadata: Default::default(),
            source,
        }
    }

    #[test]
    fn missing_challenge_url_fails_without_navigating() {
        let mut session = AuthSession::new(&payment_with_url(None));
        let result = session.start().unwrap();
        assert!(matches!(result, AuthResult::Failed { .. }));

        // The session is spent; later events are ignored.
        assert_eq!(
            NavigationDirective::Allow,
            session.on_navigation("https://sdk.paysheet.io/payment/return?id=pay_1")
        );
    }

    #[test]
    fn blank_challenge_url_counts_as_missing() {
        let mut session = AuthSession::new(&payment_with_url(Some("   ")));
        assert!(session.start().is_some());
    }

    #[test]
    fn return_host_navigation_is_intercepted_with_parameters() {
        let mut session = AuthSession::new(&payment_with_url(Some("https://bank.example/3ds")));
        assert!(session.start().is_none());

        let directive = session.on_navigation(
            "https://sdk.paysheet.io/payment/return?id=pay_1&status=paid&message=ok",
        );
        assert_eq!(
            NavigationDirective::Finish(AuthResult::Completed {
                id: "pay_1".to_string(),
                status: "paid".to_string(),
                message: "ok".to_string(),
            }),
            directive
        );
    }

    #[test]
    fn absent_query_parameters_default_to_empty() {
        let mut session = AuthSession::new(&payment_with_url(Some("https://bank.example/3ds")));
        let directive = session.on_navigation("https://sdk.paysheet.io/payment/return");
        assert_eq!(
            NavigationDirective::Finish(AuthResult::Completed {
                id: String::new(),
                status: String::new(),
                message: String::new(),
            }),
            directive
        );
    }

    #[test]
    fn non_return_hosts_are_allowed_through() {
        let mut session = AuthSession::new(&payment_with_url(Some("https://bank.example/3ds")));
        assert_eq!(
            NavigationDirective::Allow,
            session.on_navigation("https://bank.example/3ds/step2")
        );
        assert_eq!(
            NavigationDirective::Allow,
            session.on_navigation("not a url")
        );
    }

    #[test]
    fn page_error_maps_to_failed_once() {
        let mut session = AuthSession::new(&payment_with_url(Some("https://bank.example/3ds")));
        let result = session.on_load_error("net::ERR_CONNECTION_RESET").unwrap();
        assert_eq!(
            AuthResult::Failed {
                error: Some("net::ERR_CONNECTION_RESET".to_string()),
            },
            result
        );
        assert!(session.on_load_error("again").is_none());
    }

    #[test]
    fn dismissal_cancels_once() {
        let mut session = AuthSession::new(&payment_with_url(Some("https://bank.example/3ds")));
        assert_eq!(Some(AuthResult::Canceled), session.cancel());
        assert_eq!(None, session.cancel());
    }

    #[test]
    fn session_survives_a_serialization_round_trip() {
        let session = AuthSession::new(&payment_with_url(Some("https://bank.example/3ds")));
        let raw = session.to_json().unwrap();
        let restored = AuthSession::from_json(&raw).unwrap();
        assert_eq!("pay_1", restored.payment_id());
        assert_eq!(Some("https://bank.example/3ds"), restored.challenge_url());
    }
}
