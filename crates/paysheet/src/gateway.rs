//! Gateway client: one network call per operation, typed error mapping, no
//! retries and no caching.

use std::time::Duration;

use async_trait::async_trait;
use error_stack::{report, ResultExt};
use masking::{PeekInterface, Secret};
use paysheet_env::logger;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::{
    consts,
    errors::{ApiErrorResponse, CustomResult, GatewayError},
    models::{Payment, PaymentRequest, Token, TokenRequest},
};

/// Seam between the submission state machine and the network.
///
/// Production code uses [`ApiClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a card payment.
    async fn create_payment(&self, request: &PaymentRequest)
        -> CustomResult<Payment, GatewayError>;

    /// Create a save-only card token.
    async fn create_token(&self, request: &TokenRequest) -> CustomResult<Token, GatewayError>;
}

/// HTTP client for the payment gateway.
///
/// Authenticates with the merchant publishable key over basic auth. Each
/// operation is a single attempt; transport, timeout and API failures all
/// surface immediately as [`GatewayError`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    publishable_key: Secret<String>,
}

/// Error body shape the gateway uses for non-success responses.
#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: Option<String>,
}

impl ApiClient {
    /// Build a client for the given key and base URL.
    pub fn new(
        publishable_key: impl Into<String>,
        base_url: &str,
    ) -> CustomResult<Self, GatewayError> {
        let base_url = Url::parse(base_url).change_context(GatewayError::UrlParsingFailed)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(consts::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|error| report!(GatewayError::RequestNotSent(error.to_string())))?;

        Ok(Self {
            http,
            base_url,
            publishable_key: Secret::new(publishable_key.into()),
        })
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> CustomResult<R, GatewayError> {
        let url = self
            .base_url
            .join(path)
            .change_context(GatewayError::UrlParsingFailed)?;

        logger::info!(%url, "sending gateway request");

        let response = self
            .http
            .post(url)
            .basic_auth(self.publishable_key.peek(), Some(""))
            .json(body)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    report!(GatewayError::Timeout)
                } else {
                    report!(GatewayError::RequestNotSent(error.to_string()))
                }
            })?;

        let status_code = response.status();
        logger::info!(status = %status_code, "gateway responded");

        if status_code.is_success() {
            response
                .json::<R>()
                .await
                .change_context(GatewayError::ResponseDecodingFailed)
        } else {
            let body = response.text().await.unwrap_or_default();
            let parsed: Option<GatewayErrorBody> = serde_json::from_str(&body).ok();
            let api_error = ApiErrorResponse {
                status_code: status_code.as_u16(),
                error_type: parsed.as_ref().and_then(|b| b.error_type.clone()),
                message: parsed
                    .and_then(|b| b.message)
                    .unwrap_or_else(|| status_code.to_string()),
            };
            logger::error!(?api_error, "gateway rejected the request");
            Err(report!(GatewayError::Api(api_error)))
        }
    }
}

#[async_trait]
impl PaymentGateway for ApiClient {
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> CustomResult<Payment, GatewayError> {
        self.post("v1/payments", request).await
    }

    async fn create_token(&self, request: &TokenRequest) -> CustomResult<Token, GatewayError> {
        self.post("v1/tokens", request).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn rejects_an_invalid_base_url() {
        let client = ApiClient::new("pk_test_123", "not a url");
        assert!(client.is_err());
    }

    #[test]
    fn endpoint_paths_join_onto_the_base_url() {
        let base = Url::parse("https://api.example.com/").unwrap();
        assert_eq!(
            "https://api.example.com/v1/payments",
            base.join("v1/payments").unwrap().as_str()
        );
    }

    #[test]
    fn error_body_parsing_tolerates_unknown_shapes() {
        let parsed: Option<GatewayErrorBody> = serde_json::from_str("not json").ok();
        assert!(parsed.is_none());

        let parsed: Option<GatewayErrorBody> =
            serde_json::from_str(r#"{"type":"invalid_request_error","message":"bad amount"}"#).ok();
        let body = parsed.unwrap();
        assert_eq!(Some("invalid_request_error".to_string()), body.error_type);
        assert_eq!(Some("bad amount".to_string()), body.message);
    }
}
