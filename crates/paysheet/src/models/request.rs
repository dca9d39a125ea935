use std::{collections::HashMap, str::FromStr};

use cards::{CardExpiry, CardNumber};
use error_stack::{report, ResultExt};
use masking::Secret;
use serde::Serialize;

use crate::{
    config::PaymentConfig,
    consts,
    errors::{CustomResult, ValidationError},
    fields::{CardForm, FieldKind},
};

/// Create-payment request body.
///
/// Built fresh on every submit, only after the whole form validates; the
/// submission state machine enforces that, the builder just parses.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
    /// Fixed SDK return endpoint the bank redirects to after 3-D Secure.
    pub callback_url: String,
    pub source: CardPaymentSource,
    pub metadata: HashMap<String, String>,
}

/// Card source of a payment request.
///
/// `manual` and `save_card` are literal `"true"`/`"false"` strings; that is
/// the gateway's expected wire shape, not an accident.
#[derive(Clone, Debug, Serialize)]
pub struct CardPaymentSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub name: String,
    pub number: CardNumber,
    pub month: String,
    pub year: String,
    pub cvc: Secret<String>,
    pub manual: String,
    pub save_card: String,
}

fn bool_string(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

fn parse_card_number(raw: &str) -> CustomResult<CardNumber, ValidationError> {
    CardNumber::from_str(raw).change_context(ValidationError::InvalidValue {
        message: "card number failed validation".to_string(),
    })
}

fn parse_expiry(raw: &str) -> CustomResult<CardExpiry, ValidationError> {
    CardExpiry::parse(raw).ok_or_else(|| {
        report!(ValidationError::InvalidValue {
            message: "expiry date failed validation".to_string(),
        })
    })
}

impl PaymentRequest {
    /// Assemble a request from the config and the validated form values.
    pub fn build(config: &PaymentConfig, form: &CardForm) -> CustomResult<Self, ValidationError> {
        let number = parse_card_number(form.value(FieldKind::Number))?;
        let expiry = parse_expiry(form.value(FieldKind::Expiry))?;

        Ok(Self {
            amount: config.amount,
            currency: config.currency.clone(),
            description: config.description.clone(),
            callback_url: consts::RETURN_URL.to_string(),
            source: CardPaymentSource {
                source_type: consts::SOURCE_TYPE_CREDITCARD.to_string(),
                name: form.value(FieldKind::Name).trim().to_string(),
                number,
                month: expiry.month().to_string(),
                year: expiry.year().to_string(),
                cvc: Secret::new(form.value(FieldKind::Cvc).to_string()),
                manual: bool_string(config.manual),
                save_card: bool_string(config.save_card),
            },
            metadata: config.metadata.clone(),
        })
    }
}

/// Tokenize-only request body for the save-card flow.
#[derive(Clone, Debug, Serialize)]
pub struct TokenRequest {
    pub name: String,
    pub number: CardNumber,
    pub cvc: Secret<String>,
    pub month: String,
    pub year: String,
    pub save_only: bool,
    pub callback_url: String,
}

impl TokenRequest {
    /// Assemble a token request from the validated form values.
    pub fn build(form: &CardForm) -> CustomResult<Self, ValidationError> {
        let number = parse_card_number(form.value(FieldKind::Number))?;
        let expiry = parse_expiry(form.value(FieldKind::Expiry))?;

        Ok(Self {
            name: form.value(FieldKind::Name).trim().to_string(),
            number,
            cvc: Secret::new(form.value(FieldKind::Cvc).to_string()),
            month: expiry.month().to_string(),
            year: expiry.year().to_string(),
            save_only: true,
            callback_url: consts::RETURN_URL.to_string(),
        })
    }
}
