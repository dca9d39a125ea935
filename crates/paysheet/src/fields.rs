//! Field validation engine for the card form.
//!
//! Each field binds an ordered chain of `(predicate, message)` rules; the
//! first rule whose predicate matches wins. Errors are published to plain
//! `watch` slots that the host's UI can observe without the SDK knowing
//! anything about widgets.

use std::sync::{Arc, LazyLock, RwLock};

use cards::{valid_luhn, CardExpiry, CardNetwork};
use regex::Regex;
use tokio::sync::watch;

/// Validation messages surfaced inline under the fields.
pub mod messages {
    /// Name field, empty input.
    pub const NAME_REQUIRED: &str = "Name on card is required";
    /// Name field, non-Latin characters present.
    pub const NAME_ENGLISH_ONLY: &str = "Name should only contain English letters";
    /// Name field, fewer than two name tokens.
    pub const NAME_BOTH_REQUIRED: &str = "Both first and last name are required";
    /// Number field, empty input.
    pub const NUMBER_REQUIRED: &str = "Card number is required";
    /// Number field, checksum failure.
    pub const NUMBER_INVALID: &str = "Card number is not valid";
    /// Number field, prefix matched no supported network.
    pub const NETWORK_UNSUPPORTED: &str = "Unsupported card network";
    /// CVC field, empty input.
    pub const CVC_REQUIRED: &str = "Security code is required";
    /// CVC field, shorter than the detected network requires.
    pub const CVC_INVALID: &str = "Security code is too short";
    /// Expiry field, empty input.
    pub const EXPIRY_REQUIRED: &str = "Expiry date is required";
    /// Expiry field, malformed or month out of range.
    pub const EXPIRY_INVALID: &str = "Expiry date is not valid";
    /// Expiry field, strictly before the current month.
    pub const EXPIRY_EXPIRED: &str = "Card has expired";
}

static LATIN_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\-\s]+$").ok());
static FULL_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\-]+\s+?([a-zA-Z\-]+\s?)+$").ok());

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct ValidationRule {
    predicate: Predicate,
    message: String,
}

/// Ordered rule chain for one field.
///
/// Rule order is significant: `validate` short-circuits on the first match,
/// so chains are declared required → format → content-specific.
pub struct FieldValidator {
    rules: Vec<ValidationRule>,
    error: watch::Sender<Option<String>>,
}

impl FieldValidator {
    /// Empty validator with a clear error slot.
    pub fn new() -> Self {
        let (error, _) = watch::channel(None);
        Self {
            rules: Vec::new(),
            error,
        }
    }

    /// Append a rule. A predicate returning `true` means the rule FAILED and
    /// its message is the error.
    pub fn add_rule(
        &mut self,
        message: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) {
        self.rules.push(ValidationRule {
            predicate: Box::new(predicate),
            message: message.into(),
        });
    }

    /// Run the chain against `value`, publish the outcome to the error slot
    /// and return the first matching rule's message.
    pub fn validate(&self, value: &str) -> Option<String> {
        for rule in &self.rules {
            if (rule.predicate)(value) {
                self.error.send_replace(Some(rule.message.clone()));
                return Some(rule.message.clone());
            }
        }
        self.error.send_replace(None);
        None
    }

    /// Focus gain clears the displayed error without re-running rules;
    /// focus loss re-validates the current value.
    pub fn on_focus_change(&self, has_focus: bool, value: &str) {
        if has_focus {
            self.error.send_replace(None);
        } else {
            self.validate(value);
        }
    }

    /// Observable error slot for this field.
    pub fn error_slot(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Last published error.
    pub fn current_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// The four card fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// Name on card.
    Name,
    /// Card number.
    Number,
    /// Expiry date.
    Expiry,
    /// Security code.
    Cvc,
}

struct FormField {
    value: String,
    validator: FieldValidator,
}

impl FormField {
    fn new(validator: FieldValidator) -> Self {
        Self {
            value: String::new(),
            validator,
        }
    }
}

/// Mutable card form state: one slot per field, updated only through the
/// validation pipeline.
pub struct CardForm {
    name: FormField,
    number: FormField,
    expiry: FormField,
    cvc: FormField,
    // Shared with the CVC length rule so it always reads the in-flight card
    // number, not a previously published snapshot.
    number_mirror: Arc<RwLock<String>>,
}

impl CardForm {
    /// Form with the standard rule chains installed.
    pub fn new() -> Self {
        let number_mirror = Arc::new(RwLock::new(String::new()));

        let mut name = FieldValidator::new();
        name.add_rule(messages::NAME_REQUIRED, |v| v.trim().is_empty());
        name.add_rule(messages::NAME_ENGLISH_ONLY, |v| {
            LATIN_NAME.as_ref().map_or(true, |re| !re.is_match(v))
        });
        name.add_rule(messages::NAME_BOTH_REQUIRED, |v| {
            FULL_NAME.as_ref().map_or(true, |re| !re.is_match(v))
        });

        let mut number = FieldValidator::new();
        number.add_rule(messages::NUMBER_REQUIRED, |v| v.trim().is_empty());
        number.add_rule(messages::NUMBER_INVALID, |v| {
            let digits: String = v.split_whitespace().collect();
            !valid_luhn(&digits)
        });
        number.add_rule(messages::NETWORK_UNSUPPORTED, |v| {
            CardNetwork::detect(v) == CardNetwork::Unknown
        });

        let mut cvc = FieldValidator::new();
        cvc.add_rule(messages::CVC_REQUIRED, |v| v.trim().is_empty());
        let mirror = Arc::clone(&number_mirror);
        cvc.add_rule(messages::CVC_INVALID, move |v| {
            let card_number = mirror.read().map(|n| n.clone()).unwrap_or_default();
            v.chars().count() < CardNetwork::detect(&card_number).min_cvc_length()
        });

        let mut expiry = FieldValidator::new();
        expiry.add_rule(messages::EXPIRY_REQUIRED, |v| v.trim().is_empty());
        expiry.add_rule(messages::EXPIRY_INVALID, |v| {
            CardExpiry::parse(v).map_or(true, |e| e.is_invalid())
        });
        expiry.add_rule(messages::EXPIRY_EXPIRED, |v| {
            CardExpiry::parse(v).is_some_and(|e| e.is_expired())
        });

        Self {
            name: FormField::new(name),
            number: FormField::new(number),
            expiry: FormField::new(expiry),
            cvc: FormField::new(cvc),
            number_mirror,
        }
    }

    fn field(&self, kind: FieldKind) -> &FormField {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::Number => &self.number,
            FieldKind::Expiry => &self.expiry,
            FieldKind::Cvc => &self.cvc,
        }
    }

    fn field_mut(&mut self, kind: FieldKind) -> &mut FormField {
        match kind {
            FieldKind::Name => &mut self.name,
            FieldKind::Number => &mut self.number,
            FieldKind::Expiry => &mut self.expiry,
            FieldKind::Cvc => &mut self.cvc,
        }
    }

    /// Record an edit and re-validate the field atomically.
    pub fn set_value(&mut self, kind: FieldKind, text: impl Into<String>) -> Option<String> {
        let text = text.into();
        if kind == FieldKind::Number {
            if let Ok(mut mirror) = self.number_mirror.write() {
                *mirror = text.clone();
            }
        }
        let field = self.field_mut(kind);
        field.value = text;
        field.validator.validate(&field.value)
    }

    /// Forward a focus transition to the field's validator.
    pub fn focus_changed(&self, kind: FieldKind, has_focus: bool) {
        let field = self.field(kind);
        field.validator.on_focus_change(has_focus, &field.value);
    }

    /// Current raw text of a field.
    pub fn value(&self, kind: FieldKind) -> &str {
        &self.field(kind).value
    }

    /// Last published error of a field.
    pub fn error(&self, kind: FieldKind) -> Option<String> {
        self.field(kind).validator.current_error()
    }

    /// Observable error slot of a field.
    pub fn error_slot(&self, kind: FieldKind) -> watch::Receiver<Option<String>> {
        self.field(kind).validator.error_slot()
    }

    /// Re-validate every field, publishing errors, and report whether the
    /// whole form passes.
    pub fn is_valid(&self) -> bool {
        [
            FieldKind::Name,
            FieldKind::Number,
            FieldKind::Expiry,
            FieldKind::Cvc,
        ]
        .into_iter()
        .fold(true, |valid, kind| {
            let field = self.field(kind);
            field.validator.validate(&field.value).is_none() && valid
        })
    }
}

impl Default for CardForm {
    fn default() -> Self {
        Self::new()
    }
}
