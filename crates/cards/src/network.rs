use serde::{Deserialize, Serialize};

/// Card networks recognized by the payment gateway.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum CardNetwork {
    Visa,
    Mastercard,
    #[strum(serialize = "American Express")]
    Amex,
    Mada,
    /// Prefix did not match any supported network. Always fails validation.
    #[default]
    Unknown,
}

/// Mada cards are issued inside the Visa and Mastercard ranges, so their
/// six-digit BINs have to be matched before the generic prefix rules.
const MADA_BINS: &[&str] = &[
    "400861", "406136", "406996", "407197", "407395", "409201", "410621", "410685", "417633",
    "419593", "420132", "421141", "422817", "422818", "422819", "428331", "428671", "428672",
    "428673", "431361", "432328", "434107", "439954", "440533", "440647", "440795", "445564",
    "446393", "446404", "446672", "455036", "455708", "457865", "458456", "462220", "468540",
    "468541", "468542", "468543", "474491", "483010", "483011", "483012", "484783", "486094",
    "486095", "486096", "489318", "489319", "492464", "493428", "504300", "513213", "515079",
    "516138", "520058", "521076", "527016", "530060", "531196", "535825", "535989", "536023",
    "537767", "539931", "543085", "543357", "549760", "554180", "555610", "558563", "558848",
    "585265", "588845", "588846", "588847", "588848", "588850", "589005", "589206", "604906",
    "636120", "968201", "968202", "968203", "968204", "968205", "968206", "968207", "968208",
    "968209", "968210", "968211",
];

impl CardNetwork {
    /// Detect the network from a card number prefix.
    ///
    /// Grouping spaces are ignored; an unmatched prefix yields
    /// [`CardNetwork::Unknown`].
    pub fn detect(number: &str) -> Self {
        let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();

        if digits
            .get(..6)
            .is_some_and(|bin| MADA_BINS.contains(&bin))
        {
            return Self::Mada;
        }

        if digits.starts_with("34") || digits.starts_with("37") {
            return Self::Amex;
        }

        let first_two = digits.get(..2).and_then(|p| p.parse::<u8>().ok());
        if matches!(first_two, Some(51..=55)) {
            return Self::Mastercard;
        }
        let first_four = digits.get(..4).and_then(|p| p.parse::<u16>().ok());
        if matches!(first_four, Some(2221..=2720)) {
            return Self::Mastercard;
        }

        if digits.starts_with('4') {
            return Self::Visa;
        }

        Self::Unknown
    }

    /// Minimum security code length the network accepts.
    pub fn min_cvc_length(&self) -> usize {
        match self {
            Self::Amex => 4,
            _ => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("4111111111111111", CardNetwork::Visa; "visa prefix 4")]
    #[test_case("341111111111111", CardNetwork::Amex; "amex prefix 34")]
    #[test_case("371449635398431", CardNetwork::Amex; "amex prefix 37")]
    #[test_case("5555555555554444", CardNetwork::Mastercard; "mastercard 51-55 range")]
    #[test_case("2221000000000009", CardNetwork::Mastercard; "mastercard 2221-2720 range")]
    #[test_case("5132130000000000", CardNetwork::Mada; "mada bin inside mastercard range")]
    #[test_case("5888450000000000", CardNetwork::Mada; "mada bin outside generic ranges")]
    #[test_case("4406470000000006", CardNetwork::Mada; "mada bin inside visa range")]
    #[test_case("0000000000000000", CardNetwork::Unknown; "unrecognized prefix")]
    fn detects_network_from_prefix(number: &str, expected: CardNetwork) {
        assert_eq!(expected, CardNetwork::detect(number));
    }

    #[test]
    fn detection_ignores_grouping_spaces() {
        assert_eq!(CardNetwork::Visa, CardNetwork::detect("4111 1111 1111 1111"));
    }

    #[test]
    fn amex_requires_a_longer_cvc() {
        assert_eq!(4, CardNetwork::Amex.min_cvc_length());
        assert_eq!(3, CardNetwork::Visa.min_cvc_length());
        assert_eq!(3, CardNetwork::Unknown.min_cvc_length());
    }
}
