use time::OffsetDateTime;

/// Parsed card expiry.
///
/// Parsing keeps whatever month was typed; validity is a separate question
/// answered by [`CardExpiry::is_invalid`] so the "invalid" and "expired"
/// error messages stay distinct.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CardExpiry {
    month: u8,
    year: u16,
}

impl CardExpiry {
    /// Parse `MM/YY`, `MM YY` or `MM / YYYY` shapes.
    ///
    /// Display formatting (spaces around the separator) is tolerated.
    /// Two-digit years resolve to `2000 + YY`, so `12/99` means December
    /// 2099; there is no century rollover window.
    pub fn parse(input: &str) -> Option<Self> {
        let parts: Vec<&str> = input
            .split(|c: char| c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        let [month, year] = parts[..] else {
            return None;
        };

        let month: u8 = month.parse().ok()?;
        let mut year: u16 = year.parse().ok()?;
        if year < 100 {
            year += 2000;
        }

        Some(Self { month, year })
    }

    /// Month outside the calendar range.
    pub fn is_invalid(&self) -> bool {
        self.month < 1 || self.month > 12
    }

    /// Whether the expiry is strictly before the current calendar month.
    pub fn is_expired(&self) -> bool {
        let today = OffsetDateTime::now_utc().date();
        self.is_expired_as_of(today.year(), u8::from(today.month()))
    }

    /// Expiry check against an explicit (year, month) reference point.
    pub fn is_expired_as_of(&self, year: i32, month: u8) -> bool {
        let own_year = i32::from(self.year);
        own_year < year || (own_year == year && self.month < month)
    }

    /// Expiry month as typed, 1-12 when valid.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Four-digit expiry year.
    pub fn year(&self) -> u16 {
        self.year
    }
}
