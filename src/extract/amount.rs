//! Amount extraction
//!
//! Priority:
//! 1. Explicit currency: `36 eur`, `12,50€`, `€ 9.99`
//! 2. First bare number with 1–5 integer digits and up to 2 decimals
//!
//! Clock times ("10:30") are not amounts and are skipped by the bare pass.

use regex::Regex;
use std::sync::LazyLock;

static EXPLICIT_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,7}(?:[.,]\d{1,2})?)\s*(?:€|eur(?:os?)?\b)").unwrap()
});

static EXPLICIT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"€\s*(\d{1,7}(?:[.,]\d{1,2})?)\b").unwrap());

static BARE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,5}(?:[.,]\d{1,2})?)\b").unwrap());

/// Currency code reported when the amount carried an explicit euro marker.
pub const EURO: &str = "EUR";

/// An amount found in the signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountMatch {
    pub value: f64,
    /// `Some("EUR")` when the text carried an explicit currency marker.
    pub currency: Option<&'static str>,
}

/// Extract the monetary amount from a signal.
pub fn extract_amount(text: &str) -> Option<AmountMatch> {
    for re in [&*EXPLICIT_SUFFIX_RE, &*EXPLICIT_PREFIX_RE] {
        if let Some(value) = re
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_amount(m.as_str()))
        {
            return Some(AmountMatch {
                value,
                currency: Some(EURO),
            });
        }
    }

    first_bare_number(text).map(|value| AmountMatch {
        value,
        currency: None,
    })
}

/// True when the text holds any positive amount.
pub fn has_amount(text: &str) -> bool {
    extract_amount(text).is_some()
}

/// First bare number that is not part of a clock time.
fn first_bare_number(text: &str) -> Option<f64> {
    let m = BARE_NUMBER_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find(|m| !is_clock_time(text, m.start(), m.end()))?;
    parse_amount(m.as_str())
}

fn is_clock_time(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let mut after = text[end..].chars();
    let colon_after = after.next() == Some(':') && after.next().is_some_and(|c| c.is_ascii_digit());
    colon_after || before == Some(':')
}

/// Parse a decimal with either `.` or `,` as separator. Only finite,
/// strictly positive values are accepted.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
