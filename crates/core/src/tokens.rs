//! Numeric token extraction.
//!
//! Low-level helpers shared by every extraction rule: the regex fragments for numeric tokens,
//! construction of label-synonym alternations, and lenient conversion of a token to a
//! [`Decimal`]. Unparseable tokens are absent values, never errors.

use crate::{LensError, LensResult};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Signed decimal or integer, e.g. `-2.00`, `+1`, `.75`.
pub const NUMBER: &str = r"[+-]?(?:\d+(?:\.\d+)?|\.\d+)";

/// Number carrying an explicit plus sign, e.g. `+2.00`, `+.75`.
pub const PLUS_NUMBER: &str = r"\+(?:\d+(?:\.\d+)?|\.\d+)";

/// Signed decimal with a fractional part, e.g. `-0.50`, `+.25`.
pub const DECIMAL: &str = r"[+-]?(?:\d+\.\d+|\.\d+)";

/// Punctuation allowed between a label and its value. Lazy so a sign stays with the number.
pub const GAP: &str = r"[\s:=()\[\],;/|#.]{0,8}?";

/// Largest sphere or cylinder magnitude accepted as a real reading.
const MAX_POWER: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Build a regex alternation matching any of `synonyms` as whole words.
///
/// Synonyms are literal lowercase text. Internal spaces match any run of whitespace, and
/// longer synonyms are tried first so `right eye` wins over `right`.
pub fn label_pattern(synonyms: &[&str]) -> String {
    let mut synonyms: Vec<&str> = synonyms.to_vec();
    synonyms.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let branches: Vec<String> = synonyms
        .iter()
        .map(|synonym| {
            let body = synonym
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            let lead = if synonym.starts_with(|c: char| c.is_ascii_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            let tail = if synonym.ends_with(|c: char| c.is_ascii_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            format!("{lead}{body}{tail}")
        })
        .collect();

    format!("(?:{})", branches.join("|"))
}

/// Pattern for a number following `label` (a regex fragment), captured as `group`.
pub fn labelled_number_pattern(label: &str, group: &str) -> String {
    format!(r"{label}{GAP}(?P<{group}>{NUMBER})")
}

/// Locates signed numbers that follow one of a set of label synonyms.
#[derive(Debug, Clone)]
pub struct NumberNearLabel {
    regex: Regex,
}

impl NumberNearLabel {
    /// Build an extractor for the given lowercase label synonyms.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidInput`] if no synonym is given or the resulting pattern is
    /// rejected by the regex engine.
    pub fn new(synonyms: &[&str]) -> LensResult<Self> {
        Self::build(synonyms, NUMBER)
    }

    /// Like [`NumberNearLabel::new`], but only numbers written with a leading `+` are read.
    ///
    /// For labels that are also ordinary words, where an unsigned number is usually prose.
    ///
    /// # Errors
    ///
    /// As for [`NumberNearLabel::new`].
    pub fn plus_signed(synonyms: &[&str]) -> LensResult<Self> {
        Self::build(synonyms, PLUS_NUMBER)
    }

    fn build(synonyms: &[&str], value: &str) -> LensResult<Self> {
        if synonyms.iter().all(|s| s.trim().is_empty()) {
            return Err(LensError::InvalidInput(
                "at least one label synonym is required".into(),
            ));
        }
        let synonyms: Vec<&str> = synonyms
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        let pattern = format!(r"{}{GAP}(?P<value>{value})", label_pattern(&synonyms));
        let regex = Regex::new(&pattern)
            .map_err(|e| LensError::InvalidInput(format!("invalid label pattern: {e}")))?;
        Ok(Self { regex })
    }

    /// Every readable number following a label, in text order.
    ///
    /// `text` is expected to be normalised (see [`crate::parser::normalise`]).
    pub fn values<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Decimal> + 't {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.name("value").and_then(|m| parse_decimal(m.as_str())))
    }

    /// The first readable number following a label.
    pub fn first(&self, text: &str) -> Option<Decimal> {
        self.values(text).next()
    }
}

/// Read a numeric token as a decimal, keeping the token's precision.
///
/// Accepts a leading sign, a leading bare point (`-.75`) and a comma decimal separator.
/// Returns `None` for anything else.
pub fn parse_decimal(token: &str) -> Option<Decimal> {
    let token = token.trim();
    let (negative, unsigned) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    let unsigned = unsigned.replace(',', ".");
    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let unsigned = if unsigned.starts_with('.') {
        format!("0{unsigned}")
    } else {
        unsigned
    };

    let value = Decimal::from_str(&unsigned).ok()?;
    if negative && !value.is_zero() {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Read a sphere or cylinder token, rejecting magnitudes no lens is made for.
pub fn parse_power(token: &str) -> Option<Decimal> {
    parse_decimal(token).filter(|v| v.abs() <= MAX_POWER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test decimal")
    }

    #[test]
    fn parse_decimal_keeps_precision() {
        let value = parse_decimal("-2.00").expect("decimal");
        assert_eq!(value.to_string(), "-2.00");
        assert_eq!(parse_decimal("+1.25"), Some(dec("1.25")));
    }

    #[test]
    fn parse_decimal_accepts_bare_point_and_comma() {
        assert_eq!(parse_decimal("-.75"), Some(dec("-0.75")));
        assert_eq!(parse_decimal("2,25"), Some(dec("2.25")));
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
        assert_eq!(parse_decimal("2o.5"), None);
    }

    #[test]
    fn parse_decimal_has_no_negative_zero() {
        let zero = parse_decimal("-0.00").expect("zero");
        assert!(!zero.is_sign_negative());
    }

    #[test]
    fn parse_power_rejects_implausible_magnitudes() {
        assert_eq!(parse_power("180"), None);
        assert_eq!(parse_power("-12.50"), Some(dec("-12.50")));
    }

    #[test]
    fn label_pattern_matches_whole_words_only() {
        let re = Regex::new(&label_pattern(&["re", "right eye", "o.d."])).expect("regex");
        assert!(re.is_match("re: -2.00"));
        assert!(re.is_match("o.d. -2.00"));
        assert!(!re.is_match("prescription -2.00"));
        let m = re.find("right  eye -2").expect("match");
        assert_eq!(m.as_str(), "right  eye");
    }

    #[test]
    fn number_near_label_finds_value_after_label() {
        let add = NumberNearLabel::new(&["add", "addition"]).expect("extractor");
        assert_eq!(add.first("addition: +2.25"), Some(dec("2.25")));
        assert_eq!(add.first("near add +1.50"), Some(dec("1.50")));
        assert_eq!(add.first("no value here"), None);
    }

    #[test]
    fn plus_signed_extractor_ignores_unsigned_numbers() {
        let near = NumberNearLabel::plus_signed(&["near", "reading"]).expect("extractor");
        assert_eq!(near.first("reading +1.75"), Some(dec("1.75")));
        assert_eq!(near.first("near: +.75"), Some(dec("0.75")));
        assert_eq!(near.first("review near 3 months"), None);
        assert_eq!(near.first("reading -1.00"), None);
    }

    #[test]
    fn number_near_label_skips_distant_numbers() {
        let pd = NumberNearLabel::new(&["pd"]).expect("extractor");
        assert_eq!(pd.first("pd see attached sheet 63"), None);
    }

    #[test]
    fn number_near_label_requires_a_synonym() {
        let err = NumberNearLabel::new(&["  "]).expect_err("should reject blank synonyms");
        assert!(matches!(err, LensError::InvalidInput(_)));
    }
}
