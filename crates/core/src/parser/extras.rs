//! Addition and pupillary distance extraction.
//!
//! Both are read from the whole text, independently of the eye rules. Each has a small ordered
//! rule set and the first rule that produces a plausible value wins.

use crate::constants::{MAX_ADD, MAX_MONO_PD, MAX_PD, MIN_MONO_PD, MIN_PD};
use crate::tokens::{label_pattern, parse_decimal, NumberNearLabel, GAP, NUMBER};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::sync::LazyLock;

const ADD_LABELS: &[&str] = &["addition", "add"];
const NEAR_LABELS: &[&str] = &["reading power", "reading", "near vision", "near", "rdg"];
const PD_LABELS: &[&str] = &["pupillary distance", "pupil distance", "p.d.", "ipd", "pd"];
const RIGHT_MARK: &str = r"\b(?:right|od|r)\b";
const LEFT_MARK: &str = r"\b(?:left|os|l)\b";

static ADD_RULES: LazyLock<Vec<(&'static str, NumberNearLabel)>> = LazyLock::new(|| {
    vec![
        (
            "add_label",
            NumberNearLabel::new(ADD_LABELS).expect("built-in add labels"),
        ),
        (
            "near_label",
            NumberNearLabel::plus_signed(NEAR_LABELS).expect("built-in near labels"),
        ),
    ]
});

static PD_RULES: LazyLock<Vec<ValueRule>> = LazyLock::new(|| {
    let pd = label_pattern(PD_LABELS);
    let eye_pd = |mark: &str, group: &str| format!(r"{mark}{GAP}{pd}{GAP}(?P<{group}>{NUMBER})");
    vec![
        ValueRule::new(
            "pd_value",
            &format!(r"{pd}{GAP}(?P<a>{NUMBER})(?:\s*/\s*(?P<b>{NUMBER}))?"),
            read_pd_value,
        ),
        ValueRule::new(
            "pd_then_eyes",
            &format!(
                r"{pd}{GAP}{RIGHT_MARK}{GAP}(?P<a>{NUMBER}){GAP}{LEFT_MARK}{GAP}(?P<b>{NUMBER})"
            ),
            read_monocular_pair,
        ),
        ValueRule::new(
            "eye_pd_pairs",
            &format!(
                r"{}[\s\S]{{0,40}}?{}",
                eye_pd(RIGHT_MARK, "a"),
                eye_pd(LEFT_MARK, "b")
            ),
            read_monocular_pair,
        ),
    ]
});

/// A whole-text rule producing a single value from its captures.
struct ValueRule {
    name: &'static str,
    regex: Regex,
    read: fn(&Captures<'_>) -> Option<Decimal>,
}

impl ValueRule {
    fn new(name: &'static str, pattern: &str, read: fn(&Captures<'_>) -> Option<Decimal>) -> Self {
        let regex = Regex::new(pattern).expect("built-in value rule regex");
        Self { name, regex, read }
    }

    fn apply(&self, text: &str) -> Option<Decimal> {
        self.regex
            .captures_iter(text)
            .find_map(|caps| (self.read)(&caps))
    }
}

fn capture(caps: &Captures<'_>, group: &str) -> Option<Decimal> {
    caps.name(group).and_then(|m| parse_decimal(m.as_str()))
}

fn is_binocular(value: Decimal) -> bool {
    (MIN_PD..=MAX_PD).contains(&value)
}

fn is_monocular(value: Decimal) -> bool {
    (MIN_MONO_PD..=MAX_MONO_PD).contains(&value)
}

fn read_pd_value(caps: &Captures<'_>) -> Option<Decimal> {
    let first = capture(caps, "a")?;
    if is_binocular(first) {
        return Some(first);
    }
    let second = capture(caps, "b")?;
    (is_monocular(first) && is_monocular(second)).then(|| first + second)
}

fn read_monocular_pair(caps: &Captures<'_>) -> Option<Decimal> {
    let right = capture(caps, "a")?;
    let left = capture(caps, "b")?;
    (is_monocular(right) && is_monocular(left)).then(|| right + left)
}

/// Near addition in `(0, 4.00]`, if any label introduces one.
pub fn extract_add(text: &str) -> Option<Decimal> {
    ADD_RULES.iter().find_map(|(name, rule)| {
        let add = rule
            .values(text)
            .find(|v| v.is_sign_positive() && !v.is_zero() && *v <= MAX_ADD)?;
        tracing::debug!(rule = name, %add, "addition extracted");
        Some(add)
    })
}

/// Binocular pupillary distance in millimetres.
///
/// A pair of monocular values is summed.
pub fn extract_pd(text: &str) -> Option<Decimal> {
    PD_RULES.iter().find_map(|rule| {
        let pd = rule.apply(text)?;
        tracing::debug!(rule = rule.name, %pd, "pupillary distance extracted");
        Some(pd)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test decimal")
    }

    #[test]
    fn add_prefers_explicit_label() {
        assert_eq!(extract_add("near vision 1.00 add: +2.25"), Some(dec("2.25")));
        assert_eq!(extract_add("reading +1.75"), Some(dec("1.75")));
    }

    #[test]
    fn near_words_need_a_plus_sign() {
        assert_eq!(extract_add("review near 3 months"), None);
        assert_eq!(extract_add("reading 2.00"), None);
        assert_eq!(extract_add("near vision +2.00"), Some(dec("2.00")));
        assert_eq!(extract_add("rdg +1.50"), Some(dec("1.50")));
    }

    #[test]
    fn add_outside_plausible_range_is_dropped() {
        assert_eq!(extract_add("add 0.00"), None);
        assert_eq!(extract_add("add -1.00"), None);
        assert_eq!(extract_add("add 12"), None);
        assert_eq!(extract_add("add 4.00"), Some(dec("4.00")));
    }

    #[test]
    fn add_ignores_words_that_only_start_with_add() {
        assert_eq!(extract_add("address 2 high street"), None);
    }

    #[test]
    fn binocular_pd_is_taken_as_is() {
        assert_eq!(extract_pd("pd: 63"), Some(dec("63")));
        assert_eq!(extract_pd("p.d. 64/61"), Some(dec("64")));
        assert_eq!(extract_pd("pupillary distance = 62.5 mm"), Some(dec("62.5")));
    }

    #[test]
    fn monocular_pd_values_are_summed() {
        assert_eq!(extract_pd("pd 32/31.5"), Some(dec("63.5")));
        assert_eq!(extract_pd("pd r 32 l 31"), Some(dec("63")));
        assert_eq!(extract_pd("right pd 32.5 left pd 31.0"), Some(dec("63.5")));
    }

    #[test]
    fn implausible_pd_is_dropped() {
        assert_eq!(extract_pd("pd 6"), None);
        assert_eq!(extract_pd("pd 120"), None);
        assert_eq!(extract_pd("no distance given"), None);
    }
}
