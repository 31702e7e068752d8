//! Label-anchored extraction rules for a single eye.
//!
//! Each eye has an ordered list of [`ExtractionRule`]s. The first rule that yields a sphere
//! value wins; later rules are never consulted for that eye.
//!
//! | # | Rule | Shape |
//! |---|------|-------|
//! | 1 | `labelled_triple` | `OD: SPH -2.00 CYL -0.50 AXIS 180` |
//! | 2 | `separated_triple` | `OD -2.00/-0.50/180`, `OD -2.00 -0.50 x 180` |
//! | 3 | `whitespace_triple` | `OD -2 -0.5 180` (integers allowed, axis required) |
//! | 4 | `sphere_only` | `RE: -2.00` |
//!
//! Rule 2 needs decimal sphere and cylinder; its axis is optional.
//! `labelled_triple` needs a SPH or CYL sub-label; without one the shape belongs to rule 2 or 3.
//! After a SPH label the cylinder may be unlabelled, as in `OD SPH -2.00 -0.50 x 180`.

use crate::prescription::{AxisSource, Eye, EyeReading};
use crate::tokens::{label_pattern, labelled_number_pattern, parse_power, DECIMAL, GAP, NUMBER};
use lens_types::Axis;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Label synonyms for the right eye, lowercase.
pub const RIGHT_EYE_SYNONYMS: &[&str] = &[
    "right eye",
    "right",
    "r.e.",
    "re",
    "o.d.",
    "od",
    "oculus dexter",
];

/// Label synonyms for the left eye, lowercase.
pub const LEFT_EYE_SYNONYMS: &[&str] = &[
    "left eye",
    "left",
    "l.e.",
    "le",
    "o.s.",
    "os",
    "oculus sinister",
];

static RIGHT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&label_pattern(RIGHT_EYE_SYNONYMS)).expect("right eye label regex")
});

static LEFT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&label_pattern(LEFT_EYE_SYNONYMS)).expect("left eye label regex")
});

static RIGHT_RULES: LazyLock<Vec<ExtractionRule>> =
    LazyLock::new(|| build_rules(&label_pattern(RIGHT_EYE_SYNONYMS)));

static LEFT_RULES: LazyLock<Vec<ExtractionRule>> =
    LazyLock::new(|| build_rules(&label_pattern(LEFT_EYE_SYNONYMS)));

/// Compiled label regex for `eye`.
pub fn label_regex(eye: Eye) -> &'static Regex {
    match eye {
        Eye::Right => &RIGHT_LABEL,
        Eye::Left => &LEFT_LABEL,
    }
}

/// Ordered extraction rules for `eye`.
pub fn eye_rules(eye: Eye) -> &'static [ExtractionRule] {
    match eye {
        Eye::Right => &RIGHT_RULES,
        Eye::Left => &LEFT_RULES,
    }
}

/// A label-anchored extraction rule: a pattern, an acceptance predicate and a shared
/// extraction of the `sph`/`cyl`/`axis` capture groups.
#[derive(Debug)]
pub struct ExtractionRule {
    name: &'static str,
    regex: Regex,
    accepts: fn(&Captures<'_>) -> bool,
}

/// Successful application of a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleMatch {
    /// Name of the rule that fired.
    pub rule: &'static str,
    /// Byte offset of the eye label that anchored the match.
    pub anchor: usize,
    /// Values extracted by the rule; `sph` is always set.
    pub reading: EyeReading,
}

impl ExtractionRule {
    fn new(name: &'static str, pattern: &str, accepts: fn(&Captures<'_>) -> bool) -> Self {
        let regex = Regex::new(pattern).expect("built-in extraction rule regex");
        Self {
            name,
            regex,
            accepts,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the rule to normalised text.
    ///
    /// Candidate matches are tried in text order; the first accepted match with a readable
    /// sphere wins. Returns `None` if no candidate yields a sphere.
    pub fn apply(&self, text: &str) -> Option<RuleMatch> {
        self.regex
            .captures_iter(text)
            .filter(|caps| (self.accepts)(caps))
            .find_map(|caps| {
                let sph = caps.name("sph").and_then(|m| parse_power(m.as_str()))?;
                let cyl = caps
                    .name("cyl")
                    .or_else(|| caps.name("cyl_bare"))
                    .and_then(|m| parse_power(m.as_str()));
                let axis = caps
                    .name("axis")
                    .or_else(|| caps.name("axis_bare"))
                    .and_then(|m| Axis::parse(m.as_str()));
                let anchor = caps.get(0).map_or(0, |m| m.start());

                Some(RuleMatch {
                    rule: self.name,
                    anchor,
                    reading: EyeReading {
                        sph: Some(sph),
                        cyl,
                        axis,
                        axis_source: axis.map(|_| AxisSource::Labelled),
                    },
                })
            })
    }
}

fn has_sub_label(caps: &Captures<'_>) -> bool {
    caps.name("sph_label").is_some() || caps.name("cyl_label").is_some()
}

fn always(_: &Captures<'_>) -> bool {
    true
}

fn build_rules(label: &str) -> Vec<ExtractionRule> {
    // An unlabelled cylinder must carry a fractional part; it may be followed directly by the
    // axis, as in rule 2.
    let trailing_axis = |group: &str| format!(r"(?:\s*[/x]?\s*x?\s*(?P<{group}>\d{{1,3}})\b)?");
    let sphere = format!(r"(?P<sph_label>sph(?:ere)?\.?{GAP})?(?P<sph>{NUMBER})");
    let cyl_labelled = format!(r"(?P<cyl_label>cyl(?:inder)?\.?){GAP}(?P<cyl>{NUMBER})");
    let cyl_bare = format!(r"(?P<cyl_bare>{DECIMAL}){}", trailing_axis("axis_bare"));
    let cylinder = format!(r"(?:{GAP}(?:{cyl_labelled}|{cyl_bare}))?");
    let axis = format!(r"(?:{GAP}(?:axis|ax\.?|x){GAP}(?P<axis>\d{{1,3}})\b)?");

    let labelled_triple = format!("{label}{GAP}{sphere}{cylinder}{axis}");
    let separated_triple = format!(
        r"{label}{GAP}(?P<sph>{DECIMAL})\s*(?:/|\s)\s*(?P<cyl>{DECIMAL}){}",
        trailing_axis("axis")
    );
    let whitespace_triple = format!(
        r"{label}{GAP}(?P<sph>{NUMBER})\s+(?P<cyl>{NUMBER})\s+(?:x\s*)?(?P<axis>\d{{1,3}})\b"
    );
    let sphere_only = labelled_number_pattern(&format!(r"{label}(?:{GAP}sph(?:ere)?\.?)?"), "sph");

    vec![
        ExtractionRule::new("labelled_triple", &labelled_triple, has_sub_label),
        ExtractionRule::new("separated_triple", &separated_triple, always),
        ExtractionRule::new("whitespace_triple", &whitespace_triple, always),
        ExtractionRule::new("sphere_only", &sphere_only, always),
    ]
}

/// Run the rule cascade for `eye` over normalised text.
pub fn extract_eye(text: &str, eye: Eye) -> Option<RuleMatch> {
    eye_rules(eye).iter().find_map(|rule| {
        let found = rule.apply(text)?;
        tracing::debug!(rule = found.rule, %eye, "eye extraction rule matched");
        Some(found)
    })
}

/// The part of `text` that belongs to the eye labelled at `anchor`: up to the next label of
/// the other eye, or the end of the text.
pub fn segment(text: &str, eye: Eye, anchor: usize) -> &str {
    let anchor = anchor.min(text.len());
    let end = label_regex(eye.other())
        .find_at(text, anchor)
        .map_or(text.len(), |m| m.start());
    &text[anchor..end.max(anchor)]
}
