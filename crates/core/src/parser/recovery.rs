//! Narrow passes that recover a missing axis within one eye's segment of text.
//!
//! These only ever fill an absent axis. The positional pass is structurally ambiguous (a
//! trailing PD or date fragment can look like an axis), so values from it are marked
//! [`AxisSource::Positional`] and logged.

use crate::prescription::{AxisSource, Eye, EyeReading};
use crate::tokens::DECIMAL;
use lens_types::Axis;
use regex::Regex;
use std::sync::LazyLock;

static AXIS_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\baxis|\bax\b\.?|\bx|\dx)\s*[:=]?\s*(?P<axis>\d{1,3})\b")
        .expect("axis keyword regex")
});

static POSITIONAL_AXIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{DECIMAL}[\s/,;|]+{DECIMAL}[\s/,;|]+x?\s*(?P<axis>\d{{1,3}})\b"
    ))
    .expect("positional axis regex")
});

/// Axis introduced by an explicit `AXIS`, `AX` or `X` keyword.
pub fn axis_by_keyword(segment: &str) -> Option<Axis> {
    AXIS_KEYWORD
        .captures_iter(segment)
        .find_map(|caps| caps.name("axis").and_then(|m| Axis::parse(m.as_str())))
}

/// Whole number directly following two decimals.
pub fn axis_by_position(segment: &str) -> Option<Axis> {
    POSITIONAL_AXIS
        .captures_iter(segment)
        .find_map(|caps| caps.name("axis").and_then(|m| Axis::parse(m.as_str())))
}

/// Fill a missing axis on `reading` from its segment of text.
///
/// The keyword pass runs first; the positional pass runs only if `allow_positional` is set
/// and the keyword pass found nothing. An axis already present is returned untouched.
pub fn recover_axis(
    reading: &EyeReading,
    segment: &str,
    eye: Eye,
    allow_positional: bool,
) -> EyeReading {
    if reading.axis.is_some() {
        return reading.clone();
    }

    if let Some(axis) = axis_by_keyword(segment) {
        tracing::debug!(%eye, %axis, "axis recovered by keyword");
        return reading.with_axis_if_missing(axis, AxisSource::Keyword);
    }

    if allow_positional {
        if let Some(axis) = axis_by_position(segment) {
            tracing::warn!(
                %eye,
                %axis,
                "axis recovered positionally; value may be an unrelated trailing number"
            );
            return reading.with_axis_if_missing(axis, AxisSource::Positional);
        }
    }

    reading.clone()
}
