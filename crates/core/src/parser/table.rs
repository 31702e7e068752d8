//! Table-format pass.
//!
//! Scans the whole text for `SPH … CYL … AXIS` rows regardless of eye labels. With at least
//! two rows, the first describes the right eye and the second the left eye. Rows only fill
//! fields that the label-anchored rules left empty.

use crate::prescription::{AxisSource, EyeReading};
use crate::tokens::{parse_power, NUMBER};
use lens_types::Axis;
use regex::Regex;
use std::sync::LazyLock;

static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    let sph = format!(r"sph(?:ere)?[^\d+\-.]{{0,12}}(?P<sph>{NUMBER})");
    let cyl = format!(r"cyl(?:inder)?[^\d+\-.]{{0,12}}(?P<cyl>{NUMBER})");
    let axis = r"(?:axis|ax)[^\d]{0,8}(?P<axis>\d{1,3})\b";
    Regex::new(&format!(r"{sph}[^\d]{{0,12}}?{cyl}[^\d]{{0,12}}?{axis}"))
        .expect("table row regex")
});

/// Every `SPH … CYL … AXIS` row in normalised text, in order.
pub fn table_rows(text: &str) -> Vec<EyeReading> {
    TABLE_ROW
        .captures_iter(text)
        .map(|caps| {
            let axis = caps.name("axis").and_then(|m| Axis::parse(m.as_str()));
            EyeReading {
                sph: caps.name("sph").and_then(|m| parse_power(m.as_str())),
                cyl: caps.name("cyl").and_then(|m| parse_power(m.as_str())),
                axis,
                axis_source: axis.map(|_| AxisSource::Table),
            }
        })
        .collect()
}

/// Fill missing right/left fields from the first two table rows.
///
/// Fewer than two rows leaves both eyes untouched.
pub fn fill_from_table(
    text: &str,
    right: Option<EyeReading>,
    left: Option<EyeReading>,
) -> (Option<EyeReading>, Option<EyeReading>) {
    let rows = table_rows(text);
    if rows.len() < 2 {
        return (right, left);
    }

    tracing::debug!(rows = rows.len(), "table-format pass filling missing fields");
    (merge(right, &rows[0]), merge(left, &rows[1]))
}

fn merge(existing: Option<EyeReading>, row: &EyeReading) -> Option<EyeReading> {
    match existing {
        Some(reading) => Some(reading.filled_from(row)),
        None if row.is_empty() => None,
        None => Some(row.clone()),
    }
}
