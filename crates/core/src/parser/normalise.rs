//! Text normalisation applied before any extraction rule runs.

use regex::Regex;
use std::sync::LazyLock;

static PLANO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bplano\b").expect("plano regex"));

// Signed values or single-digit integer parts only, so "pd 64,61" is left alone.
static DECIMAL_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-]\d{1,2}|\b\d),(\d{2})\b").expect("decimal comma regex"));

/// Lowercase the text and fold the typographic variants recognition engines emit.
///
/// - Unicode minus, dashes and full-width signs become ASCII `-`/`+`.
/// - `plano` reads as `0.00`.
/// - A decimal comma inside a dioptre value (`-2,25`) becomes a point.
pub fn normalise(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}'
            | '\u{FE63}' | '\u{FF0D}' => '-',
            '\u{FF0B}' => '+',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();

    let folded = PLANO.replace_all(&folded, "0.00");
    DECIMAL_COMMA.replace_all(&folded, "${1}.${2}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_dashes() {
        assert_eq!(normalise("OD: SPH \u{2212}2.00"), "od: sph -2.00");
        assert_eq!(normalise("RE \u{2013}1.25"), "re -1.25");
    }

    #[test]
    fn reads_plano_as_zero() {
        assert_eq!(normalise("OS Plano"), "os 0.00");
        assert_eq!(normalise("planometer"), "planometer");
    }

    #[test]
    fn converts_decimal_commas_in_powers_only() {
        assert_eq!(normalise("OD -2,25 -0,50"), "od -2.25 -0.50");
        assert_eq!(normalise("ADD 1,50"), "add 1.50");
        assert_eq!(normalise("PD 64,61"), "pd 64,61");
    }
}
