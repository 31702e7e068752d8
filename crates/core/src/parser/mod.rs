//! Prescription text parser.
//!
//! Turns recognised text into a [`ParsedPrescription`]. Parsing never fails: anything that
//! cannot be read is simply absent from the result.
//!
//! Passes, in order (earlier values always win):
//! 1. [`normalise`] the text.
//! 2. Per eye, right first: the label-anchored rule cascade in [`rules`].
//! 3. Per eye: axis recovery within that eye's segment ([`recovery`]).
//! 4. The table-format pass over the whole text ([`table`]).
//! 5. Addition and pupillary distance ([`extras`]).

pub mod extras;
pub mod normalise;
pub mod recovery;
pub mod rules;
pub mod table;

pub use normalise::normalise;

use crate::config::AdvisorConfig;
use crate::prescription::{Eye, EyeReading, ParsedPrescription};

/// Recognised-text parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrescriptionParser {
    positional_axis_recovery: bool,
}

impl Default for PrescriptionParser {
    fn default() -> Self {
        Self::from_config(&AdvisorConfig::default())
    }
}

impl PrescriptionParser {
    pub fn from_config(cfg: &AdvisorConfig) -> Self {
        Self {
            positional_axis_recovery: cfg.positional_axis_recovery(),
        }
    }

    /// Parse recognised text.
    pub fn parse(&self, text: &str) -> ParsedPrescription {
        let text = normalise(text);

        let right = self.read_eye(&text, Eye::Right);
        let left = self.read_eye(&text, Eye::Left);
        let (right_eye, left_eye) = table::fill_from_table(&text, right, left);

        let parsed = ParsedPrescription {
            right_eye,
            left_eye,
            add: extras::extract_add(&text),
            pd: extras::extract_pd(&text),
        };

        if parsed.is_empty() {
            tracing::debug!("no prescription values recognised");
        }
        parsed
    }

    fn read_eye(&self, text: &str, eye: Eye) -> Option<EyeReading> {
        let found = rules::extract_eye(text, eye)?;
        let segment = rules::segment(text, eye, found.anchor);
        Some(recovery::recover_axis(
            &found.reading,
            segment,
            eye,
            self.positional_axis_recovery,
        ))
    }
}

/// Parse recognised text with the default configuration.
pub fn parse(text: &str) -> ParsedPrescription {
    PrescriptionParser::default().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prescription::AxisSource;
    use lens_types::Axis;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test decimal")
    }

    #[test]
    fn parses_fully_labelled_prescription() {
        let rx = parse("OD: SPH -6.00 CYL -1.00 AXIS 90  OS: SPH -5.50 CYL -0.75 AXIS 85");

        let right = rx.right_eye.expect("right eye");
        assert_eq!(right.sph, Some(dec("-6.00")));
        assert_eq!(right.cyl, Some(dec("-1.00")));
        assert_eq!(right.axis.map(Axis::degrees), Some(90));
        assert_eq!(right.axis_source, Some(AxisSource::Labelled));

        let left = rx.left_eye.expect("left eye");
        assert_eq!(left.sph, Some(dec("-5.50")));
        assert_eq!(left.cyl, Some(dec("-0.75")));
        assert_eq!(left.axis.map(Axis::degrees), Some(85));
    }

    #[test]
    fn sphere_only_eye_renders_nulls() {
        let rx = parse("RE: -2.00");
        let json = serde_json::to_value(&rx).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({ "rightEye": { "sph": "-2.00", "cyl": null, "axis": null } })
        );
    }

    #[test]
    fn text_without_eye_markers_is_empty() {
        let rx = parse("Thank you for visiting. Next check-up in 2 years.");
        assert!(rx.is_empty());
        assert_eq!(serde_json::to_string(&rx).expect("serialise"), "{}");
        assert!(parse("").is_empty());
    }

    #[test]
    fn labelled_axis_survives_table_pass() {
        let rx = parse(
            "Right eye -2.00 / -0.50 / 180\n\
             SPH -2.00 CYL -0.50 AXIS 90\n\
             SPH -1.00 CYL -0.25 AXIS 10",
        );

        let right = rx.right_eye.expect("right eye");
        assert_eq!(right.axis.map(Axis::degrees), Some(180));
        assert_eq!(right.axis_source, Some(AxisSource::Labelled));

        let left = rx.left_eye.expect("left eye from table");
        assert_eq!(left.sph, Some(dec("-1.00")));
        assert_eq!(left.axis.map(Axis::degrees), Some(10));
        assert_eq!(left.axis_source, Some(AxisSource::Table));
    }

    #[test]
    fn table_only_text_fills_both_eyes() {
        let rx = parse("Sphere -1.00 Cylinder -0.50 Axis 90\nSphere -1.25 Cylinder -0.75 Axis 80");
        assert_eq!(rx.right_eye.and_then(|r| r.sph), Some(dec("-1.00")));
        assert_eq!(rx.left_eye.and_then(|r| r.axis).map(Axis::degrees), Some(80));
    }

    #[test]
    fn zero_cylinder_is_distinct_from_absent() {
        let rx = parse("OD: SPH -1.00 CYL plano OS: -1.50");
        assert_eq!(rx.right_eye.as_ref().and_then(|r| r.cyl), Some(Decimal::ZERO));
        assert_eq!(rx.left_eye.as_ref().and_then(|r| r.cyl), None);
    }

    #[test]
    fn axis_keyword_is_recovered_within_the_eye() {
        let rx = parse("OD -2.00 -0.50 axis 95 OS -1.00 -0.25 axis 80");
        let right = rx.right_eye.expect("right eye");
        assert_eq!(right.axis.map(Axis::degrees), Some(95));
        assert_eq!(right.axis_source, Some(AxisSource::Keyword));
        let left = rx.left_eye.expect("left eye");
        assert_eq!(left.axis.map(Axis::degrees), Some(80));
    }

    #[test]
    fn sphere_label_does_not_hide_unlabelled_cylinder() {
        for text in [
            "OD SPH -4.50 -1.50 x 90",
            "OD SPH -4.50 / -1.50 / 90",
            "RE: SPH -4.50 -1.50 90",
        ] {
            let right = parse(text).right_eye.expect("right eye");
            assert_eq!(right.sph, Some(dec("-4.50")), "{text}");
            assert_eq!(right.cyl, Some(dec("-1.50")), "{text}");
            assert_eq!(right.axis.map(Axis::degrees), Some(90), "{text}");
        }

        let right = parse("OD SPH -2.00 / -0.50 / 63").right_eye.expect("right eye");
        assert_eq!(right.cyl, Some(dec("-0.50")));
        assert_eq!(right.axis.map(Axis::degrees), Some(63));
        assert!(!right.has_ambiguous_axis());
    }

    #[test]
    fn positional_axis_is_flagged_and_switchable() {
        let text = "OD -2.00 ; -0.50 ; 63";

        let rx = parse(text);
        assert!(rx.has_ambiguous_axis());
        assert_eq!(rx.right_eye.and_then(|r| r.axis).map(Axis::degrees), Some(63));

        let strict = PrescriptionParser::from_config(&AdvisorConfig::new(false)).parse(text);
        assert_eq!(strict.right_eye.as_ref().and_then(|r| r.sph), Some(dec("-2.00")));
        assert!(!strict.has_ambiguous_axis());
        assert_eq!(strict.right_eye.and_then(|r| r.axis), None);
    }

    #[test]
    fn reads_add_and_pd_alongside_eyes() {
        let rx = parse("R: ... OD +1.00 OS +1.25 ADD +2.00 PD 32/31");
        assert_eq!(rx.add, Some(dec("2.00")));
        assert_eq!(rx.pd, Some(dec("63")));
        assert_eq!(rx.right_eye.and_then(|r| r.sph), Some(dec("1.00")));
    }

    #[test]
    fn prose_near_a_reading_word_is_not_an_add() {
        let rx = parse("OD -2.00 -0.50 X 90 OS -1.00 -0.25 X 80 near 3 months");
        assert_eq!(rx.add, None);
        assert_eq!(rx.left_eye.and_then(|l| l.axis).map(Axis::degrees), Some(80));
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "od -3.25/-1.00x175 os -2.75/-0.75x5 add 1.50 pd 62";
        assert_eq!(parse(text), parse(text));
    }
}
