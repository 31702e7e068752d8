//! Frame safety evaluation.
//!
//! Thresholds are per frame family and checked from the highest down; the first threshold
//! that `|SE|` exceeds decides the verdict. Families without thresholds are always safe.

use crate::frame::{FrameFamily, FrameType};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Warning,
    Blocked,
}

/// Safety verdict for a frame at a given power.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameSafetyResult {
    pub safe: bool,
    pub level: SafetyLevel,
    pub message: Option<String>,
}

impl FrameSafetyResult {
    fn safe() -> Self {
        Self {
            safe: true,
            level: SafetyLevel::Safe,
            message: None,
        }
    }
}

struct Threshold {
    above: Decimal,
    safe: bool,
    level: SafetyLevel,
    message: &'static str,
}

const fn dioptres(whole: u32) -> Decimal {
    Decimal::from_parts(whole, 0, 0, false, 0)
}

const HALF_RIM_THRESHOLDS: &[Threshold] = &[
    Threshold {
        above: dioptres(8),
        safe: false,
        level: SafetyLevel::Warning,
        message: "Half-rim frames are not recommended above 8D, suggest full-rim",
    },
    Threshold {
        above: dioptres(6),
        safe: true,
        level: SafetyLevel::Caution,
        message: "Half-rim frames: consider full-rim above 6D",
    },
];

const RIMLESS_THRESHOLDS: &[Threshold] = &[
    Threshold {
        above: dioptres(7),
        safe: false,
        level: SafetyLevel::Blocked,
        message: "Rimless frames cannot be used above 7D due to lens fragility risk",
    },
    Threshold {
        above: dioptres(6),
        safe: true,
        level: SafetyLevel::Warning,
        message: "Rimless frames are not recommended above 6D",
    },
];

fn thresholds(family: FrameFamily) -> &'static [Threshold] {
    match family {
        FrameFamily::HalfRim => HALF_RIM_THRESHOLDS,
        FrameFamily::Rimless => RIMLESS_THRESHOLDS,
        FrameFamily::FullRim | FrameFamily::Other => &[],
    }
}

/// Evaluate whether `frame` can carry a lens of spherical equivalent `se`.
pub fn evaluate_safety(frame: FrameType, se: Decimal) -> FrameSafetyResult {
    let magnitude = se.abs();
    thresholds(frame.family())
        .iter()
        .find(|t| magnitude > t.above)
        .map_or_else(FrameSafetyResult::safe, |t| FrameSafetyResult {
            safe: t.safe,
            level: t.level,
            message: Some(t.message.to_owned()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test decimal")
    }

    #[test]
    fn full_rim_is_always_safe() {
        for se in ["0", "-6.5", "12"] {
            assert_eq!(
                evaluate_safety(FrameType::FullRimPlastic, dec(se)),
                FrameSafetyResult::safe()
            );
        }
        assert_eq!(evaluate_safety(FrameType::Other, dec("15")), FrameSafetyResult::safe());
    }

    #[test]
    fn half_rim_thresholds() {
        assert_eq!(evaluate_safety(FrameType::HalfRim, dec("6")).level, SafetyLevel::Safe);

        let caution = evaluate_safety(FrameType::SemiRimless, dec("-6.5"));
        assert!(caution.safe);
        assert_eq!(caution.level, SafetyLevel::Caution);
        assert!(caution.message.expect("message").contains("6D"));

        let warning = evaluate_safety(FrameType::HalfRim, dec("8.25"));
        assert!(!warning.safe);
        assert_eq!(warning.level, SafetyLevel::Warning);
        assert_eq!(evaluate_safety(FrameType::HalfRim, dec("8")).level, SafetyLevel::Caution);
    }

    #[test]
    fn rimless_thresholds() {
        assert_eq!(evaluate_safety(FrameType::Drilled, dec("6")), FrameSafetyResult::safe());

        let warning = evaluate_safety(FrameType::Rimless, dec("6.75"));
        assert!(warning.safe);
        assert_eq!(warning.level, SafetyLevel::Warning);

        let at_limit = evaluate_safety(FrameType::Rimless, dec("7"));
        assert!(at_limit.safe);

        let blocked = evaluate_safety(FrameType::Rimless, dec("7.5"));
        assert!(!blocked.safe);
        assert_eq!(blocked.level, SafetyLevel::Blocked);
        assert!(blocked.message.expect("message").contains("fragility"));
    }

    #[test]
    fn serialises_level_in_lowercase() {
        let json = serde_json::to_value(evaluate_safety(FrameType::HalfRim, dec("7")))
            .expect("serialise");
        assert_eq!(json["level"], "caution");
        assert_eq!(json["safe"], true);
    }
}
