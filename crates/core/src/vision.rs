//! Vision type classification.
//!
//! A literal decision table of `(name, predicate, outcome)` rows evaluated top to bottom; the
//! first row whose predicate holds decides the result. When no row matches the classifier
//! falls back to single-vision distance without a note.

use crate::constants::PRESBYOPIA_AGE;
use crate::LensError;
use lens_types::Age;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the customer says they need the glasses for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionNeed {
    Distance,
    Near,
    Both,
    ZeroPower,
}

impl FromStr for VisionNeed {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "distance" => Ok(Self::Distance),
            "near" => Ok(Self::Near),
            "both" => Ok(Self::Both),
            "zero_power" | "plano" => Ok(Self::ZeroPower),
            _ => Err(LensError::InvalidInput(format!(
                "vision need must be one of distance, near, both, zero_power; got '{}'",
                s.trim()
            ))),
        }
    }
}

/// Lens design verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisionType {
    ZeroPower,
    SvDistance,
    SvNear,
    SvBifocalPair,
    Progressive,
    Bifocal,
}

/// Result of classification. `secondary` is only set when an alternative design applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionTypeResult {
    pub primary: VisionType,
    pub secondary: Option<VisionType>,
    pub note: Option<String>,
}

impl VisionTypeResult {
    fn plain(primary: VisionType) -> Self {
        Self {
            primary,
            secondary: None,
            note: None,
        }
    }
}

/// Inputs to [`classify`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierInput {
    pub max_abs_se: Decimal,
    pub add: Option<Decimal>,
    pub age: Option<Age>,
    pub vision_need: VisionNeed,
    pub has_add: bool,
}

impl ClassifierInput {
    /// Presbyopia is modelled solely as a known age of 40 or more.
    pub fn is_presbyopic(&self) -> bool {
        self.age
            .is_some_and(|age| age.years() >= PRESBYOPIA_AGE)
    }

    fn needs_near_support(&self) -> bool {
        matches!(self.vision_need, VisionNeed::Near | VisionNeed::Both)
            || self.has_add
            || self.add.is_some_and(|add| add > Decimal::ZERO)
    }
}

const TWO_PAIRS_NOTE: &str =
    "Distance and near needs are best served by two separate single-vision pairs.";
const PROGRESSIVE_NOTE: &str =
    "Progressive lenses recommended for presbyopia; bifocal lenses are an alternative.";
const FUTURE_NEAR_NOTE: &str =
    "Single-vision distance lenses for now; near-vision support is likely to be needed soon.";

// ============================================================================
// Decision table
// ============================================================================

type Predicate = fn(&ClassifierInput) -> bool;
type Outcome = fn() -> VisionTypeResult;

/// Ordered classification rows.
pub const VISION_RULES: &[(&str, Predicate, Outcome)] = &[
    ("zero_power", is_zero_power, zero_power),
    ("young_distance", young_distance, sv_distance),
    ("young_near", young_near, sv_near),
    ("young_both", young_both, sv_bifocal_pair),
    ("presbyopic_near", presbyopic_near, progressive),
    ("presbyopic_distance", presbyopic_distance, sv_distance_with_warning),
];

fn is_zero_power(input: &ClassifierInput) -> bool {
    input.max_abs_se.is_zero() && input.vision_need == VisionNeed::ZeroPower
}

fn young_with(input: &ClassifierInput, need: VisionNeed) -> bool {
    !input.is_presbyopic() && input.vision_need == need
}

fn young_distance(input: &ClassifierInput) -> bool {
    young_with(input, VisionNeed::Distance)
}

fn young_near(input: &ClassifierInput) -> bool {
    young_with(input, VisionNeed::Near)
}

fn young_both(input: &ClassifierInput) -> bool {
    young_with(input, VisionNeed::Both)
}

fn presbyopic_near(input: &ClassifierInput) -> bool {
    input.is_presbyopic() && input.needs_near_support()
}

fn presbyopic_distance(input: &ClassifierInput) -> bool {
    input.is_presbyopic() && input.vision_need == VisionNeed::Distance
}

fn zero_power() -> VisionTypeResult {
    VisionTypeResult::plain(VisionType::ZeroPower)
}

fn sv_distance() -> VisionTypeResult {
    VisionTypeResult::plain(VisionType::SvDistance)
}

fn sv_near() -> VisionTypeResult {
    VisionTypeResult::plain(VisionType::SvNear)
}

fn sv_bifocal_pair() -> VisionTypeResult {
    VisionTypeResult {
        note: Some(TWO_PAIRS_NOTE.to_owned()),
        ..VisionTypeResult::plain(VisionType::SvBifocalPair)
    }
}

fn progressive() -> VisionTypeResult {
    VisionTypeResult {
        primary: VisionType::Progressive,
        secondary: Some(VisionType::Bifocal),
        note: Some(PROGRESSIVE_NOTE.to_owned()),
    }
}

fn sv_distance_with_warning() -> VisionTypeResult {
    VisionTypeResult {
        note: Some(FUTURE_NEAR_NOTE.to_owned()),
        ..VisionTypeResult::plain(VisionType::SvDistance)
    }
}

/// Classify the lens design for `input`.
pub fn classify(input: &ClassifierInput) -> VisionTypeResult {
    VISION_RULES
        .iter()
        .find(|(_, applies, _)| applies(input))
        .map_or_else(sv_distance, |(name, _, outcome)| {
            tracing::debug!(rule = name, "vision type rule matched");
            outcome()
        })
}
