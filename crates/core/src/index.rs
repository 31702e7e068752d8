//! Minimum lens index resolution.
//!
//! Two literal tables drive the result: power bands map `|SE|` to an index, and per-family
//! frame policies raise that floor or block the frame outright. The final answer is the
//! larger of the two floors, or [`IndexRecommendation::Blocked`].

use crate::frame::{FrameFamily, FrameType};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Available lens materials, in ascending refractive index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LensIndex {
    Index156,
    Index160,
    Index167,
    Index174,
}

impl LensIndex {
    /// Refractive index as a decimal, e.g. `1.67`.
    pub fn value(self) -> Decimal {
        match self {
            LensIndex::Index156 => Decimal::from_parts(156, 0, 0, false, 2),
            LensIndex::Index160 => Decimal::from_parts(160, 0, 0, false, 2),
            LensIndex::Index167 => Decimal::from_parts(167, 0, 0, false, 2),
            LensIndex::Index174 => Decimal::from_parts(174, 0, 0, false, 2),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            LensIndex::Index156 => 1.56,
            LensIndex::Index160 => 1.60,
            LensIndex::Index167 => 1.67,
            LensIndex::Index174 => 1.74,
        }
    }
}

impl std::fmt::Display for LensIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for LensIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Minimum acceptable index, or a frame-safety block.
///
/// Ordered so that `Blocked` is above every index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexRecommendation {
    Index(LensIndex),
    Blocked,
}

impl IndexRecommendation {
    pub fn is_blocked(self) -> bool {
        self == IndexRecommendation::Blocked
    }

    pub fn index(self) -> Option<LensIndex> {
        match self {
            IndexRecommendation::Index(index) => Some(index),
            IndexRecommendation::Blocked => None,
        }
    }
}

impl std::fmt::Display for IndexRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexRecommendation::Index(index) => index.fmt(f),
            IndexRecommendation::Blocked => write!(f, "BLOCKED"),
        }
    }
}

impl Serialize for IndexRecommendation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            IndexRecommendation::Index(index) => index.serialize(serializer),
            IndexRecommendation::Blocked => serializer.serialize_str("BLOCKED"),
        }
    }
}

// ============================================================================
// Tables
// ============================================================================

const fn dioptres(whole: u32) -> Decimal {
    Decimal::from_parts(whole, 0, 0, false, 0)
}

/// `(upper bound inclusive, index)`; anything above the last bound is 1.74.
const POWER_BANDS: &[(Decimal, LensIndex)] = &[
    (dioptres(3), LensIndex::Index156),
    (dioptres(5), LensIndex::Index160),
    (dioptres(8), LensIndex::Index167),
];

/// Per-family adjustments to the power-based index.
#[derive(Debug)]
struct FramePolicy {
    family: FrameFamily,
    /// Minimum index for the family regardless of power.
    floor: Option<LensIndex>,
    /// Above this `|SE|`, the index is raised to at least the given one.
    raise_above: Option<(Decimal, LensIndex)>,
    /// Above this `|SE|`, no index is acceptable.
    block_above: Option<Decimal>,
}

const FRAME_POLICIES: &[FramePolicy] = &[
    FramePolicy {
        family: FrameFamily::HalfRim,
        floor: Some(LensIndex::Index160),
        raise_above: Some((dioptres(4), LensIndex::Index167)),
        block_above: None,
    },
    FramePolicy {
        family: FrameFamily::Rimless,
        floor: Some(LensIndex::Index160),
        raise_above: None,
        block_above: Some(dioptres(7)),
    },
];

/// Index required by power alone.
pub fn index_by_power(se: Decimal) -> LensIndex {
    let magnitude = se.abs();
    POWER_BANDS
        .iter()
        .find(|(upper, _)| magnitude <= *upper)
        .map_or(LensIndex::Index174, |(_, index)| *index)
}

/// Index floor imposed by the frame for this power.
pub fn index_by_frame(frame: FrameType, se: Decimal) -> IndexRecommendation {
    let by_power = index_by_power(se);
    let Some(policy) = FRAME_POLICIES.iter().find(|p| p.family == frame.family()) else {
        return IndexRecommendation::Index(by_power);
    };

    let magnitude = se.abs();
    if policy.block_above.is_some_and(|limit| magnitude > limit) {
        return IndexRecommendation::Blocked;
    }

    let raised = policy
        .raise_above
        .filter(|(limit, _)| magnitude > *limit)
        .map(|(_, index)| index);
    let floor = [Some(by_power), policy.floor, raised]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(by_power);
    IndexRecommendation::Index(floor)
}

/// Minimum acceptable index for `frame` at spherical equivalent `se`.
pub fn resolve_index(frame: FrameType, se: Decimal) -> IndexRecommendation {
    let by_power = IndexRecommendation::Index(index_by_power(se));
    let by_frame = index_by_frame(frame, se);
    if by_frame.is_blocked() {
        tracing::info!(?frame, %se, "no lens index is safe for this frame");
        return IndexRecommendation::Blocked;
    }
    by_power.max(by_frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FRAMES: [FrameType; 7] = [
        FrameType::FullRimPlastic,
        FrameType::FullRimMetal,
        FrameType::HalfRim,
        FrameType::SemiRimless,
        FrameType::Rimless,
        FrameType::Drilled,
        FrameType::Other,
    ];

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test decimal")
    }

    #[test]
    fn power_bands_include_upper_bound() {
        assert_eq!(index_by_power(dec("0")), LensIndex::Index156);
        assert_eq!(index_by_power(dec("-3.00")), LensIndex::Index156);
        assert_eq!(index_by_power(dec("3.25")), LensIndex::Index160);
        assert_eq!(index_by_power(dec("5")), LensIndex::Index160);
        assert_eq!(index_by_power(dec("-8.00")), LensIndex::Index167);
        assert_eq!(index_by_power(dec("8.25")), LensIndex::Index174);
    }

    #[test]
    fn full_rim_follows_power_alone() {
        assert_eq!(
            resolve_index(FrameType::FullRimMetal, dec("2")),
            IndexRecommendation::Index(LensIndex::Index156)
        );
        assert_eq!(
            resolve_index(FrameType::Other, dec("9")),
            IndexRecommendation::Index(LensIndex::Index174)
        );
    }

    #[test]
    fn half_rim_raises_floor() {
        assert_eq!(
            resolve_index(FrameType::HalfRim, dec("1")),
            IndexRecommendation::Index(LensIndex::Index160)
        );
        assert_eq!(
            resolve_index(FrameType::SemiRimless, dec("4.25")),
            IndexRecommendation::Index(LensIndex::Index167)
        );
        assert_eq!(
            resolve_index(FrameType::HalfRim, dec("-6.5")),
            IndexRecommendation::Index(LensIndex::Index167)
        );
        assert_eq!(
            resolve_index(FrameType::HalfRim, dec("9")),
            IndexRecommendation::Index(LensIndex::Index174)
        );
    }

    #[test]
    fn rimless_blocks_above_seven() {
        assert_eq!(
            resolve_index(FrameType::Rimless, dec("7")),
            IndexRecommendation::Index(LensIndex::Index167)
        );
        assert_eq!(resolve_index(FrameType::Rimless, dec("7.5")), IndexRecommendation::Blocked);
        assert_eq!(resolve_index(FrameType::Drilled, dec("-7.25")), IndexRecommendation::Blocked);
    }

    #[test]
    fn resolution_is_monotonic_in_power() {
        let steps: Vec<Decimal> = (0..=48).map(|q| Decimal::new(q * 25, 2)).collect();
        for frame in ALL_FRAMES {
            let results: Vec<_> = steps.iter().map(|se| resolve_index(frame, *se)).collect();
            assert!(
                results.windows(2).all(|w| w[0] <= w[1]),
                "{frame:?} not monotonic: {results:?}"
            );
            let frame_floor = results.iter().zip(&steps).all(|(r, se)| {
                r.is_blocked() || *r >= IndexRecommendation::Index(index_by_power(*se))
            });
            assert!(frame_floor, "{frame:?} went below the power floor");
        }
    }

    #[test]
    fn serialises_as_number_or_blocked() {
        let json = serde_json::to_value(IndexRecommendation::Index(LensIndex::Index167))
            .expect("serialise");
        assert_eq!(json, serde_json::json!(1.67));
        let json = serde_json::to_value(IndexRecommendation::Blocked).expect("serialise");
        assert_eq!(json, serde_json::json!("BLOCKED"));
        assert_eq!(LensIndex::Index160.to_string(), "1.60");
    }
}
