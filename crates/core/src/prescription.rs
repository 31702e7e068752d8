//! Prescription data model.
//!
//! Every field is independently optional: an absent value means "unknown", never zero.
//! The parser and the manual-entry path both produce a [`ParsedPrescription`]; numeric
//! components substitute zero for absent sphere/cylinder only at the point of computation.

use crate::tokens::parse_decimal;
use crate::{LensError, LensResult};
use lens_types::Axis;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Which eye a reading belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Eye {
    /// Right eye (OD).
    Right,
    /// Left eye (OS).
    Left,
}

impl Eye {
    /// The opposite eye.
    pub fn other(self) -> Self {
        match self {
            Eye::Right => Eye::Left,
            Eye::Left => Eye::Right,
        }
    }
}

impl std::fmt::Display for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Eye::Right => write!(f, "right"),
            Eye::Left => write!(f, "left"),
        }
    }
}

/// How an axis value was obtained.
///
/// Only [`AxisSource::Positional`] is ambiguous: it was taken as the third number after two
/// decimals, which can be an unrelated trailing number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSource {
    /// Captured together with the sphere by a label-anchored rule.
    Labelled,
    /// Recovered through an explicit `AXIS`/`X` keyword.
    Keyword,
    /// Recovered as the third positional number after two decimals.
    Positional,
    /// Filled from a SPH/CYL/AXIS table row.
    Table,
    /// Entered by hand.
    Manual,
}

/// One eye's refractive values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EyeReading {
    /// Sphere in dioptres.
    pub sph: Option<Decimal>,

    /// Cylinder in dioptres. `Some(0)` is a real reading, distinct from absent.
    pub cyl: Option<Decimal>,

    /// Cylinder axis in degrees.
    pub axis: Option<Axis>,

    /// Provenance of `axis`; absent whenever `axis` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_source: Option<AxisSource>,
}

impl EyeReading {
    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.sph.is_none() && self.cyl.is_none() && self.axis.is_none()
    }

    /// True when the axis came from the positional fallback and may be a stray number.
    pub fn has_ambiguous_axis(&self) -> bool {
        self.axis_source == Some(AxisSource::Positional)
    }

    /// Returns a copy with `other`'s values filling only the fields this reading lacks.
    pub fn filled_from(&self, other: &EyeReading) -> EyeReading {
        let (axis, axis_source) = match self.axis {
            Some(axis) => (Some(axis), self.axis_source),
            None => (other.axis, other.axis_source),
        };
        EyeReading {
            sph: self.sph.or(other.sph),
            cyl: self.cyl.or(other.cyl),
            axis,
            axis_source,
        }
    }

    /// Returns a copy carrying `axis` when this reading has none yet.
    pub fn with_axis_if_missing(&self, axis: Axis, source: AxisSource) -> EyeReading {
        if self.axis.is_some() {
            return self.clone();
        }
        EyeReading {
            axis: Some(axis),
            axis_source: Some(source),
            ..self.clone()
        }
    }
}

/// Structured result of prescription extraction.
///
/// Any subset of fields may be absent. Absent top-level fields are omitted from JSON, so a
/// prescription with nothing recognised renders as `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedPrescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_eye: Option<EyeReading>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_eye: Option<EyeReading>,

    /// Near addition in dioptres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<Decimal>,

    /// Binocular pupillary distance in millimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pd: Option<Decimal>,
}

impl ParsedPrescription {
    /// The reading for `eye`, if any value was found for it.
    pub fn eye(&self, eye: Eye) -> Option<&EyeReading> {
        match eye {
            Eye::Right => self.right_eye.as_ref(),
            Eye::Left => self.left_eye.as_ref(),
        }
    }

    /// True when nothing at all was recognised.
    pub fn is_empty(&self) -> bool {
        self.right_eye.is_none()
            && self.left_eye.is_none()
            && self.add.is_none()
            && self.pd.is_none()
    }

    /// True when either eye carries a positionally recovered axis.
    pub fn has_ambiguous_axis(&self) -> bool {
        [&self.right_eye, &self.left_eye]
            .into_iter()
            .flatten()
            .any(EyeReading::has_ambiguous_axis)
    }
}

// ============================================================================
// Manual entry
// ============================================================================

/// Form-style manual entry that bypasses text recognition.
///
/// Every field accepts a JSON number or a string. Values that cannot be read as numbers are
/// treated as absent, the same way unreadable recognised text is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualEntry {
    #[serde(deserialize_with = "lenient_decimal")]
    pub right_sph: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub right_cyl: Option<Decimal>,
    #[serde(deserialize_with = "lenient_axis")]
    pub right_axis: Option<Axis>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub left_sph: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub left_cyl: Option<Decimal>,
    #[serde(deserialize_with = "lenient_axis")]
    pub left_axis: Option<Axis>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub add: Option<Decimal>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub pd: Option<Decimal>,
}

impl ManualEntry {
    /// Parse a manual entry from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::InvalidJson`] if the text is not a JSON object. Individual fields
    /// never fail; unreadable values become absent.
    pub fn from_json(json_text: &str) -> LensResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json_text)?;
        if !value.is_object() {
            return Err(LensError::InvalidJson(serde::de::Error::custom(
                "manual entry must be a JSON object",
            )));
        }
        serde_json::from_value(value).map_err(LensError::from)
    }

    /// Convert into the same structure the text parser produces.
    pub fn to_prescription(&self) -> ParsedPrescription {
        ParsedPrescription {
            right_eye: manual_eye(self.right_sph, self.right_cyl, self.right_axis),
            left_eye: manual_eye(self.left_sph, self.left_cyl, self.left_axis),
            add: self.add,
            pd: self.pd,
        }
    }
}

fn manual_eye(
    sph: Option<Decimal>,
    cyl: Option<Decimal>,
    axis: Option<Axis>,
) -> Option<EyeReading> {
    let reading = EyeReading {
        sph,
        cyl,
        axis,
        axis_source: axis.map(|_| AxisSource::Manual),
    };
    (!reading.is_empty()).then_some(reading)
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => parse_decimal(&s),
        Some(serde_json::Value::Number(n)) => parse_decimal(&n.to_string()),
        _ => None,
    })
}

fn lenient_axis<'de, D>(deserializer: D) -> Result<Option<Axis>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Axis::parse(s.trim().trim_end_matches('°')),
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(|d| Axis::new(d).ok()),
        _ => None,
    })
}
