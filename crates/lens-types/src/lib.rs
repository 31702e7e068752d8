//! Validated optical value types.
//!
//! These newtypes carry the range invariants of prescription values that are whole numbers:
//! the cylinder axis and the customer's age. Decimal powers (sphere, cylinder, addition) stay
//! as plain decimals in `lens-core` because every decimal a prescription can carry is valid
//! input to the engine.

/// Errors that can occur when creating validated value types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    /// The axis was outside 0..=180 degrees
    #[error("axis must be between 0 and 180 degrees, got {0}")]
    AxisOutOfRange(i64),
    /// The age was outside 0..=130 years
    #[error("age must be between 0 and 130 years, got {0}")]
    AgeOutOfRange(i64),
}

/// Orientation of the cylindrical correction, in whole degrees.
///
/// An `Axis` always lies in `0..=180`. Text recognition frequently produces values outside that
/// range (a stray digit, a misread PD); callers are expected to treat those as absent rather
/// than clamp them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Axis(u16);

impl Axis {
    /// Largest valid axis in degrees.
    pub const MAX: u16 = 180;

    /// Creates a new `Axis` from a whole number of degrees.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::AxisOutOfRange`] if `degrees` is negative or above 180.
    pub fn new(degrees: i64) -> Result<Self, RangeError> {
        if !(0..=i64::from(Self::MAX)).contains(&degrees) {
            return Err(RangeError::AxisOutOfRange(degrees));
        }
        Ok(Self(degrees as u16))
    }

    /// Parses an axis from a token of ASCII digits.
    ///
    /// Returns `None` for anything that is not a whole number in range.
    pub fn parse(token: &str) -> Option<Self> {
        token
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|d| Self::new(d).ok())
    }

    /// Returns the axis in degrees.
    pub fn degrees(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Axis {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl serde::Serialize for Axis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Axis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let degrees = i64::deserialize(deserializer)?;
        Axis::new(degrees).map_err(serde::de::Error::custom)
    }
}

/// Customer age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u8);

impl Age {
    /// Oldest accepted age in years.
    pub const MAX: u8 = 130;

    /// Creates a new `Age`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::AgeOutOfRange`] if `years` is negative or above 130.
    pub fn new(years: i64) -> Result<Self, RangeError> {
        if !(0..=i64::from(Self::MAX)).contains(&years) {
            return Err(RangeError::AgeOutOfRange(years));
        }
        Ok(Self(years as u8))
    }

    /// Returns the age in years.
    pub fn years(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Age {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl serde::Serialize for Age {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let years = i64::deserialize(deserializer)?;
        Age::new(years).map_err(serde::de::Error::custom)
    }
}
