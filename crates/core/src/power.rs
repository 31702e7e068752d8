//! Spherical equivalent calculation.

use crate::prescription::{EyeReading, ParsedPrescription};
use rust_decimal::Decimal;
use serde::Serialize;

const TWO: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// `sph + cyl / 2`, with absent values read as zero.
pub fn se(sph: Option<Decimal>, cyl: Option<Decimal>) -> Decimal {
    sph.unwrap_or_default() + cyl.unwrap_or_default() / TWO
}

/// Larger absolute spherical equivalent of the two eyes.
pub fn max_abs_se(
    right_sph: Option<Decimal>,
    right_cyl: Option<Decimal>,
    left_sph: Option<Decimal>,
    left_cyl: Option<Decimal>,
) -> Decimal {
    se(right_sph, right_cyl)
        .abs()
        .max(se(left_sph, left_cyl).abs())
}

/// Per-eye and combined spherical equivalent of a prescription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SphericalEquivalent {
    pub right: Decimal,
    pub left: Decimal,
    pub max_abs: Decimal,
}

impl SphericalEquivalent {
    /// Compute from a parsed prescription. A missing eye counts as plano.
    pub fn of(rx: &ParsedPrescription) -> Self {
        let eye_se = |reading: Option<&EyeReading>| {
            reading.map_or(Decimal::ZERO, |r| se(r.sph, r.cyl))
        };
        let right = eye_se(rx.right_eye.as_ref());
        let left = eye_se(rx.left_eye.as_ref());
        Self {
            right,
            left,
            max_abs: right.abs().max(left.abs()),
        }
    }
}
