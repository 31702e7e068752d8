//! Clinical constants used throughout the lens engine.
//!
//! Table thresholds live next to the tables that use them (`index.rs`, `safety.rs`); this
//! module holds the values shared across components.

use rust_decimal::Decimal;

/// Age from which a customer is treated as presbyopic.
pub const PRESBYOPIA_AGE: u8 = 40;

/// Largest addition accepted from recognised text. Anything above is treated as a misread.
pub const MAX_ADD: Decimal = Decimal::from_parts(400, 0, 0, false, 2);

/// Plausible binocular pupillary distance range in millimetres.
pub const MIN_PD: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
pub const MAX_PD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Plausible monocular pupillary distance range in millimetres.
pub const MIN_MONO_PD: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
pub const MAX_MONO_PD: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Default directive for the `tracing` env filter installed by binaries.
pub const DEFAULT_LOG_DIRECTIVE: &str = "lens_core=info";

/// Environment variable that toggles positional axis recovery.
pub const POSITIONAL_AXIS_ENV: &str = "LENS_POSITIONAL_AXIS_RECOVERY";
