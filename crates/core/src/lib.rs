//! # Lens Core
//!
//! Prescription interpretation and lens specification engine.
//!
//! This crate turns a spectacle prescription, however messily captured, into a lens
//! specification:
//! - [`parser`]: extraction of per-eye sphere, cylinder and axis, addition and pupillary
//!   distance from recognised text
//! - [`power`]: spherical equivalent
//! - [`vision`]: vision type classification
//! - [`index`]: minimum lens index for a frame
//! - [`safety`]: frame safety verdict
//! - [`advisor`]: the pipeline composing all of the above
//!
//! Every engine operation is pure and total. Missing or malformed data degrades to absent
//! values and conservative defaults; nothing here performs I/O.
//!
//! **No presentation concerns**: argument parsing, file reading and log output belong in
//! `lens-cli`.

pub mod advisor;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod index;
pub mod parser;
pub mod power;
pub mod prescription;
pub mod safety;
pub mod tokens;
pub mod vision;

pub use advisor::{render_json, AdvisoryRequest, LensAdvice, LensAdvisor, PrescriptionSource};
pub use config::{positional_axis_recovery_from_env_value, AdvisorConfig};
pub use error::{LensError, LensResult};
pub use frame::{FrameFamily, FrameType};
pub use index::{
    index_by_frame, index_by_power, resolve_index, IndexRecommendation, LensIndex,
};
pub use parser::{parse, PrescriptionParser};
pub use power::{max_abs_se, se, SphericalEquivalent};
pub use prescription::{AxisSource, Eye, EyeReading, ManualEntry, ParsedPrescription};
pub use safety::{evaluate_safety, FrameSafetyResult, SafetyLevel};
pub use vision::{classify, ClassifierInput, VisionNeed, VisionType, VisionTypeResult};

pub use lens_types::{Age, Axis, RangeError};
pub use rust_decimal::Decimal;
