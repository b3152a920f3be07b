//! Working area discovery for pilot
//!
//! Locates the version-controlled project root that anchors every relative
//! path option and checks that it carries the expected project fingerprint.

pub mod error;
pub mod working_area;

pub use error::{Error, Result, WorkingAreaError};
pub use working_area::{ProjectFingerprint, WorkingAreaResolver};
