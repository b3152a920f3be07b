//! Filesystem abstraction for the pilot configuration engine
//!
//! Provides normalized path handling, working-area relative path conversion
//! and safe I/O for run snapshots.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod normalize;
pub mod path;

pub use config::ConfigStore;
pub use constants::PilotPath;
pub use error::{Error, PathError, Result};
pub use normalize::PathNormalizer;
pub use path::NormalizedPath;
