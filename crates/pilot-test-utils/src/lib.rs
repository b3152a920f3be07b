//! Shared test utilities for the pilot workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`area`] — [`area::TestArea`], a temporary working area on disk

pub mod area;
