//! Working area resolution
//!
//! The working area is the checkout root of the project. It is found by
//! walking upward from a start directory to the enclosing git work tree,
//! then confirmed by a fingerprint file so a run started inside some
//! unrelated repository fails instead of anchoring paths to the wrong place.

use crate::{Error, Result, WorkingAreaError};
use git2::{ErrorCode, Repository};
use pilot_fs::{NormalizedPath, PilotPath};
use serde::Deserialize;
use std::path::Path;

/// What identifies the project's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFingerprint {
    /// Marker file, relative to the root
    marker: String,
    /// Expected `name` key inside the marker, if checked
    project_name: Option<String>,
}

impl Default for ProjectFingerprint {
    fn default() -> Self {
        Self {
            marker: PilotPath::ProjectMarker.as_str().to_string(),
            project_name: None,
        }
    }
}

impl ProjectFingerprint {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            project_name: None,
        }
    }

    /// Additionally require the marker's `name` key to equal `name`.
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    fn expected(&self) -> String {
        self.project_name
            .clone()
            .unwrap_or_else(|| self.marker.clone())
    }
}

#[derive(Debug, Deserialize)]
struct MarkerFile {
    name: Option<String>,
}

/// Locates and validates the project root.
#[derive(Debug, Clone, Default)]
pub struct WorkingAreaResolver {
    fingerprint: ProjectFingerprint,
}

impl WorkingAreaResolver {
    pub fn new(fingerprint: ProjectFingerprint) -> Self {
        Self { fingerprint }
    }

    pub fn fingerprint(&self) -> &ProjectFingerprint {
        &self.fingerprint
    }

    /// Resolve the working area enclosing `start_dir`.
    ///
    /// Returns the canonical root of the git work tree containing
    /// `start_dir` once its fingerprint has been checked.
    pub fn resolve(&self, start_dir: &Path) -> Result<NormalizedPath> {
        let repo = match Repository::discover(start_dir) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(WorkingAreaError::NotFound {
                    start: start_dir.to_path_buf(),
                }
                .into());
            }
            Err(e) => return Err(Error::Git(e)),
        };

        let workdir = repo.workdir().ok_or_else(|| WorkingAreaError::NotFound {
            start: start_dir.to_path_buf(),
        })?;
        let root = dunce::canonicalize(workdir).map_err(|e| pilot_fs::Error::io(workdir, e))?;

        self.check_fingerprint(&root)?;

        let root = NormalizedPath::new(root);
        tracing::debug!(root = %root, "Working area resolved");
        Ok(root)
    }

    fn check_fingerprint(&self, root: &Path) -> Result<()> {
        let mismatch = |reason: String| WorkingAreaError::IdentityMismatch {
            root: root.to_path_buf(),
            expected: self.fingerprint.expected(),
            reason,
        };

        let marker_path = root.join(&self.fingerprint.marker);
        if !marker_path.is_file() {
            return Err(mismatch(format!("marker '{}' not found", self.fingerprint.marker)).into());
        }

        let Some(expected) = self.fingerprint.project_name() else {
            return Ok(());
        };

        let content = std::fs::read_to_string(&marker_path)
            .map_err(|e| pilot_fs::Error::io(&marker_path, e))?;
        let marker: MarkerFile = toml::from_str(&content)
            .map_err(|e| mismatch(format!("marker is not valid TOML: {e}")))?;

        match marker.name.as_deref() {
            Some(name) if name == expected => Ok(()),
            Some(name) => Err(mismatch(format!("marker names project '{name}'")).into()),
            None => Err(mismatch("marker has no 'name' key".to_string()).into()),
        }
    }
}
