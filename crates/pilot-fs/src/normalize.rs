//! Conversion between absolute and working-area relative path values
//!
//! Path options are stored relative to the working area so snapshots stay
//! valid when a project is checked out somewhere else.

use crate::{NormalizedPath, PathError};

/// Anchors path option values to a working area root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNormalizer {
    root: NormalizedPath,
}

impl PathNormalizer {
    /// Create a normalizer for an already resolved working area root.
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    /// The working area root.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Convert a path option value to its working-area relative form.
    ///
    /// Absolute values must lie under the root and exist, unless
    /// `allow_missing` is set for options naming files a run will create.
    /// Relative values must stay inside the root and exist there.
    pub fn to_relative(
        &self,
        option: &str,
        path: &str,
        allow_missing: bool,
    ) -> Result<String, PathError> {
        let candidate = NormalizedPath::new(path);

        if candidate.is_absolute() {
            let relative =
                candidate
                    .strip_prefix(&self.root)
                    .ok_or_else(|| PathError::NotUnderWorkingArea {
                        option: option.to_string(),
                        path: path.to_string(),
                        working_area: self.root.to_string(),
                    })?;
            if !allow_missing && !candidate.exists() {
                return Err(PathError::PathDoesNotExist {
                    option: option.to_string(),
                    path: path.to_string(),
                });
            }
            return Ok(relative.as_str().to_string());
        }

        if candidate.escapes_root() {
            return Err(PathError::NotUnderWorkingArea {
                option: option.to_string(),
                path: path.to_string(),
                working_area: self.root.to_string(),
            });
        }
        if !self.root.join(candidate.as_str()).exists() {
            return Err(PathError::PathDoesNotExist {
                option: option.to_string(),
                path: path.to_string(),
            });
        }
        Ok(candidate.as_str().to_string())
    }

    /// Join a path onto the working area root unless it is already absolute.
    pub fn to_absolute(&self, path: impl AsRef<std::path::Path>) -> NormalizedPath {
        self.root.join(path)
    }

    /// [`PathNormalizer::to_absolute`] over many paths.
    pub fn to_absolute_all<I, P>(&self, paths: I) -> Vec<NormalizedPath>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<std::path::Path>,
    {
        paths.into_iter().map(|p| self.to_absolute(p)).collect()
    }
}
