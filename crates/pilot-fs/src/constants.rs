//! Well-known paths inside a working area and a run's output area.

use std::path::Path;

/// Standard pilot filesystem markers and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotPath {
    /// The `.pilot` directory holding the project fingerprint
    PilotDir,
    /// The project fingerprint file, relative to the working area root
    ProjectMarker,
    /// Default root for run output areas
    RunsDir,
    /// Snapshot file written into the output area at freeze time
    Snapshot,
    /// Run log written into the output area
    RunLog,
}

impl PilotPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PilotDir => ".pilot",
            Self::ProjectMarker => ".pilot/project.toml",
            Self::RunsDir => "runs",
            Self::Snapshot => "config.yaml",
            Self::RunLog => "pilot.log",
        }
    }
}

impl AsRef<Path> for PilotPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PilotPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PilotPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_lives_inside_pilot_dir() {
        assert!(
            PilotPath::ProjectMarker
                .as_str()
                .starts_with(PilotPath::PilotDir.as_str())
        );
    }

    #[test]
    fn snapshot_is_yaml() {
        assert_eq!(PilotPath::Snapshot.to_string(), "config.yaml");
    }
}
