//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A lexically cleaned path that uses forward slashes internally.
///
/// Backslashes become forward slashes, empty and `.` components are dropped
/// and `..` is resolved against preceding components. A leading `..` on a
/// relative path is kept so callers can detect paths that climb out of
/// their anchor (see [`NormalizedPath::escapes_root`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner: clean(&raw) }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An absolute segment replaces the base, mirroring [`Path::join`].
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        let segment = NormalizedPath::new(segment);
        if segment.is_absolute() {
            return segment;
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment.inner)),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(0) => None,
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.rsplit('/').next() {
            Some("") | Some(".") | Some("..") | None => None,
            Some(name) => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Whether the path is anchored at a filesystem root.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || has_drive_prefix(&self.inner)
    }

    /// Whether a relative path climbs above its starting directory.
    pub fn escapes_root(&self) -> bool {
        self.inner == ".." || self.inner.starts_with("../")
    }

    /// Whether `base` is this path or one of its ancestors, compared by
    /// whole components.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        self.strip_prefix(base).is_some()
    }

    /// Express this path relative to `base`.
    ///
    /// Returns `None` when `base` is not an ancestor. Stripping a path from
    /// itself yields `.`.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<NormalizedPath> {
        if self.inner == base.inner {
            return Some(Self {
                inner: ".".to_string(),
            });
        }
        let prefix = if base.inner.ends_with('/') {
            base.inner.clone()
        } else {
            format!("{}/", base.inner)
        };
        self.inner.strip_prefix(&prefix).map(|rest| Self {
            inner: rest.to_string(),
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

/// Lexically clean a forward-slash path.
fn clean(raw: &str) -> String {
    let (prefix, rest) = if raw.starts_with("//") && !raw.starts_with("///") {
        ("//", &raw[2..])
    } else if let Some(rest) = raw.strip_prefix('/') {
        ("/", rest)
    } else if has_drive_prefix(raw) {
        (&raw[..3], &raw[3..])
    } else {
        ("", raw)
    };
    let absolute = !prefix.is_empty();

    let mut parts: Vec<&str> = Vec::new();
    for component in rest.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // Nothing sits above a filesystem root.
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("{prefix}{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_top_level_absolute_is_root() {
        let path = NormalizedPath::new("/repo");
        assert_eq!(path.parent().unwrap().as_str(), "/");
        assert!(NormalizedPath::new("/").parent().is_none());
    }

    #[test]
    fn strip_prefix_requires_whole_components() {
        let root = NormalizedPath::new("/repo");
        assert!(NormalizedPath::new("/repository/x").strip_prefix(&root).is_none());
        assert_eq!(
            NormalizedPath::new("/repo/data/x")
                .strip_prefix(&root)
                .unwrap()
                .as_str(),
            "data/x"
        );
    }

    #[test]
    fn join_with_absolute_segment_replaces_base() {
        let base = NormalizedPath::new("/repo");
        assert_eq!(base.join("/other/x").as_str(), "/other/x");
    }
}
