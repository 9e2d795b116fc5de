//! Storage locator parsing
//!
//! A locator is either a bare local path or an `s3://container/key` style
//! object-store reference. Parsing is the only way to construct one, so a
//! `StorageLocator` in hand is always well-formed.

use crate::error::{GenMediaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage backend addressed by a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Local filesystem path
    Local,
    /// Remote object store (bucket + key)
    ObjectStore,
}

/// Parsed reference to an input or output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocator {
    scheme: Scheme,
    container: String,
    key: String,
}

impl StorageLocator {
    /// Parse a locator string with an explicit scheme.
    ///
    /// `s3://bucket/path/to/object` yields an object-store locator and
    /// `file:///some/path` a local one. See [`StorageLocator::from_arg`]
    /// for the CLI-argument form that also accepts bare paths.
    ///
    /// # Errors
    /// - `InvalidLocator` for an empty string, a missing or unrecognized
    ///   scheme, or an object-store locator missing its container or key
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(GenMediaError::invalid_locator("empty locator"));
        }

        if let Some(rest) = raw.strip_prefix("s3://") {
            let (container, key) = match rest.split_once('/') {
                Some((c, k)) => (c, k.trim_start_matches('/')),
                None => (rest, ""),
            };
            if container.is_empty() || key.is_empty() {
                return Err(GenMediaError::invalid_locator(format!(
                    "'{raw}' must have the form s3://container/key"
                )));
            }
            return Ok(Self {
                scheme: Scheme::ObjectStore,
                container: container.to_string(),
                key: key.to_string(),
            });
        }

        if let Some(path) = raw.strip_prefix("file://") {
            if path.is_empty() {
                return Err(GenMediaError::invalid_locator("empty file:// path"));
            }
            return Ok(Self::local(path));
        }

        match raw.split_once("://") {
            Some((scheme, _)) => Err(GenMediaError::invalid_locator(format!(
                "unrecognized scheme '{scheme}' in '{raw}'"
            ))),
            None => Err(GenMediaError::invalid_locator(format!(
                "'{raw}' has no scheme prefix"
            ))),
        }
    }

    /// Resolve a command-line argument: a string with a scheme parses as a
    /// locator, a bare path is taken as local.
    ///
    /// # Errors
    /// - `InvalidLocator` as for [`StorageLocator::parse`]
    pub fn from_arg(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(GenMediaError::invalid_locator("empty locator"));
        }
        if raw.contains("://") {
            Self::parse(raw)
        } else {
            Ok(Self::local(raw))
        }
    }

    /// Build a local-path locator directly
    pub fn local<S: Into<String>>(path: S) -> Self {
        Self {
            scheme: Scheme::Local,
            container: String::new(),
            key: path.into(),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Object-store container (empty for local locators)
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Object key, or the full path for local locators
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_object_store(&self) -> bool {
        self.scheme == Scheme::ObjectStore
    }

    /// Derive a child locator by appending `suffix` to the key. Used to
    /// resolve a job's output artifact under its submission prefix.
    pub fn join(&self, suffix: &str) -> Self {
        let base = self.key.trim_end_matches('/');
        Self {
            scheme: self.scheme,
            container: self.container.clone(),
            key: format!("{}/{}", base, suffix.trim_start_matches('/')),
        }
    }

    /// Final path segment of the key, if any
    pub fn file_name(&self) -> Option<&str> {
        self.key.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scheme {
            Scheme::Local => write!(f, "{}", self.key),
            Scheme::ObjectStore => write!(f, "s3://{}/{}", self.container, self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_store() {
        let loc = StorageLocator::parse("s3://my-bucket/photos/input.jpg").unwrap();
        assert_eq!(loc.scheme(), Scheme::ObjectStore);
        assert_eq!(loc.container(), "my-bucket");
        assert_eq!(loc.key(), "photos/input.jpg");
    }

    #[test]
    fn test_parse_local_paths() {
        let loc = StorageLocator::parse("file:///tmp/a.png").unwrap();
        assert_eq!(loc.scheme(), Scheme::Local);
        assert_eq!(loc.key(), "/tmp/a.png");
    }

    #[test]
    fn test_from_arg_accepts_bare_paths() {
        let loc = StorageLocator::from_arg("output/result.png").unwrap();
        assert_eq!(loc.scheme(), Scheme::Local);
        assert_eq!(loc.key(), "output/result.png");

        let loc = StorageLocator::from_arg("s3://bucket/key").unwrap();
        assert_eq!(loc.scheme(), Scheme::ObjectStore);

        assert!(StorageLocator::from_arg("gs://bucket/key").is_err());
        assert!(StorageLocator::from_arg("").is_err());
    }

    #[test]
    fn test_roundtrip_display() {
        for raw in ["s3://bucket/key", "s3://bucket/a/b/c.png"] {
            let loc = StorageLocator::parse(raw).unwrap();
            assert_eq!(loc.to_string(), raw);
        }
        let loc = StorageLocator::local("/tmp/x.png");
        assert_eq!(loc.to_string(), "/tmp/x.png");
    }

    #[test]
    fn test_invalid_locators() {
        for raw in [
            "",
            "no-scheme.png",
            "s3://",
            "s3://bucket-only",
            "s3://bucket/",
            "s3:///key-without-bucket",
            "ftp://host/file",
            "gs://bucket/key",
        ] {
            let err = StorageLocator::parse(raw).unwrap_err();
            assert!(
                matches!(err, GenMediaError::InvalidLocator(_)),
                "expected InvalidLocator for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_join_normalizes_separators() {
        let prefix = StorageLocator::parse("s3://bucket/videos/").unwrap();
        let child = prefix.join("abc123");
        assert_eq!(child.to_string(), "s3://bucket/videos/abc123");

        let child = StorageLocator::parse("s3://bucket/videos/run")
            .unwrap()
            .join("/output.mp4");
        assert_eq!(child.to_string(), "s3://bucket/videos/run/output.mp4");
    }

    #[test]
    fn test_file_name() {
        let loc = StorageLocator::parse("s3://bucket/a/b/out.mp4").unwrap();
        assert_eq!(loc.file_name(), Some("out.mp4"));
    }
}
