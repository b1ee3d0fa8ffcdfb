//! Configuration artifact model
//!
//! Represents a single configuration file discovered in a project scan,
//! classified against the current scheme.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Classification of a configuration artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Old-scheme artifact with a defined conversion path
    Legacy,
    /// Already in the current scheme
    Current,
    /// User-authored artifact the scheme knows about but does not own
    Custom,
    /// Unrecognized or ambiguous content
    Unknown,
}

impl ArtifactKind {
    /// Parse artifact kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "current" => Some(Self::Current),
            "custom" => Some(Self::Custom),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Current => write!(f, "current"),
            Self::Custom => write!(f, "custom"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// SHA-256 content hash, stored as lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash a byte slice
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// Construct from an already-hex-encoded digest
    pub fn from_hex(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }

    /// The full hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated digest for display
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A configuration file found during a project scan
///
/// Immutable once computed; a fresh scan produces fresh artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigArtifact {
    /// Path relative to the project root, normalized
    pub path: PathBuf,

    /// Classification against the current scheme
    pub kind: ArtifactKind,

    /// SHA-256 of the file content at scan time
    pub content_hash: ContentHash,

    /// File size at scan time
    pub size_bytes: u64,
}

impl ConfigArtifact {
    /// Create an artifact record from a scanned file's content
    pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind, content: &[u8]) -> Self {
        Self {
            path: path.into(),
            kind,
            content_hash: ContentHash::compute(content),
            size_bytes: content.len() as u64,
        }
    }
}

impl fmt::Display for ConfigArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(ArtifactKind::parse("legacy"), Some(ArtifactKind::Legacy));
        assert_eq!(ArtifactKind::parse("CURRENT"), Some(ArtifactKind::Current));
        assert_eq!(ArtifactKind::parse("bogus"), None);
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = ContentHash::compute(b"hello");
        let b = ContentHash::compute(b"hello");
        let c = ContentHash::compute(b"world");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn test_known_digest() {
        // sha256 of the empty string
        let empty = ContentHash::compute(b"");
        assert_eq!(
            empty.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_artifact_new() {
        let artifact = ConfigArtifact::new(".claude.json", ArtifactKind::Legacy, b"{}");
        assert_eq!(artifact.path, PathBuf::from(".claude.json"));
        assert_eq!(artifact.kind, ArtifactKind::Legacy);
        assert_eq!(artifact.size_bytes, 2);
        assert_eq!(artifact.content_hash, ContentHash::compute(b"{}"));
    }

    #[test]
    fn test_serialization() {
        let artifact = ConfigArtifact::new("CLAUDE.md", ArtifactKind::Current, b"# notes\n");
        let json = serde_json::to_string(&artifact).unwrap();
        assert!(json.contains("\"current\""));
        let back: ConfigArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.path, artifact.path);
        assert_eq!(back.content_hash, artifact.content_hash);
    }
}
