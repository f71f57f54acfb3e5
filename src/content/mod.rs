//! Content loading
//!
//! Reads the JSON content document from a local file or, with the `remote`
//! feature, from an HTTP(S) URL. One attempt per load: no retries, no
//! timeout, no caching.

mod schema;

pub use schema::RawContent;

use crate::WorkContent;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

/// Resource name used when nothing else is configured
pub const DEFAULT_CONTENT: &str = "content.json";

/// Where the content document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Remote(Url),
}

impl ContentSource {
    /// `http://` and `https://` locations are remote, anything else is a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            if let Ok(url) = Url::parse(location) {
                return ContentSource::Remote(url);
            }
        }
        ContentSource::File(PathBuf::from(location))
    }

    /// Resolve relative file paths against a base directory
    pub fn resolve(self, base: &Path) -> Self {
        match self {
            ContentSource::File(p) if p.is_relative() => ContentSource::File(base.join(p)),
            other => other,
        }
    }

    /// Local file backing this source, if any
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ContentSource::File(p) => Some(p),
            ContentSource::Remote(_) => None,
        }
    }
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::File(p) => write!(f, "{}", p.display()),
            ContentSource::Remote(u) => write!(f, "{}", u),
        }
    }
}

/// Why the content document could not be loaded
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {message}")]
    Request { url: Url, message: String },
    #[error("{url} responded with status {status}")]
    Status { url: Url, status: u16 },
    #[error("invalid content document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("remote content needs the `remote` feature: {0}")]
    RemoteUnavailable(Url),
}

/// Parse a content document in either the canonical or the split-array schema
pub fn parse_content(text: &str) -> Result<WorkContent, ContentError> {
    let raw: RawContent = serde_json::from_str(text)?;
    if raw.is_legacy() {
        debug!("merging split publication/project/contribution arrays");
    }
    Ok(raw.into_content())
}

/// Load the content document, reporting why it failed
pub fn fetch_content(source: &ContentSource) -> Result<WorkContent, ContentError> {
    let text = match source {
        ContentSource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?
        }
        ContentSource::Remote(url) => fetch_remote(url)?,
    };
    let content = parse_content(&text)?;
    debug!(source = %source, items = content.items.len(), "content loaded");
    Ok(content)
}

/// Load the content document; `None` means render nothing.
///
/// The failure is logged, never surfaced to the page.
pub fn load_content(source: &ContentSource) -> Option<WorkContent> {
    match fetch_content(source) {
        Ok(content) => Some(content),
        Err(e) => {
            error!("Error loading content: {}", e);
            None
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &Url) -> Result<String, ContentError> {
    let response = reqwest::blocking::get(url.clone()).map_err(|e| ContentError::Request {
        url: url.clone(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ContentError::Status {
            url: url.clone(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(|e| ContentError::Request {
        url: url.clone(),
        message: e.to_string(),
    })
}

/// Stub implementation when the remote feature is disabled
#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &Url) -> Result<String, ContentError> {
    Err(ContentError::RemoteUnavailable(url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "bio": {"name": "A", "description": "d"},
        "items": [
            {"title": "T1", "url": "https://x", "tags": ["project", "react"]},
            {"title": "T2", "tags": ["paper"]}
        ]
    }"#;

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            ContentSource::parse("https://example.com/content.json"),
            ContentSource::Remote(_)
        ));
        assert_eq!(
            ContentSource::parse("content.json"),
            ContentSource::File(PathBuf::from("content.json"))
        );
    }

    #[test]
    fn test_resolve_relative_only() {
        let base = Path::new("/srv/site");
        assert_eq!(
            ContentSource::parse("content.json").resolve(base),
            ContentSource::File(PathBuf::from("/srv/site/content.json"))
        );
        assert_eq!(
            ContentSource::parse("/abs/content.json").resolve(base),
            ContentSource::File(PathBuf::from("/abs/content.json"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let content = load_content(&ContentSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(content.bio.name, "A");
        assert_eq!(content.items.len(), 2);
        assert_eq!(content.items[0].url.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let source = ContentSource::File(PathBuf::from("/definitely/not/here/content.json"));
        assert!(load_content(&source).is_none());
        assert!(matches!(fetch_content(&source), Err(ContentError::Io { .. })));
    }

    #[test]
    fn test_invalid_json_is_none() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        file.flush().unwrap();

        let source = ContentSource::File(file.path().to_path_buf());
        assert!(load_content(&source).is_none());
        assert!(matches!(fetch_content(&source), Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_missing_bio_is_parse_error() {
        let err = parse_content(r#"{"items": []}"#).unwrap_err();
        assert!(err.to_string().contains("invalid content document"));
    }

    #[cfg(not(feature = "remote"))]
    #[test]
    fn test_remote_without_feature() {
        let source = ContentSource::parse("https://example.com/content.json");
        assert!(matches!(
            fetch_content(&source),
            Err(ContentError::RemoteUnavailable(_))
        ));
    }
}
