//! Slide request and identity derivation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// One input record: a slide identifier plus the URL of its media asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRequest {
    #[serde(rename = "slide")]
    pub slide_id: String,
    #[serde(rename = "url")]
    pub source_url: String,
}

impl SlideRequest {
    /// Derive the canonical slide name from the source URL.
    ///
    /// Prefers the `Slide_NNN` pattern embedded in the URL; falls back to the
    /// filename stem with any query string stripped. Deterministic for a
    /// given URL, so re-runs target the same remote objects.
    pub fn slide_name(&self) -> String {
        extract_slide_name(&self.source_url)
    }

    /// File extension of the source asset, including the leading dot.
    /// Empty when the URL path has no extension.
    pub fn extension(&self) -> String {
        extension_from_url(&self.source_url)
    }

    /// Media kind of the source asset, judged by its extension.
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_extension(&self.extension())
    }
}

fn slide_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(Slide_\d+)\.(jpg|jpeg|png|mp4)").expect("slide name pattern is valid")
    })
}

/// Extract the canonical slide name from a URL.
pub fn extract_slide_name(url: &str) -> String {
    if let Some(captures) = slide_name_pattern().captures(url) {
        return captures[1].to_string();
    }
    let filename = url
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .split('?')
        .next()
        .unwrap_or_default();
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extract the file extension (with leading dot) from a URL, ignoring any
/// query string.
pub fn extension_from_url(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Broad media category used for compression dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Other,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            ".mp4" => MediaKind::Video,
            ".jpg" | ".jpeg" | ".png" => MediaKind::Image,
            _ => MediaKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
            MediaKind::Other => "other",
        }
    }
}
