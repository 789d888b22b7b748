use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tracing::{debug, warn};

use crate::constants::*;

/// Logical image identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetId {
    /// A named asset such as the brand logo, looked up as `{name}.{ext}`.
    Named(String),
    /// A 1-based slide position, looked up as `{index}.{ext}`.
    Slide(usize),
}

impl AssetId {
    pub fn logo() -> Self {
        AssetId::Named(LOGO_NAME.to_string())
    }

    fn base_name(&self) -> String {
        match self {
            AssetId::Named(name) => name.clone(),
            AssetId::Slide(index) => index.to_string(),
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Named(name) => write!(f, "{name}"),
            AssetId::Slide(index) => write!(f, "slide {index}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    LocalFile,
    Fallback,
}

/// Result of one resolution attempt.
///
/// For `LocalFile` the payload is the base64 encoded file; for `Fallback` it
/// is the placeholder URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub media_type: String,
    pub payload: String,
    pub source: SourceKind,
}

impl ResolvedAsset {
    pub fn fallback(url: &str) -> Self {
        Self {
            media_type: "png".to_string(),
            payload: url.to_string(),
            source: SourceKind::Fallback,
        }
    }

    /// Value for an `<img src>` attribute.
    pub fn src(&self) -> String {
        match self.source {
            SourceKind::LocalFile => format!("data:{};base64,{}", self.mime_type(), self.payload),
            SourceKind::Fallback => self.payload.clone(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self.media_type.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            _ => "image/png",
        }
    }
}

pub trait ResolveAsset {
    fn resolve(&self, id: &AssetId) -> ResolvedAsset;
}

/// Looks assets up in a single directory.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    base_dir: PathBuf,
    logo_fallback: String,
    slide_fallback: String,
}

impl DirectoryResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            logo_fallback: LOGO_FALLBACK_URL.to_string(),
            slide_fallback: SLIDE_FALLBACK_URL.to_string(),
        }
    }

    pub fn with_fallbacks(mut self, logo: impl Into<String>, slide: impl Into<String>) -> Self {
        self.logo_fallback = logo.into();
        self.slide_fallback = slide.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn fallback_for(&self, id: &AssetId) -> ResolvedAsset {
        match id {
            AssetId::Named(_) => ResolvedAsset::fallback(&self.logo_fallback),
            AssetId::Slide(_) => ResolvedAsset::fallback(&self.slide_fallback),
        }
    }
}

impl ResolveAsset for DirectoryResolver {
    fn resolve(&self, id: &AssetId) -> ResolvedAsset {
        let base = id.base_name();
        for ext in IMAGE_EXTENSIONS {
            let path = self.base_dir.join(format!("{base}{ext}"));
            if !path.exists() {
                continue;
            }
            match fs::read(&path) {
                Ok(bytes) => {
                    debug!(asset = %id, path = %path.display(), bytes = bytes.len(), "resolved local image");
                    return ResolvedAsset {
                        media_type: ext.trim_start_matches('.').to_lowercase(),
                        payload: BASE64_STANDARD.encode(&bytes),
                        source: SourceKind::LocalFile,
                    };
                }
                Err(e) => {
                    // Unreadable candidates count as missing.
                    warn!(asset = %id, path = %path.display(), error = %e, "failed to read image");
                }
            }
        }
        debug!(asset = %id, "no local image, using placeholder");
        self.fallback_for(id)
    }
}
