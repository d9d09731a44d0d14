//! Image assets (logo, background)
//!
//! Images are opaque references (data URIs or object URLs) owned by the
//! customization. Loading is asynchronous and may fail; a missing image never
//! stops the wheel from rendering.

use std::fmt;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::consts::{BACKGROUND_MAX_BYTES, LOGO_MAX_BYTES};
use crate::error::AssetError;

/// Which slot an image is uploaded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Logo,
    Background,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Background => "background",
        }
    }

    /// Upload ceiling in bytes
    pub fn max_bytes(&self) -> u64 {
        match self {
            AssetKind::Logo => LOGO_MAX_BYTES,
            AssetKind::Background => BACKGROUND_MAX_BYTES,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque image reference (data URI or object URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URIs can be megabytes long
        match self.0.char_indices().nth(64) {
            Some((end, _)) => write!(f, "{}...", &self.0[..end]),
            None => f.write_str(&self.0),
        }
    }
}

/// Check an upload against the slot's type and size limits
pub fn validate_upload(kind: AssetKind, mime: &str, size: u64) -> Result<(), AssetError> {
    if !mime.starts_with("image/") {
        return Err(AssetError::UnsupportedType {
            kind,
            mime: mime.to_string(),
        });
    }
    let limit = kind.max_bytes();
    if size > limit {
        return Err(AssetError::TooLarge { kind, size, limit });
    }
    Ok(())
}

/// Natural pixel size of a decoded image
pub trait ImageSize {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn aspect_ratio(&self) -> f32 {
        if self.height() > 0.0 {
            self.width() / self.height()
        } else {
            1.0
        }
    }
}

/// Resolves image references into drawable images
pub trait ImageLoader {
    type Image: ImageSize;

    /// Start loading; the future resolves once the image is decoded
    fn load(&self, src: &ImageRef) -> LocalBoxFuture<'static, Result<Self::Image, AssetError>>;
}
