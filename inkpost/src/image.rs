//! Turning opaque image references into URLs on the image CDN.
//!
//! The content store refers to uploaded images by asset id, for example
//! `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`. The CDN serves that image
//! at `<cdn>/images/<project>/<dataset>/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg`.
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Without a project id no image URLs can be built.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_cdn")]
    pub cdn: String,
}

fn default_dataset() -> String {
    "production".to_owned()
}

fn default_cdn() -> String {
    "https://cdn.sanity.io".to_owned()
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            project_id: None,
            dataset: default_dataset(),
            cdn: default_cdn(),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("Image reference does not start with `image-`")]
    MissingPrefix,

    #[error("Image reference is missing its dimensions or format")]
    Incomplete,

    #[error("Could not parse image dimensions")]
    Dimensions,
}

/// A parsed image asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub asset_id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl FromStr for ImageRef {
    type Err = ImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("image-").ok_or(ImageRefError::MissingPrefix)?;

        // the asset id itself may contain dashes, so split from the right
        let mut parts = rest.rsplitn(3, '-');
        let format = parts.next().ok_or(ImageRefError::Incomplete)?;
        let dimensions = parts.next().ok_or(ImageRefError::Incomplete)?;
        let asset_id = parts.next().ok_or(ImageRefError::Incomplete)?;
        if asset_id.is_empty() || format.is_empty() {
            return Err(ImageRefError::Incomplete);
        }

        let (width, height) = dimensions
            .split_once('x')
            .ok_or(ImageRefError::Dimensions)?;
        let width = width.parse().map_err(|_| ImageRefError::Dimensions)?;
        let height = height.parse().map_err(|_| ImageRefError::Dimensions)?;

        Ok(ImageRef {
            asset_id: asset_id.to_owned(),
            width,
            height,
            format: format.to_owned(),
        })
    }
}

impl Display for ImageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image-{}-{}x{}-{}",
            self.asset_id, self.width, self.height, self.format
        )
    }
}

impl ImageRef {
    pub fn url(&self, config: &ImageConfig) -> Option<String> {
        let project_id = config.project_id.as_deref()?;
        Some(format!(
            "{}/images/{}/{}/{}-{}x{}.{}",
            config.cdn.trim_end_matches('/'),
            project_id,
            config.dataset,
            self.asset_id,
            self.width,
            self.height,
            self.format
        ))
    }
}

/// Resolve an optional raw reference to a URL, ignoring references that
/// cannot be parsed.
pub fn url_for(reference: Option<&str>, config: &ImageConfig) -> Option<String> {
    let reference = reference?;
    match reference.parse::<ImageRef>() {
        Ok(image) => image.url(config),
        Err(e) => {
            tracing::debug!(reference, "ignoring image reference: {}", e);
            None
        }
    }
}
