//! Reference images and their timed rotation.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::{GrayImage, ImageError};

use crate::detect::rgb_to_luma;

/// How long a reference stays active before the next one is loaded.
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(500);

/// Errors from loading reference images.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("No reference images configured")]
    Empty,

    #[error("Reference image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to decode reference image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
}

/// Load an image file as 8-bit luma, weighted like live frames.
pub fn load_reference(path: &Path) -> Result<GrayImage, ReferenceError> {
    match image::open(path) {
        Ok(img) => Ok(rgb_to_luma(&img.to_rgb8())),
        Err(ImageError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ReferenceError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(ReferenceError::Decode {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Ordered reference images with the one currently in use.
#[derive(Debug)]
pub struct ReferenceSet {
    paths: Vec<PathBuf>,
    index: usize,
    image: GrayImage,
    last_update: Instant,
    loads: u64,
}

impl ReferenceSet {
    /// Load the first image of `paths`. The rotation clock starts at `now`.
    pub fn load(paths: Vec<PathBuf>, now: Instant) -> Result<Self, ReferenceError> {
        let first = paths.first().ok_or(ReferenceError::Empty)?;
        let image = load_reference(first)?;
        log::info!("Loaded reference image {}", first.display());
        Ok(Self {
            paths,
            index: 0,
            image,
            last_update: now,
            loads: 1,
        })
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn current_path(&self) -> &Path {
        &self.paths[self.index]
    }

    /// Number of image loads performed so far, including the initial one.
    pub fn loads(&self) -> u64 {
        self.loads
    }

    /// Advance to the next image when more than [`ROTATION_INTERVAL`] has passed
    /// since the last rotation. Reloads from disk even when the index wraps
    /// onto itself. Returns whether a rotation happened.
    ///
    /// On a load error the index has already moved; the old image stays in
    /// place and the timestamp is not reset.
    pub fn rotate_if_due(&mut self, now: Instant) -> Result<bool, ReferenceError> {
        if now.saturating_duration_since(self.last_update) <= ROTATION_INTERVAL {
            return Ok(false);
        }
        self.index = (self.index + 1) % self.paths.len();
        self.image = load_reference(&self.paths[self.index])?;
        self.loads += 1;
        self.last_update = now;
        log::debug!(
            "reference rotated to {} ({}/{})",
            self.current_path().display(),
            self.index + 1,
            self.paths.len()
        );
        Ok(true)
    }
}
