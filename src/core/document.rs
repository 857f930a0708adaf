use anyhow::{Context, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Formats accepted for classification.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif];

/// Handle to a document image on disk. Pixels are never decoded here; the
/// collaborators read the file themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentImage {
    path: PathBuf,
}

impl DocumentImage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Checks the file exists and has a supported image extension.
    pub fn open(path: PathBuf) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("image file does not exist: {}", path.display());
        }
        let format = ImageFormat::from_path(&path)
            .with_context(|| format!("unrecognized image type: {}", path.display()))?;
        if !SUPPORTED_FORMATS.contains(&format) {
            anyhow::bail!(
                "unsupported image format {:?}: {}",
                format,
                path.display()
            );
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Width and height read from the file header.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        image::image_dimensions(&self.path)
            .with_context(|| format!("failed to read image header: {}", self.path.display()))
    }

    /// File stem used to name exported results.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "result".to_string())
    }
}
