use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::core::document::DocumentImage;
use crate::core::error::SignalError;
use crate::ocr::TextExtractor;

/// Runs the `tesseract` command-line engine on an image file.
#[derive(Debug, Clone)]
pub struct TesseractBridge {
    binary: PathBuf,
    lang: String,
}

impl TesseractBridge {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }

    pub fn run(&self, image_path: &Path) -> Result<String, SignalError> {
        let output = match Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SignalError::unavailable(format!(
                    "{} not found; is tesseract-ocr installed?",
                    self.binary.display()
                )));
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context("failed to invoke tesseract")
                    .into())
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!("tesseract failed: {stderr}").into());
        }

        let text = String::from_utf8(output.stdout)
            .with_context(|| format!("tesseract emitted non-UTF8 text for {}", image_path.display()))?;
        debug!(chars = text.len(), image = %image_path.display(), "tesseract finished");
        Ok(text)
    }
}

impl Default for TesseractBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for TesseractBridge {
    fn extract(&self, image: &DocumentImage) -> Result<String, SignalError> {
        self.run(image.path())
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_unavailable() {
        let bridge =
            TesseractBridge::new().with_binary(PathBuf::from("/nonexistent/docensemble-tesseract"));
        let image = DocumentImage::new(PathBuf::from("scan.png"));
        let err = bridge.extract(&image).unwrap_err();
        assert!(err.is_unavailable());
        assert!(!bridge.is_available());
    }
}
