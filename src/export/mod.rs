pub mod json_export;
pub mod text_export;

use anyhow::Result;
use std::path::PathBuf;

use crate::core::model::EnsembleResult;

pub use json_export::JsonExporter;
pub use text_export::TextExporter;

pub trait Exporter {
    /// Writes `result` under the name `stem` and returns the written path.
    fn export(&self, stem: &str, result: &EnsembleResult) -> Result<PathBuf>;
}
