//! TOML configuration for the classification pipeline.
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! labels = ["form", "invoice", "list", "note", "sign"]
//! display_text_limit = 100
//! include_debug = true
//! placeholder = { seeded = 42 }
//!
//! [ocr]
//! binary = "tesseract"
//! lang = "eng"
//!
//! [models]
//! python = "python3"
//! script = "scripts/model_bridge.py"
//! text_model = "ocr_text_model.pkl"
//! image_model = "image_model.h5"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::ModelBridge;
use crate::core::model::LabelSpace;
use crate::core::placeholder::PlaceholderPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Labels used when the text classifier does not name its classes.
    pub labels: Vec<String>,
    /// Characters of extracted text kept in a result.
    pub display_text_limit: usize,
    pub include_debug: bool,
    pub placeholder: PlaceholderPolicy,
    pub ocr: OcrConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub binary: PathBuf,
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub python: PathBuf,
    pub script: PathBuf,
    pub text_model: PathBuf,
    pub image_model: PathBuf,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            labels: ["form", "invoice", "list", "note", "sign"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            display_text_limit: 100,
            include_debug: true,
            placeholder: PlaceholderPolicy::default(),
            ocr: OcrConfig::default(),
            models: ModelConfig::default(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            python: PathBuf::from("python3"),
            script: PathBuf::from("scripts/model_bridge.py"),
            text_model: PathBuf::from("ocr_text_model.pkl"),
            image_model: PathBuf::from("image_model.h5"),
        }
    }
}

impl ModelConfig {
    pub fn text_bridge(&self) -> ModelBridge {
        ModelBridge::new(self.script.clone(), self.text_model.clone())
            .with_python(self.python.clone())
    }

    pub fn image_bridge(&self) -> ModelBridge {
        ModelBridge::new(self.script.clone(), self.image_model.clone())
            .with_python(self.python.clone())
    }
}

impl EnsembleConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EnsembleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn label_space(&self) -> LabelSpace {
        LabelSpace::new(self.labels.clone())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::Validation("labels must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for label in &self.labels {
            if label.trim().is_empty() {
                return Err(ConfigError::Validation("labels must not be blank".into()));
            }
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate label: {label}")));
            }
        }
        if self.display_text_limit == 0 {
            return Err(ConfigError::Validation(
                "display_text_limit must be greater than 0".into(),
            ));
        }
        if self.ocr.lang.trim().is_empty() {
            return Err(ConfigError::Validation("ocr.lang must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = EnsembleConfig::from_toml_str("").unwrap();
        assert_eq!(config.labels.len(), 5);
        assert_eq!(config.display_text_limit, 100);
        assert_eq!(config.placeholder, PlaceholderPolicy::FirstLabel);
        assert_eq!(config.models.text_model, PathBuf::from("ocr_text_model.pkl"));
    }

    #[test]
    fn parses_overrides() {
        let config = EnsembleConfig::from_toml_str(
            r#"
            labels = ["form", "invoice", "letter", "memo", "handwritten", "resume"]
            display_text_limit = 200
            placeholder = { seeded = 42 }

            [ocr]
            lang = "eng+fra"

            [models]
            image_model = "models/cnn.h5"
            "#,
        )
        .unwrap();
        assert_eq!(config.labels.len(), 6);
        assert_eq!(config.display_text_limit, 200);
        assert_eq!(config.placeholder, PlaceholderPolicy::Seeded(42));
        assert_eq!(config.ocr.lang, "eng+fra");
        assert_eq!(config.ocr.binary, PathBuf::from("tesseract"));
        assert_eq!(config.models.image_model, PathBuf::from("models/cnn.h5"));
    }

    #[test]
    fn parses_unit_placeholder() {
        let config = EnsembleConfig::from_toml_str(r#"placeholder = "entropy""#).unwrap();
        assert_eq!(config.placeholder, PlaceholderPolicy::Entropy);
    }

    #[test]
    fn rejects_duplicate_labels() {
        let err = EnsembleConfig::from_toml_str(r#"labels = ["form", "form"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_zero_display_limit() {
        let err = EnsembleConfig::from_toml_str("display_text_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = EnsembleConfig::from_toml_str("labels = [").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
