use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classify::{ImageClassifier, ScriptImageClassifier, ScriptTextClassifier, TextClassifier};
use crate::config::EnsembleConfig;
use crate::core::document::DocumentImage;
use crate::core::error::{EnsembleError, SignalError};
use crate::core::model::{ClassScores, EnsembleResult, LabelSpace};
use crate::fusion::finalize::Reporter;
use crate::fusion::{EnsembleSignals, FusionEngine, WeightedFusionEngine};
use crate::ocr::{Extraction, TesseractBridge, TextExtractor};

/// One classification request at a time, no state shared between requests.
///
/// Collaborators are injected once and only read afterwards. A missing
/// collaborator, or one reporting [`SignalError::Unavailable`], is substituted;
/// any other collaborator failure turns the request into a `fallback` result.
pub struct EnsemblePipeline {
    extractor: Option<Box<dyn TextExtractor>>,
    text_classifier: Option<Box<dyn TextClassifier>>,
    image_classifier: Option<Box<dyn ImageClassifier>>,
    engine: WeightedFusionEngine,
}

pub struct PipelineBuilder {
    extractor: Option<Box<dyn TextExtractor>>,
    text_classifier: Option<Box<dyn TextClassifier>>,
    image_classifier: Option<Box<dyn ImageClassifier>>,
    engine: WeightedFusionEngine,
}

impl PipelineBuilder {
    pub fn extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    pub fn text_classifier(mut self, classifier: impl TextClassifier + 'static) -> Self {
        self.text_classifier = Some(Box::new(classifier));
        self
    }

    pub fn image_classifier(mut self, classifier: impl ImageClassifier + 'static) -> Self {
        self.image_classifier = Some(Box::new(classifier));
        self
    }

    pub fn build(self) -> EnsemblePipeline {
        EnsemblePipeline {
            extractor: self.extractor,
            text_classifier: self.text_classifier,
            image_classifier: self.image_classifier,
            engine: self.engine,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Partial,
    Demo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub text_model: bool,
    pub image_model: bool,
    pub ocr: bool,
    pub supported_classes: LabelSpace,
}

impl EnsemblePipeline {
    /// Empty builder; collaborators left unset are treated as unavailable.
    pub fn builder(config: &EnsembleConfig) -> PipelineBuilder {
        let engine = WeightedFusionEngine::new(config.label_space())
            .with_placeholder(config.placeholder)
            .with_reporter(Reporter::new(
                config.display_text_limit,
                config.include_debug,
            ));
        PipelineBuilder {
            extractor: None,
            text_classifier: None,
            image_classifier: None,
            engine,
        }
    }

    /// Tesseract plus the script-backed classifiers whose model and script exist.
    pub fn from_config(config: &EnsembleConfig) -> Self {
        let mut builder = Self::builder(config).extractor(
            TesseractBridge::new()
                .with_binary(config.ocr.binary.clone())
                .with_lang(config.ocr.lang.clone()),
        );

        let text_bridge = config.models.text_bridge();
        match text_bridge.missing() {
            None => builder = builder.text_classifier(ScriptTextClassifier::new(text_bridge)),
            Some(reason) => warn!(%reason, "text model not loaded"),
        }

        let image_bridge = config.models.image_bridge();
        match image_bridge.missing() {
            None => builder = builder.image_classifier(ScriptImageClassifier::new(image_bridge)),
            Some(reason) => warn!(%reason, "image model not loaded"),
        }

        builder.build()
    }

    /// Classifies one image.
    ///
    /// Only malformed classifier output is returned as an error; every other
    /// problem still yields a result with the matching mode.
    pub fn classify(&self, image: &DocumentImage) -> Result<EnsembleResult, EnsembleError> {
        debug!(image = %image.path().display(), "classifying");

        let extraction = match self.extract(image) {
            Ok(extraction) => extraction,
            Err(err) => return Ok(self.fail(&Extraction::unavailable(), err)),
        };
        let text = match self.classify_text(&extraction) {
            Ok(scores) => scores,
            Err(err) => return Ok(self.fail(&extraction, err)),
        };
        let image_scores = match self.classify_image(image) {
            Ok(scores) => scores,
            Err(err) => return Ok(self.fail(&extraction, err)),
        };

        let result = self.engine.fuse(&EnsembleSignals {
            extraction,
            text,
            image: image_scores,
        })?;
        info!(
            mode = result.mode.as_str(),
            prediction = %result.prediction,
            confidence = result.confidence,
            "classified document"
        );
        Ok(result)
    }

    pub fn health(&self) -> HealthReport {
        let text_model = self
            .text_classifier
            .as_ref()
            .is_some_and(|c| c.is_available());
        let image_model = self
            .image_classifier
            .as_ref()
            .is_some_and(|c| c.is_available());
        let ocr = self.extractor.as_ref().is_some_and(|e| e.is_available());

        let status = match (text_model, image_model) {
            (true, true) if ocr => HealthStatus::Healthy,
            (false, false) => HealthStatus::Demo,
            _ => HealthStatus::Partial,
        };
        HealthReport {
            status,
            text_model,
            image_model,
            ocr,
            supported_classes: self.engine.default_labels().clone(),
        }
    }

    fn extract(&self, image: &DocumentImage) -> Result<Extraction, SignalError> {
        let Some(extractor) = &self.extractor else {
            return Ok(Extraction::unavailable());
        };
        match extractor.extract(image) {
            Ok(raw) => Ok(Extraction::from_raw(&raw)),
            Err(SignalError::Unavailable(reason)) => {
                warn!(%reason, "text extraction unavailable");
                Ok(Extraction::unavailable())
            }
            Err(err) => Err(err),
        }
    }

    fn classify_text(&self, extraction: &Extraction) -> Result<Option<ClassScores>, SignalError> {
        let Some(classifier) = &self.text_classifier else {
            return Ok(None);
        };
        if extraction.text.is_empty() {
            return Ok(None);
        }
        substitute_unavailable("text classifier", classifier.classify(&extraction.text))
    }

    fn classify_image(&self, image: &DocumentImage) -> Result<Option<ClassScores>, SignalError> {
        let Some(classifier) = &self.image_classifier else {
            return Ok(None);
        };
        substitute_unavailable("image classifier", classifier.classify(image))
    }

    fn fail(&self, extraction: &Extraction, err: SignalError) -> EnsembleResult {
        let message = format!("{err:#}");
        warn!(error = %message, "classification failed, returning fallback");
        self.engine.fallback(extraction, &message)
    }
}

fn substitute_unavailable(
    what: &str,
    result: Result<ClassScores, SignalError>,
) -> Result<Option<ClassScores>, SignalError> {
    match result {
        Ok(scores) => Ok(Some(scores)),
        Err(SignalError::Unavailable(reason)) => {
            warn!(%reason, "{what} unavailable");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
