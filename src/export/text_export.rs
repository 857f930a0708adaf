use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::EnsembleResult;
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    /// Human-readable report: decision, weights and the per-class breakdown.
    pub fn render(result: &EnsembleResult) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Predicted class: {}", result.prediction);
        let _ = writeln!(out, "Confidence: {:.2}%", result.confidence * 100.0);
        let _ = writeln!(out, "Mode: {}", result.mode.as_str());
        let _ = writeln!(out, "Text length: {} characters", result.text_length);
        let _ = writeln!(
            out,
            "Ensemble weights: text {:.1}%, image {:.1}%",
            result.ensemble_weights.text * 100.0,
            result.ensemble_weights.image * 100.0
        );
        if !result.mode.is_computed() {
            let _ = writeln!(out, "Note: placeholder result, no classifier output was blended");
        }
        if let Some(error) = &result.diagnostics.error {
            let _ = writeln!(out, "Error: {error}");
        }

        if !result.final_proba.is_empty() {
            let _ = writeln!(out, "\nProbabilities:");
            let _ = writeln!(out, "{}", "-".repeat(40));
            for (idx, final_p) in result.final_proba.iter().enumerate() {
                let text_p = result.text_proba.get(idx).copied().unwrap_or(0.0);
                let image_p = result.image_proba.get(idx).copied().unwrap_or(0.0);
                let _ = writeln!(
                    out,
                    "{:<10}: text={:.3}, image={:.3}, final={:.3}",
                    result.labels.name_at(idx),
                    text_p,
                    image_p,
                    final_p
                );
            }
        }

        if !result.extracted_text.is_empty() {
            let _ = writeln!(out, "\nExtracted text:");
            let _ = writeln!(out, "{}", "-".repeat(40));
            let _ = writeln!(out, "{}", result.extracted_text);
        }
        out
    }
}

impl Exporter for TextExporter {
    fn export(&self, stem: &str, result: &EnsembleResult) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{stem}.txt"));
        fs::write(&path, Self::render(result))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{
        Diagnostics, EnsembleWeights, LabelSpace, Mode, TextStatus,
    };

    fn sample() -> EnsembleResult {
        EnsembleResult {
            prediction: "invoice".to_string(),
            confidence: 0.48,
            extracted_text: "Invoice #12345".to_string(),
            text_length: 14,
            ensemble_weights: EnsembleWeights::from_text_weight(0.7),
            mode: Mode::Full,
            labels: ["form", "invoice", "list"].into_iter().collect::<LabelSpace>(),
            text_proba: vec![0.1, 0.6, 0.3],
            image_proba: vec![0.2, 0.2, 0.6],
            final_proba: vec![0.13, 0.48, 0.39],
            diagnostics: Diagnostics {
                text_status: TextStatus::Extracted,
                nominal_text_weight: 0.7,
                label_mismatches: vec![],
                error: None,
            },
            debug_info: None,
        }
    }

    #[test]
    fn renders_per_class_table() {
        let report = TextExporter::render(&sample());
        assert!(report.contains("Predicted class: invoice"));
        assert!(report.contains("Confidence: 48.00%"));
        assert!(report.contains("invoice   : text=0.600, image=0.200, final=0.480"));
        assert!(report.contains("Invoice #12345"));
    }
}
