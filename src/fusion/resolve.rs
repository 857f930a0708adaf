use crate::core::confidence::effective_weights;
use crate::core::model::{EnsembleWeights, ProbabilityVector};
use crate::fusion::align::AlignmentResult;

/// Output of blending one aligned pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Blend {
    pub weights: EnsembleWeights,
    pub final_proba: ProbabilityVector,
    pub class_idx: usize,
    pub confidence: f64,
}

/// `final[i] = w * text[i] + (1 - w) * image[i]`, then the stable argmax.
///
/// `nominal_text_weight` is the step-rule weight; it is overridden when one
/// side is all-zero (see [`effective_weights`]). Returns `None` for an empty
/// class space.
pub fn blend(aligned: &AlignmentResult, nominal_text_weight: f64) -> Option<Blend> {
    let weights = effective_weights(nominal_text_weight, &aligned.text, &aligned.image);
    let final_proba: ProbabilityVector = aligned
        .text
        .iter()
        .zip(&aligned.image)
        .map(|(t, i)| weights.text * t + weights.image * i)
        .collect();

    let class_idx = argmax(&final_proba)?;
    let confidence = final_proba[class_idx];
    Some(Blend {
        weights,
        final_proba,
        class_idx,
        confidence,
    })
}

/// Index of the largest value; ties go to the lowest index.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.iter().copied().enumerate() {
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::confidence::text_weight;
    use crate::fusion::align::align_vectors;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn long_text_favors_text_classifier() {
        let aligned = align_vectors(&[0.1, 0.6, 0.3], &[0.2, 0.2, 0.6]).unwrap();
        let blend = blend(&aligned, text_weight(45)).unwrap();
        assert_eq!(blend.weights.text, 0.7);
        assert_close(&blend.final_proba, &[0.13, 0.48, 0.39]);
        assert_eq!(blend.class_idx, 1);
        assert!((blend.confidence - 0.48).abs() < 1e-9);
    }

    #[test]
    fn short_text_favors_image_classifier() {
        let aligned = align_vectors(&[0.1, 0.6, 0.3], &[0.2, 0.2, 0.6]).unwrap();
        let blend = blend(&aligned, text_weight(3)).unwrap();
        assert_eq!(blend.weights.text, 0.3);
        assert_close(&blend.final_proba, &[0.17, 0.32, 0.51]);
        assert_eq!(blend.class_idx, 2);
        assert!((blend.confidence - 0.51).abs() < 1e-9);
    }

    #[test]
    fn blended_distribution_sums_to_one() {
        let pairs = [
            (vec![0.25, 0.25, 0.5], vec![0.9, 0.05, 0.05]),
            (vec![1.0, 0.0], vec![0.0, 1.0]),
            (vec![0.2; 5], vec![0.1, 0.1, 0.1, 0.1, 0.6]),
        ];
        for (text, image) in pairs {
            let aligned = align_vectors(&text, &image).unwrap();
            for weight in [0.3, 0.7] {
                let total: f64 = blend(&aligned, weight).unwrap().final_proba.iter().sum();
                assert!((total - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn zero_side_defers_to_other_argmax() {
        let aligned = align_vectors(&[0.0, 0.0, 0.0], &[0.1, 0.7, 0.2]).unwrap();
        for weight in [0.3, 0.7] {
            let blend = blend(&aligned, weight).unwrap();
            assert_eq!(blend.class_idx, 1);
            assert!((blend.confidence - 0.7).abs() < 1e-9);
        }
    }

    #[test]
    fn ties_pick_first_index() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some(0));
        assert_eq!(argmax(&[0.1, 0.45, 0.45]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
