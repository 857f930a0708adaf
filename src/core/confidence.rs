use crate::core::model::EnsembleWeights;

/// Extracted text strictly longer than this is trusted.
pub const TEXT_LENGTH_THRESHOLD: usize = 10;
pub const TRUSTED_TEXT_WEIGHT: f64 = 0.7;
pub const WEAK_TEXT_WEIGHT: f64 = 0.3;

/// Step rule: 0.7 above the threshold, 0.3 at or below it. Nothing in between.
pub fn text_weight(text_length: usize) -> f64 {
    if text_length > TEXT_LENGTH_THRESHOLD {
        TRUSTED_TEXT_WEIGHT
    } else {
        WEAK_TEXT_WEIGHT
    }
}

/// Weights actually applied to a pair of aligned vectors.
///
/// An all-zero side carries no information, so its weight is handed over to
/// the other side. When both or neither side is zero the nominal weight holds.
pub fn effective_weights(nominal_text: f64, text: &[f64], image: &[f64]) -> EnsembleWeights {
    match (is_zero(text), is_zero(image)) {
        (true, false) => EnsembleWeights::from_text_weight(0.0),
        (false, true) => EnsembleWeights::from_text_weight(1.0),
        _ => EnsembleWeights::from_text_weight(nominal_text),
    }
}

pub fn is_zero(values: &[f64]) -> bool {
    values.iter().all(|v| *v == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_steps_between_ten_and_eleven() {
        for len in 0..=10 {
            assert_eq!(text_weight(len), WEAK_TEXT_WEIGHT, "length {len}");
        }
        for len in [11, 12, 45, 10_000] {
            assert_eq!(text_weight(len), TRUSTED_TEXT_WEIGHT, "length {len}");
        }
    }

    #[test]
    fn zero_text_hands_weight_to_image() {
        let weights = effective_weights(0.7, &[0.0, 0.0], &[0.4, 0.6]);
        assert_eq!(weights.text, 0.0);
        assert_eq!(weights.image, 1.0);
    }

    #[test]
    fn zero_image_hands_weight_to_text() {
        let weights = effective_weights(0.3, &[0.4, 0.6], &[0.0, 0.0]);
        assert_eq!(weights.text, 1.0);
        assert_eq!(weights.image, 0.0);
    }

    #[test]
    fn nominal_weight_kept_when_both_present() {
        let weights = effective_weights(0.3, &[0.5, 0.5], &[0.2, 0.8]);
        assert_eq!(weights.text, 0.3);
        assert!((weights.image - 0.7).abs() < 1e-12);
    }
}
