use crate::core::error::EnsembleError;
use crate::core::model::{LabelSpace, ProbabilityVector};

/// Two probability vectors brought onto a common class space.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub text: ProbabilityVector,
    pub image: ProbabilityVector,
    /// Length of the text vector before reconciliation.
    pub text_classes: usize,
    /// Length of the image vector before reconciliation.
    pub image_classes: usize,
}

impl AlignmentResult {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Reconciles the two vectors by position.
///
/// The common size is `min(a, b)`; a side with no entries is replaced by a
/// zero vector of the other side's length. Labels are never consulted, so
/// position `i` is only assumed to mean the same class in both spaces. Each
/// side is re-normalized to sum to 1, an all-zero side stays all-zero.
pub fn align_vectors(text: &[f64], image: &[f64]) -> Result<AlignmentResult, EnsembleError> {
    validate(text, "text")?;
    validate(image, "image")?;

    let n = match (text.len(), image.len()) {
        (0, b) => b,
        (a, 0) => a,
        (a, b) => a.min(b),
    };

    Ok(AlignmentResult {
        text: normalize(fit(text, n)),
        image: normalize(fit(image, n)),
        text_classes: text.len(),
        image_classes: image.len(),
    })
}

/// Display labels for an `n`-class reconciled space.
pub fn align_labels(labels: &LabelSpace, n: usize) -> LabelSpace {
    labels.truncated(n)
}

/// Divides by the sum; a zero sum leaves the vector untouched.
pub fn normalize(mut values: ProbabilityVector) -> ProbabilityVector {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        for value in &mut values {
            *value /= sum;
        }
    }
    values
}

fn fit(values: &[f64], n: usize) -> ProbabilityVector {
    let mut out: ProbabilityVector = values.iter().copied().take(n).collect();
    out.resize(n, 0.0);
    out
}

fn validate(values: &[f64], signal: &'static str) -> Result<(), EnsembleError> {
    for (idx, value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(EnsembleError::malformed(
                signal,
                format!("entry {idx} is not a finite number ({value})"),
            ));
        }
        if *value < 0.0 {
            return Err(EnsembleError::malformed(
                signal,
                format!("entry {idx} is negative ({value})"),
            ));
        }
    }
    let sum: f64 = values.iter().sum();
    if !sum.is_finite() {
        return Err(EnsembleError::malformed(
            signal,
            format!("entries sum to {sum}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn equal_lengths_are_left_alone() {
        let text = [0.1, 0.6, 0.3];
        let image = [0.2, 0.2, 0.6];
        let aligned = align_vectors(&text, &image).unwrap();
        assert_close(&aligned.text, &text);
        assert_close(&aligned.image, &image);
    }

    #[test]
    fn longer_text_space_is_truncated_and_renormalized() {
        let text = [0.1, 0.2, 0.2, 0.3, 0.2];
        let image = [0.5, 0.3, 0.2];
        let aligned = align_vectors(&text, &image).unwrap();
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.text_classes, 5);
        assert_eq!(aligned.image_classes, 3);
        assert_close(&aligned.text, &[0.2, 0.4, 0.4]);
    }

    #[test]
    fn missing_side_becomes_zero_vector() {
        let aligned = align_vectors(&[], &[0.25, 0.25, 0.5]).unwrap();
        assert_eq!(aligned.len(), 3);
        assert_eq!(aligned.text, vec![0.0, 0.0, 0.0]);
        assert_close(&aligned.image, &[0.25, 0.25, 0.5]);
    }

    #[test]
    fn zero_vector_is_not_divided() {
        let aligned = align_vectors(&[0.0, 0.0], &[1.0, 3.0]).unwrap();
        assert_eq!(aligned.text, vec![0.0, 0.0]);
        assert_close(&aligned.image, &[0.25, 0.75]);
    }

    #[test]
    fn rejects_nan_and_negative_entries() {
        let err = align_vectors(&[0.5, f64::NAN], &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, EnsembleError::MalformedInput { signal: "text", .. }));

        let err = align_vectors(&[0.5, 0.5], &[1.2, -0.2]).unwrap_err();
        assert!(matches!(err, EnsembleError::MalformedInput { signal: "image", .. }));
    }

    #[test]
    fn rejects_entries_whose_sum_overflows() {
        let err = align_vectors(&[0.5, 0.5], &[1e308, 1e308]).unwrap_err();
        assert!(matches!(err, EnsembleError::MalformedInput { signal: "image", .. }));
    }

    #[test]
    fn large_finite_scores_still_normalize() {
        let aligned = align_vectors(&[1e300, 3e300], &[1.0, 1.0]).unwrap();
        assert_close(&aligned.text, &[0.25, 0.75]);
    }

    #[test]
    fn labels_follow_common_size() {
        let labels: LabelSpace = ["form", "invoice", "list", "note", "sign"].into_iter().collect();
        assert_eq!(align_labels(&labels, 3).len(), 3);
    }
}
