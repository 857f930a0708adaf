use strsim::normalized_levenshtein;

use crate::core::model::LabelSpace;

/// Two label names count as the same class at or above this similarity.
const LABEL_MATCH_THRESHOLD: f64 = 0.8;

/// Positions below `n` where the two label spaces name different classes.
///
/// Reconciliation aligns by position only; this reports where that assumption
/// visibly breaks. Positions missing from either space are not compared.
pub fn label_mismatches(a: &LabelSpace, b: &LabelSpace, n: usize) -> Vec<usize> {
    a.iter()
        .zip(b.iter())
        .take(n)
        .enumerate()
        .filter(|(_, (x, y))| label_similarity(x, y) < LABEL_MATCH_THRESHOLD)
        .map(|(idx, _)| idx)
        .collect()
}

pub fn label_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_spaces_match() {
        let labels: LabelSpace = ["form", "invoice", "list"].into_iter().collect();
        assert!(label_mismatches(&labels, &labels, 3).is_empty());
    }

    #[test]
    fn case_and_spelling_noise_tolerated() {
        let a: LabelSpace = ["Invoice", "forms"].into_iter().collect();
        let b: LabelSpace = ["invoice", "form"].into_iter().collect();
        assert!(label_mismatches(&a, &b, 2).is_empty());
    }

    #[test]
    fn reports_shifted_positions() {
        let a: LabelSpace = ["form", "invoice", "letter", "memo"].into_iter().collect();
        let b: LabelSpace = ["form", "invoice", "list"].into_iter().collect();
        assert_eq!(label_mismatches(&a, &b, 3), vec![2]);
    }
}
