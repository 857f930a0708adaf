//! Synthetic predictions for requests where nothing was computed.
//!
//! `demo` and `fallback` results still need a label. Where it comes from is
//! chosen by a [`PlaceholderPolicy`]: the default always picks the first
//! label so results stay reproducible, `Seeded` draws from a seeded
//! generator, `Entropy` draws from OS randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::model::{ClassLabel, LabelSpace, UNKNOWN_LABEL};

/// Inclusive bounds for the confidence attached to a demo result.
pub const DEMO_CONFIDENCE_MIN: f64 = 0.70;
pub const DEMO_CONFIDENCE_MAX: f64 = 0.95;
/// Demo confidence when the policy does not draw randomly.
pub const DEMO_CONFIDENCE_DEFAULT: f64 = 0.75;
/// Fixed confidence of a fallback result. No computed blend reports exactly this
/// alongside `mode = fallback`.
pub const FALLBACK_CONFIDENCE: f64 = 0.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderPolicy {
    #[default]
    FirstLabel,
    Seeded(u64),
    Entropy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub label: ClassLabel,
    pub confidence: f64,
}

impl PlaceholderPolicy {
    fn rng(&self) -> Option<StdRng> {
        match self {
            PlaceholderPolicy::FirstLabel => None,
            PlaceholderPolicy::Seeded(seed) => Some(StdRng::seed_from_u64(*seed)),
            PlaceholderPolicy::Entropy => Some(StdRng::from_entropy()),
        }
    }

    pub fn demo(&self, labels: &LabelSpace) -> Placeholder {
        match self.rng() {
            Some(mut rng) => Placeholder {
                label: pick_label(labels, &mut rng),
                confidence: rng.gen_range(DEMO_CONFIDENCE_MIN..=DEMO_CONFIDENCE_MAX),
            },
            None => Placeholder {
                label: labels.name_at(0).to_string(),
                confidence: DEMO_CONFIDENCE_DEFAULT,
            },
        }
    }

    pub fn fallback(&self, labels: &LabelSpace) -> Placeholder {
        let label = match self.rng() {
            Some(mut rng) => pick_label(labels, &mut rng),
            None => labels.name_at(0).to_string(),
        };
        Placeholder {
            label,
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}

fn pick_label(labels: &LabelSpace, rng: &mut StdRng) -> ClassLabel {
    if labels.is_empty() {
        return UNKNOWN_LABEL.to_string();
    }
    labels.name_at(rng.gen_range(0..labels.len())).to_string()
}
