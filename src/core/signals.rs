use crate::core::model::Mode;

/// Which classifiers produced real, non-substituted output for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalOutcome {
    pub text_real: bool,
    pub image_real: bool,
}

/// Mode for a request that did not hit an unexpected failure.
pub fn select_mode(signals: SignalOutcome) -> Mode {
    match (signals.text_real, signals.image_real) {
        (true, true) => Mode::Full,
        (true, false) | (false, true) => Mode::Partial,
        (false, false) => Mode::Demo,
    }
}
