pub mod classify;
pub mod config;
pub mod core;
pub mod export;
pub mod fusion;
pub mod ocr;
pub mod pipeline;

pub use config::EnsembleConfig;
pub use core::document::DocumentImage;
pub use core::error::{EnsembleError, SignalError};
pub use core::model::{ClassScores, EnsembleResult, LabelSpace, Mode};
pub use pipeline::EnsemblePipeline;
