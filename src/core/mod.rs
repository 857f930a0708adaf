pub mod confidence;
pub mod document;
pub mod error;
pub mod model;
pub mod placeholder;
pub mod signals;
