pub mod base;
pub mod tagging;

pub use base::*;
pub use tagging::{TaggingEngine, TaggingOutcome};
