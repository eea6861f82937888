//! Address tagger type system
//!
//! - `history`: raw per-address transaction documents (input side)
//! - `record`: tag store entries (output side)
//! - `statistics`: run counters and timing

mod history;
mod record;
pub mod statistics;

pub use history::*;
pub use record::*;

pub use statistics::{NonceScanStats, StatisticsCollector, TaggingStats};
