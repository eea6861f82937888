//! Address tagging
//!
//! - `builder`: one address history in, one `AddressRecord` out
//! - `aggregator`: destination frequencies across all processed addresses
//! - `exclusion`: service addresses left out of the folded views

pub mod aggregator;
pub mod builder;
pub mod exclusion;

pub use aggregator::{FrequencyCounter, OutboundAddressAggregator, RankedEntry};
pub use builder::{AddressRecordBuilder, BuildOutcome, OutAddressExtraction};
pub use exclusion::ServiceExclusion;
