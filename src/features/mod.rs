//! Feature extraction and labeling
//!
//! Match qualification, lane-pair resolution, lane-phase windowing,
//! per-frame snapshots and behavior labels.

pub mod filter;
pub mod label;
pub mod lane_pair;
pub mod snapshot;
pub mod window;

pub use filter::{CleanMatchEntry, MatchFilter, SkipReason, Verdict};
pub use label::{BehaviorLabeler, LabelCounts, LabeledSnapshot};
pub use lane_pair::LanePair;
pub use snapshot::Snapshot;
