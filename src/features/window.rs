//! Lane phase window
//!
//! The lane phase ends when the first outer turret of the tracked lane
//! falls, or at a fixed ceiling if it survives that long.

use crate::data::riot::{Frame, Timeline};
use crate::StructureLane;

pub const BUILDING_KILL: &str = "BUILDING_KILL";
pub const OUTER_TURRET: &str = "OUTER_TURRET";

/// End of the lane phase in seconds, always within `[0, ceiling_s]`.
///
/// Only the first qualifying destruction counts. Frames and their events are
/// chronological, so that is also the earliest one.
pub fn lane_end_time(timeline: &Timeline, lane: Option<StructureLane>, ceiling_s: f64) -> f64 {
    let Some(lane) = lane else {
        return ceiling_s;
    };

    let first_kill = timeline
        .info
        .frames
        .iter()
        .flat_map(|frame| frame.events.iter())
        .find(|event| {
            event.kind == BUILDING_KILL
                && event.lane_type.as_deref() == Some(lane.event_code())
                && event.tower_type.as_deref() == Some(OUTER_TURRET)
        });

    match first_kill {
        Some(event) => (event.timestamp as f64 / 1000.0).min(ceiling_s).max(0.0),
        None => ceiling_s,
    }
}

/// Frames stamped at or before the cutoff
pub fn in_window(frames: &[Frame], cutoff_s: f64) -> &[Frame] {
    let end = frames
        .iter()
        .rposition(|frame| frame.time_s() <= cutoff_s)
        .map_or(0, |i| i + 1);
    &frames[..end]
}
