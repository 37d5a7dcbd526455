//! Per-frame lane matchup features

use serde::{Deserialize, Serialize};

use super::lane_pair::LanePair;
use super::window::in_window;
use crate::data::riot::{Frame, ParticipantFrame, Timeline};
use crate::{LaneError, Result};

/// One lane-phase frame seen from the reference player's side.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub match_id: String,
    pub time_s: f64,

    pub cs_self: i64,
    pub cs_enemy: i64,
    pub cs_diff: i64,

    pub xp_self: i64,
    pub xp_enemy: i64,
    pub xp_diff: i64,

    pub self_x: f64,
    pub self_y: f64,
    pub enemy_x: f64,
    pub enemy_y: f64,
    /// Distance between the two laners
    pub champ_distance: f64,
    /// Reference player's distance from their spawn corner
    pub self_base_distance: f64,

    /// CS differential at the last lane-phase frame, repeated on every row
    pub cs_diff_final: i64,
    /// 1 if `cs_diff_final > 0`
    pub is_ahead_final: u8,
}

impl Snapshot {
    pub const HEADER: [&'static str; 16] = [
        "match_id",
        "time_s",
        "cs_self",
        "cs_enemy",
        "cs_diff",
        "xp_self",
        "xp_enemy",
        "xp_diff",
        "self_x",
        "self_y",
        "enemy_x",
        "enemy_y",
        "champ_distance",
        "self_base_distance",
        "cs_diff_final",
        "is_ahead_final",
    ];
}

/// Lane outcome at the end of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneOutcome {
    pub cs_diff_final: i64,
    pub is_ahead_final: u8,
}

impl LaneOutcome {
    pub fn from_final_frame(frame: &Frame, pair: &LanePair) -> Result<Self> {
        let (me, enemy) = pair_frames(frame, pair).ok_or_else(|| {
            LaneError::LookupFailure(format!(
                "participants {} / {} missing from final lane frame at {}ms",
                pair.self_id, pair.opponent_id, frame.timestamp
            ))
        })?;

        let cs_diff_final = me.cs() - enemy.cs();
        Ok(LaneOutcome {
            cs_diff_final,
            // ties count as not ahead
            is_ahead_final: u8::from(cs_diff_final > 0),
        })
    }
}

fn pair_frames<'a>(
    frame: &'a Frame,
    pair: &LanePair,
) -> Option<(&'a ParticipantFrame, &'a ParticipantFrame)> {
    Some((
        frame.participant(pair.self_id)?,
        frame.participant(pair.opponent_id)?,
    ))
}

/// Build one snapshot per lane-phase frame that has both players' positions.
///
/// Frames without position telemetry are skipped; a window with no frames at
/// all is `DataIncomplete`.
pub fn build_snapshots(
    match_id: &str,
    timeline: &Timeline,
    pair: &LanePair,
    cutoff_s: f64,
) -> Result<Vec<Snapshot>> {
    let frames = &timeline.info.frames;
    if frames.is_empty() {
        return Err(LaneError::DataIncomplete(format!(
            "no frames in timeline for {}",
            match_id
        )));
    }

    let window = in_window(frames, cutoff_s);
    let Some(final_frame) = window.last() else {
        return Err(LaneError::DataIncomplete(format!(
            "no frames within lane phase ({}s) for {}",
            cutoff_s, match_id
        )));
    };

    let outcome = LaneOutcome::from_final_frame(final_frame, pair)?;
    let spawn = pair.side.spawn();

    let mut snapshots = Vec::with_capacity(window.len());
    for frame in window {
        let Some((me, enemy)) = pair_frames(frame, pair) else {
            log::debug!("{}: frame {}ms missing a laner", match_id, frame.timestamp);
            continue;
        };
        let (Some(pos_self), Some(pos_enemy)) = (me.position, enemy.position) else {
            log::debug!("{}: frame {}ms has no positions", match_id, frame.timestamp);
            continue;
        };

        let cs_self = me.cs();
        let cs_enemy = enemy.cs();

        snapshots.push(Snapshot {
            match_id: match_id.to_string(),
            time_s: frame.time_s(),
            cs_self,
            cs_enemy,
            cs_diff: cs_self - cs_enemy,
            xp_self: me.xp,
            xp_enemy: enemy.xp,
            xp_diff: me.xp - enemy.xp,
            self_x: pos_self.x,
            self_y: pos_self.y,
            enemy_x: pos_enemy.x,
            enemy_y: pos_enemy.y,
            champ_distance: pos_self.distance_to(&pos_enemy),
            self_base_distance: pos_self.distance_to(&spawn),
            cs_diff_final: outcome.cs_diff_final,
            is_ahead_final: outcome.is_ahead_final,
        });
    }

    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{frame, pframe, timeline};
    use crate::Side;
    use serde_json::json;

    fn blue_pair() -> LanePair {
        LanePair {
            self_id: 1,
            opponent_id: 6,
            side: Side::Blue,
        }
    }

    fn sample_timeline() -> Timeline {
        timeline(vec![
            frame(0, pframe(0, 0, 0, None), pframe(0, 0, 0, None), vec![]),
            frame(
                60_000,
                pframe(0, 0, 120, Some((3000.0, 4000.0))),
                pframe(0, 0, 100, Some((3000.0, 10000.0))),
                vec![],
            ),
            frame(
                120_000,
                pframe(8, 0, 400, Some((1200.0, 9000.0))),
                pframe(6, 1, 380, Some((1500.0, 9400.0))),
                vec![],
            ),
            frame(
                180_000,
                pframe(15, 2, 700, Some((900.0, 10500.0))),
                pframe(16, 0, 720, Some((1100.0, 11000.0))),
                vec![],
            ),
            frame(
                240_000,
                pframe(22, 2, 1000, Some((800.0, 10800.0))),
                pframe(20, 0, 950, Some((900.0, 11200.0))),
                vec![],
            ),
        ])
    }

    #[test]
    fn test_skips_frames_without_positions() {
        let snaps = build_snapshots("NA1_1", &sample_timeline(), &blue_pair(), 1200.0).unwrap();

        assert_eq!(snaps.len(), 4);
        assert_eq!(snaps[0].time_s, 60.0);
    }

    #[test]
    fn test_feature_values() {
        let snaps = build_snapshots("NA1_1", &sample_timeline(), &blue_pair(), 1200.0).unwrap();

        let first = &snaps[0];
        assert_eq!(first.champ_distance, 6000.0);
        assert_eq!(first.self_base_distance, 5000.0);
        assert_eq!(first.xp_diff, 20);

        let second = &snaps[1];
        assert_eq!(second.cs_self, 8);
        assert_eq!(second.cs_enemy, 7);
        assert_eq!(second.cs_diff, 1);
        assert_eq!(second.enemy_y, 9400.0);
    }

    #[test]
    fn test_red_side_spawn_distance() {
        let pair = LanePair {
            side: Side::Red,
            ..blue_pair()
        };
        let tl = timeline(vec![frame(
            60_000,
            pframe(0, 0, 0, Some((13000.0, 12000.0))),
            pframe(0, 0, 0, Some((13000.0, 12000.0))),
            vec![],
        )]);

        let snaps = build_snapshots("NA1_1", &tl, &pair, 1200.0).unwrap();
        assert_eq!(snaps[0].self_base_distance, 5000.0);
        assert_eq!(snaps[0].champ_distance, 0.0);
    }

    #[test]
    fn test_outcome_from_last_window_frame() {
        // cutoff at 180s: final frame is 15+2 vs 16+0 -> +1, ahead
        let snaps = build_snapshots("NA1_1", &sample_timeline(), &blue_pair(), 180.0).unwrap();

        assert_eq!(snaps.len(), 3);
        assert!(snaps.iter().all(|s| s.cs_diff_final == 1));
        assert!(snaps.iter().all(|s| s.is_ahead_final == 1));
        assert!(snaps.iter().all(|s| s.time_s <= 180.0));
        assert!(snaps.windows(2).all(|w| w[0].time_s <= w[1].time_s));
    }

    #[test]
    fn test_tie_is_not_ahead() {
        let tl = timeline(vec![frame(
            60_000,
            pframe(10, 0, 0, Some((1.0, 1.0))),
            pframe(9, 1, 0, Some((2.0, 2.0))),
            vec![],
        )]);

        let snaps = build_snapshots("NA1_1", &tl, &blue_pair(), 1200.0).unwrap();
        assert_eq!(snaps[0].cs_diff_final, 0);
        assert_eq!(snaps[0].is_ahead_final, 0);
    }

    #[test]
    fn test_empty_timeline_and_empty_window() {
        let empty = timeline(vec![]);
        assert!(matches!(
            build_snapshots("NA1_1", &empty, &blue_pair(), 1200.0),
            Err(LaneError::DataIncomplete(_))
        ));

        let late = timeline(vec![frame(
            90_000,
            pframe(0, 0, 0, None),
            pframe(0, 0, 0, None),
            vec![],
        )]);
        assert!(matches!(
            build_snapshots("NA1_1", &late, &blue_pair(), 30.0),
            Err(LaneError::DataIncomplete(_))
        ));
    }

    #[test]
    fn test_missing_laner_in_final_frame() {
        let tl = timeline(vec![json!({
            "timestamp": 60_000,
            "participantFrames": { "1": pframe(0, 0, 0, Some((1.0, 1.0))) },
        })]);

        let err = build_snapshots("NA1_1", &tl, &blue_pair(), 1200.0).unwrap_err();
        assert!(matches!(err, LaneError::LookupFailure(_)));
    }
}
