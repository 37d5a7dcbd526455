//! Lane opponent resolution
//!
//! Finds the reference player's participant id, their side, and the
//! opposing player who laned against them.

use crate::data::riot::{MatchRecord, Participant};
use crate::{LaneError, Result, Role, Side};

/// The two players whose lane is being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanePair {
    pub self_id: u32,
    pub opponent_id: u32,
    pub side: Side,
}

/// Resolve the lane pair for `puuid` in a match.
///
/// The opponent is the first enemy whose resolved role is `role`. When role
/// data is missing or garbled, the enemy with the most lane minions stands in.
pub fn resolve(record: &MatchRecord, puuid: &str, role: Role) -> Result<LanePair> {
    let match_id = &record.metadata.match_id;

    let index = record
        .metadata
        .participants
        .iter()
        .position(|p| p == puuid)
        .ok_or_else(|| {
            LaneError::LookupFailure(format!("player not in participants of {}", match_id))
        })?;

    let me = record.info.participants.get(index).ok_or_else(|| {
        LaneError::LookupFailure(format!(
            "no participant record at index {} in {}",
            index, match_id
        ))
    })?;

    let side = Side::from_team_id(me.team_id);
    let enemies: Vec<&Participant> = record
        .info
        .participants
        .iter()
        .filter(|p| p.team_id != me.team_id)
        .collect();

    let opponent = match enemies.iter().find(|p| role.matches(p)) {
        Some(p) => *p,
        None => {
            let fallback = most_minions(&enemies).ok_or_else(|| {
                LaneError::LookupFailure(format!("no opposing players in {}", match_id))
            })?;
            log::debug!(
                "No enemy {} in {}, using participant {} ({} minions)",
                role,
                match_id,
                fallback.participant_id,
                fallback.total_minions_killed
            );
            fallback
        }
    };

    Ok(LanePair {
        self_id: me.participant_id,
        opponent_id: opponent.participant_id,
        side,
    })
}

/// Enemy with the highest lane minion count; the first one wins ties
fn most_minions<'a>(players: &[&'a Participant]) -> Option<&'a Participant> {
    players.iter().copied().fold(None, |best, p| match best {
        Some(b) if b.total_minions_killed >= p.total_minions_killed => Some(b),
        _ => Some(p),
    })
}
