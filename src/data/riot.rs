//! Match and timeline payloads as returned by the Riot match-v5 API
//!
//! Only the fields the pipeline reads are modelled. Required fields fail
//! parsing when absent; summary stats and frame positions are optional.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A full match record (`/lol/match/v5/matches/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    /// Puuids in participant order
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub map_id: u32,
    pub game_mode: String,
    pub queue_id: u32,
    /// Seconds
    pub game_duration: u64,
    /// Epoch milliseconds
    #[serde(default)]
    pub game_creation: i64,
    pub participants: Vec<Participant>,
}

impl MatchInfo {
    /// Find a participant by puuid
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }
}

/// Per-player summary inside a match record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    pub participant_id: u32,
    pub team_id: u32,
    #[serde(default, deserialize_with = "non_empty")]
    pub individual_position: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub team_position: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub role: Option<String>,
    #[serde(default)]
    pub champion_name: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub total_minions_killed: u32,
    #[serde(default)]
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub win: bool,
}

impl Participant {
    /// Position used for role checks: individual first, team as fallback
    pub fn resolved_position(&self) -> Option<&str> {
        self.individual_position
            .as_deref()
            .or(self.team_position.as_deref())
    }

    /// Lane plus jungle minions
    pub fn total_cs(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }
}

/// A match timeline (`/lol/match/v5/matches/{id}/timeline`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub info: TimelineInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineInfo {
    pub frames: Vec<Frame>,
}

/// State of every player at one timestamp, plus the events since the previous frame
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Milliseconds since game start
    pub timestamp: i64,
    /// Keyed by participant id as a string ("1".."10")
    #[serde(default)]
    pub participant_frames: BTreeMap<String, ParticipantFrame>,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Frame {
    pub fn time_s(&self) -> f64 {
        self.timestamp as f64 / 1000.0
    }

    pub fn participant(&self, participant_id: u32) -> Option<&ParticipantFrame> {
        self.participant_frames.get(&participant_id.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFrame {
    pub minions_killed: i64,
    pub jungle_minions_killed: i64,
    pub xp: i64,
    /// Some early frames carry no position telemetry
    #[serde(default)]
    pub position: Option<Position>,
}

impl ParticipantFrame {
    pub fn cs(&self) -> i64 {
        self.minions_killed + self.jungle_minions_killed
    }
}

/// A discrete timeline event; fields not needed by the pipeline are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: i64,
    #[serde(default)]
    pub lane_type: Option<String>,
    #[serde(default)]
    pub tower_type: Option<String>,
}

/// 2-D map coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Treat empty strings the same as a missing field
fn non_empty<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
