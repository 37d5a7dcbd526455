//! Lane-phase behavior dataset builder
//!
//! Turns League of Legends match and timeline payloads into per-frame
//! lane-matchup snapshots and labels each snapshot as aggressive, safe or neutral.

pub mod data;
pub mod features;
pub mod pipeline;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::riot::{Participant, Position};

/// Team id the API uses for the blue side
pub const BLUE_TEAM_ID: u32 = 100;

/// Opposite map corner, home of the red side on Summoner's Rift
pub const RED_SPAWN: Position = Position {
    x: 16000.0,
    y: 16000.0,
};

/// Home corner of the blue side
pub const BLUE_SPAWN: Position = Position { x: 0.0, y: 0.0 };

/// Which half of the map a team starts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn from_team_id(team_id: u32) -> Self {
        if team_id == BLUE_TEAM_ID {
            Side::Blue
        } else {
            Side::Red
        }
    }

    /// Spawn corner for this side
    pub fn spawn(&self) -> Position {
        match self {
            Side::Blue => BLUE_SPAWN,
            Side::Red => RED_SPAWN,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => write!(f, "BLUE"),
            Side::Red => write!(f, "RED"),
        }
    }
}

/// Lane a destroyed structure belonged to, as reported in timeline events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureLane {
    Top,
    Mid,
    Bot,
}

impl StructureLane {
    pub fn event_code(&self) -> &'static str {
        match self {
            StructureLane::Top => "TOP_LANE",
            StructureLane::Mid => "MID_LANE",
            StructureLane::Bot => "BOT_LANE",
        }
    }
}

/// Role a player filled in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Carry,
    Support,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Middle => "MIDDLE",
            Role::Carry => "CARRY",
            Role::Support => "SUPPORT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "TOP" => Some(Role::Top),
            "JUNGLE" => Some(Role::Jungle),
            "MIDDLE" | "MID" => Some(Role::Middle),
            "CARRY" | "ADC" => Some(Role::Carry),
            "SUPPORT" | "UTILITY" => Some(Role::Support),
            _ => None,
        }
    }

    /// Lane whose outer turret closes the lane phase (none for jungle)
    pub fn structure_lane(&self) -> Option<StructureLane> {
        match self {
            Role::Top => Some(StructureLane::Top),
            Role::Middle => Some(StructureLane::Mid),
            Role::Carry | Role::Support => Some(StructureLane::Bot),
            Role::Jungle => None,
        }
    }

    /// Check whether a participant played this role.
    ///
    /// Bottom lane players are told apart by the secondary `role` field.
    pub fn matches(&self, participant: &Participant) -> bool {
        let position = participant.resolved_position();
        match self {
            Role::Top => position == Some("TOP"),
            Role::Jungle => position == Some("JUNGLE"),
            Role::Middle => position == Some("MIDDLE"),
            Role::Carry => {
                position == Some("BOTTOM") && participant.role.as_deref() == Some("DUO_CARRY")
            }
            Role::Support => {
                position == Some("BOTTOM") && participant.role.as_deref() == Some("DUO_SUPPORT")
            }
        }
    }

    /// Lower-case name used in artifact file names
    pub fn file_stem(&self) -> String {
        self.code().to_lowercase()
    }
}

/// Accepts any code `Role::from_code` knows, so `role = "mid"` works in config
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Role::from_code(&code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role `{}`", code)))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Behavior label attached to a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BehaviorLabel {
    Aggressive,
    Safe,
    Neutral,
}

impl fmt::Display for BehaviorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorLabel::Aggressive => write!(f, "AGGRESSIVE"),
            BehaviorLabel::Safe => write!(f, "SAFE"),
            BehaviorLabel::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum LaneError {
    #[error("Missing input {}: {hint}", path.display())]
    MissingInput { path: PathBuf, hint: String },

    #[error("Lookup failed: {0}")]
    LookupFailure(String),

    #[error("Incomplete data: {0}")]
    DataIncomplete(String),

    #[error("Riot API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LaneError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub player: PlayerConfig,
    pub data: DataConfig,
    pub filter: FilterConfig,
    pub lane_phase: LanePhaseConfig,
    pub labeling: LabelingConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// File holding the reference player's puuid on a single line
    pub puuid_file: String,
    /// Riot ID game name, used by `account`
    pub game_name: Option<String>,
    /// Riot ID tag line, used by `account`
    pub tag_line: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub map_id: u32,
    pub game_mode: String,
    pub queues: Vec<u32>,
    /// Games shorter than this are treated as remakes
    pub min_duration_s: u64,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanePhaseConfig {
    /// Lane phase ceiling when the outer turret survives
    pub max_time_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelingConfig {
    /// Minimum change in distance from spawn between two frames
    pub move_threshold: f64,
    /// Players must be closer than this to count as laning against each other
    pub max_champ_distance: f64,
    /// Player must be further than this from spawn
    pub min_base_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub platform_region: String,
    pub routing_region: String,
    /// Number of match ids requested per download
    pub match_count: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            map_id: 11,
            game_mode: "CLASSIC".to_string(),
            // Normal Draft, Ranked Solo/Duo, Normal Blind, Ranked Flex
            queues: vec![400, 420, 430, 440],
            min_duration_s: 300,
            role: Role::Top,
        }
    }
}

impl Default for LanePhaseConfig {
    fn default() -> Self {
        LanePhaseConfig {
            max_time_s: 20.0 * 60.0,
        }
    }
}

impl Default for LabelingConfig {
    fn default() -> Self {
        LabelingConfig {
            move_threshold: 1000.0,
            max_champ_distance: 6000.0,
            min_base_distance: 5000.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            player: PlayerConfig {
                puuid_file: "puuid.txt".to_string(),
                game_name: None,
                tag_line: None,
            },
            data: DataConfig {
                data_dir: "data".to_string(),
            },
            filter: FilterConfig::default(),
            lane_phase: LanePhaseConfig::default(),
            labeling: LabelingConfig::default(),
            api: ApiConfig {
                platform_region: "na1".to_string(),
                routing_region: "americas".to_string(),
                match_count: 30,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LaneError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| LaneError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LaneError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
