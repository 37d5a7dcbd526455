//! Match qualification
//!
//! Decides whether a downloaded match belongs in the dataset and builds the
//! clean index entry for the ones that do.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::riot::{MatchInfo, MatchRecord, Participant};
use crate::{FilterConfig, Role};

/// Why a match was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    WrongMap(u32),
    WrongMode(String),
    WrongQueue(u32),
    Remake { duration_s: u64 },
    PlayerMissing,
    WrongRole {
        expected: Role,
        found: Option<String>,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::WrongMap(id) => write!(f, "not Summoner's Rift (mapId={})", id),
            SkipReason::WrongMode(mode) => write!(f, "game mode {} is not allowed", mode),
            SkipReason::WrongQueue(id) => write!(f, "queue {} is not allowed", id),
            SkipReason::Remake { duration_s } => {
                write!(f, "remake ({}s is under the minimum duration)", duration_s)
            }
            SkipReason::PlayerMissing => write!(f, "player not found in participants"),
            SkipReason::WrongRole { expected, found } => write!(
                f,
                "player did not play {} (position={})",
                expected,
                found.as_deref().unwrap_or("none")
            ),
        }
    }
}

/// Filter decision for one match
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<'a> {
    /// Match qualifies; carries the reference player's participant record
    Keep(&'a Participant),
    Skip(SkipReason),
}

impl Verdict<'_> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Verdict::Keep(_))
    }
}

pub struct MatchFilter {
    config: FilterConfig,
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl MatchFilter {
    pub fn new(config: FilterConfig) -> Self {
        MatchFilter { config }
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    /// Map, mode and queue checks
    pub fn check_game_type(&self, info: &MatchInfo) -> Option<SkipReason> {
        if info.map_id != self.config.map_id {
            return Some(SkipReason::WrongMap(info.map_id));
        }
        if info.game_mode != self.config.game_mode {
            return Some(SkipReason::WrongMode(info.game_mode.clone()));
        }
        if !self.config.queues.contains(&info.queue_id) {
            return Some(SkipReason::WrongQueue(info.queue_id));
        }
        None
    }

    /// Duration-based remake heuristic; there is no explicit remake flag to read
    pub fn is_remake(&self, info: &MatchInfo) -> bool {
        info.game_duration < self.config.min_duration_s
    }

    /// Run every rule in order and report the first one that fails
    pub fn check<'a>(&self, record: &'a MatchRecord, puuid: &str) -> Verdict<'a> {
        let info = &record.info;

        if let Some(reason) = self.check_game_type(info) {
            return Verdict::Skip(reason);
        }

        if self.is_remake(info) {
            return Verdict::Skip(SkipReason::Remake {
                duration_s: info.game_duration,
            });
        }

        let Some(me) = info.participant(puuid) else {
            return Verdict::Skip(SkipReason::PlayerMissing);
        };

        if !self.config.role.matches(me) {
            return Verdict::Skip(SkipReason::WrongRole {
                expected: self.config.role,
                found: me.resolved_position().map(str::to_string),
            });
        }

        Verdict::Keep(me)
    }
}

/// One row of the clean match index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanMatchEntry {
    pub match_id: String,
    /// Epoch milliseconds
    pub game_creation: i64,
    /// Seconds
    pub game_duration: u64,
    pub queue_id: u32,
    pub map_id: u32,
    pub game_mode: String,
    pub champion_name: String,
    #[serde(rename = "teamposition")]
    pub team_position: Option<String>,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub cs: u32,
    pub jungle_minions_killed: u32,
}

impl CleanMatchEntry {
    pub fn from_match(record: &MatchRecord, me: &Participant) -> Self {
        let info = &record.info;
        CleanMatchEntry {
            match_id: record.metadata.match_id.clone(),
            game_creation: info.game_creation,
            game_duration: info.game_duration,
            queue_id: info.queue_id,
            map_id: info.map_id,
            game_mode: info.game_mode.clone(),
            champion_name: me.champion_name.clone(),
            team_position: me
                .team_position
                .clone()
                .or_else(|| me.individual_position.clone()),
            win: me.win,
            kills: me.kills,
            deaths: me.deaths,
            assists: me.assists,
            cs: me.total_cs(),
            jungle_minions_killed: me.neutral_minions_killed,
        }
    }

    pub fn kda(&self) -> String {
        format!("{}/{}/{}", self.kills, self.deaths, self.assists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{self, ME};

    #[test]
    fn test_standard_match_qualifies() {
        let record = fixtures::standard_match("NA1_1");
        let verdict = MatchFilter::default().check(&record, ME);

        match verdict {
            Verdict::Keep(me) => assert_eq!(me.participant_id, 1),
            Verdict::Skip(reason) => panic!("unexpected skip: {}", reason),
        }
    }

    #[test]
    fn test_short_game_is_remake() {
        let mut record = fixtures::standard_match("NA1_1");
        record.info.game_duration = 250;

        let verdict = MatchFilter::default().check(&record, ME);
        assert_eq!(
            verdict,
            Verdict::Skip(SkipReason::Remake { duration_s: 250 })
        );
    }

    #[test]
    fn test_boundary_duration_kept() {
        let mut record = fixtures::standard_match("NA1_1");
        record.info.game_duration = 300;
        assert!(MatchFilter::default().check(&record, ME).is_keep());
    }

    #[test]
    fn test_game_type_rules() {
        let filter = MatchFilter::default();

        let mut aram = fixtures::standard_match("NA1_1");
        aram.info.map_id = 12;
        assert_eq!(filter.check(&aram, ME), Verdict::Skip(SkipReason::WrongMap(12)));

        let mut mode = fixtures::standard_match("NA1_2");
        mode.info.game_mode = "URF".to_string();
        assert!(matches!(
            filter.check(&mode, ME),
            Verdict::Skip(SkipReason::WrongMode(_))
        ));

        let mut queue = fixtures::standard_match("NA1_3");
        queue.info.queue_id = 450;
        assert_eq!(
            filter.check(&queue, ME),
            Verdict::Skip(SkipReason::WrongQueue(450))
        );
    }

    #[test]
    fn test_player_missing_and_wrong_role() {
        let record = fixtures::standard_match("NA1_1");
        let filter = MatchFilter::default();

        assert_eq!(
            filter.check(&record, "someone-else"),
            Verdict::Skip(SkipReason::PlayerMissing)
        );

        let mid = MatchFilter::new(FilterConfig {
            role: Role::Middle,
            ..FilterConfig::default()
        });
        let verdict = mid.check(&record, ME);
        assert_eq!(
            verdict,
            Verdict::Skip(SkipReason::WrongRole {
                expected: Role::Middle,
                found: Some("TOP".to_string()),
            })
        );
    }

    #[test]
    fn test_role_falls_back_to_team_position() {
        let mut record = fixtures::standard_match("NA1_1");
        record.info.participants[0].individual_position = None;
        record.info.participants[0].team_position = Some("TOP".to_string());

        assert!(MatchFilter::default().check(&record, ME).is_keep());
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut record = fixtures::standard_match("NA1_1");
        record.info.queue_id = 1700;
        let filter = MatchFilter::default();

        let first = filter.check(&record, ME);
        let second = filter.check(&record, ME);
        assert_eq!(first, second);
        if let Verdict::Skip(reason) = first {
            assert_eq!(reason.to_string(), "queue 1700 is not allowed");
        }
    }

    #[test]
    fn test_clean_entry() {
        let record = fixtures::standard_match("NA1_9");
        let filter = MatchFilter::default();
        let Verdict::Keep(me) = filter.check(&record, ME) else {
            panic!("expected keep");
        };

        let entry = CleanMatchEntry::from_match(&record, me);
        assert_eq!(entry.match_id, "NA1_9");
        assert_eq!(entry.cs, 101 + 4);
        assert_eq!(entry.kda(), "2/1/3");
        assert!(entry.win);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["teamposition"], "TOP");
        assert_eq!(value["jungleMinionsKilled"], 4);
    }
}
