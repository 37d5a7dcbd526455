//! Payload builders shared by unit tests

use serde_json::{json, Value};

use super::riot::{MatchRecord, Timeline};

pub const ME: &str = "puuid-me";

pub fn participant(puuid: &str, id: u32, team: u32, position: &str, minions: u32) -> Value {
    json!({
        "puuid": puuid,
        "participantId": id,
        "teamId": team,
        "individualPosition": position,
        "teamPosition": position,
        "role": "SOLO",
        "championName": format!("Champ{}", id),
        "kills": 2,
        "deaths": 1,
        "assists": 3,
        "totalMinionsKilled": minions,
        "neutralMinionsKilled": 4,
        "win": team == 100,
    })
}

/// Ten-player match with the reference player as blue top (id 1) and red top as id 6
pub fn standard_participants() -> Vec<Value> {
    let positions = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"];
    let mut players = Vec::new();
    for (i, pos) in positions.iter().enumerate() {
        let id = i as u32 + 1;
        let puuid = if id == 1 {
            ME.to_string()
        } else {
            format!("blue-{}", id)
        };
        players.push(participant(&puuid, id, 100, pos, 100 + id));
    }
    for (i, pos) in positions.iter().enumerate() {
        let id = i as u32 + 6;
        players.push(participant(&format!("red-{}", id), id, 200, pos, 100 + id));
    }
    players
}

pub fn match_value(match_id: &str, duration: u64, participants: Vec<Value>) -> Value {
    let puuids: Vec<Value> = participants.iter().map(|p| p["puuid"].clone()).collect();
    json!({
        "metadata": { "matchId": match_id, "participants": puuids },
        "info": {
            "mapId": 11,
            "gameMode": "CLASSIC",
            "queueId": 420,
            "gameDuration": duration,
            "gameCreation": 1_700_000_000_000i64,
            "participants": participants,
        }
    })
}

pub fn match_record(match_id: &str, duration: u64, participants: Vec<Value>) -> MatchRecord {
    serde_json::from_value(match_value(match_id, duration, participants)).unwrap()
}

pub fn standard_match(match_id: &str) -> MatchRecord {
    match_record(match_id, 1800, standard_participants())
}

/// Participant frame with an optional position
pub fn pframe(minions: i64, jungle: i64, xp: i64, pos: Option<(f64, f64)>) -> Value {
    match pos {
        Some((x, y)) => json!({
            "minionsKilled": minions,
            "jungleMinionsKilled": jungle,
            "xp": xp,
            "position": { "x": x, "y": y },
        }),
        None => json!({
            "minionsKilled": minions,
            "jungleMinionsKilled": jungle,
            "xp": xp,
        }),
    }
}

/// Frame holding participants 1 and 6
pub fn frame(timestamp: i64, me: Value, enemy: Value, events: Vec<Value>) -> Value {
    json!({
        "timestamp": timestamp,
        "participantFrames": { "1": me, "6": enemy },
        "events": events,
    })
}

pub fn turret_kill(timestamp: i64, lane: &str, tower: &str) -> Value {
    json!({
        "type": "BUILDING_KILL",
        "timestamp": timestamp,
        "buildingType": "TOWER_BUILDING",
        "laneType": lane,
        "towerType": tower,
    })
}

pub fn timeline_value(frames: Vec<Value>) -> Value {
    json!({ "metadata": {}, "info": { "frameInterval": 60000, "frames": frames } })
}

pub fn timeline(frames: Vec<Value>) -> Timeline {
    serde_json::from_value(timeline_value(frames)).unwrap()
}
