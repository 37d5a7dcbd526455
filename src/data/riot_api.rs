//! Blocking client for the Riot account-v1 and match-v5 endpoints
//!
//! Downloads raw payloads into the data layout; nothing here parses them
//! beyond what is needed to save them.

use serde::Deserialize;
use serde_json::Value;

use super::store::{write_json_pretty, DataLayout};
use crate::{ApiConfig, LaneError, Result};

const USER_AGENT: &str = "lanephase/0.1";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

/// Outcome of a download run
#[derive(Debug, Default, Clone, Copy)]
pub struct DownloadReport {
    pub listed: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: usize,
}

pub struct RiotClient {
    client: reqwest::blocking::Client,
    api_key: String,
    routing_region: String,
}

impl RiotClient {
    pub fn new(api_key: &str, config: &ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(RiotClient {
            client,
            api_key: api_key.to_string(),
            routing_region: config.routing_region.clone(),
        })
    }

    fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.routing_region)
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        log::debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .header("X-Riot-Token", &self.api_key)
            .send()?;

        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            Err(LaneError::Api { status, body })
        }
    }

    /// Look up an account by Riot ID (game name + tag line)
    pub fn account_by_riot_id(&self, game_name: &str, tag_line: &str) -> Result<Account> {
        let url = format!(
            "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.base_url(),
            game_name,
            tag_line
        );
        Ok(self.get(&url)?.json()?)
    }

    /// Most recent match ids for a player
    pub fn match_ids(&self, puuid: &str, start: u32, count: u32) -> Result<Vec<String>> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?start={}&count={}",
            self.base_url(),
            puuid,
            start,
            count
        );
        Ok(self.get(&url)?.json()?)
    }

    pub fn match_payload(&self, match_id: &str) -> Result<Value> {
        let url = format!("{}/lol/match/v5/matches/{}", self.base_url(), match_id);
        Ok(self.get(&url)?.json()?)
    }

    pub fn timeline_payload(&self, match_id: &str) -> Result<Value> {
        let url = format!(
            "{}/lol/match/v5/matches/{}/timeline",
            self.base_url(),
            match_id
        );
        Ok(self.get(&url)?.json()?)
    }

    /// Download match and timeline payloads for the player's recent matches.
    ///
    /// Matches whose two files already exist are left alone. A failure on
    /// one match is logged and the rest still download.
    pub fn download_recent(
        &self,
        puuid: &str,
        count: u32,
        layout: &DataLayout,
    ) -> Result<DownloadReport> {
        layout.ensure_dirs()?;

        let ids = self.match_ids(puuid, 0, count)?;
        log::info!("Fetched {} match ids", ids.len());

        let mut report = DownloadReport {
            listed: ids.len(),
            ..Default::default()
        };

        for match_id in &ids {
            let match_path = layout.match_path(match_id);
            let timeline_path = layout.timeline_path(match_id);

            if match_path.exists() && timeline_path.exists() {
                log::debug!("Match {} already downloaded", match_id);
                report.already_present += 1;
                continue;
            }

            log::info!("Downloading match {}", match_id);
            let payloads = self
                .match_payload(match_id)
                .and_then(|m| self.timeline_payload(match_id).map(|t| (m, t)));

            match payloads {
                Ok((match_json, timeline_json)) => {
                    write_json_pretty(&match_path, &match_json)?;
                    write_json_pretty(&timeline_path, &timeline_json)?;
                    report.downloaded += 1;
                }
                Err(e) => {
                    log::warn!("Failed to download {}: {}", match_id, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
