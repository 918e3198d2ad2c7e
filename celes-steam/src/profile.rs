//! Public-profile lookups against the Steam Community XML endpoints.
//!
//! Both feeds are plain XML documents; parsing is event-based and kept
//! separate from the HTTP plumbing so it can be tested on fixtures.

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::Event;

use celes_core::{ActiveAchievement, ScrapError};

const DEFAULT_COMMUNITY_URL: &str = "https://steamcommunity.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A game visible on an account's public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedGame {
    pub app_id: String,
    /// Playtime on record, seconds.
    pub playtime: u64,
}

/// Platform-account resolution, kept behind a trait so the adapters and
/// orchestrator never touch HTTP directly.
pub trait ProfileLookup: Send + Sync {
    /// Games owned by the account, with observed playtime.
    fn owned_games(&self, account_id: &str) -> Result<Vec<OwnedGame>, ScrapError>;

    /// Unlocked achievements for one owned game.
    fn achievements(
        &self,
        account_id: &str,
        app_id: &str,
    ) -> Result<Vec<ActiveAchievement>, ScrapError>;
}

/// HTTP client for the Steam Community public XML feeds.
pub struct SteamCommunityClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl SteamCommunityClient {
    pub fn new() -> Result<Self, ScrapError> {
        Self::with_base_url(DEFAULT_COMMUNITY_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ScrapError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ScrapError::http)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn get_xml(&self, url: &str) -> Result<String, ScrapError> {
        let response = self.http.get(url).send().map_err(ScrapError::http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapError::http(format!("HTTP {status} for {url}")));
        }
        response.text().map_err(ScrapError::http)
    }
}

impl ProfileLookup for SteamCommunityClient {
    fn owned_games(&self, account_id: &str) -> Result<Vec<OwnedGame>, ScrapError> {
        let url = format!(
            "{}/profiles/{account_id}/games?tab=all&xml=1",
            self.base_url
        );
        parse_owned_games_xml(&self.get_xml(&url)?)
    }

    fn achievements(
        &self,
        account_id: &str,
        app_id: &str,
    ) -> Result<Vec<ActiveAchievement>, ScrapError> {
        let url = format!(
            "{}/profiles/{account_id}/stats/{app_id}/achievements?xml=1",
            self.base_url
        );
        parse_achievements_xml(&self.get_xml(&url)?)
    }
}

fn xml_error(e: impl std::fmt::Display) -> ScrapError {
    ScrapError::parse(format!("invalid profile XML: {e}"))
}

fn handle_games_text(
    current_tag: &str,
    value: String,
    in_game: bool,
    app_id: &mut String,
    playtime: &mut u64,
) -> Result<(), ScrapError> {
    if current_tag == "error" {
        return Err(ScrapError::http(format!("profile error: {value}")));
    }
    if in_game {
        match current_tag {
            "appID" => *app_id = value,
            "hoursOnRecord" => {
                let hours: f64 = value.replace(',', "").parse().unwrap_or(0.0);
                *playtime = (hours * 3600.0) as u64;
            }
            _ => {}
        }
    }
    Ok(())
}

fn handle_achievement_text(
    current_tag: &str,
    value: String,
    in_achievement: bool,
    api_name: &mut String,
    unlock_time: &mut u64,
) -> Result<(), ScrapError> {
    if current_tag == "error" {
        return Err(ScrapError::http(format!("profile error: {value}")));
    }
    if in_achievement {
        match current_tag {
            "apiname" => *api_name = value,
            "unlockTimestamp" => *unlock_time = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    Ok(())
}

/// Parse the owned-games feed (`<gamesList>` document). `hoursOnRecord`
/// is fractional hours; playtime is reported in whole seconds.
pub fn parse_owned_games_xml(text: &str) -> Result<Vec<OwnedGame>, ScrapError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut games = Vec::new();
    let mut current_tag = String::new();
    let mut in_game = false;
    let mut app_id = String::new();
    let mut playtime = 0u64;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "game" {
                    in_game = true;
                    app_id.clear();
                    playtime = 0;
                } else {
                    current_tag = tag;
                }
            }
            Event::Text(ref e) => {
                let value = e.unescape().map_err(xml_error)?.to_string();
                handle_games_text(&current_tag, value, in_game, &mut app_id, &mut playtime)?;
            }
            Event::CData(ref e) => {
                let value = String::from_utf8_lossy(e).to_string();
                handle_games_text(&current_tag, value, in_game, &mut app_id, &mut playtime)?;
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "game" {
                    in_game = false;
                    if !app_id.is_empty() {
                        games.push(OwnedGame {
                            app_id: app_id.clone(),
                            playtime,
                        });
                    }
                } else {
                    current_tag.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(games)
}

/// Parse the per-game achievements feed (`<playerstats>` document). Only
/// closed (unlocked) achievements carry data in this feed.
pub fn parse_achievements_xml(text: &str) -> Result<Vec<ActiveAchievement>, ScrapError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut achievements = Vec::new();
    let mut current_tag = String::new();
    let mut in_achievement = false;
    let mut closed = false;
    let mut api_name = String::new();
    let mut unlock_time = 0u64;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "achievement" {
                    in_achievement = true;
                    closed = false;
                    api_name.clear();
                    unlock_time = 0;
                    for attr in e.attributes() {
                        let attr = attr.map_err(xml_error)?;
                        if attr.key.as_ref() == b"closed" {
                            closed = attr.value.as_ref() == b"1";
                        }
                    }
                } else {
                    current_tag = tag;
                }
            }
            Event::Text(ref e) => {
                let value = e.unescape().map_err(xml_error)?.to_string();
                handle_achievement_text(
                    &current_tag,
                    value,
                    in_achievement,
                    &mut api_name,
                    &mut unlock_time,
                )?;
            }
            Event::CData(ref e) => {
                let value = String::from_utf8_lossy(e).to_string();
                handle_achievement_text(
                    &current_tag,
                    value,
                    in_achievement,
                    &mut api_name,
                    &mut unlock_time,
                )?;
            }
            Event::End(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if tag == "achievement" {
                    in_achievement = false;
                    if closed && !api_name.is_empty() {
                        achievements.push(ActiveAchievement::unlocked(api_name.clone(), unlock_time));
                    }
                } else {
                    current_tag.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(achievements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAMES_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<gamesList>
  <steamID64>76561190000000000</steamID64>
  <games>
    <game>
      <appID>220</appID>
      <name><![CDATA[Half-Life 2]]></name>
      <hoursOnRecord>12.5</hoursOnRecord>
    </game>
    <game>
      <appID>382890</appID>
      <name><![CDATA[Celeste]]></name>
    </game>
  </games>
</gamesList>"#;

    const ACHIEVEMENTS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<playerstats>
  <game><gameName>Celeste</gameName></game>
  <achievements>
    <achievement closed="1">
      <apiname>ACH_CH1</apiname>
      <name>Forsaken City</name>
      <unlockTimestamp>1600000000</unlockTimestamp>
    </achievement>
    <achievement closed="0">
      <apiname>ACH_CH2</apiname>
      <name>Old Site</name>
    </achievement>
  </achievements>
</playerstats>"#;

    const ERROR_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<response><error><![CDATA[The specified profile could not be found.]]></error></response>"#;

    #[test]
    fn owned_games_extract_app_id_and_playtime() {
        let games = parse_owned_games_xml(GAMES_XML).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].app_id, "220");
        assert_eq!(games[0].playtime, 45_000);
        assert_eq!(games[1].app_id, "382890");
        assert_eq!(games[1].playtime, 0);
    }

    #[test]
    fn achievements_keep_only_closed_entries() {
        let achievements = parse_achievements_xml(ACHIEVEMENTS_XML).unwrap();
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0].name, "ACH_CH1");
        assert!(achievements[0].achieved);
        assert_eq!(achievements[0].unlock_time, 1_600_000_000);
    }

    #[test]
    fn profile_error_document_is_reported() {
        let err = parse_achievements_xml(ERROR_XML).unwrap_err();
        assert!(err.to_string().contains("could not be found"));
    }
}
