//! Steam Web API client for the two calls the sync flow needs.

use crate::config::SteamConfig;
use crate::error::{GameLibError, Result};
use crate::store::LibraryStore;
use crate::sync::OwnershipSource;
use crate::types::ExternalId;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const RESOLVE_VANITY_PATH: &str = "/ISteamUser/ResolveVanityURL/v0001/";
const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct VanityResponse {
    success: u32,
    #[serde(default)]
    steamid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    game_count: Option<u64>,
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    #[serde(default)]
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// SteamClient
// ---------------------------------------------------------------------------

pub struct SteamClient {
    http: Client,
    api_base: String,
    key: String,
    include_free_games: bool,
}

impl SteamClient {
    pub fn new(config: &SteamConfig, key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GameLibError::IntegrationUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            key: key.into(),
            include_free_games: config.include_free_games,
        })
    }

    /// Build a client from the key stored in the global settings.
    pub fn from_store(store: &LibraryStore, config: &SteamConfig) -> Result<Self> {
        let key = store.integration_api_key()?.ok_or_else(|| {
            GameLibError::IntegrationUnavailable(
                "no Steam API key configured; run 'gamelib steamkey <key>'".into(),
            )
        })?;
        Self::new(config, key)
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .http
            .get(&url)
            .query(&[("key", self.key.as_str()), ("format", "json")])
            .query(query)
            .send()
            .map_err(|e| {
                GameLibError::IntegrationUnavailable(format!("Steam request failed: {e}"))
            })?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GameLibError::IntegrationUnavailable(
                    "Steam rejected the API key".into(),
                ));
            }
            s if !s.is_success() => {
                return Err(GameLibError::IntegrationUnavailable(format!(
                    "Steam returned {s}"
                )));
            }
            _ => {}
        }

        resp.json::<T>().map_err(|e| {
            GameLibError::IntegrationUnavailable(format!("unexpected Steam response: {e}"))
        })
    }
}

impl OwnershipSource for SteamClient {
    fn resolve_vanity_name(&self, name: &str) -> Result<ExternalId> {
        tracing::info!(name, "resolving Steam vanity name");
        let env: Envelope<VanityResponse> =
            self.get(RESOLVE_VANITY_PATH, &[("vanityurl", name.to_string())])?;
        if env.response.success != 1 {
            return Err(GameLibError::NameResolutionFailed(name.to_string()));
        }
        env.response
            .steamid
            .as_deref()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(ExternalId)
            .ok_or_else(|| GameLibError::NameResolutionFailed(name.to_string()))
    }

    fn fetch_external_titles(&self, id: ExternalId) -> Result<Vec<String>> {
        tracing::info!(external_id = %id, "fetching owned Steam games");
        let free = if self.include_free_games { "1" } else { "0" };
        let env: Envelope<OwnedGamesResponse> = self.get(
            OWNED_GAMES_PATH,
            &[
                ("steamid", id.to_string()),
                ("include_appinfo", "1".to_string()),
                ("include_played_free_games", free.to_string()),
            ],
        )?;

        match (env.response.games, env.response.game_count) {
            (Some(games), _) => Ok(games.into_iter().filter_map(|g| g.name).collect()),
            (None, Some(0)) => Ok(Vec::new()),
            // Steam omits both fields when the profile's game details are private
            (None, _) => Err(GameLibError::IntegrationUnavailable(format!(
                "game details for Steam profile {id} are private"
            ))),
        }
    }
}
