use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::entity::EntityState;
use crate::settings::Settings;

// Per-endpoint timeouts. The full state dump is the heavy call.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
const LOG_TIMEOUT: Duration = Duration::from_secs(15);
const STATES_TIMEOUT: Duration = Duration::from_secs(30);

/// System information from `/api/config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl SystemInfo {
    /// Placeholder used when `/api/config` could not be fetched at all.
    pub fn unreachable() -> Self {
        Self {
            version: Some("unreachable".into()),
            state: Some("unreachable".into()),
            time_zone: None,
        }
    }
}

/// Bearer-authenticated client for the Home Assistant REST API.
#[derive(Clone)]
pub struct HaClient {
    base_url: String,
    token: String,
    http: Client,
}

impl HaClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            base_url: settings.ha_url.clone(),
            token: settings.ha_token.clone(),
            http: Client::new(),
        }
    }

    async fn get(&self, path: &str, timeout: Duration) -> Result<Response> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.describe_send_error(path, e))?;
        self.check_status(path, response).await
    }

    async fn post(&self, path: &str, body: serde_json::Value, timeout: Duration) -> Result<Response> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.describe_send_error(path, e))?;
        self.check_status(path, response).await
    }

    fn describe_send_error(&self, path: &str, error: reqwest::Error) -> anyhow::Error {
        if error.is_connect() {
            anyhow!(
                "Cannot connect to Home Assistant at '{}'. Check HA_URL and ensure Home Assistant is running.",
                self.base_url
            )
        } else if error.is_timeout() {
            anyhow!("Timeout talking to Home Assistant at '{}'", self.base_url)
        } else {
            anyhow!("Network error accessing {path}: {error}")
        }
    }

    async fn check_status(&self, path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response".to_string());
        let message = match status.as_u16() {
            401 => "Authentication failed. Check that HA_TOKEN is valid and has not expired."
                .to_string(),
            403 => "Access forbidden. The HA_TOKEN may not have sufficient permissions.".to_string(),
            404 => format!("Home Assistant API endpoint not found: {path}"),
            500..=599 => format!("Home Assistant server error ({status}): {body}"),
            _ => format!("HTTP error {status} accessing {path}: {body}"),
        };
        bail!(message)
    }

    /// All entity states.
    pub async fn get_states(&self) -> Result<Vec<EntityState>> {
        let response = self.get("/api/states", STATES_TIMEOUT).await?;
        response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse /api/states response: {e}"))
    }

    /// One entity state; `None` when Home Assistant does not know the id.
    pub async fn get_state(&self, entity_id: &str) -> Result<Option<EntityState>> {
        let path = format!("/api/states/{entity_id}");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.describe_send_error(&path, e))?;

        // An unknown entity is a normal answer, not a transport failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = self.check_status(&path, response).await?;
        let state = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse state for '{entity_id}': {e}"))?;
        Ok(Some(state))
    }

    /// System configuration (version, state, timezone).
    pub async fn get_system_info(&self) -> Result<SystemInfo> {
        let response = self.get("/api/config", LOOKUP_TIMEOUT).await?;
        response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse /api/config response: {e}"))
    }

    /// Raw error-log text.
    pub async fn get_error_log(&self) -> Result<String> {
        let response = self.get("/api/error_log", LOG_TIMEOUT).await?;
        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read error log: {e}"))
    }

    /// State changes for one entity over the last `hours` hours.
    ///
    /// `/api/history/period` returns one list per requested entity; with
    /// `minimal_response` only the first point carries full attributes, so the
    /// points stay untyped JSON.
    pub async fn get_history(&self, entity_id: &str, hours: i64) -> Result<Vec<serde_json::Value>> {
        // Z-suffixed so the timestamp stays URL-path safe.
        let start = (Utc::now() - chrono::Duration::hours(hours))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        let path = format!("/api/history/period/{start}");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .query(&[
                ("filter_entity_id", entity_id),
                ("minimal_response", "true"),
            ])
            .timeout(LOG_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.describe_send_error(&path, e))?;
        let response = self.check_status(&path, response).await?;

        let mut lists: Vec<Vec<serde_json::Value>> = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse history for '{entity_id}': {e}"))?;
        Ok(if lists.is_empty() {
            Vec::new()
        } else {
            lists.swap_remove(0)
        })
    }

    /// Render a Jinja template server-side. Read-only despite the POST verb.
    pub async fn render_template(&self, template: &str) -> Result<String> {
        let response = self
            .post("/api/template", json!({ "template": template }), LOOKUP_TIMEOUT)
            .await?;
        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read rendered template: {e}"))
    }
}
