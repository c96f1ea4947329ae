use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use url::Url;

/// Runtime configuration shared by the MCP server and the bridge.
///
/// Both binaries collect the same environment-backed values through clap and
/// hand them here; the struct itself is read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Home Assistant base URL, normalized without a trailing slash.
    pub ha_url: String,
    /// Long-lived access token for the Home Assistant REST API.
    pub ha_token: String,
    /// Root of the ha-config repository clone.
    pub repo_path: PathBuf,
    /// Directory where health reports and the stats snapshot live.
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn new(
        ha_url: String,
        ha_token: String,
        repo_path: PathBuf,
        data_dir: PathBuf,
    ) -> Result<Self> {
        let parsed = Url::parse(&ha_url)
            .with_context(|| format!("invalid Home Assistant URL '{ha_url}'"))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => bail!("unsupported Home Assistant URL scheme '{other}' (use http or https)"),
        }

        if ha_token.is_empty() {
            tracing::warn!("HA_TOKEN is empty — state and health tools will fail to authenticate");
        }
        if !repo_path.is_dir() {
            tracing::warn!(
                "REPO_PATH {} is not a directory — config tools will find nothing",
                repo_path.display()
            );
        }

        Ok(Self {
            ha_url: ha_url.trim_end_matches('/').to_string(),
            ha_token,
            repo_path,
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> Result<Settings> {
        Settings::new(
            url.to_string(),
            "token".to_string(),
            PathBuf::from("/tmp"),
            PathBuf::from("/tmp/data"),
        )
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let s = settings("http://hass.local:8123/").unwrap();
        assert_eq!(s.ha_url, "http://hass.local:8123");
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(settings("ftp://hass.local").is_err());
        assert!(settings("not a url").is_err());
    }
}
