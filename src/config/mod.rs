use anyhow::{bail, Context};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_REDIRECT_CONFIG_FILE: &str = "redirect_config.json";
pub const DEFAULT_ANALYTICS_ENDPOINT: &str = "https://www.google-analytics.com/mp/collect";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub resolver: ResolverConfig,
    pub analytics: AnalyticsConfig,
    pub static_files: StaticConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Redirect table, re-read on every request
    pub config_file: PathBuf,
    pub redirect_status: RedirectMode,
}

/// Status code used for group redirects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectMode {
    /// 302 Found
    #[default]
    Found,
    /// 307 Temporary Redirect
    Temporary,
}

impl RedirectMode {
    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectMode::Found => StatusCode::FOUND,
            RedirectMode::Temporary => StatusCode::TEMPORARY_REDIRECT,
        }
    }

    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "302" | "found" => Ok(RedirectMode::Found),
            "307" | "temporary" => Ok(RedirectMode::Temporary),
            other => bail!("unsupported REDIRECT_STATUS '{other}', expected 302 or 307"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub measurement_id: Option<String>,
    pub api_secret: Option<String>,
    pub endpoint: String,
    #[serde(default = "AnalyticsConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AnalyticsConfig {
    const fn default_timeout_secs() -> u64 {
        5
    }

    /// Configuration with reporting switched off.
    pub fn disabled() -> Self {
        Self {
            measurement_id: None,
            api_secret: None,
            endpoint: DEFAULT_ANALYTICS_ENDPOINT.to_string(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }

    /// Measurement id and api secret, only when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.measurement_id.as_deref(), self.api_secret.as_deref()) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticConfig {
    /// Directory served under `/static`
    pub dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset, matching how operators blank out a variable in .env
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("REDIRECT_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("REDIRECT_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("REDIRECT_PORT must be a valid port number")?;

        let config_file = var("REDIRECT_CONFIG_FILE")
            .unwrap_or_else(|| DEFAULT_REDIRECT_CONFIG_FILE.to_string());

        let redirect_status = match var("REDIRECT_STATUS") {
            Some(value) => RedirectMode::parse(&value)?,
            None => RedirectMode::default(),
        };

        let timeout_secs = match var("GA_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .context("GA_TIMEOUT_SECS must be a whole number of seconds")?,
            None => AnalyticsConfig::default_timeout_secs(),
        };

        let endpoint =
            var("GA_ENDPOINT").unwrap_or_else(|| DEFAULT_ANALYTICS_ENDPOINT.to_string());

        let static_dir = var("STATIC_DIR").unwrap_or_else(|| "static".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            resolver: ResolverConfig {
                config_file: PathBuf::from(config_file),
                redirect_status,
            },
            analytics: AnalyticsConfig {
                measurement_id: var("GA_MEASUREMENT_ID"),
                api_secret: var("GA_API_SECRET"),
                endpoint,
                timeout_secs,
            },
            static_files: StaticConfig {
                dir: PathBuf::from(static_dir),
            },
        })
    }
}
