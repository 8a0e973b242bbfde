use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::ConfigurationError;
use crate::models::{RedirectConfig, Resolution};

/// Resolves requests against the redirect table on disk.
///
/// The file is read on every call; edits take effect on the next request.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    config_file: PathBuf,
}

impl RedirectResolver {
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub async fn load(&self) -> Result<RedirectConfig, ConfigurationError> {
        let raw = tokio::fs::read_to_string(&self.config_file)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ConfigurationError::NotFound {
                    path: self.config_file.clone(),
                },
                _ => ConfigurationError::Read {
                    path: self.config_file.clone(),
                    source,
                },
            })?;

        RedirectConfig::from_json(&raw).map_err(|source| ConfigurationError::Invalid {
            path: self.config_file.clone(),
            source,
        })
    }

    pub async fn resolve(
        &self,
        path_segment: &str,
        user_agent: &str,
    ) -> Result<Resolution, ConfigurationError> {
        let config = self.load().await?;
        config.resolve(path_segment, user_agent)
    }
}
