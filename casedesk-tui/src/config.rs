//! Configuration loading for the CaseDesk TUI.
//!
//! Every key must be present in the file except `[session]`.

use casedesk_core::{RecordKind, Session};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CASEDESK_TUI_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    pub upload_base_url: String,
    pub request_timeout_ms: u64,
    pub refresh_interval_ms: u64,
    pub persistence_path: PathBuf,
    pub session_path: PathBuf,
    pub error_log_path: PathBuf,
    pub export_dir: PathBuf,
    /// Seeds the session store when it is empty.
    #[serde(default)]
    pub session: Option<SessionSeed>,
    pub pagination: PaginationConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSeed {
    pub user_id: String,
    pub token: String,
}

impl From<SessionSeed> for Session {
    fn from(seed: SessionSeed) -> Self {
        Session::new(seed.user_id, seed.token)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    pub case_page_size: usize,
    pub record_page_size: usize,
    /// Page buttons shown around the current page.
    pub window: usize,
}

impl PaginationConfig {
    pub fn page_size(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Case => self.case_page_size,
            RecordKind::Land | RecordKind::Miscellaneous => self.record_page_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or CASEDESK_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_url("api_base_url", &self.api_base_url)?;
        require_url("upload_base_url", &self.upload_base_url)?;
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }
        require_path("persistence_path", &self.persistence_path)?;
        require_path("session_path", &self.session_path)?;
        require_path("error_log_path", &self.error_log_path)?;
        require_path("export_dir", &self.export_dir)?;
        if self.pagination.case_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.case_page_size",
                reason: "must be > 0".to_string(),
            });
        }
        if self.pagination.record_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.record_page_size",
                reason: "must be > 0".to_string(),
            });
        }
        if self.pagination.window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.window",
                reason: "must be > 0".to_string(),
            });
        }
        if let Some(seed) = &self.session {
            if seed.user_id.trim().is_empty() || seed.token.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "session",
                    reason: "user_id and token must both be set".to_string(),
                });
            }
        }
        if self.theme.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.theme.name.to_ascii_lowercase() != "ledger" {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "only 'ledger' is supported".to_string(),
            });
        }
        Ok(())
    }
}

fn require_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must start with http:// or https://".to_string(),
        });
    }
    Ok(())
}

fn require_path(field: &'static str, value: &Path) -> Result<(), ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
