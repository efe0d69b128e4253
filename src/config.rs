use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const CONFIG_DIR_NAME: &str = "flashgem";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com";
pub const DEFAULT_STORE_ENDPOINT: &str = "https://firestore.googleapis.com";
pub const DEFAULT_COLLECTION: &str = "flashcards";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Firebase,
}

impl Backend {
    fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Backend::Memory),
            "firebase" => Some(Backend::Firebase),
            _ => None,
        }
    }
}

/// Connection parameters for the identity provider and flashcard store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: Backend,
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub auth_endpoint: String,
    pub token_endpoint: String,
    pub store_endpoint: String,
    pub collection: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            backend: Backend::Memory,
            api_key: None,
            project_id: None,
            auth_endpoint: DEFAULT_AUTH_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            store_endpoint: DEFAULT_STORE_ENDPOINT.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub fn config_path() -> PathBuf {
    glib::user_config_dir()
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl AppConfig {
    /// Reads the config file, then lets `FLASHGEM_*` environment variables win.
    pub fn load() -> Result<Self, AppError> {
        let mut config = Self::load_from(&config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), AppError> {
        if let Some(raw) = lookup("FLASHGEM_BACKEND") {
            self.backend = Backend::from_code(&raw)
                .ok_or_else(|| AppError::Config(format!("unknown backend '{raw}'")))?;
        }
        if let Some(value) = lookup("FLASHGEM_API_KEY").and_then(non_empty) {
            self.api_key = Some(value);
        }
        if let Some(value) = lookup("FLASHGEM_PROJECT_ID").and_then(non_empty) {
            self.project_id = Some(value);
        }
        if let Some(value) = lookup("FLASHGEM_AUTH_ENDPOINT").and_then(non_empty) {
            self.auth_endpoint = value;
        }
        if let Some(value) = lookup("FLASHGEM_TOKEN_ENDPOINT").and_then(non_empty) {
            self.token_endpoint = value;
        }
        if let Some(value) = lookup("FLASHGEM_STORE_ENDPOINT").and_then(non_empty) {
            self.store_endpoint = value;
        }
        if let Some(value) = lookup("FLASHGEM_COLLECTION").and_then(non_empty) {
            self.collection = value;
        }
        if let Some(raw) = lookup("FLASHGEM_TIMEOUT_SECS") {
            self.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| AppError::Config(format!("invalid timeout '{raw}'")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout must be at least one second".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(AppError::Config("collection name is empty".into()));
        }
        if self.backend == Backend::Firebase {
            if self.api_key.is_none() {
                return Err(AppError::Config("firebase backend needs an api key".into()));
            }
            if self.project_id.is_none() {
                return Err(AppError::Config("firebase backend needs a project id".into()));
            }
        }
        Ok(())
    }
}
