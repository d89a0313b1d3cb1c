use crate::error::{BomError, Result};
use bom_scanner_common::{KeyboardProfile, ParseOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "TME_TOKEN";
pub const SECRET_ENV: &str = "TME_APP_SECRET";
/// Keyboard profile of this workstation, overriding the config file
pub const PROFILE_ENV: &str = "BOM_SCAN_PROFILE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tme_token: Option<String>,
    pub tme_secret: Option<String>,
    pub country: String,
    pub language: String,
    pub timeout_seconds: u64,
    pub keyboard_profile: KeyboardProfile,
    pub restore_separators: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tme_token: None,
            tme_secret: None,
            country: "CZ".into(),
            language: "EN".into(),
            timeout_seconds: 10,
            keyboard_profile: KeyboardProfile::default(),
            restore_separators: false,
        }
    }
}

/// API credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub secret: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from a file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BomError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("bom-scanner").join("config.json"))
    }

    /// Credentials, environment variables first
    pub fn credentials(&self) -> Result<Credentials> {
        let token = non_empty(std::env::var(TOKEN_ENV).ok())
            .or_else(|| non_empty(self.tme_token.clone()));
        let secret = non_empty(std::env::var(SECRET_ENV).ok())
            .or_else(|| non_empty(self.tme_secret.clone()));

        match (token, secret) {
            (Some(token), Some(secret)) => Ok(Credentials { token, secret }),
            _ => Err(BomError::MissingCredentials),
        }
    }

    /// Select the keyboard profile by name (`shift-row`, `legacy`, `a`, `b`, ...)
    pub fn set_profile_name(&mut self, name: &str) -> Result<()> {
        self.keyboard_profile = name.parse()?;
        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            profile: self.keyboard_profile,
            restore_separators: self.restore_separators,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
