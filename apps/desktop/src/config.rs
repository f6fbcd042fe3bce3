use std::{fs, path::PathBuf};

use serde::Deserialize;

pub const CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub chain: String,
    pub manifest_dir: PathBuf,
    pub database_url: String,
    pub account: Option<String>,
    /// Defaults to the chain's rpc url.
    pub relay_url: Option<String>,
    /// Defaults to the chain's indexer url.
    pub indexer_url: Option<String>,
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chain: "KATANA".into(),
            manifest_dir: PathBuf::from("."),
            database_url: "sqlite://./data/client.db".into(),
            account: None,
            relay_url: None,
            indexer_url: None,
            music_enabled: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    chain: Option<String>,
    manifest_dir: Option<PathBuf>,
    database_url: Option<String>,
    account: Option<String>,
    relay_url: Option<String>,
    indexer_url: Option<String>,
    music_enabled: Option<bool>,
}

pub fn load_settings() -> Settings {
    let raw = fs::read_to_string(CONFIG_FILE).ok();
    settings_from(raw.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file, then the environment.
fn settings_from(raw_file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = raw_file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.chain {
                    settings.chain = v;
                }
                if let Some(v) = file_cfg.manifest_dir {
                    settings.manifest_dir = v;
                }
                if let Some(v) = file_cfg.database_url {
                    settings.database_url = v;
                }
                if file_cfg.account.is_some() {
                    settings.account = file_cfg.account;
                }
                if file_cfg.relay_url.is_some() {
                    settings.relay_url = file_cfg.relay_url;
                }
                if file_cfg.indexer_url.is_some() {
                    settings.indexer_url = file_cfg.indexer_url;
                }
                if let Some(v) = file_cfg.music_enabled {
                    settings.music_enabled = v;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, file = CONFIG_FILE, "ignoring malformed config")
            }
        }
    }

    let var = |names: &[&str]| names.iter().rev().find_map(|name| env(*name));

    if let Some(v) = var(&["CHAIN_ID", "APP__CHAIN"]) {
        settings.chain = v;
    }
    if let Some(v) = var(&["MANIFEST_DIR", "APP__MANIFEST_DIR"]) {
        settings.manifest_dir = PathBuf::from(v);
    }
    if let Some(v) = var(&["DATABASE_URL", "APP__DATABASE_URL"]) {
        settings.database_url = v;
    }
    if let Some(v) = var(&["ACCOUNT_ADDRESS", "APP__ACCOUNT"]) {
        settings.account = Some(v);
    }
    if let Some(v) = var(&["RELAY_URL", "APP__RELAY_URL"]) {
        settings.relay_url = Some(v);
    }
    if let Some(v) = var(&["INDEXER_URL", "APP__INDEXER_URL"]) {
        settings.indexer_url = Some(v);
    }
    if let Some(v) = var(&["APP__MUSIC_ENABLED"]) {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.music_enabled = parsed;
        }
    }

    settings.database_url = normalize_database_url(&settings.database_url);
    settings
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
