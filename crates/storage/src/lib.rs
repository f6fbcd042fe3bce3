use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
};
use tracing::debug;

use shared::domain::{AccountAddress, GameId};

const GAME_ID_KEY_PREFIX: &str = "untitled_game_id_";

/// Storage key holding the active game id of `account`.
pub fn game_id_key(account: &AccountAddress) -> String {
    format!("{GAME_ID_KEY_PREFIX}{}", account.as_str())
}

/// Per-account persistence of the active game id, surviving restarts.
#[async_trait]
pub trait GameIdStore: Send + Sync {
    async fn load_game_id(&self, account: &AccountAddress) -> Result<Option<GameId>>;
    async fn save_game_id(&self, account: &AccountAddress, game_id: GameId) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to an in-memory database sees its own empty database.
        let max_connections = if database_url.starts_with("sqlite::memory:") {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        let storage = Self { pool };
        storage.ensure_kv_table().await?;
        Ok(storage)
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_kv_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure kv_entries table exists")?;
        Ok(())
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read key '{key}'"))?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write key '{key}'"))?;
        Ok(())
    }
}

#[async_trait]
impl GameIdStore for Storage {
    async fn load_game_id(&self, account: &AccountAddress) -> Result<Option<GameId>> {
        let key = game_id_key(account);
        let Some(raw) = self.get_value(&key).await? else {
            return Ok(None);
        };
        parse_game_id(&key, &raw).map(Some)
    }

    async fn save_game_id(&self, account: &AccountAddress, game_id: GameId) -> Result<()> {
        let key = game_id_key(account);
        self.set_value(&key, &game_id.to_string()).await?;
        debug!(key = %key, game_id = game_id.0, "saved game id");
        Ok(())
    }
}

/// Process-local store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryGameIdStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryGameIdStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_value(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }
}

#[async_trait]
impl GameIdStore for MemoryGameIdStore {
    async fn load_game_id(&self, account: &AccountAddress) -> Result<Option<GameId>> {
        let key = game_id_key(account);
        let Some(raw) = self.raw_value(&key) else {
            return Ok(None);
        };
        parse_game_id(&key, &raw).map(Some)
    }

    async fn save_game_id(&self, account: &AccountAddress, game_id: GameId) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("game id store lock poisoned"))?;
        entries.insert(game_id_key(account), game_id.to_string());
        Ok(())
    }
}

fn parse_game_id(key: &str, raw: &str) -> Result<GameId> {
    raw.trim()
        .parse::<u64>()
        .map(GameId)
        .with_context(|| format!("stored value for '{key}' is not a game id: {raw:?}"))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
