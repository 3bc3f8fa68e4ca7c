
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use strum_macros::{Display, EnumIter};
use anyhow::{anyhow, Context};

use std::sync::Arc;
use std::fmt;
use std::fs;

use crate::utility::*;


const DATABASE_DIRECTORY: &str = "data";

#[derive(EnumIter, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum DB {
    Config,
    Settings,
    Mutes,
    Feeds,
}

impl DB {

    /// Tables holding plain `key -> value` entries.
    pub fn is_key_value(&self) -> bool {
        matches!(self, DB::Config | DB::Settings)
    }

    fn schema(&self) -> String {
        match self {
            DB::Config | DB::Settings => format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    key       TEXT    PRIMARY KEY,
                    value     TEXT    NOT NULL,
                    timestamp INTEGER NOT NULL
                )", self),
            DB::Mutes => format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    user_id   INTEGER NOT NULL,
                    guild_id  INTEGER NOT NULL,
                    unmute_at TEXT    NOT NULL,
                    PRIMARY KEY (user_id, guild_id)
                )", self),
            DB::Feeds => format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    guild_id   INTEGER NOT NULL,
                    feed_type  TEXT    NOT NULL,
                    channel_id INTEGER NOT NULL,
                    PRIMARY KEY (guild_id, feed_type)
                )", self),
        }
    }

}

#[derive(Debug, Clone, PartialEq)]
pub struct DBEntry {
    pub key: String,
    pub value: String,
    pub timestamp: i64,
}

impl fmt::Display for DBEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// One sqlite connection per table, shared behind an async mutex.
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    pub identifier: DB,
}

impl Database {

    pub fn new(identifier: DB) -> anyhow::Result<Self> {
        fs::create_dir_all(DATABASE_DIRECTORY)
            .with_context(|| format!("Failed to create '{}'", DATABASE_DIRECTORY))?;
        let path = format!("{}/{}.db", DATABASE_DIRECTORY, identifier);
        let connection = Connection::open(&path)
            .with_context(|| format!("Failed to open database '{}'", path))?;
        Database::init(connection, identifier)
    }

    pub fn in_memory(identifier: DB) -> anyhow::Result<Self> {
        let connection = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;
        Database::init(connection, identifier)
    }

    fn init(connection: Connection, identifier: DB) -> anyhow::Result<Self> {
        connection.execute(&identifier.schema(), [])
            .with_context(|| format!("Failed to create table '{}'", identifier))?;
        Ok(Database { connection: Arc::new(Mutex::new(connection)), identifier })
    }

    pub async fn with_connection<T: Send>(&self,
                                          action: impl Send + FnOnce(&Connection) -> rusqlite::Result<T>
    ) -> anyhow::Result<T> {
        let connection = self.connection.lock().await;
        action(&connection).map_err(|err| anyhow!("{} database: {}", self.identifier, err))
    }

    // ---- Key-value tables ---- //

    pub async fn get_keys(&self) -> anyhow::Result<Vec<String>> {
        let table = self.identifier.to_string();
        self.with_connection(move |connection| {
            let mut statement = connection.prepare(&format!("SELECT key FROM {} ORDER BY key", table))?;
            let keys = statement.query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>();
            keys
        }).await
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<DBEntry>> {
        let table = self.identifier.to_string();
        let key = key.to_string();
        self.with_connection(move |connection| {
            let mut statement = connection.prepare(
                &format!("SELECT key, value, timestamp FROM {} WHERE key = ?", table))?;
            let mut entries = statement.query_map(params![key], |row| {
                Ok(DBEntry {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?;
            entries.next().transpose()
        }).await
    }

    pub async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let table = self.identifier.to_string();
        let (key, value) = (key.to_string(), value.to_string());
        self.with_connection(move |connection| {
            connection.execute(
                &format!("INSERT INTO {} (key, value, timestamp) VALUES (?1, ?2, ?3)
                          ON CONFLICT(key) DO UPDATE SET value = excluded.value, timestamp = excluded.timestamp", table),
                params![key, value, chrono::Utc::now().timestamp()],
            )
        }).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        let table = self.identifier.to_string();
        let key = key.to_string();
        let deleted = self.with_connection(move |connection| {
            connection.execute(&format!("DELETE FROM {} WHERE key = ?", table), params![key])
        }).await?;
        Ok(deleted > 0)
    }

}

/// Key-value access shared by the config and settings tables.
pub trait DatabaseWrapper: Send + Sync {

    fn get_database(&self) -> &Database;

    fn get_keys<'a>(&'a self) -> BoxedFuture<'a, anyhow::Result<Vec<String>>> {
        Box::pin(async move {
            self.get_database().get_keys().await
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxedFuture<'a, anyhow::Result<DBEntry>> {
        Box::pin(async move {
            self.get_database().get(key).await?
                .ok_or_else(|| anyhow!("Failed to get value for '{}'", key))
        })
    }

    fn get_or<'a>(&'a self, key: &'a str, default: &'a str) -> BoxedFuture<'a, String> {
        Box::pin(async move {
            match self.get_database().get(key).await {
                Ok(Some(entry)) => entry.value,
                Ok(None) => default.to_string(),
                Err(err) => {
                    Logger::warn_long(&format!("Falling back to default for '{}'", key), &err.to_string());
                    default.to_string()
                }
            }
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.get_database().set(key, value).await
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxedFuture<'a, anyhow::Result<bool>> {
        Box::pin(async move {
            self.get_database().delete(key).await
        })
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    struct TestDB {
        database: Database
    }

    impl DatabaseWrapper for TestDB {
        fn get_database(&self) -> &Database {
            &self.database
        }
    }

    fn test_db() -> TestDB {
        TestDB { database: Database::in_memory(DB::Config).unwrap() }
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let db = test_db();
        db.set("command_prefix", "!").await.unwrap();
        db.set("command_prefix", "%").await.unwrap();
        assert_eq!(db.get("command_prefix").await.unwrap().value, "%");
        assert_eq!(db.get_keys().await.unwrap(), vec!["command_prefix".to_string()]);
    }

    #[tokio::test]
    async fn missing_key_is_an_error_or_default() {
        let db = test_db();
        assert!(db.get("token").await.is_err());
        assert_eq!(db.get_or("sweep_interval", "30").await, "30");
    }

    #[tokio::test]
    async fn delete_reports_whether_key_existed() {
        let db = test_db();
        db.set("token", "abc").await.unwrap();
        assert!(db.delete("token").await.unwrap());
        assert!(!db.delete("token").await.unwrap());
    }

}
