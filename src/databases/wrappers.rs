
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use serde::{Serialize, Deserialize};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use rusqlite::types::Type;
use strum_macros::{Display, EnumString, VariantNames};

use crate::databases::database::{Database, DatabaseWrapper, DB};
use crate::utility::*;
use crate::impl_singleton;


macro_rules! impl_database_wrapper {
    ($name:ident, $db_type:expr) => {
        pub struct $name {
            database: Database
        }

        impl $name {
            pub fn open() -> anyhow::Result<Self> {
                Ok($name { database: Database::new($db_type)? })
            }

            #[allow(unused)]
            pub fn in_memory() -> anyhow::Result<Self> {
                Ok($name { database: Database::in_memory($db_type)? })
            }
        }

        impl DatabaseWrapper for $name {
            fn get_database(&self) -> &Database {
                &self.database
            }
        }
    };
}

impl_database_wrapper!(ConfigDB, DB::Config);
impl_database_wrapper!(SettingsDB, DB::Settings);

impl ConfigDB {
    fn new() -> Self {
        ConfigDB::open().unwrap_or_else(|err| {
            Logger::err_long("Failed to open config database", &err.to_string());
            ConfigDB::in_memory().expect("Failed to open database")
        })
    }
}

impl_singleton!(ConfigDB);


// ---- Settings ---- //

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GuildSettings {
    #[serde(default)]
    pub mod_role_id: Option<RoleId>,
}

impl SettingsDB {

    pub async fn get_settings_for_guild(&self, guild_id: GuildId) -> GuildSettings {
        let entry = self.get_database().get(&guild_id.to_string()).await;
        match entry {
            Ok(Some(entry)) => serde_json::from_str(&entry.value).unwrap_or_else(|err| {
                Logger::warn_long(&format!("Malformed settings for guild {}", guild_id), &err.to_string());
                GuildSettings::default()
            }),
            Ok(None) => GuildSettings::default(),
            Err(err) => {
                Logger::err_long("Failed to read settings", &err.to_string());
                GuildSettings::default()
            }
        }
    }

    pub async fn set_settings_for_guild(&self, guild_id: GuildId, settings: &GuildSettings) -> anyhow::Result<()> {
        let value = serde_json::to_string(settings)?;
        self.set(&guild_id.to_string(), &value).await
    }

}


// ---- Mutes ---- //

#[derive(Debug, Clone, PartialEq)]
pub struct MuteRecord {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub unmute_at: DateTime<Utc>,
}

impl MuteRecord {

    /// Seconds until the mute ends, negative once it is overdue.
    pub fn remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.unmute_at - now).num_seconds()
    }

    fn from_row(row: &Row) -> rusqlite::Result<MuteRecord> {
        let unmute_at: String = row.get(2)?;
        let unmute_at = DateTime::parse_from_rfc3339(&unmute_at)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(err)))?
            .with_timezone(&Utc);
        Ok(MuteRecord {
            user_id: UserId::new(snowflake(row, 0)?),
            guild_id: GuildId::new(snowflake(row, 1)?),
            unmute_at,
        })
    }

}

fn snowflake(row: &Row, index: usize) -> rusqlite::Result<u64> {
    let id: i64 = row.get(index)?;
    match id > 0 {
        true  => Ok(id as u64),
        false => Err(rusqlite::Error::IntegralValueOutOfRange(index, id))
    }
}

fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct MutesDB {
    database: Database
}

impl MutesDB {

    pub fn open() -> anyhow::Result<Self> {
        Ok(MutesDB { database: Database::new(DB::Mutes)? })
    }

    #[allow(unused)]
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(MutesDB { database: Database::in_memory(DB::Mutes)? })
    }

    /// Inserts the mute or moves the end of an existing one.
    pub async fn set(&self, user_id: UserId, guild_id: GuildId, unmute_at: DateTime<Utc>) -> anyhow::Result<()> {
        let unmute_at = timestamp(unmute_at);
        self.database.with_connection(move |connection| {
            connection.execute(
                "INSERT INTO mutes (user_id, guild_id, unmute_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, guild_id) DO UPDATE SET unmute_at = excluded.unmute_at",
                params![user_id.get() as i64, guild_id.get() as i64, unmute_at],
            )
        }).await?;
        Ok(())
    }

    pub async fn get(&self, user_id: UserId, guild_id: GuildId) -> anyhow::Result<Option<MuteRecord>> {
        self.database.with_connection(move |connection| {
            let mut statement = connection.prepare(
                "SELECT user_id, guild_id, unmute_at FROM mutes WHERE user_id = ?1 AND guild_id = ?2")?;
            let mut records = statement.query_map(
                params![user_id.get() as i64, guild_id.get() as i64],
                MuteRecord::from_row)?;
            let record = records.next().transpose();
            record
        }).await
    }

    pub async fn get_for_guild(&self, guild_id: GuildId) -> anyhow::Result<Vec<MuteRecord>> {
        self.database.with_connection(move |connection| {
            let mut statement = connection.prepare(
                "SELECT user_id, guild_id, unmute_at FROM mutes WHERE guild_id = ?1 ORDER BY unmute_at")?;
            let records = statement.query_map(params![guild_id.get() as i64], MuteRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>();
            records
        }).await
    }

    pub async fn get_expired(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<MuteRecord>> {
        let now = timestamp(now);
        self.database.with_connection(move |connection| {
            let mut statement = connection.prepare(
                "SELECT user_id, guild_id, unmute_at FROM mutes WHERE unmute_at <= ?1 ORDER BY unmute_at")?;
            let records = statement.query_map(params![now], MuteRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>();
            records
        }).await
    }

    pub async fn delete(&self, user_id: UserId, guild_id: GuildId) -> anyhow::Result<bool> {
        let deleted = self.database.with_connection(move |connection| {
            connection.execute(
                "DELETE FROM mutes WHERE user_id = ?1 AND guild_id = ?2",
                params![user_id.get() as i64, guild_id.get() as i64],
            )
        }).await?;
        Ok(deleted > 0)
    }

    /// Deletes the record only while it still ends at `unmute_at`.
    pub async fn delete_if(&self, user_id: UserId, guild_id: GuildId, unmute_at: DateTime<Utc>) -> anyhow::Result<bool> {
        let unmute_at = timestamp(unmute_at);
        let deleted = self.database.with_connection(move |connection| {
            connection.execute(
                "DELETE FROM mutes WHERE user_id = ?1 AND guild_id = ?2 AND unmute_at = ?3",
                params![user_id.get() as i64, guild_id.get() as i64, unmute_at],
            )
        }).await?;
        Ok(deleted > 0)
    }

}


// ---- Feeds ---- //

#[derive(EnumString, Display, VariantNames, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum FeedType {
    Modlog,
}

pub struct FeedsDB {
    database: Database
}

impl FeedsDB {

    pub fn open() -> anyhow::Result<Self> {
        Ok(FeedsDB { database: Database::new(DB::Feeds)? })
    }

    #[allow(unused)]
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(FeedsDB { database: Database::in_memory(DB::Feeds)? })
    }

    pub async fn set_feed(&self, guild_id: GuildId, feed_type: FeedType, channel_id: ChannelId) -> anyhow::Result<()> {
        let feed_type = feed_type.to_string();
        self.database.with_connection(move |connection| {
            connection.execute(
                "INSERT INTO feeds (guild_id, feed_type, channel_id) VALUES (?1, ?2, ?3)
                 ON CONFLICT(guild_id, feed_type) DO UPDATE SET channel_id = excluded.channel_id",
                params![guild_id.get() as i64, feed_type, channel_id.get() as i64],
            )
        }).await?;
        Ok(())
    }

    pub async fn get_feed(&self, guild_id: GuildId, feed_type: FeedType) -> anyhow::Result<Option<ChannelId>> {
        let feed_type = feed_type.to_string();
        self.database.with_connection(move |connection| {
            let mut statement = connection.prepare(
                "SELECT channel_id FROM feeds WHERE guild_id = ?1 AND feed_type = ?2")?;
            let mut channels = statement.query_map(
                params![guild_id.get() as i64, feed_type],
                |row| snowflake(row, 0).map(ChannelId::new))?;
            let channel = channels.next().transpose();
            channel
        }).await
    }

    pub async fn remove_feed(&self, guild_id: GuildId, feed_type: FeedType) -> anyhow::Result<bool> {
        let feed_type = feed_type.to_string();
        let deleted = self.database.with_connection(move |connection| {
            connection.execute(
                "DELETE FROM feeds WHERE guild_id = ?1 AND feed_type = ?2",
                params![guild_id.get() as i64, feed_type],
            )
        }).await?;
        Ok(deleted > 0)
    }

}
