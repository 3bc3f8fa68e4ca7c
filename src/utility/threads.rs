
use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;
#[cfg(feature = "db_interface")]
use strum::IntoEnumIterator;

#[cfg(feature = "mute_sweeper")]
use std::sync::Arc;
use std::thread;
#[cfg(feature = "mute_sweeper")]
use std::time::Duration;

use crate::commands::Stores;
#[cfg(feature = "db_interface")]
use crate::databases::database::Database;
use crate::databases::*;
use crate::utility::*;


pub const DEFAULT_SWEEP_INTERVAL: u64 = 30;

/// Runs a blocking task on its own thread with a private runtime.
pub fn spawn(name: &'static str, task: BoxedFuture<'static, ()>) {
    thread::spawn(move || {
        match Runtime::new() {
            Ok(runtime) => runtime.block_on(task),
            Err(err) => Logger::err_long(&format!("Failed to start {}", name), &err.to_string()),
        }
    });
}

#[cfg(feature = "db_interface")]
pub fn database_interface<'a>() -> BoxedFuture<'a, ()> {
    Box::pin(async move {
        let mut database = ConfigDB::get_instance().get_database().clone();
        Logger::info_long("Connected to database", &database.identifier.to_string());
        loop {
            let Some(input) = Logger::input("Enter a command") else {
                Logger::warn("Console closed, database interface stopped");
                break;
            };
            let words = input.split_whitespace().collect::<Vec<&str>>();
            let Some(command) = words.first() else {
                continue;
            };

            match *command {
                "ls" => {
                    match database.get_keys().await {
                        Ok(keys) => Logger::info_long("Keys", &keys.join(", ")),
                        Err(err) => Logger::err(&err.to_string())
                    }
                }
                "get" => {
                    match words.len() {
                        2 => {
                            let key = words[1];
                            match database.get(key).await {
                                Ok(Some(entry)) => Logger::info_long(&format!("Value of {}", key), &entry.to_string()),
                                Ok(None) => Logger::warn_long("No such key", key),
                                Err(err) => Logger::err(&err.to_string())
                            }
                        }
                        1 => Logger::warn("Too few parameters"),
                        _ => Logger::warn("Too many parameters")
                    }
                }
                "set" => {
                    match words.len() {
                        1..=2 => {
                            Logger::warn("Too few parameters");
                        }
                        _ => {
                            let key = words[1];
                            let value = words[2..].join(" ");
                            match database.set(key, &value).await {
                                Ok(()) => Logger::info_long(&format!("Set value for {}", key), &value),
                                Err(err) => Logger::err(&err.to_string())
                            }
                        }
                    }
                }
                "rm" => {
                    match words.len() {
                        2 => {
                            let key = words[1];
                            match database.delete(key).await {
                                Ok(true) => Logger::info_long("Removed key", key),
                                Ok(false) => Logger::warn_long("No such key", key),
                                Err(err) => Logger::err(&err.to_string())
                            }
                        }
                        1 => Logger::warn("Too few parameters"),
                        _ => Logger::warn("Too many parameters")
                    }
                },
                "cd" => {
                    match words.len() {
                        2 => {
                            let target = DB::iter()
                                .filter(DB::is_key_value)
                                .find(|db| db.to_string() == words[1]);
                            match target.map(Database::new) {
                                Some(Ok(switched)) => {
                                    database = switched;
                                    Logger::info_long("Switched to database", words[1]);
                                },
                                Some(Err(err)) => Logger::err(&err.to_string()),
                                None => Logger::warn_long("Invalid database", words[1])
                            }
                        }
                        1 => Logger::warn("Too few parameters"),
                        _ => Logger::warn("Too many parameters")
                    }
                }
                _ => {
                    Logger::err("Invalid command");
                }
            }
        }
    })
}

/// Lifts every mute that ran out by `now`, returns how many records were cleared.
pub async fn sweep_expired_mutes(platform: &dyn Platform, stores: &Stores, now: DateTime<Utc>) -> usize {
    let expired = match stores.mutes.get_expired(now).await {
        Ok(expired) => expired,
        Err(err) => {
            Logger::err_long("Failed to read expired mutes", &err.to_string());
            return 0;
        }
    };

    let mut cleared = 0;
    for record in expired {
        let _guard = stores.locks.lock((record.user_id, record.guild_id)).await;
        let member = platform.member(record.guild_id, record.user_id).await;
        let role = platform.find_role_by_name(record.guild_id, MUTED_ROLE).await;

        // the record may have been moved or lifted since the scan
        if !is_unchanged(&stores.mutes, &record).await {
            Logger::debug("Skipped renewed mute", &format!("{} in {}", record.user_id, record.guild_id));
            continue;
        }

        // members that left or a deleted role leave nothing to take away
        if let (Some(member), Some(role)) = (&member, &role) {
            if member.has_role(role.id) {
                if let Err(err) = platform.remove_role(record.guild_id, record.user_id, role.id).await {
                    Logger::warn_long(&format!("Failed to unmute {}", member.name), &err.to_string());
                    continue;
                }
            }
        }

        match stores.mutes.delete_if(record.user_id, record.guild_id, record.unmute_at).await {
            Ok(true) => cleared += 1,
            Ok(false) => continue,
            Err(err) => {
                Logger::err_long("Failed to delete mute", &err.to_string());
                continue;
            }
        }

        let name = member.map(|member| member.name).unwrap_or_else(|| record.user_id.to_string());
        Logger::debug("Mute expired", &format!("{} in {}", name, record.guild_id));
        stores.feeds.submit_text(platform, FeedType::Modlog, record.guild_id, &format!(
            "🔊 **{}** (ID:{}) was unmuted (time expired)", name, record.user_id)).await;
    }
    cleared
}

async fn is_unchanged(mutes: &MutesDB, record: &MuteRecord) -> bool {
    match mutes.get(record.user_id, record.guild_id).await {
        Ok(current) => current.is_some_and(|current| current.unmute_at == record.unmute_at),
        Err(err) => {
            Logger::err_long("Failed to read mute", &err.to_string());
            false
        }
    }
}

#[cfg(feature = "mute_sweeper")]
pub fn mute_sweeper(platform: Arc<dyn Platform>, stores: Stores) -> BoxedFuture<'static, ()> {
    Box::pin(async move {
        let interval = ConfigDB::get_instance()
            .get_or("sweep_interval", &DEFAULT_SWEEP_INTERVAL.to_string()).await
            .parse::<u64>()
            .unwrap_or(DEFAULT_SWEEP_INTERVAL)
            .max(1);
        Logger::info_long("Sweeping mutes every", &format!("{} seconds", interval));
        loop {
            tokio::time::sleep(Duration::from_secs(interval)).await;
            let cleared = sweep_expired_mutes(platform.as_ref(), &stores, Utc::now()).await;
            if cleared > 0 {
                Logger::info_long("Lifted expired mutes", &cleared.to_string());
            }
        }
    })
}
