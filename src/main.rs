
// the nonempty! macro expands to `alloc::vec!`
extern crate alloc;

use serenity::prelude::{Client, GatewayIntents};

use utility::*;
use commands::{CommandManager, Stores};
use handler::Handler;
use databases::*;

mod handler;
mod utility;
mod databases;
mod commands;


#[tokio::main]
async fn main() {

    // setup
    let Some(token) = setup_token().await else {
        Logger::err("No token configured, set DISCORD_TOKEN or the \"token\" config key");
        return;
    };
    let stores = match Stores::open() {
        Ok(stores) => stores,
        Err(err) => {
            Logger::err_long("Failed to open databases", &err.to_string());
            return;
        }
    };
    let command_manager = CommandManager::new(&stores);
    let handler = Handler::new(command_manager, stores);

    // start threads
    let intents = GatewayIntents::GUILDS                    |
                  GatewayIntents::GUILD_MEMBERS             |
                  GatewayIntents::GUILD_PRESENCES           |
                  GatewayIntents::GUILD_MESSAGES            |
                  GatewayIntents::DIRECT_MESSAGES           |
                  GatewayIntents::MESSAGE_CONTENT;
    let mut client = match Client::builder(token, intents).event_handler(handler).await {
        Ok(client) => client,
        Err(err) => {
            Logger::err_long("Error creating client", &err.to_string());
            return;
        }
    };

    #[cfg(feature = "db_interface")]
    spawn("database interface", database_interface());

    if let Err(err) = client.start().await {
        Logger::err_long("Client stopped", &err.to_string());
    }
}

async fn setup_token() -> Option<String> {
    let config = ConfigDB::get_instance();
    if let Ok(token) = std::env::var("DISCORD_TOKEN") {
        if let Err(err) = config.set("token", &token).await {
            Logger::warn_long("Failed to store token", &err.to_string());
        }
        return Some(token);
    }
    config.get("token").await
        .map(|entry| entry.value)
        .ok()
        .filter(|token| !token.is_empty())
}
