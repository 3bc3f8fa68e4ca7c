
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;

use std::sync::Arc;
#[cfg(feature = "mute_sweeper")]
use std::sync::atomic::{AtomicBool, Ordering};

use crate::commands::{CommandManager, Stores};
use crate::utility::*;
use crate::databases::*;


pub const DEFAULT_PREFIX: &str = "%";

pub struct Handler {
    command_manager: CommandManager,
    #[cfg_attr(not(feature = "mute_sweeper"), allow(unused))]
    stores: Stores,
    #[cfg(feature = "mute_sweeper")]
    sweeping: AtomicBool,
}

impl Handler {

    pub fn new(command_manager: CommandManager, stores: Stores) -> Handler {
        Handler {
            command_manager,
            stores,
            #[cfg(feature = "mute_sweeper")]
            sweeping: AtomicBool::new(false),
        }
    }

    // ready fires again on reconnects, the sweeper must only run once
    #[cfg(feature = "mute_sweeper")]
    fn start_sweeper(&self, ctx: Context) {
        if !self.sweeping.swap(true, Ordering::SeqCst) {
            let platform: Arc<dyn Platform> = Arc::new(Resolver::new(ctx));
            tokio::spawn(mute_sweeper(platform, self.stores.clone()));
        }
    }

    #[cfg(not(feature = "mute_sweeper"))]
    fn start_sweeper(&self, _ctx: Context) {}

}

#[async_trait]
impl EventHandler for Handler {

    async fn ready(&self, ctx: Context, ready: Ready) {

        Logger::info_long("Connected as", &ready.user.name);
        self.start_sweeper(ctx);
    }

    async fn message(&self, ctx: Context, msg: Message) {

        if msg.author.bot {
            return;
        }

        let prefix = ConfigDB::get_instance()
            .get_or("command_prefix", DEFAULT_PREFIX).await;
        let message = MessageManager::new(Arc::new(Resolver::new(ctx)), &msg, &prefix);

        if message.is_command() {
            self.command_manager.execute(message).await;
        }
    }

}
