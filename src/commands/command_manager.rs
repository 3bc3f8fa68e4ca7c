
use serenity::model::id::{GuildId, UserId};

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::*;
use crate::commands::arguments::ArgumentParser;
use crate::commands::command::{CommandParams, MatchType};
use crate::commands::error::CommandError;
use crate::databases::*;
use crate::utility::*;


/// Serializes every change to one member's mute.
pub type MuteLocks = KeyedLock<(UserId, GuildId)>;

/// Shared stores the commands work on.
#[derive(Clone)]
pub struct Stores {
    pub settings: Arc<SettingsDB>,
    pub mutes: Arc<MutesDB>,
    pub feeds: Arc<FeedHandler>,
    pub locks: Arc<MuteLocks>,
}

impl Stores {

    pub fn open() -> anyhow::Result<Stores> {
        Ok(Stores {
            settings: Arc::new(SettingsDB::open()?),
            mutes: Arc::new(MutesDB::open()?),
            feeds: Arc::new(FeedHandler::new(Arc::new(FeedsDB::open()?))),
            locks: Arc::new(MuteLocks::new()),
        })
    }

    #[allow(unused)]
    pub fn in_memory() -> anyhow::Result<Stores> {
        Ok(Stores {
            settings: Arc::new(SettingsDB::in_memory()?),
            mutes: Arc::new(MutesDB::in_memory()?),
            feeds: Arc::new(FeedHandler::new(Arc::new(FeedsDB::in_memory()?))),
            locks: Arc::new(MuteLocks::new()),
        })
    }

}

pub struct CommandManager {
    commands: Vec<Box<dyn Command>>,
    table: HashMap<String, usize>,
    settings: Arc<SettingsDB>,
}

impl CommandManager {

    pub fn new(stores: &Stores) -> CommandManager {
        let mute = MuteCommand::new(
            Arc::clone(&stores.feeds),
            Arc::clone(&stores.settings),
            Arc::clone(&stores.mutes),
            Arc::clone(&stores.locks));
        CommandManager::with_commands(vec![
            Box::new(mute),
            Box::new(MuteListCommand::new(Arc::clone(&stores.mutes))),
            Box::new(MuteSetupCommand::new()),
            Box::new(UnmuteCommand::new(
                Arc::clone(&stores.feeds),
                Arc::clone(&stores.mutes),
                Arc::clone(&stores.locks))),
            Box::new(FeedCommand::new(Arc::clone(&stores.feeds))),
            Box::new(FeedRemoveCommand::new(Arc::clone(&stores.feeds))),
            Box::new(ServerInfoCommand {}),
        ], Arc::clone(&stores.settings))
    }

    pub fn with_commands(commands: Vec<Box<dyn Command>>, settings: Arc<SettingsDB>) -> CommandManager {
        let table = CommandManager::build_table(&commands);
        CommandManager { commands, table, settings }
    }

    /// Flattens the command tree into `path -> command`, aliases included.
    fn build_table(commands: &[Box<dyn Command>]) -> HashMap<String, usize> {
        let mut table = HashMap::new();
        for (index, command) in commands.iter().enumerate() {
            let usage = command.define_usage();
            let prefixes: Vec<String> = match usage.get_parent() {
                None => vec![String::new()],
                Some(parent) => commands.iter()
                    .map(|command| command.define_usage())
                    .find(|candidate| candidate.get_parent().is_none() && candidate.triggers().contains(&parent.to_string()))
                    .map(|parent_usage| parent_usage.triggers().iter().map(|trigger| format!("{} ", trigger)).collect())
                    .unwrap_or_else(|| {
                        Logger::warn_long("Command without registered parent", &usage.path());
                        vec![format!("{} ", parent)]
                    }),
            };
            for prefix in prefixes.iter() {
                for trigger in usage.triggers().iter() {
                    table.insert(format!("{}{}", prefix, trigger.to_lowercase()), index);
                }
            }
        }
        table
    }

    pub fn resolve(&self, message: &MessageManager) -> MatchType {
        let word = match message.get_command() {
            Some(word) => word,
            None => return MatchType::None,
        };

        // sub-commands win over their parents
        if let Some(next) = message.get_arguments().first() {
            let path = format!("{} {}", word, next.to_lowercase());
            if let Some(index) = self.table.get(&path) {
                return MatchType::Exact { index: *index, depth: 1 };
            }
        }
        if let Some(index) = self.table.get(&word) {
            return MatchType::Exact { index: *index, depth: 0 };
        }

        let closest = self.table.keys()
            .filter(|path| !path.contains(' '))
            .map(|trigger| (string_distance(trigger, &word), trigger))
            .filter(|(distance, trigger)| *distance <= trigger.len() / 3)
            .min();
        match closest {
            Some((_, trigger)) => MatchType::Fuzzy(trigger.to_string()),
            None => MatchType::None,
        }
    }

    async fn author_level(&self, message: &MessageManager, guild_id: GuildId) -> PermLevel {
        let platform = message.get_platform();
        let guild = platform.guild(guild_id).await;
        let member = platform.member(guild_id, message.get_author()).await;
        match (guild, member) {
            (Some(guild), Some(member)) => {
                let settings = self.settings.get_settings_for_guild(guild_id).await;
                PermLevel::for_member(&member, &guild, &settings)
            },
            _ => PermLevel::Everyone
        }
    }

    async fn check_bot_permissions(&self, command: &dyn Command, message: &MessageManager, guild_id: GuildId) -> Result<(), CommandError> {
        let required = command.required_permissions();
        if required.is_empty() {
            return Ok(());
        }
        let platform = message.get_platform();
        let granted = match (platform.guild(guild_id).await, platform.current_member(guild_id).await) {
            (Some(guild), Some(bot)) => guild.permissions_of(&bot),
            _ => serenity::model::permissions::Permissions::empty()
        };
        let missing = required - granted;
        match missing.is_empty() {
            true  => Ok(()),
            false => Err(CommandError::MissingPermissions(missing.get_permission_names().join(", ")))
        }
    }

    // note: only execute this method, when message.is_command() is true
    pub async fn execute(&self, message: MessageManager) -> bool {
        let (command, depth) = match self.resolve(&message) {
            MatchType::Exact { index, depth } => (&self.commands[index], depth),
            MatchType::Fuzzy(closest_match) => {
                message.reply_warning(&format!("Did you mean `{}{}`?", message.get_prefix(), closest_match)).await;
                return false;
            },
            MatchType::None => return false,
        };
        let path = command.get_path();

        // guild-only commands
        let guild_id = match message.get_guild() {
            Some(guild_id) => Some(guild_id),
            None if command.available_in_dm() => None,
            None => {
                message.reply_warning("This command is not available in Direct Messages").await;
                return false;
            }
        };

        // permission floor
        if command.level() > PermLevel::Everyone {
            let level = match guild_id {
                Some(guild_id) => self.author_level(&message, guild_id).await,
                None => PermLevel::Everyone,
            };
            if !level.is_at_least(command.level()) {
                Logger::debug("Refused command", &format!("{} for {} ({})", path, message.get_author_name(), level));
                message.reply_warning(&format!("You must be at least {} to use `{}`", command.level(), path)).await;
                return false;
            }
        }

        if let Some(guild_id) = guild_id {
            if let Err(error) = self.check_bot_permissions(command.as_ref(), &message, guild_id).await {
                return error.report(&message).await;
            }
        }

        // arguments
        let parser = ArgumentParser::new(message.get_platform(), guild_id);
        let payload = message.payload(depth);
        let arguments = match parser.parse(&command.arguments(), &payload, command.separator()).await {
            Ok(arguments) => arguments,
            Err(error) => return command.invalid_usage(&message, error).await,
        };

        let author = message.get_author_name().to_string();
        let success = command.execute(CommandParams::new(message, arguments)).await;
        Logger::info_long("Command", &format!("{} by {} -> {}", path, author,
            if success { "done" } else { "failed" }));
        success
    }

}
