
use serenity::model::permissions::Permissions;
use nonempty::nonempty;

use crate::commands::command::{Command, CommandParams};
use crate::commands::error::CommandError;
use crate::commands::moderation::*;
use crate::utility::*;


/// What the "Muted" role may not do in any text or voice channel.
pub const MUTED_DENY: Permissions = Permissions::SEND_MESSAGES
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::SPEAK);

pub struct MuteSetupCommand;

impl MuteSetupCommand {

    pub fn new() -> MuteSetupCommand {
        MuteSetupCommand
    }

    async fn setup(&self, message: &MessageManager) -> Result<String, CommandError> {
        let platform = message.get_platform();
        let guild_id = message.get_guild()
            .ok_or_else(|| CommandError::InvalidArguments("This command is not available in Direct Messages".to_string()))?;

        if let Some(role) = platform.find_role_by_name(guild_id, MUTED_ROLE).await {
            return Err(CommandError::InvalidArguments(format!("A \"{}\" role already exists!", role.name)));
        }

        let role = platform.create_role(guild_id, MUTED_ROLE).await
            .map_err(|err| external_failure("create", MUTED_ROLE, err))?;
        Logger::info_long("Created role", &format!("{} in {}", role.name, guild_id));

        let channels = platform.guild(guild_id).await
            .map(|guild| guild.channels)
            .unwrap_or_default();
        let mut updated = 0;
        let mut failed = 0;
        for channel in channels.iter().filter(|channel| channel.kind != ChannelKind::Other) {
            match platform.deny_role_in_channel(channel.id, role.id, MUTED_DENY).await {
                Ok(()) => updated += 1,
                Err(err) => {
                    Logger::warn_long(&format!("Failed to update #{}", channel.name), &err.to_string());
                    failed += 1;
                }
            }
        }

        let mut result = format!("Created the **{}** role and updated **{}** channels", role.name, updated);
        if failed > 0 {
            result.push_str(&format!(", **{}** channels could not be updated", failed));
        }
        Ok(result)
    }

}

impl Command for MuteSetupCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "setup".to_string()
        ])
            .parent("mute")
            .help("creates a \"Muted\" role that cannot talk or react")
            .example("mute setup")
    }

    fn level(&self) -> PermLevel {
        PermLevel::Admin
    }

    fn available_in_dm(&self) -> bool {
        false
    }

    fn required_permissions(&self) -> Permissions {
        Permissions::MANAGE_ROLES | Permissions::MANAGE_CHANNELS
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool> {
        Box::pin(
            async move {
                let message = &params.message;
                match self.setup(message).await {
                    Ok(result) => message.reply_success(&result).await,
                    Err(error) => error.report(message).await,
                }
            }
        )
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::commands::command_manager::*;
    use crate::utility::mock_platform::*;

    use std::sync::Arc;

    fn message(platform: &Arc<MockPlatform>, author: serenity::model::id::UserId, content: &str) -> MessageManager {
        MessageManager::from_parts(
            platform.clone(), Some(GUILD_ID), COMMANDS_CHANNEL, author, "author", content, "%")
    }

    #[tokio::test]
    async fn setup_creates_role_and_overwrites() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new().without_muted_role());

        assert!(manager.execute(message(&platform, OWNER_ID, "%mute setup")).await);
        assert_eq!(platform.last_message_in(COMMANDS_CHANNEL), "✅ Created the **Muted** role and updated **4** channels");

        let overwrites = platform.overwrites();
        assert_eq!(overwrites.len(), 4);
        assert!(overwrites.iter().all(|(_, role, deny)| *role == MUTED_ROLE_ID && *deny == MUTED_DENY));

        // the freshly made role is usable right away
        assert!(manager.execute(message(&platform, MOD_ID, "%mute Regular for 5m")).await);
        assert!(platform.roles_of(MEMBER_ID).contains(&MUTED_ROLE_ID));
    }

    #[tokio::test]
    async fn existing_role_is_kept() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new());

        assert!(!manager.execute(message(&platform, OWNER_ID, "%mute setup")).await);
        assert_eq!(platform.last_message_in(COMMANDS_CHANNEL), "⚠️ A \"muted\" role already exists!");
        assert!(platform.overwrites().is_empty());
    }

    #[tokio::test]
    async fn moderators_cannot_run_setup() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new().without_muted_role());

        assert!(!manager.execute(message(&platform, MOD_ID, "%mute setup")).await);
        assert_eq!(platform.last_message_in(COMMANDS_CHANNEL), "⚠️ You must be at least Admin to use `mute setup`");
    }

}
