
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;
use nonempty::nonempty;

use std::sync::Arc;

use crate::commands::arguments::{Argument, ArgumentType};
use crate::commands::command::{Command, CommandParams};
use crate::commands::command_manager::MuteLocks;
use crate::commands::error::CommandError;
use crate::commands::moderation::*;
use crate::databases::*;
use crate::utility::*;


pub struct UnmuteCommand {
    feeds: Arc<FeedHandler>,
    mutes: Arc<MutesDB>,
    locks: Arc<MuteLocks>,
}

impl UnmuteCommand {

    pub fn new(feeds: Arc<FeedHandler>, mutes: Arc<MutesDB>, locks: Arc<MuteLocks>) -> UnmuteCommand {
        UnmuteCommand { feeds, mutes, locks }
    }

    async fn unmute(&self, message: &MessageManager, guild_id: GuildId, target: &MemberInfo) -> Result<(), CommandError> {
        let platform = message.get_platform();
        let _guard = self.locks.lock((target.id, guild_id)).await;

        let muted_role = find_muted_role(message, guild_id).await?;
        let record = self.mutes.get(target.id, guild_id).await
            .map_err(|err| external_failure("unmute", &target.name, err))?;
        let has_role = target.has_role(muted_role.id);
        if !has_role && record.is_none() {
            return Err(CommandError::InvalidArguments(format!("**{}** is not muted", target.name)));
        }

        if has_role {
            let guild = platform.guild(guild_id).await
                .ok_or_else(|| external_failure("unmute", &target.name, anyhow::anyhow!("guild {} is not available", guild_id)))?;
            check_hierarchy(platform, &guild, target, &muted_role, "unmute").await?;
            platform.remove_role(guild_id, target.id, muted_role.id).await
                .map_err(|err| external_failure("unmute", &target.name, err))?;
        }
        self.mutes.delete(target.id, guild_id).await
            .map_err(|err| external_failure("unmute", &target.name, err))?;

        message.reply_success(&format!("**{}** was unmuted", target.name)).await;
        self.feeds.submit_text(platform, FeedType::Modlog, guild_id, &format!(
            "🔊 **{}** unmuted **{}** (ID:{})", message.get_author_name(), target.name, target.id)).await;
        Ok(())
    }

}

impl Command for UnmuteCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "unmute".to_string()
        ])
            .help("removes a mute before it runs out")
            .example("unmute @BadBoy")
    }

    fn arguments(&self) -> Vec<Argument> {
        vec![
            Argument::new("user", ArgumentType::LocalUser, true),
        ]
    }

    fn level(&self) -> PermLevel {
        PermLevel::Moderator
    }

    fn available_in_dm(&self) -> bool {
        false
    }

    fn required_permissions(&self) -> Permissions {
        Permissions::MANAGE_ROLES
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool> {
        Box::pin(
            async move {
                let message = &params.message;
                let (Some(guild_id), Some(target)) = (message.get_guild(), params.arguments.member(0)) else {
                    return self.invalid_usage(message,
                        CommandError::InvalidArguments("Please include a `user`".to_string())).await;
                };

                match self.unmute(message, guild_id, target).await {
                    Ok(()) => true,
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

    fn message(platform: &Arc<MockPlatform>, content: &str) -> MessageManager {
        MessageManager::from_parts(
            platform.clone(), Some(GUILD_ID), COMMANDS_CHANNEL, MOD_ID, "Moderator", content, "%")
    }

    async fn setup() -> (Arc<MockPlatform>, Stores, CommandManager) {
        let stores = Stores::in_memory().unwrap();
        stores.feeds.get_feeds().set_feed(GUILD_ID, FeedType::Modlog, MODLOG_CHANNEL).await.unwrap();
        let manager = CommandManager::new(&stores);
        (Arc::new(MockPlatform::new()), stores, manager)
    }

    #[tokio::test]
    async fn unmute_removes_role_and_record() {
        let (platform, stores, manager) = setup().await;
        assert!(manager.execute(message(&platform, "%mute Regular for 1h")).await);

        assert!(manager.execute(message(&platform, "%unmute regular")).await);
        assert!(!platform.roles_of(MEMBER_ID).contains(&MUTED_ROLE_ID));
        assert!(stores.mutes.get(MEMBER_ID, GUILD_ID).await.unwrap().is_none());
        assert_eq!(platform.last_message_in(COMMANDS_CHANNEL), "✅ **Regular** was unmuted");
        assert!(platform.last_message_in(MODLOG_CHANNEL).ends_with(
            &format!("🔊 **Moderator** unmuted **Regular** (ID:{})", MEMBER_ID)));
    }

    #[tokio::test]
    async fn unmuted_members_are_refused() {
        let (platform, _stores, manager) = setup().await;
        assert!(!manager.execute(message(&platform, "%unmute Regular")).await);
        assert_eq!(platform.last_message_in(COMMANDS_CHANNEL), "⚠️ **Regular** is not muted");
        assert!(platform.messages_in(MODLOG_CHANNEL).is_empty());
    }

    #[tokio::test]
    async fn stale_records_are_cleared_without_the_role() {
        let (platform, stores, manager) = setup().await;
        stores.mutes.set(MEMBER_ID, GUILD_ID, chrono::Utc::now()).await.unwrap();

        assert!(manager.execute(message(&platform, &format!("%unmute {}", MEMBER_ID))).await);
        assert!(stores.mutes.get(MEMBER_ID, GUILD_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unmute_waits_for_the_member_lock() {
        let (platform, stores, manager) = setup().await;
        assert!(manager.execute(message(&platform, "%mute Regular for 1h")).await);
        let manager = Arc::new(manager);

        let guard = stores.locks.lock((MEMBER_ID, GUILD_ID)).await;
        let unmute = tokio::spawn({
            let (platform, manager) = (platform.clone(), manager.clone());
            async move { manager.execute(message(&platform, "%unmute Regular")).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(stores.mutes.get(MEMBER_ID, GUILD_ID).await.unwrap().is_some());
        assert!(platform.roles_of(MEMBER_ID).contains(&MUTED_ROLE_ID));

        drop(guard);
        assert!(unmute.await.unwrap());
        assert!(stores.mutes.get(MEMBER_ID, GUILD_ID).await.unwrap().is_none());
    }

}
