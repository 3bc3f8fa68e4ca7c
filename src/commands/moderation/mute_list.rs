
use nonempty::nonempty;
use chrono::Utc;

use std::sync::Arc;

use crate::commands::command::{Command, CommandParams};
use crate::commands::error::CommandError;
use crate::commands::moderation::*;
use crate::databases::*;
use crate::utility::*;


pub struct MuteListCommand {
    mutes: Arc<MutesDB>,
}

impl MuteListCommand {

    pub fn new(mutes: Arc<MutesDB>) -> MuteListCommand {
        MuteListCommand { mutes }
    }

    async fn list(&self, message: &MessageManager) -> Result<String, CommandError> {
        let platform = message.get_platform();
        let guild_id = message.get_guild()
            .ok_or_else(|| CommandError::InvalidArguments("This command is not available in Direct Messages".to_string()))?;

        let muted_role = find_muted_role(message, guild_id).await?;
        let guild_name = platform.guild(guild_id).await
            .map(|guild| guild.name)
            .unwrap_or_else(|| guild_id.to_string());
        let records = self.mutes.get_for_guild(guild_id).await
            .map_err(|err| external_failure("list the mutes of", &guild_name, err))?;
        let now = Utc::now();

        let mut lines = Vec::new();
        let holders = platform.members_with_role(guild_id, muted_role.id).await;
        for member in holders.iter() {
            let mut line = format!("\n**{}** (ID:{})", member.name, member.id);
            if let Some(record) = records.iter().find(|record| record.user_id == member.id) {
                line.push_str(&format!(" ends in {}", format_duration(record.remaining(now))));
            }
            lines.push(line);
        }

        // records of users that left the guild are listed by id only
        for record in records.iter() {
            if platform.member(guild_id, record.user_id).await.is_some() {
                continue;
            }
            lines.push(format!("\nID:{} ends in {}", record.user_id, format_duration(record.remaining(now))));
        }

        let header = format!("{}**{}** users muted on **{}**:", Severity::Success.prefix(), lines.len(), guild_name);
        Ok(Sender::fit_lines(&header, &lines))
    }

}

impl Command for MuteListCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "list".to_string()
        ])
            .parent("mute")
            .help("lists currently-muted users")
            .example("mute list")
    }

    fn level(&self) -> PermLevel {
        PermLevel::Moderator
    }

    fn available_in_dm(&self) -> bool {
        false
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool> {
        Box::pin(
            async move {
                let message = &params.message;
                match self.list(message).await {
                    Ok(list) => message.reply(&list).await,
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

    use chrono::Duration;

    fn message(platform: &Arc<MockPlatform>, content: &str) -> MessageManager {
        MessageManager::from_parts(
            platform.clone(), Some(GUILD_ID), COMMANDS_CHANNEL, MOD_ID, "Moderator", content, "%")
    }

    #[tokio::test]
    async fn holders_and_departed_users_are_counted_once() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new());

        assert!(manager.execute(message(&platform, "%mute Regular for 1h")).await);
        stores.mutes.set(OTHER_ID, GUILD_ID, Utc::now() + Duration::minutes(5)).await.unwrap();

        assert!(manager.execute(message(&platform, "%mute list")).await);
        let list = platform.last_message_in(COMMANDS_CHANNEL);
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines[0], "✅ **2** users muted on **Discord API**:");
        assert!(lines[1].starts_with(&format!("**Regular** (ID:{}) ends in ", MEMBER_ID)));
        assert!(lines[2].starts_with(&format!("ID:{} ends in ", OTHER_ID)));
        assert_eq!(lines.len(), 3);
    }

    #[tokio::test]
    async fn holders_without_records_have_no_end() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new());
        platform.edit(|guild| guild.members.iter_mut()
            .filter(|member| member.id == MEMBER_ID)
            .for_each(|member| member.roles.push(MUTED_ROLE_ID)));

        assert!(manager.execute(message(&platform, "%mute list")).await);
        assert_eq!(platform.last_message_in(COMMANDS_CHANNEL),
            format!("✅ **1** users muted on **Discord API**:\n**Regular** (ID:{})", MEMBER_ID));
    }

    #[tokio::test]
    async fn overdue_mutes_show_negative_time() {
        let stores = Stores::in_memory().unwrap();
        let command = MuteListCommand::new(Arc::clone(&stores.mutes));
        let platform = Arc::new(MockPlatform::new());
        stores.mutes.set(OTHER_ID, GUILD_ID, Utc::now() - Duration::minutes(2)).await.unwrap();

        let list = command.list(&message(&platform, "%mute list")).await.unwrap();
        assert!(list.contains(&format!("ID:{} ends in -2 minutes", OTHER_ID)));
    }

    #[tokio::test]
    async fn long_lists_name_the_hidden_rest() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new());
        let now = Utc::now();
        for i in 0..200u64 {
            let user = serenity::model::id::UserId::new(300000000000000000 + i);
            stores.mutes.set(user, GUILD_ID, now + Duration::hours(1)).await.unwrap();
        }

        assert!(manager.execute(message(&platform, "%mute list")).await);
        let list = platform.last_message_in(COMMANDS_CHANNEL);
        assert!(list.chars().count() <= MESSAGE_LIMIT);
        assert!(list.starts_with("✅ **200** users muted on **Discord API**:"));

        let shown = list.lines().filter(|line| line.starts_with("ID:")).count();
        assert!(shown > 0 && shown < 200);
        assert!(list.ends_with(&format!("… and {} more", 200 - shown)));
    }

    #[tokio::test]
    async fn missing_role_is_reported() {
        let stores = Stores::in_memory().unwrap();
        let command = MuteListCommand::new(Arc::clone(&stores.mutes));
        let platform = Arc::new(MockPlatform::new().without_muted_role());
        assert_eq!(command.list(&message(&platform, "%mute list")).await, Err(CommandError::muted_role_missing("%")));
    }

}
