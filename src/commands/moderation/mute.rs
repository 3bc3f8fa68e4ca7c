
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;
use nonempty::nonempty;
use chrono::{Duration, Utc};

use std::sync::Arc;

use crate::commands::arguments::{Argument, ArgumentType};
use crate::commands::command::{Command, CommandParams};
use crate::commands::command_manager::MuteLocks;
use crate::commands::error::CommandError;
use crate::commands::moderation::*;
use crate::databases::*;
use crate::utility::*;


/// Longest mute a moderator can hand out, in seconds.
pub const MAX_MUTE_SECONDS: i64 = 12 * 60 * 60;

pub struct MuteCommand {
    feeds: Arc<FeedHandler>,
    settings: Arc<SettingsDB>,
    mutes: Arc<MutesDB>,
    locks: Arc<MuteLocks>,
}

impl MuteCommand {

    pub fn new(feeds: Arc<FeedHandler>,
               settings: Arc<SettingsDB>,
               mutes: Arc<MutesDB>,
               locks: Arc<MuteLocks>
    ) -> MuteCommand {
        MuteCommand { feeds, settings, mutes, locks }
    }

    async fn mute(&self,
                  message: &MessageManager,
                  guild_id: GuildId,
                  target: &MemberInfo,
                  seconds: i64,
                  reason: &str
    ) -> Result<(), CommandError> {
        let platform = message.get_platform();

        // one mute per member at a time
        let _guard = self.locks.lock((target.id, guild_id)).await;

        let muted_role = find_muted_role(message, guild_id).await?;
        let guild = platform.guild(guild_id).await
            .ok_or_else(|| external_failure("mute", &target.name, anyhow::anyhow!("guild {} is not available", guild_id)))?;

        // moderators cannot mute each other
        let settings = self.settings.get_settings_for_guild(guild_id).await;
        let target_level = PermLevel::for_member(target, &guild, &settings);
        if target_level.is_at_least(self.level()) {
            return Err(CommandError::InsufficientPrivilegeDelta {
                target: target.name.to_string(),
                action: "muted".to_string(),
                level: target_level,
            });
        }

        check_hierarchy(platform, &guild, target, &muted_role, "mute").await?;

        platform.add_role(guild_id, target.id, muted_role.id).await
            .map_err(|err| external_failure("mute", &target.name, err))?;
        let unmute_at = Utc::now() + Duration::seconds(seconds);
        self.mutes.set(target.id, guild_id, unmute_at).await
            .map_err(|err| external_failure("mute", &target.name, err))?;

        let duration = format_duration(seconds);
        message.reply_success(&format!("**{}** was muted for {}", target.name, duration)).await;
        self.feeds.submit_text(platform, FeedType::Modlog, guild_id, &format!(
            "🔇 **{}** muted **{}** (ID:{}) for {} for {}",
            message.get_author_name(), target.name, target.id, duration, reason)).await;
        Ok(())
    }

}

impl Command for MuteCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "mute".to_string()
        ])
            .help("mutes a user for a limited time")
            .example("mute @BadBoy for 1 hour for spamming")
    }

    fn arguments(&self) -> Vec<Argument> {
        vec![
            Argument::new("user", ArgumentType::LocalUser, true),
            Argument::new("time", ArgumentType::Time, true).bounded(0, MAX_MUTE_SECONDS),
            Argument::new("reason", ArgumentType::LongString, false),
        ]
    }

    fn separator(&self) -> Option<&'static str> {
        Some("for")
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
                let arguments = &params.arguments;
                let (Some(guild_id), Some(target), Some(seconds)) =
                    (message.get_guild(), arguments.member(0), arguments.seconds(1)) else {
                    return self.invalid_usage(message,
                        CommandError::InvalidArguments("Please include a `user` and a `time`".to_string())).await;
                };
                let reason = arguments.text(2)
                    .map(str::trim)
                    .filter(|reason| !reason.is_empty())
                    .unwrap_or(DEFAULT_REASON);

                match self.mute(message, guild_id, target, seconds, reason).await {
                    Ok(()) => true,
                    Err(error) => error.report(message).await,
                }
            }
        )
    }

}
