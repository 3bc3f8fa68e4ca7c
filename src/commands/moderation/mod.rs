pub mod feed;
pub mod mute;
pub mod mute_list;
pub mod mute_setup;
pub mod unmute;

use serenity::model::id::GuildId;

use crate::commands::error::CommandError;
use crate::utility::*;


pub const DEFAULT_REASON: &str = "[no reason specified]";

/// Looks up the guild's "Muted" role, fresh on every call.
pub async fn find_muted_role(message: &MessageManager, guild_id: GuildId) -> Result<RoleInfo, CommandError> {
    message.get_platform()
        .find_role_by_name(guild_id, MUTED_ROLE).await
        .ok_or_else(|| CommandError::muted_role_missing(message.get_prefix()))
}

/// Makes sure the bot ranks above both the target and the role it hands out.
pub async fn check_hierarchy(platform: &dyn Platform,
                             guild: &GuildSnapshot,
                             target: &MemberInfo,
                             role: &RoleInfo,
                             action: &str
) -> Result<(), CommandError> {
    let bot = platform.current_member(guild.id).await
        .ok_or_else(|| CommandError::HierarchyViolation(format!("I cannot {} **{}** right now", action, target.name)))?;
    if !guild.can_interact_with_member(&bot, target) {
        return Err(CommandError::HierarchyViolation(
            format!("I cannot {} **{}** due to permission hierarchy", action, target.name)));
    }
    if !guild.can_interact_with_role(&bot, role) {
        return Err(CommandError::HierarchyViolation(
            format!("I cannot {} **{}** because the \"{}\" role is above my highest role", action, target.name, role.name)));
    }
    Ok(())
}

pub fn external_failure(action: &str, target: &str, err: anyhow::Error) -> CommandError {
    Logger::err_long(&format!("Failed to {} {}", action, target), &err.to_string());
    CommandError::ExternalCallFailure {
        action: action.to_string(),
        target: target.to_string(),
    }
}
