
use serenity::model::guild::VerificationLevel;
use nonempty::nonempty;

use crate::commands::command::{Command, CommandParams};
use crate::commands::error::CommandError;
use crate::utility::*;


pub struct ServerInfoCommand;

fn verification_name(level: VerificationLevel) -> &'static str {
    match level {
        VerificationLevel::None   => "None",
        VerificationLevel::Low    => "Low",
        VerificationLevel::Medium => "Medium",
        VerificationLevel::High   => "High",
        VerificationLevel::Higher => "(╯°□°）╯︵ ┻━┻",
        _ => "Unknown",
    }
}

/// Renders the info block for a guild.
pub fn server_info(guild: &GuildSnapshot, owner: Option<&MemberInfo>, online: usize) -> String {
    let owner = match owner {
        Some(MemberInfo { name, discriminator: Some(discriminator), .. }) => format!("**{}** #{:04}", name, discriminator),
        Some(owner) => format!("**{}**", owner.name),
        None => format!("**{}**", guild.owner_id),
    };

    let mut info = format!("🖥 Information about **{}**:", guild.name);
    info.push_str(&format!("\n{}ID: **{}**", LINESTART, guild.id));
    info.push_str(&format!("\n{}Owner: {}", LINESTART, owner));
    info.push_str(&format!("\n{}Location: **{}**", LINESTART, guild.locale));
    info.push_str(&format!("\n{}Creation: **{}**", LINESTART, format_creation_time(guild.id.get())));
    info.push_str(&format!("\n{}Users: **{}** ({} online)", LINESTART, guild.member_count, online));
    info.push_str(&format!("\n{}Channels: **{}** Text, **{}** Voice", LINESTART,
        guild.count_channels(ChannelKind::Text), guild.count_channels(ChannelKind::Voice)));
    info.push_str(&format!("\n{}Verification: **{}**", LINESTART, verification_name(guild.verification_level)));
    if let Some(icon) = &guild.icon_url {
        info.push_str(&format!("\n{}Server Icon: {}", LINESTART, icon));
    }
    info
}

impl Command for ServerInfoCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "server".to_string(),
            "serverinfo".to_string(),
            "srvr".to_string(),
            "guildinfo".to_string(),
        ])
            .help("shows information about the server")
    }

    fn available_in_dm(&self) -> bool {
        false
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool> {
        Box::pin(
            async move {
                let message = &params.message;
                let platform = message.get_platform();
                let guild = match message.get_guild() {
                    Some(guild_id) => platform.guild(guild_id).await,
                    None => None,
                };
                let guild = match guild {
                    Some(guild) => guild,
                    None => return CommandError::ExternalCallFailure {
                        action: "look up".to_string(),
                        target: "this server".to_string(),
                    }.report(message).await,
                };

                let online = platform.members(guild.id).await
                    .iter()
                    .filter(|member| member.is_online())
                    .count();
                let owner = platform.member(guild.id, guild.owner_id).await;
                message.reply(&server_info(&guild, owner.as_ref(), online)).await
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

    #[tokio::test]
    async fn info_lists_the_guild() {
        let stores = Stores::in_memory().unwrap();
        let manager = CommandManager::new(&stores);
        let platform = Arc::new(MockPlatform::new());
        let message = MessageManager::from_parts(
            platform.clone(), Some(GUILD_ID), COMMANDS_CHANNEL, MEMBER_ID, "Regular", "%srvr", "%");

        assert!(manager.execute(message).await);
        let info = platform.last_message_in(COMMANDS_CHANNEL);
        let lines: Vec<&str> = info.lines().collect();
        assert_eq!(lines[0], "🖥 Information about **Discord API**:");
        assert_eq!(lines[1], format!("➤ ID: **{}**", GUILD_ID));
        assert_eq!(lines[2], "➤ Owner: **jagrosh** #0001");
        assert_eq!(lines[3], "➤ Location: **en-US**");
        assert!(lines[4].starts_with("➤ Creation: **"));
        assert_eq!(lines[5], "➤ Users: **4** (3 online)");
        assert_eq!(lines[6], "➤ Channels: **3** Text, **1** Voice");
        assert_eq!(lines[7], "➤ Verification: **Low**");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn highest_verification_flips_tables() {
        let mut guild = MockGuild::new().snapshot();
        guild.verification_level = VerificationLevel::Higher;
        guild.icon_url = Some("https://cdn.discordapp.com/icons/1/a.png".to_string());

        let info = server_info(&guild, None, 0);
        assert!(info.contains("➤ Verification: **(╯°□°）╯︵ ┻━┻**"));
        assert!(info.contains(&format!("➤ Owner: **{}**", OWNER_ID)));
        assert!(info.ends_with("➤ Server Icon: https://cdn.discordapp.com/icons/1/a.png"));
    }

}
