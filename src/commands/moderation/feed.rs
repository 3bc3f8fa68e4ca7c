
use serenity::model::id::GuildId;
use nonempty::nonempty;
use strum::VariantNames;

use std::str::FromStr;
use std::sync::Arc;

use crate::commands::arguments::{Argument, ArgumentType};
use crate::commands::command::{Command, CommandParams};
use crate::commands::error::CommandError;
use crate::commands::moderation::*;
use crate::databases::*;
use crate::utility::*;


fn parse_feed_type(name: &str) -> Result<FeedType, CommandError> {
    FeedType::from_str(&name.to_lowercase()).map_err(|_| CommandError::InvalidArguments(format!(
        "`{}` is not a feed, choose one of: {}", name, FeedType::VARIANTS.join(", "))))
}

pub struct FeedCommand {
    feeds: Arc<FeedHandler>,
}

impl FeedCommand {

    pub fn new(feeds: Arc<FeedHandler>) -> FeedCommand {
        FeedCommand { feeds }
    }

    async fn set(&self, guild_id: GuildId, feed_type: FeedType, channel: &ChannelInfo) -> Result<String, CommandError> {
        self.feeds.get_feeds().set_feed(guild_id, feed_type, channel.id).await
            .map_err(|err| external_failure("configure", &format!("{} feed", feed_type), err))?;
        Logger::info_long("Set feed", &format!("{} in {} to #{}", feed_type, guild_id, channel.name));
        Ok(format!("The **{}** feed will now be posted in <#{}>", feed_type, channel.id))
    }

}

impl Command for FeedCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "feed".to_string()
        ])
            .help("chooses the channel a feed is posted in")
            .example("feed modlog #mod-log")
    }

    fn arguments(&self) -> Vec<Argument> {
        vec![
            Argument::new("feed", ArgumentType::ShortString, true),
            Argument::new("channel", ArgumentType::TextChannel, true),
        ]
    }

    fn level(&self) -> PermLevel {
        PermLevel::Admin
    }

    fn available_in_dm(&self) -> bool {
        false
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool> {
        Box::pin(
            async move {
                let message = &params.message;
                let arguments = &params.arguments;
                let (Some(guild_id), Some(name), Some(channel)) =
                    (message.get_guild(), arguments.text(0), arguments.channel(1)) else {
                    return self.invalid_usage(message,
                        CommandError::InvalidArguments("Please include a `feed` and a `channel`".to_string())).await;
                };

                let result = match parse_feed_type(name) {
                    Ok(feed_type) => self.set(guild_id, feed_type, channel).await,
                    Err(error) => Err(error),
                };
                match result {
                    Ok(result) => message.reply_success(&result).await,
                    Err(error) => error.report(message).await,
                }
            }
        )
    }

}

pub struct FeedRemoveCommand {
    feeds: Arc<FeedHandler>,
}

impl FeedRemoveCommand {

    pub fn new(feeds: Arc<FeedHandler>) -> FeedRemoveCommand {
        FeedRemoveCommand { feeds }
    }

    async fn remove(&self, guild_id: GuildId, name: &str) -> Result<String, CommandError> {
        let feed_type = parse_feed_type(name)?;
        let removed = self.feeds.get_feeds().remove_feed(guild_id, feed_type).await
            .map_err(|err| external_failure("remove", &format!("{} feed", feed_type), err))?;
        match removed {
            true => Ok(format!("The **{}** feed was removed", feed_type)),
            false => Err(CommandError::InvalidArguments(format!("No **{}** feed is set up", feed_type))),
        }
    }

}

impl Command for FeedRemoveCommand {

    fn define_usage(&self) -> UsageBuilder {
        UsageBuilder::new(nonempty![
            "remove".to_string()
        ])
            .parent("feed")
            .help("stops posting a feed")
            .example("feed remove modlog")
    }

    fn arguments(&self) -> Vec<Argument> {
        vec![
            Argument::new("feed", ArgumentType::ShortString, true),
        ]
    }

    fn level(&self) -> PermLevel {
        PermLevel::Admin
    }

    fn available_in_dm(&self) -> bool {
        false
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool> {
        Box::pin(
            async move {
                let message = &params.message;
                let (Some(guild_id), Some(name)) = (message.get_guild(), params.arguments.text(0)) else {
                    return self.invalid_usage(message,
                        CommandError::InvalidArguments("Please include a `feed`".to_string())).await;
                };

                match self.remove(guild_id, name).await {
                    Ok(result) => message.reply_success(&result).await,
                    Err(error) => error.report(message).await,
                }
            }
        )
    }

}
