
use serenity::model::prelude::*;

use std::sync::Arc;

use crate::utility::*;


/// An incoming message together with the platform it arrived on.
#[derive(Clone)]
pub struct MessageManager {
    platform: Arc<dyn Platform>,
    guild_id: Option<GuildId>,
    channel_id: ChannelId,
    author_id: UserId,
    author_name: String,
    prefix: String,
    command: Option<String>,
    words: Vec<String>,
}

impl MessageManager {

    pub fn new(platform: Arc<dyn Platform>, message: &Message, prefix: &str) -> MessageManager {
        MessageManager::from_parts(
            platform,
            message.guild_id,
            message.channel_id,
            message.author.id,
            &message.author.name,
            &message.content,
            prefix)
    }

    pub fn from_parts(platform: Arc<dyn Platform>,
                      guild_id: Option<GuildId>,
                      channel_id: ChannelId,
                      author_id: UserId,
                      author_name: &str,
                      content: &str,
                      prefix: &str
    ) -> MessageManager {
        let mut manager = MessageManager {
            platform,
            guild_id,
            channel_id,
            author_id,
            author_name: author_name.to_string(),
            prefix: prefix.to_string(),
            command: None,
            words: Vec::new(),
        };
        manager.parse_message(content);
        manager
    }

    fn parse_message(&mut self, content: &str) {
        // obtain words
        self.words = content
            .split_whitespace()
            .map(|word| word.to_string())
            .collect();

        // obtain command
        if let Some(first) = self.words.first() {
            self.command = first.strip_prefix(&self.prefix)
                .filter(|command| !command.is_empty())
                .map(|command| command.to_lowercase());
        }
    }

    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }

    pub fn get_command(&self) -> Option<String> {
        self.command.clone()
    }

    pub fn get_prefix(&self) -> &str {
        &self.prefix
    }

    /// Words following the command word.
    pub fn get_arguments(&self) -> &[String] {
        match self.words.is_empty() {
            true  => &[],
            false => &self.words[1..]
        }
    }

    pub fn payload(&self, starting_from: usize) -> String {
        self.get_arguments()
            .iter()
            .skip(starting_from)
            .map(|word| word.as_str())
            .collect::<Vec<&str>>()
            .join(" ")
    }

    // ---- Replies ---- //

    pub async fn reply(&self, content: &str) -> bool {
        Sender::send_response(content, self).await
    }

    pub async fn reply_with(&self, severity: Severity, content: &str) -> bool {
        self.reply(&format!("{}{}", severity.prefix(), content)).await
    }

    pub async fn reply_success(&self, content: &str) -> bool {
        self.reply_with(Severity::Success, content).await
    }

    pub async fn reply_warning(&self, content: &str) -> bool {
        self.reply_with(Severity::Warning, content).await
    }

    pub async fn reply_error(&self, content: &str) -> bool {
        self.reply_with(Severity::Error, content).await
    }

    // ---- Basics ---- //

    pub fn get_platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn get_channel(&self) -> ChannelId {
        self.channel_id
    }

    pub fn get_guild(&self) -> Option<GuildId> {
        self.guild_id
    }

    pub fn get_author(&self) -> UserId {
        self.author_id
    }

    pub fn get_author_name(&self) -> &str {
        &self.author_name
    }

}
