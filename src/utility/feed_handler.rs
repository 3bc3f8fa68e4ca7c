
use serenity::model::id::GuildId;

use std::sync::Arc;

use crate::databases::*;
use crate::utility::*;


/// Posts moderation entries to the channel a guild configured for a feed.
pub struct FeedHandler {
    feeds: Arc<FeedsDB>,
}

impl FeedHandler {

    pub fn new(feeds: Arc<FeedsDB>) -> FeedHandler {
        FeedHandler { feeds }
    }

    pub fn get_feeds(&self) -> &FeedsDB {
        &self.feeds
    }

    pub async fn submit_text(&self, platform: &dyn Platform, feed_type: FeedType, guild_id: GuildId, text: &str) {
        let channel = match self.feeds.get_feed(guild_id, feed_type).await {
            Ok(Some(channel)) => channel,
            Ok(None) => return,
            Err(err) => {
                Logger::warn_long(&format!("Failed to look up {} feed", feed_type), &err.to_string());
                return;
            }
        };
        let time = chrono::Utc::now().format("%H:%M:%S");
        let entry = format!("`[{}]` {}", time, text);
        Sender::send_to(platform, channel, &entry).await;
    }

}
