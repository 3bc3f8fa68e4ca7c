
use serenity::model::id::ChannelId;

use crate::utility::*;


/// Discord rejects messages above this many characters.
pub const MESSAGE_LIMIT: usize = 2000;

pub const LINESTART: &str = "➤ ";

/// Kept free at the end of a list for the "and K more" line.
const OVERFLOW_ROOM: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Success => "✅ ",
            Severity::Warning => "⚠️ ",
            Severity::Error   => "❌ ",
        }
    }
}

pub struct Sender;

impl Sender {

    pub fn truncate(content: &str) -> String {
        if content.chars().count() <= MESSAGE_LIMIT {
            return content.to_string();
        }
        let mut truncated: String = content.chars().take(MESSAGE_LIMIT - 3).collect();
        truncated.push_str("...");
        truncated
    }

    /// Appends whole lines while they fit in one message, then counts the ones left out.
    pub fn fit_lines(header: &str, lines: &[String]) -> String {
        let mut content = header.to_string();
        let mut length = content.chars().count();
        for (shown, line) in lines.iter().enumerate() {
            let line_length = line.chars().count();
            let room = if shown + 1 < lines.len() { OVERFLOW_ROOM } else { 0 };
            if length + line_length + room > MESSAGE_LIMIT {
                content.push_str(&format!("\n… and {} more", lines.len() - shown));
                return content;
            }
            content.push_str(line);
            length += line_length;
        }
        content
    }

    pub async fn send_to(platform: &dyn Platform, channel: ChannelId, content: &str) -> bool {
        let content = Sender::truncate(content);
        match platform.send_message(channel, &content).await {
            Ok(()) => true,
            Err(err) => {
                Logger::err_long(&format!("Failed to send message to {}", channel), &err.to_string());
                false
            }
        }
    }

    pub async fn send_response(content: &str, message: &MessageManager) -> bool {
        Sender::send_to(message.get_platform(), message.get_channel(), content).await
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn long_messages_are_cut_at_the_limit() {
        let content = "a".repeat(MESSAGE_LIMIT + 50);
        let truncated = Sender::truncate(&content);
        assert_eq!(truncated.chars().count(), MESSAGE_LIMIT);
        assert!(truncated.ends_with("..."));
        assert_eq!(Sender::truncate("short"), "short");
    }

    #[test]
    fn long_lists_say_how_much_was_left_out() {
        let lines: Vec<String> = (0..300).map(|i| format!("\nline number {:04}", i)).collect();
        let content = Sender::fit_lines("header:", &lines);
        assert!(content.chars().count() <= MESSAGE_LIMIT);
        assert!(content.starts_with("header:\nline number 0000"));

        let shown = content.lines().filter(|line| line.starts_with("line number")).count();
        assert!(content.ends_with(&format!("\n… and {} more", 300 - shown)));

        let few = &lines[..3];
        assert_eq!(Sender::fit_lines("header:", few), format!("header:{}", few.concat()));
    }

}
