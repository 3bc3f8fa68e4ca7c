
use serenity::model::id::{GuildId, UserId};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::commands::error::CommandError;
use crate::utility::*;


static MENTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:<@!?(\d{17,20})>|(\d{17,20}))$").expect("valid mention regex")
});

static CHANNEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:<#(\d{17,20})>|(\d{17,20}))$").expect("valid channel regex")
});

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\s*\d+\s*[a-z]*\s*,?)+$").expect("valid time regex")
});

static TIME_PART_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*([a-z]*)").expect("valid time part regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    /// a single word
    ShortString,
    /// everything up to the next separator
    LongString,
    /// a duration, converted to seconds
    Time,
    /// a member of the guild the command was used in
    LocalUser,
    /// a text channel of the guild the command was used in
    TextChannel,
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub name: &'static str,
    pub kind: ArgumentType,
    pub required: bool,
    pub min: i64,
    pub max: i64,
}

impl Argument {

    pub fn new(name: &'static str, kind: ArgumentType, required: bool) -> Argument {
        Argument { name, kind, required, min: i64::MIN, max: i64::MAX }
    }

    pub fn bounded(mut self, min: i64, max: i64) -> Argument {
        self.min = min;
        self.max = max;
        self
    }

}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Text(String),
    Seconds(i64),
    Member(MemberInfo),
    Channel(ChannelInfo),
}

/// Parsed values, one slot per declared argument.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<ArgumentValue>>,
}

impl Arguments {

    pub fn get(&self, index: usize) -> Option<&ArgumentValue> {
        self.values.get(index)?.as_ref()
    }

    pub fn member(&self, index: usize) -> Option<&MemberInfo> {
        match self.get(index) {
            Some(ArgumentValue::Member(member)) => Some(member),
            _ => None
        }
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelInfo> {
        match self.get(index) {
            Some(ArgumentValue::Channel(channel)) => Some(channel),
            _ => None
        }
    }

    pub fn seconds(&self, index: usize) -> Option<i64> {
        match self.get(index) {
            Some(ArgumentValue::Seconds(seconds)) => Some(*seconds),
            _ => None
        }
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        match self.get(index) {
            Some(ArgumentValue::Text(text)) => Some(text),
            _ => None
        }
    }

}

fn unit_seconds(unit: &str) -> Option<i64> {
    match unit {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Some(1),
        "m" | "min" | "mins" | "minute" | "minutes"      => Some(60),
        "h" | "hr" | "hrs" | "hour" | "hours"            => Some(60 * 60),
        "d" | "day" | "days"                             => Some(24 * 60 * 60),
        "w" | "week" | "weeks"                           => Some(7 * 24 * 60 * 60),
        _ => None
    }
}

/// Reads durations such as `90`, `10m`, `1h30m` or `2 hours, 5 minutes`.
pub fn parse_time(input: &str) -> Option<i64> {
    let input = input.trim().to_lowercase();
    if input.is_empty() || !TIME_REGEX.is_match(&input) {
        return None;
    }
    let mut total: i64 = 0;
    for part in TIME_PART_REGEX.captures_iter(&input) {
        let amount: i64 = part[1].parse().ok()?;
        let unit = unit_seconds(&part[2])?;
        total = total.checked_add(amount.checked_mul(unit)?)?;
    }
    Some(total)
}

pub struct ArgumentParser<'a> {
    platform: &'a dyn Platform,
    guild_id: Option<GuildId>,
}

impl<'a> ArgumentParser<'a> {

    pub fn new(platform: &'a dyn Platform, guild_id: Option<GuildId>) -> ArgumentParser<'a> {
        ArgumentParser { platform, guild_id }
    }

    fn split(payload: &str, count: usize, separator: Option<&str>) -> Vec<String> {
        let payload = payload.trim();
        if payload.is_empty() || count == 0 {
            return Vec::new();
        }
        let separator = separator.and_then(|separator| {
            Regex::new(&format!(r"(?i)\s+{}\s+", regex::escape(separator))).ok()
        });
        match separator {
            Some(regex) => regex.splitn(payload, count)
                .map(|segment| segment.trim().to_string())
                .collect(),
            None => {
                // only the last argument may contain whitespace
                let mut segments = Vec::new();
                let mut rest = payload;
                while segments.len() + 1 < count {
                    match rest.split_once(char::is_whitespace) {
                        Some((word, tail)) => {
                            segments.push(word.to_string());
                            rest = tail.trim_start();
                        },
                        None => break,
                    }
                }
                if !rest.is_empty() {
                    segments.push(rest.to_string());
                }
                segments
            }
        }
    }

    pub async fn parse(&self,
                       schema: &[Argument],
                       payload: &str,
                       separator: Option<&str>
    ) -> Result<Arguments, CommandError> {
        let segments = ArgumentParser::split(payload, schema.len(), separator);
        let mut values = Vec::with_capacity(schema.len());
        for (i, argument) in schema.iter().enumerate() {
            let segment = segments.get(i).filter(|segment| !segment.is_empty());
            match segment {
                Some(segment) => values.push(Some(self.parse_one(argument, segment).await?)),
                None if argument.required => {
                    return Err(CommandError::InvalidArguments(
                        format!("Please include a `{}`", argument.name)));
                },
                None => values.push(None),
            }
        }
        Ok(Arguments { values })
    }

    async fn parse_one(&self, argument: &Argument, segment: &str) -> Result<ArgumentValue, CommandError> {
        match argument.kind {
            ArgumentType::ShortString => {
                match segment.split_whitespace().count() {
                    1 => Ok(ArgumentValue::Text(segment.to_string())),
                    _ => Err(CommandError::InvalidArguments(
                        format!("`{}` must be a single word", argument.name))),
                }
            },
            ArgumentType::LongString => Ok(ArgumentValue::Text(segment.to_string())),
            ArgumentType::Time => {
                let seconds = parse_time(segment).ok_or_else(|| CommandError::InvalidArguments(
                    format!("`{}` is not a valid time", segment)))?;
                if seconds < argument.min || seconds > argument.max {
                    return Err(CommandError::InvalidArguments(format!(
                        "`{}` must be between {} and {}",
                        argument.name,
                        format_duration(argument.min),
                        format_duration(argument.max))));
                }
                Ok(ArgumentValue::Seconds(seconds))
            },
            ArgumentType::LocalUser => self.resolve_member(segment).await.map(ArgumentValue::Member),
            ArgumentType::TextChannel => self.resolve_channel(segment).await.map(ArgumentValue::Channel),
        }
    }

    async fn resolve_channel(&self, segment: &str) -> Result<ChannelInfo, CommandError> {
        let guild_id = self.guild_id.ok_or_else(|| CommandError::InvalidArguments(
            "Channels can only be looked up inside a server".to_string()))?;
        let channels = self.platform.guild(guild_id).await
            .map(|guild| guild.channels)
            .unwrap_or_default()
            .into_iter()
            .filter(|channel| channel.kind == ChannelKind::Text);

        // mention or raw id, else the name with or without '#'
        let id = CHANNEL_REGEX.captures(segment)
            .and_then(|captures| captures.get(1).or_else(|| captures.get(2)))
            .and_then(|id| id.as_str().parse::<u64>().ok());
        let mut matches: Vec<ChannelInfo> = match id {
            Some(id) => channels.filter(|channel| channel.id.get() == id).collect(),
            None => {
                let name = segment.trim_start_matches('#');
                channels.filter(|channel| channel.name.eq_ignore_ascii_case(name)).collect()
            }
        };
        match matches.len() {
            0 => Err(CommandError::InvalidArguments(format!("No text channel found matching `{}`", segment))),
            1 => Ok(matches.remove(0)),
            n => Err(CommandError::InvalidArguments(
                format!("Found {} text channels matching `{}`, please use a mention", n, segment))),
        }
    }

    async fn resolve_member(&self, segment: &str) -> Result<MemberInfo, CommandError> {
        let guild_id = self.guild_id.ok_or_else(|| CommandError::InvalidArguments(
            "Members can only be looked up inside a server".to_string()))?;

        // mention or raw id
        if let Some(captures) = MENTION_REGEX.captures(segment) {
            let id = captures.get(1).or_else(|| captures.get(2))
                .and_then(|id| id.as_str().parse::<u64>().ok())
                .filter(|id| *id != 0);
            if let Some(id) = id {
                return self.platform.member(guild_id, UserId::new(id)).await
                    .ok_or_else(|| CommandError::InvalidArguments(
                        format!("No member found with ID `{}`", id)));
            }
        }

        // name, optionally with discriminator
        let (name, discriminator) = match segment.rsplit_once('#') {
            Some((name, tag)) if tag.len() == 4 && tag.chars().all(|c| c.is_ascii_digit()) => {
                (name, tag.parse::<u16>().ok())
            },
            _ => (segment, None)
        };
        let name = name.trim_start_matches('@');
        let mut matches: Vec<MemberInfo> = self.platform.members(guild_id).await
            .into_iter()
            .filter(|member| member.name.eq_ignore_ascii_case(name))
            .filter(|member| discriminator.is_none() || member.discriminator == discriminator)
            .collect();
        match matches.len() {
            0 => Err(CommandError::InvalidArguments(format!("No member found matching `{}`", segment))),
            1 => Ok(matches.remove(0)),
            n => Err(CommandError::InvalidArguments(
                format!("Found {} members matching `{}`, please be more specific", n, segment))),
        }
    }

}
