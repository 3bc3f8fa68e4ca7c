
use serenity::model::permissions::Permissions;

use crate::commands::arguments::{Argument, Arguments};
use crate::commands::error::CommandError;
use crate::utility::*;


pub struct CommandParams {
    pub message: MessageManager,
    pub arguments: Arguments,
}

impl CommandParams {
    pub fn new(message: MessageManager, arguments: Arguments) -> Self {
        Self { message, arguments }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchType {
    /// index into the command table and how many argument words the path used up
    Exact { index: usize, depth: usize },
    Fuzzy(String),
    None
}

pub trait Command: Send + Sync {

    fn define_usage(&self) -> UsageBuilder;

    fn arguments(&self) -> Vec<Argument> {
        Vec::new()
    }

    /// Word that splits the arguments, matched case-insensitively with surrounding whitespace.
    fn separator(&self) -> Option<&'static str> {
        None
    }

    fn level(&self) -> PermLevel {
        PermLevel::Everyone
    }

    fn available_in_dm(&self) -> bool {
        true
    }

    /// Guild permissions the bot itself needs before running.
    fn required_permissions(&self) -> Permissions {
        Permissions::empty()
    }

    fn execute(&self, params: CommandParams) -> BoxedFuture<'_, bool>;

    fn get_path(&self) -> String {
        self.define_usage().path()
    }

    fn usage(&self, prefix: &str) -> String {
        self.define_usage().build(prefix, &self.arguments(), self.separator())
    }

    fn invalid_usage<'a>(&'a self, message: &'a MessageManager, error: CommandError) -> BoxedFuture<'a, bool> {
        Box::pin(
            async move {
                let usage = self.usage(message.get_prefix());
                message.reply_warning(&format!("{}\nUsage: {}", error, usage)).await;
                false
            }
        )
    }

}
