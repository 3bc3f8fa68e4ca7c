
use thiserror::Error;

use crate::utility::*;


/// Reasons a command invocation ends without its side effect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {

    #[error("{0}")]
    InvalidArguments(String),

    #[error("I need the {0} permission to do that!")]
    MissingPermissions(String),

    #[error("No \"{role}\" role exists! Please add and setup up a \"{role}\" role, or use `{prefix}mute setup` to have one made automatically.")]
    ConfigurationMissing { role: String, prefix: String },

    #[error("**{target}** cannot be {action} because they are listed as {level}")]
    InsufficientPrivilegeDelta { target: String, action: String, level: PermLevel },

    #[error("{0}")]
    HierarchyViolation(String),

    #[error("Failed to {action} **{target}**")]
    ExternalCallFailure { action: String, target: String },

}

impl CommandError {

    pub fn severity(&self) -> Severity {
        match self {
            CommandError::ExternalCallFailure { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn muted_role_missing(prefix: &str) -> CommandError {
        CommandError::ConfigurationMissing {
            role: MUTED_ROLE.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Replies with the error and reports the invocation as failed.
    pub async fn report(&self, message: &MessageManager) -> bool {
        message.reply_with(self.severity(), &self.to_string()).await;
        false
    }

}
