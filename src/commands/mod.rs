pub mod command_manager;
pub mod command;
pub mod arguments;
pub mod error;

pub use command::Command;
pub use command_manager::{CommandManager, Stores};
pub use error::CommandError;

// ---- src/commands/casual/ ---- //

pub mod casual;

pub use casual::server_info::ServerInfoCommand;

// ---- src/commands/moderation/ ---- //

pub mod moderation;

pub use moderation::feed::{FeedCommand, FeedRemoveCommand};
pub use moderation::mute::MuteCommand;
pub use moderation::mute_list::MuteListCommand;
pub use moderation::mute_setup::MuteSetupCommand;
pub use moderation::unmute::UnmuteCommand;
