pub mod traits;
pub mod mixed;
pub mod logger;
pub mod format;
pub mod platform;
pub mod resolver;
pub mod perm_level;
pub mod keyed_lock;
pub mod sender;
pub mod message_manager;
pub mod feed_handler;
pub mod usage_builder;
pub mod threads;

#[cfg(test)]
pub mod mock_platform;

pub use traits::{Singleton, ToMessage};
pub use mixed::{BoxedFuture, string_distance};
pub use logger::Logger;
pub use format::{format_duration, format_creation_time};
pub use platform::{Platform, GuildSnapshot, MemberInfo, RoleInfo, ChannelInfo, ChannelKind, MUTED_ROLE};
pub use resolver::Resolver;
pub use perm_level::PermLevel;
pub use keyed_lock::KeyedLock;
pub use sender::{Sender, Severity, LINESTART, MESSAGE_LIMIT};
pub use message_manager::MessageManager;
pub use feed_handler::FeedHandler;
pub use usage_builder::UsageBuilder;
pub use threads::*;
