pub mod database;
pub mod wrappers;

pub use database::DatabaseWrapper;
pub use database::DB;
pub use wrappers::ConfigDB;
pub use wrappers::SettingsDB;
pub use wrappers::GuildSettings;
pub use wrappers::MutesDB;
pub use wrappers::MuteRecord;
pub use wrappers::FeedsDB;
pub use wrappers::FeedType;
