
use serenity::model::prelude::*;

use crate::utility::*;


pub const MUTED_ROLE: &str = "Muted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
    Other,
}

impl From<ChannelType> for ChannelKind {
    fn from(kind: ChannelType) -> ChannelKind {
        match kind {
            ChannelType::Text  | ChannelType::News  => ChannelKind::Text,
            ChannelType::Voice | ChannelType::Stage => ChannelKind::Voice,
            _ => ChannelKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleInfo {
    pub id: RoleId,
    pub name: String,
    pub position: u16,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    pub id: UserId,
    pub name: String,
    pub discriminator: Option<u16>,
    pub roles: Vec<RoleId>,
    pub status: OnlineStatus,
}

impl MemberInfo {

    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_online(&self) -> bool {
        matches!(self.status, OnlineStatus::Online | OnlineStatus::Idle)
    }

}

/// Point-in-time view of a guild, taken fresh for every command.
#[derive(Debug, Clone)]
pub struct GuildSnapshot {
    pub id: GuildId,
    pub name: String,
    pub owner_id: UserId,
    pub locale: String,
    pub icon_url: Option<String>,
    pub verification_level: VerificationLevel,
    pub member_count: u64,
    pub channels: Vec<ChannelInfo>,
    pub roles: Vec<RoleInfo>,
}

impl GuildSnapshot {

    pub fn role(&self, id: RoleId) -> Option<&RoleInfo> {
        self.roles.iter().find(|role| role.id == id)
    }

    pub fn find_role_by_name(&self, name: &str) -> Option<&RoleInfo> {
        self.roles.iter().find(|role| role.name.eq_ignore_ascii_case(name))
    }

    pub fn is_owner(&self, member: &MemberInfo) -> bool {
        member.id == self.owner_id
    }

    pub fn count_channels(&self, kind: ChannelKind) -> usize {
        self.channels.iter().filter(|channel| channel.kind == kind).count()
    }

    /// Position of the member's highest role, @everyone counts as 0.
    pub fn highest_position(&self, member: &MemberInfo) -> u16 {
        member.roles.iter()
            .filter_map(|id| self.role(*id))
            .map(|role| role.position)
            .max()
            .unwrap_or(0)
    }

    pub fn permissions_of(&self, member: &MemberInfo) -> Permissions {
        if self.is_owner(member) {
            return Permissions::all();
        }
        let everyone = RoleId::new(self.id.get());
        let permissions = self.roles.iter()
            .filter(|role| role.id == everyone || member.has_role(role.id))
            .fold(Permissions::empty(), |acc, role| acc | role.permissions);
        match permissions.contains(Permissions::ADMINISTRATOR) {
            true  => Permissions::all(),
            false => permissions
        }
    }

    pub fn can_interact_with_member(&self, issuer: &MemberInfo, target: &MemberInfo) -> bool {
        if self.is_owner(issuer) {
            return true;
        }
        if self.is_owner(target) {
            return false;
        }
        self.highest_position(issuer) > self.highest_position(target)
    }

    pub fn can_interact_with_role(&self, issuer: &MemberInfo, role: &RoleInfo) -> bool {
        if self.is_owner(issuer) {
            return true;
        }
        self.highest_position(issuer) > role.position
    }

}

/// Everything the commands need from the chat platform.
pub trait Platform: Send + Sync {

    fn current_user_id(&self) -> UserId;

    fn guild<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Option<GuildSnapshot>>;

    fn members<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Vec<MemberInfo>>;

    fn member<'a>(&'a self, guild_id: GuildId, user_id: UserId) -> BoxedFuture<'a, Option<MemberInfo>>;

    fn add_role<'a>(&'a self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> BoxedFuture<'a, anyhow::Result<()>>;

    fn remove_role<'a>(&'a self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> BoxedFuture<'a, anyhow::Result<()>>;

    fn create_role<'a>(&'a self, guild_id: GuildId, name: &'a str) -> BoxedFuture<'a, anyhow::Result<RoleInfo>>;

    fn deny_role_in_channel<'a>(&'a self, channel_id: ChannelId, role_id: RoleId, deny: Permissions) -> BoxedFuture<'a, anyhow::Result<()>>;

    fn send_message<'a>(&'a self, channel_id: ChannelId, content: &'a str) -> BoxedFuture<'a, anyhow::Result<()>>;

    fn find_role_by_name<'a>(&'a self, guild_id: GuildId, name: &'a str) -> BoxedFuture<'a, Option<RoleInfo>> {
        Box::pin(async move {
            self.guild(guild_id).await?
                .find_role_by_name(name)
                .cloned()
        })
    }

    fn members_with_role<'a>(&'a self, guild_id: GuildId, role_id: RoleId) -> BoxedFuture<'a, Vec<MemberInfo>> {
        Box::pin(async move {
            self.members(guild_id).await
                .into_iter()
                .filter(|member| member.has_role(role_id))
                .collect()
        })
    }

    fn current_member<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Option<MemberInfo>> {
        Box::pin(async move {
            self.member(guild_id, self.current_user_id()).await
        })
    }

}
