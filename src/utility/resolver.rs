
use serenity::model::prelude::*;
use serenity::builder::EditRole;
use serenity::all::{CacheHttp, Cache, Context, Http};

use std::sync::Arc;

use crate::utility::*;


/// Serenity-backed platform, reading guild state from the gateway cache.
#[derive(Clone)]
pub struct Resolver {
    ctx: Context,
}

impl CacheHttp for Resolver {
    fn http(&self) -> &Http {
        &self.ctx.http
    }
    fn cache(&self) -> Option<&Arc<Cache>> {
        Some(&self.ctx.cache)
    }
}

impl AsRef<Http> for Resolver {
    fn as_ref(&self) -> &Http {
        &self.ctx.http
    }
}

impl Resolver {

    pub fn new(ctx: Context) -> Resolver {
        Resolver { ctx }
    }

    fn role_info(role: &Role) -> RoleInfo {
        RoleInfo {
            id: role.id,
            name: role.name.to_string(),
            position: role.position,
            permissions: role.permissions,
        }
    }

    fn member_info(member: &Member, status: OnlineStatus) -> MemberInfo {
        MemberInfo {
            id: member.user.id,
            name: member.user.name.to_string(),
            discriminator: member.user.discriminator.map(|discriminator| discriminator.get()),
            roles: member.roles.clone(),
            status,
        }
    }

    // the cache reference must not be held across an await
    fn cached_guild(&self, guild_id: GuildId) -> Option<GuildSnapshot> {
        let guild = self.ctx.cache.guild(guild_id)?;
        Some(GuildSnapshot {
            id: guild.id,
            name: guild.name.to_string(),
            owner_id: guild.owner_id,
            locale: guild.preferred_locale.to_string(),
            icon_url: guild.icon_url(),
            verification_level: guild.verification_level,
            member_count: guild.member_count,
            channels: guild.channels.values()
                .map(|channel| ChannelInfo {
                    id: channel.id,
                    name: channel.name.to_string(),
                    kind: channel.kind.into(),
                })
                .collect(),
            roles: guild.roles.values().map(Resolver::role_info).collect(),
        })
    }

    fn cached_members(&self, guild_id: GuildId) -> Vec<MemberInfo> {
        match self.ctx.cache.guild(guild_id) {
            Some(guild) => guild.members.values()
                .map(|member| {
                    let status = guild.presences.get(&member.user.id)
                        .map(|presence| presence.status)
                        .unwrap_or(OnlineStatus::Offline);
                    Resolver::member_info(member, status)
                })
                .collect(),
            None => Vec::new()
        }
    }

    fn cached_member(&self, guild_id: GuildId, user_id: UserId) -> Option<MemberInfo> {
        let guild = self.ctx.cache.guild(guild_id)?;
        let member = guild.members.get(&user_id)?;
        let status = guild.presences.get(&user_id)
            .map(|presence| presence.status)
            .unwrap_or(OnlineStatus::Offline);
        Some(Resolver::member_info(member, status))
    }

}

impl Platform for Resolver {

    fn current_user_id(&self) -> UserId {
        self.ctx.cache.current_user().id
    }

    fn guild<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Option<GuildSnapshot>> {
        Box::pin(async move {
            self.cached_guild(guild_id)
        })
    }

    fn members<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Vec<MemberInfo>> {
        Box::pin(async move {
            self.cached_members(guild_id)
        })
    }

    fn member<'a>(&'a self, guild_id: GuildId, user_id: UserId) -> BoxedFuture<'a, Option<MemberInfo>> {
        Box::pin(async move {
            if let Some(member) = self.cached_member(guild_id, user_id) {
                return Some(member);
            }
            match guild_id.member(self, user_id).await {
                Ok(member) => Some(Resolver::member_info(&member, OnlineStatus::Offline)),
                Err(_) => None
            }
        })
    }

    fn add_role<'a>(&'a self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.ctx.http.add_member_role(guild_id, user_id, role_id, None).await?;
            Ok(())
        })
    }

    fn remove_role<'a>(&'a self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.ctx.http.remove_member_role(guild_id, user_id, role_id, None).await?;
            Ok(())
        })
    }

    fn create_role<'a>(&'a self, guild_id: GuildId, name: &'a str) -> BoxedFuture<'a, anyhow::Result<RoleInfo>> {
        Box::pin(async move {
            let builder = EditRole::new()
                .name(name)
                .permissions(Permissions::empty());
            let role = guild_id.create_role(self, builder).await?;
            Ok(Resolver::role_info(&role))
        })
    }

    fn deny_role_in_channel<'a>(&'a self, channel_id: ChannelId, role_id: RoleId, deny: Permissions) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            let overwrite = PermissionOverwrite {
                allow: Permissions::empty(),
                deny,
                kind: PermissionOverwriteType::Role(role_id),
            };
            channel_id.create_permission(self, overwrite).await?;
            Ok(())
        })
    }

    fn send_message<'a>(&'a self, channel_id: ChannelId, content: &'a str) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            channel_id.send_message(self, content.to_message()).await?;
            Ok(())
        })
    }

}
