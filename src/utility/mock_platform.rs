
use serenity::model::prelude::*;

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::utility::*;


pub const GUILD_ID: GuildId = GuildId::new(81384788765712384);

pub const OWNER_ID: UserId = UserId::new(113156185389092864);
pub const BOT_ID: UserId = UserId::new(169463754382114816);
pub const MOD_ID: UserId = UserId::new(105162317578051584);
pub const MEMBER_ID: UserId = UserId::new(135251434445733888);
pub const OTHER_ID: UserId = UserId::new(98457401363025920);

pub const EVERYONE_ROLE_ID: RoleId = RoleId::new(81384788765712384);
pub const MUTED_ROLE_ID: RoleId = RoleId::new(171008284405301248);
pub const MOD_ROLE_ID: RoleId = RoleId::new(171008284405301249);
pub const BOT_ROLE_ID: RoleId = RoleId::new(171008284405301250);

pub const GENERAL_CHANNEL: ChannelId = ChannelId::new(81384788765712384);
pub const COMMANDS_CHANNEL: ChannelId = ChannelId::new(147698382092238848);
pub const MODLOG_CHANNEL: ChannelId = ChannelId::new(147698382092238849);
pub const VOICE_CHANNEL: ChannelId = ChannelId::new(147698382092238850);

pub fn member(id: UserId, name: &str, roles: Vec<RoleId>) -> MemberInfo {
    MemberInfo {
        id,
        name: name.to_string(),
        discriminator: None,
        roles,
        status: OnlineStatus::Offline,
    }
}

fn role(id: RoleId, name: &str, position: u16, permissions: Permissions) -> RoleInfo {
    RoleInfo { id, name: name.to_string(), position, permissions }
}

fn channel(id: ChannelId, name: &str, kind: ChannelKind) -> ChannelInfo {
    ChannelInfo { id, name: name.to_string(), kind }
}

/// A small guild: owner, bot, one moderator and one regular member.
pub struct MockGuild {
    pub info: GuildSnapshot,
    pub members: Vec<MemberInfo>,
}

impl MockGuild {

    pub fn new() -> MockGuild {
        let info = GuildSnapshot {
            id: GUILD_ID,
            name: "Discord API".to_string(),
            owner_id: OWNER_ID,
            locale: "en-US".to_string(),
            icon_url: None,
            verification_level: VerificationLevel::Low,
            member_count: 4,
            channels: vec![
                channel(GENERAL_CHANNEL, "general", ChannelKind::Text),
                channel(COMMANDS_CHANNEL, "commands", ChannelKind::Text),
                channel(MODLOG_CHANNEL, "modlog", ChannelKind::Text),
                channel(VOICE_CHANNEL, "voice", ChannelKind::Voice),
            ],
            roles: vec![
                role(EVERYONE_ROLE_ID, "@everyone", 0,
                    Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS | Permissions::SPEAK),
                role(MUTED_ROLE_ID, "muted", 1, Permissions::empty()),
                role(MOD_ROLE_ID, "Moderators", 2, Permissions::KICK_MEMBERS | Permissions::MANAGE_MESSAGES),
                role(BOT_ROLE_ID, "Spectra", 3, Permissions::MANAGE_ROLES | Permissions::MANAGE_CHANNELS),
            ],
        };

        let mut owner = member(OWNER_ID, "jagrosh", vec![]);
        owner.status = OnlineStatus::Online;
        owner.discriminator = Some(1);
        let mut bot = member(BOT_ID, "Spectra", vec![BOT_ROLE_ID]);
        bot.status = OnlineStatus::Online;
        let mut moderator = member(MOD_ID, "Moderator", vec![MOD_ROLE_ID]);
        moderator.status = OnlineStatus::Idle;
        let mut regular = member(MEMBER_ID, "Regular", vec![]);
        regular.status = OnlineStatus::DoNotDisturb;

        MockGuild { info, members: vec![owner, bot, moderator, regular] }
    }

    pub fn snapshot(&self) -> GuildSnapshot {
        self.info.clone()
    }

}

pub struct MockPlatform {
    guild: Mutex<Option<MockGuild>>,
    sent: Mutex<Vec<(ChannelId, String)>>,
    overwrites: Mutex<Vec<(ChannelId, RoleId, Permissions)>>,
    fail_role_updates: AtomicBool,
}

impl MockPlatform {

    pub fn new() -> MockPlatform {
        MockPlatform {
            guild: Mutex::new(Some(MockGuild::new())),
            sent: Mutex::new(Vec::new()),
            overwrites: Mutex::new(Vec::new()),
            fail_role_updates: AtomicBool::new(false),
        }
    }

    pub fn edit(&self, fn_edit: impl FnOnce(&mut MockGuild)) {
        if let Some(guild) = self.guild.lock().unwrap().as_mut() {
            fn_edit(guild);
        }
    }

    pub fn without_guild(self) -> MockPlatform {
        *self.guild.lock().unwrap() = None;
        self
    }

    pub fn without_muted_role(self) -> MockPlatform {
        self.edit(|guild| guild.info.roles.retain(|role| role.id != MUTED_ROLE_ID));
        self
    }

    pub fn fail_role_updates(self) -> MockPlatform {
        self.fail_role_updates.store(true, Ordering::SeqCst);
        self
    }

    pub fn add_member(&self, member: MemberInfo) {
        self.edit(|guild| {
            guild.members.push(member);
            guild.info.member_count += 1;
        });
    }

    pub fn remove_member(&self, user_id: UserId) {
        self.edit(|guild| {
            guild.members.retain(|member| member.id != user_id);
            guild.info.member_count -= 1;
        });
    }

    pub fn roles_of(&self, user_id: UserId) -> Vec<RoleId> {
        self.guild.lock().unwrap().as_ref()
            .and_then(|guild| guild.members.iter().find(|member| member.id == user_id).cloned())
            .map(|member| member.roles)
            .unwrap_or_default()
    }

    pub fn sent_messages(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn messages_in(&self, channel_id: ChannelId) -> Vec<String> {
        self.sent_messages().into_iter()
            .filter(|(channel, _)| *channel == channel_id)
            .map(|(_, content)| content)
            .collect()
    }

    pub fn last_message_in(&self, channel_id: ChannelId) -> String {
        self.messages_in(channel_id).pop().unwrap_or_default()
    }

    pub fn overwrites(&self) -> Vec<(ChannelId, RoleId, Permissions)> {
        self.overwrites.lock().unwrap().clone()
    }

    fn update_roles(&self, user_id: UserId, fn_update: impl FnOnce(&mut Vec<RoleId>)) -> anyhow::Result<()> {
        if self.fail_role_updates.load(Ordering::SeqCst) {
            anyhow::bail!("Missing Access");
        }
        let mut guild = self.guild.lock().unwrap();
        let member = guild.as_mut()
            .and_then(|guild| guild.members.iter_mut().find(|member| member.id == user_id))
            .ok_or_else(|| anyhow::anyhow!("Unknown Member"))?;
        fn_update(&mut member.roles);
        Ok(())
    }

}

impl Platform for MockPlatform {

    fn current_user_id(&self) -> UserId {
        BOT_ID
    }

    fn guild<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Option<GuildSnapshot>> {
        Box::pin(async move {
            self.guild.lock().unwrap().as_ref()
                .filter(|guild| guild.info.id == guild_id)
                .map(|guild| guild.snapshot())
        })
    }

    fn members<'a>(&'a self, guild_id: GuildId) -> BoxedFuture<'a, Vec<MemberInfo>> {
        Box::pin(async move {
            self.guild.lock().unwrap().as_ref()
                .filter(|guild| guild.info.id == guild_id)
                .map(|guild| guild.members.clone())
                .unwrap_or_default()
        })
    }

    fn member<'a>(&'a self, guild_id: GuildId, user_id: UserId) -> BoxedFuture<'a, Option<MemberInfo>> {
        Box::pin(async move {
            self.members(guild_id).await
                .into_iter()
                .find(|member| member.id == user_id)
        })
    }

    fn add_role<'a>(&'a self, _guild_id: GuildId, user_id: UserId, role_id: RoleId) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.update_roles(user_id, |roles| {
                if !roles.contains(&role_id) {
                    roles.push(role_id);
                }
            })
        })
    }

    fn remove_role<'a>(&'a self, _guild_id: GuildId, user_id: UserId, role_id: RoleId) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.update_roles(user_id, |roles| roles.retain(|role| *role != role_id))
        })
    }

    fn create_role<'a>(&'a self, _guild_id: GuildId, name: &'a str) -> BoxedFuture<'a, anyhow::Result<RoleInfo>> {
        Box::pin(async move {
            let created = role(MUTED_ROLE_ID, name, 1, Permissions::empty());
            let mut guild = self.guild.lock().unwrap();
            let guild = guild.as_mut().ok_or_else(|| anyhow::anyhow!("Unknown Guild"))?;
            guild.info.roles.push(created.clone());
            Ok(created)
        })
    }

    fn deny_role_in_channel<'a>(&'a self, channel_id: ChannelId, role_id: RoleId, deny: Permissions) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.overwrites.lock().unwrap().push((channel_id, role_id, deny));
            Ok(())
        })
    }

    fn send_message<'a>(&'a self, channel_id: ChannelId, content: &'a str) -> BoxedFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push((channel_id, content.to_string()));
            Ok(())
        })
    }

}
