
use serenity::model::permissions::Permissions;
use strum_macros::Display;

use crate::databases::GuildSettings;
use crate::utility::*;


#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermLevel {
    Everyone,
    Moderator,
    Admin,
    #[strum(serialize = "Server Owner")]
    ServerOwner,
}

impl PermLevel {

    pub fn for_member(member: &MemberInfo, guild: &GuildSnapshot, settings: &GuildSettings) -> PermLevel {
        if guild.is_owner(member) {
            return PermLevel::ServerOwner;
        }
        let permissions = guild.permissions_of(member);
        if permissions.intersects(Permissions::ADMINISTRATOR | Permissions::MANAGE_GUILD) {
            return PermLevel::Admin;
        }
        let is_mod_role = settings.mod_role_id
            .map(|role| member.has_role(role))
            .unwrap_or(false);
        if is_mod_role || permissions.intersects(
            Permissions::MANAGE_ROLES | Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS) {
            return PermLevel::Moderator;
        }
        PermLevel::Everyone
    }

    pub fn is_at_least(&self, level: PermLevel) -> bool {
        *self >= level
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::utility::mock_platform::*;

    #[test]
    fn levels_are_ordered() {
        assert!(PermLevel::ServerOwner.is_at_least(PermLevel::Admin));
        assert!(PermLevel::Moderator.is_at_least(PermLevel::Moderator));
        assert!(!PermLevel::Everyone.is_at_least(PermLevel::Moderator));
        assert_eq!(PermLevel::ServerOwner.to_string(), "Server Owner");
    }

    #[test]
    fn level_follows_ownership_and_permissions() {
        let guild = MockGuild::new().snapshot();
        let settings = GuildSettings::default();

        let owner = member(OWNER_ID, "jagrosh", vec![]);
        let moderator = member(MOD_ID, "Moderator", vec![MOD_ROLE_ID]);
        let regular = member(MEMBER_ID, "Regular", vec![]);

        assert_eq!(PermLevel::for_member(&owner, &guild, &settings), PermLevel::ServerOwner);
        assert_eq!(PermLevel::for_member(&moderator, &guild, &settings), PermLevel::Moderator);
        assert_eq!(PermLevel::for_member(&regular, &guild, &settings), PermLevel::Everyone);
    }

    #[test]
    fn configured_mod_role_grants_moderator() {
        let guild = MockGuild::new().snapshot();
        let settings = GuildSettings { mod_role_id: Some(MUTED_ROLE_ID) };
        let holder = member(MEMBER_ID, "Regular", vec![MUTED_ROLE_ID]);
        assert_eq!(PermLevel::for_member(&holder, &guild, &settings), PermLevel::Moderator);
    }

}
