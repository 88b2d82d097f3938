//! Who may run which command, and what the bot may do to whom.

use crate::{context::Context, platform::IncomingMessage};
use anyhow::Result;
use serenity::all::{Permissions, UserId};

/// A permission a command requires from whoever invokes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    KickMembers,
    BanMembers,
    ModerateMembers,
    ManageMessages,
}

impl Capability {
    pub fn flag(self) -> Permissions {
        match self {
            Capability::KickMembers => Permissions::KICK_MEMBERS,
            Capability::BanMembers => Permissions::BAN_MEMBERS,
            Capability::ModerateMembers => Permissions::MODERATE_MEMBERS,
            Capability::ManageMessages => Permissions::MANAGE_MESSAGES,
        }
    }

    /// Name as shown in Discord's role settings
    pub fn label(self) -> &'static str {
        match self {
            Capability::KickMembers => "Kick Members",
            Capability::BanMembers => "Ban Members",
            Capability::ModerateMembers => "Timeout Members",
            Capability::ManageMessages => "Manage Messages",
        }
    }
}

/// The capability a command requires.  `None` for commands anyone may run, or unknown commands.
pub fn required(command: &str) -> Option<Capability> {
    match command {
        "kick" => Some(Capability::KickMembers),
        "ban" | "unban" => Some(Capability::BanMembers),
        "timeout" | "mute" => Some(Capability::ModerateMembers),
        "clear" | "purge" => Some(Capability::ManageMessages),
        _ => None,
    }
}

/// Check the invoker may run `command`, replying with a rejection if not.
///
/// Returns whether the command may proceed.
pub async fn admit(ctx: &Context<'_>, msg: &IncomingMessage, command: &str) -> Result<bool> {
    let Some(capability) = required(command) else {
        return Ok(true);
    };

    let allowed = msg
        .actor
        .as_ref()
        .is_some_and(|actor| actor.has(capability.flag()));

    if !allowed {
        ctx.api
            .reply(
                msg,
                format!(
                    "❌ You need **{}** permission to use this command.",
                    capability.label()
                )
                .into(),
            )
            .await?;
    }

    Ok(allowed)
}

/// Guild-wide permissions of a member: the union of `@everyone` and all their roles.
pub fn guild_permissions(
    is_owner: bool,
    role_permissions: impl IntoIterator<Item = Permissions>,
) -> Permissions {
    if is_owner {
        return Permissions::all();
    }

    let permissions = role_permissions
        .into_iter()
        .fold(Permissions::empty(), |acc, p| acc | p);

    if permissions.contains(Permissions::ADMINISTRATOR) {
        Permissions::all()
    } else {
        permissions
    }
}

/// One side of a role hierarchy comparison.
#[derive(Clone, Copy, Debug)]
pub struct Standing {
    pub id: UserId,
    /// Position of the highest role; `0` when the member only has `@everyone`.
    pub top_role: u16,
    pub permissions: Permissions,
}

/// What the bot (`me`) may do to `target`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reach {
    pub kickable: bool,
    pub bannable: bool,
    pub moderatable: bool,
}

impl Reach {
    pub fn compute(owner_id: UserId, me: Standing, target: Standing) -> Self {
        let manageable = target.id != owner_id
            && target.id != me.id
            && (me.id == owner_id || me.top_role > target.top_role);

        if !manageable {
            return Self::default();
        }

        Self {
            kickable: me.permissions.contains(Permissions::KICK_MEMBERS),
            bannable: me.permissions.contains(Permissions::BAN_MEMBERS),
            moderatable: me.permissions.contains(Permissions::MODERATE_MEMBERS)
                && !target.permissions.contains(Permissions::ADMINISTRATOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: UserId = UserId::new(1);
    const ME: UserId = UserId::new(2);
    const THEM: UserId = UserId::new(3);

    fn standing(id: UserId, top_role: u16, permissions: Permissions) -> Standing {
        Standing {
            id,
            top_role,
            permissions,
        }
    }

    fn moderator() -> Permissions {
        Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS | Permissions::MODERATE_MEMBERS
    }

    #[test]
    fn command_requirements() {
        assert_eq!(required("kick"), Some(Capability::KickMembers));
        assert_eq!(required("ban"), Some(Capability::BanMembers));
        assert_eq!(required("unban"), Some(Capability::BanMembers));
        assert_eq!(required("mute"), Some(Capability::ModerateMembers));
        assert_eq!(required("timeout"), Some(Capability::ModerateMembers));
        assert_eq!(required("clear"), Some(Capability::ManageMessages));
        assert_eq!(required("purge"), Some(Capability::ManageMessages));
        assert_eq!(required("help"), None);
        assert_eq!(required("whatever"), None);
    }

    #[test]
    fn roles_are_combined() {
        let p = guild_permissions(
            false,
            [Permissions::SEND_MESSAGES, Permissions::KICK_MEMBERS],
        );
        assert!(p.contains(Permissions::KICK_MEMBERS | Permissions::SEND_MESSAGES));
        assert!(!p.contains(Permissions::BAN_MEMBERS));
    }

    #[test]
    fn owner_and_admin_hold_everything() {
        assert_eq!(guild_permissions(true, []), Permissions::all());
        assert_eq!(
            guild_permissions(false, [Permissions::ADMINISTRATOR]),
            Permissions::all()
        );
    }

    #[test]
    fn higher_role_can_act() {
        let reach = Reach::compute(
            OWNER,
            standing(ME, 5, moderator()),
            standing(THEM, 2, Permissions::empty()),
        );
        assert!(reach.kickable && reach.bannable && reach.moderatable);
    }

    #[test]
    fn equal_or_lower_role_cannot_act() {
        let reach = Reach::compute(
            OWNER,
            standing(ME, 3, moderator()),
            standing(THEM, 3, Permissions::empty()),
        );
        assert_eq!(reach, Reach::default());
    }

    #[test]
    fn nobody_acts_on_the_owner_or_themselves() {
        let on_owner = Reach::compute(
            OWNER,
            standing(ME, 9, moderator()),
            standing(OWNER, 0, Permissions::empty()),
        );
        assert_eq!(on_owner, Reach::default());

        let on_self = Reach::compute(
            OWNER,
            standing(ME, 9, moderator()),
            standing(ME, 9, moderator()),
        );
        assert_eq!(on_self, Reach::default());
    }

    #[test]
    fn bot_needs_the_matching_permission() {
        let reach = Reach::compute(
            OWNER,
            standing(ME, 5, Permissions::KICK_MEMBERS),
            standing(THEM, 1, Permissions::empty()),
        );
        assert!(reach.kickable);
        assert!(!reach.bannable);
        assert!(!reach.moderatable);
    }

    #[test]
    fn administrators_cannot_be_timed_out() {
        let reach = Reach::compute(
            OWNER,
            standing(ME, 5, moderator()),
            standing(THEM, 1, Permissions::ADMINISTRATOR),
        );
        assert!(reach.kickable);
        assert!(!reach.moderatable);
    }
}
