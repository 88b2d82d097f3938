//! Everything the handlers need from Discord, expressed as plain values and a single trait.
//!
//! Handlers never touch the Serenity client directly.  The live implementation lives in
//! `crate::discord`; tests substitute a recording fake.

use crate::notice::Reply;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, MessageId, Permissions, UserId};

/// The member who sent a command.
#[derive(Clone, Debug)]
pub struct Actor {
    pub permissions: Permissions,
    pub is_owner: bool,
}

impl Actor {
    /// Guild owners and administrators implicitly hold every permission.
    pub fn has(&self, required: Permissions) -> bool {
        self.is_owner
            || self.permissions.contains(Permissions::ADMINISTRATOR)
            || self.permissions.contains(required)
    }
}

/// A member a moderation action is aimed at, with the flags Discord's role hierarchy allows.
#[derive(Clone, Debug)]
pub struct Target {
    pub id: UserId,
    pub tag: String,
    pub kickable: bool,
    pub bannable: bool,
    pub moderatable: bool,
}

/// A user referenced by an event.
#[derive(Clone, Debug)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    pub tag: String,
    pub bot: bool,
    pub avatar_url: String,
}

/// A bot-addition audit log entry.
#[derive(Clone, Debug)]
pub struct AuditEntry {
    pub target_id: Option<UserId>,
    /// `None` when Discord did not say who did it, or the user could not be resolved.
    pub executor: Option<UserRef>,
}

/// A member that just joined a guild.
#[derive(Clone, Debug)]
pub struct JoinedMember {
    pub guild_id: GuildId,
    pub guild_name: String,
    pub owner_id: UserId,
    pub user: UserRef,
}

/// A message posted in a guild channel (or a DM, when `guild_id` is `None`).
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub guild_id: Option<GuildId>,
    pub guild_name: String,
    pub guild_icon_url: Option<String>,
    pub author: UserRef,
    /// `None` outside a guild.
    pub actor: Option<Actor>,
    pub content: String,
    /// In the order Discord reports them, duplicates included.
    pub mentions: Vec<UserRef>,
    /// The first mentioned user resolved as a guild member.
    pub mentioned_member: Option<Target>,
    pub created_at: DateTime<Utc>,
    pub link: String,
}

/// Outbound calls to Discord.
#[serenity::async_trait]
pub trait Platform: Send + Sync {
    /// Most recent `limit` bot-addition audit log entries, newest first.
    async fn bot_add_entries(&self, guild_id: GuildId, limit: u8) -> Result<Vec<AuditEntry>>;
    /// Resolve a guild member together with what the bot may do to them.
    async fn target(&self, guild_id: GuildId, user_id: UserId) -> Result<Target>;
    /// The system channel, or the first text channel the bot may post in.
    async fn notification_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>>;

    async fn kick(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()>;
    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()>;
    async fn unban(&self, guild_id: GuildId, user_id: UserId) -> Result<()>;
    async fn timeout(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        duration_ms: u64,
        reason: &str,
    ) -> Result<()>;
    /// Delete up to `count` of the newest messages, skipping those too old for bulk deletion.
    /// Returns how many were deleted.
    async fn bulk_delete(&self, channel_id: ChannelId, count: u8) -> Result<usize>;

    async fn reply(&self, to: &IncomingMessage, reply: Reply) -> Result<()>;
    async fn send(&self, channel_id: ChannelId, reply: Reply) -> Result<MessageId>;
    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()>;
    async fn direct_message(&self, user_id: UserId, reply: Reply) -> Result<()>;
}
