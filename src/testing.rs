//! Recording stand-in for Discord, plus fixtures shared by the plugin tests.

use crate::{
    config::Config,
    context::Context,
    event::Event,
    notice::Reply,
    platform::*,
};
use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use serenity::all::{ChannelId, GuildId, MessageId, Permissions, UserId};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

pub const GUILD: GuildId = GuildId::new(10);
pub const CHANNEL: ChannelId = ChannelId::new(20);
pub const MESSAGE: MessageId = MessageId::new(30);
pub const OWNER: UserId = UserId::new(1);
pub const MODERATOR: UserId = UserId::new(2);

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    AuditLog { limit: u8 },
    Target(UserId),
    NotificationChannel,
    Kick { user: UserId, reason: String },
    Ban { user: UserId, reason: String },
    Unban(UserId),
    Timeout { user: UserId, duration_ms: u64, reason: String },
    BulkDelete { channel: ChannelId, count: u8 },
    Reply(Reply),
    Send { channel: ChannelId, reply: Reply },
    Delete { channel: ChannelId, message: MessageId },
    DirectMessage { user: UserId, reply: Reply },
}

#[derive(Default)]
pub struct FakePlatform {
    calls: Mutex<Vec<Call>>,
    pub audit_entries: Mutex<Vec<AuditEntry>>,
    pub targets: Mutex<HashMap<UserId, Target>>,
    pub notification_channel: Mutex<Option<ChannelId>>,
    /// Operation name (e.g. `"kick"`) to the error it fails with
    pub failures: Mutex<HashMap<&'static str, String>>,
    pub dms_closed: Mutex<HashSet<UserId>>,
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(&self, operation: &'static str, error: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, error.to_owned());
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Reply(reply) => Some(reply),
                _ => None,
            })
            .collect()
    }

    /// The single reply sent, which must be plain text
    pub fn only_text_reply(&self) -> String {
        let replies = self.replies();
        assert_eq!(replies.len(), 1, "expected one reply, got {:?}", replies);
        replies[0]
            .text()
            .expect("expected a text reply")
            .to_owned()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some(error) => Err(anyhow!("{}", error)),
            None => Ok(()),
        }
    }
}

#[serenity::async_trait]
impl Platform for FakePlatform {
    async fn bot_add_entries(&self, _guild_id: GuildId, limit: u8) -> Result<Vec<AuditEntry>> {
        self.record("audit_log", Call::AuditLog { limit })?;
        let entries = self.audit_entries.lock().unwrap();
        Ok(entries.iter().take(limit as usize).cloned().collect())
    }

    async fn target(&self, _guild_id: GuildId, user_id: UserId) -> Result<Target> {
        self.record("target", Call::Target(user_id))?;
        self.targets
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(anyhow!("Unknown Member"))
    }

    async fn notification_channel(&self, _guild_id: GuildId) -> Result<Option<ChannelId>> {
        self.record("notification_channel", Call::NotificationChannel)?;
        Ok(*self.notification_channel.lock().unwrap())
    }

    async fn kick(&self, _guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()> {
        self.record(
            "kick",
            Call::Kick {
                user: user_id,
                reason: reason.to_owned(),
            },
        )
    }

    async fn ban(&self, _guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()> {
        self.record(
            "ban",
            Call::Ban {
                user: user_id,
                reason: reason.to_owned(),
            },
        )
    }

    async fn unban(&self, _guild_id: GuildId, user_id: UserId) -> Result<()> {
        self.record("unban", Call::Unban(user_id))
    }

    async fn timeout(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        duration_ms: u64,
        reason: &str,
    ) -> Result<()> {
        self.record(
            "timeout",
            Call::Timeout {
                user: user_id,
                duration_ms,
                reason: reason.to_owned(),
            },
        )
    }

    async fn bulk_delete(&self, channel_id: ChannelId, count: u8) -> Result<usize> {
        self.record(
            "bulk_delete",
            Call::BulkDelete {
                channel: channel_id,
                count,
            },
        )?;
        Ok(count as usize)
    }

    async fn reply(&self, _to: &IncomingMessage, reply: Reply) -> Result<()> {
        self.record("reply", Call::Reply(reply))
    }

    async fn send(&self, channel_id: ChannelId, reply: Reply) -> Result<MessageId> {
        self.record(
            "send",
            Call::Send {
                channel: channel_id,
                reply,
            },
        )?;
        Ok(MessageId::new(99))
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        self.record(
            "delete",
            Call::Delete {
                channel: channel_id,
                message: message_id,
            },
        )
    }

    async fn direct_message(&self, user_id: UserId, reply: Reply) -> Result<()> {
        self.record(
            "direct_message",
            Call::DirectMessage {
                user: user_id,
                reply,
            },
        )?;
        if self.dms_closed.lock().unwrap().contains(&user_id) {
            return Err(anyhow!("Cannot send messages to this user"));
        }
        Ok(())
    }
}

pub fn user(id: u64, name: &str) -> UserRef {
    UserRef {
        id: UserId::new(id),
        name: name.to_owned(),
        tag: name.to_owned(),
        bot: false,
        avatar_url: format!("https://cdn.example/avatars/{}.png", id),
    }
}

pub fn target(id: u64, tag: &str) -> Target {
    Target {
        id: UserId::new(id),
        tag: tag.to_owned(),
        kickable: true,
        bannable: true,
        moderatable: true,
    }
}

/// A guild message from a moderator holding every moderation permission.
pub fn message(content: &str) -> IncomingMessage {
    let author = user(MODERATOR.get(), "mod");
    IncomingMessage {
        id: MESSAGE,
        channel_id: CHANNEL,
        channel_name: "general".to_owned(),
        guild_id: Some(GUILD),
        guild_name: "Test Guild".to_owned(),
        guild_icon_url: None,
        actor: Some(Actor {
            permissions: Permissions::KICK_MEMBERS
                | Permissions::BAN_MEMBERS
                | Permissions::MODERATE_MEMBERS
                | Permissions::MANAGE_MESSAGES,
            is_owner: false,
        }),
        author,
        content: content.to_owned(),
        mentions: Vec::new(),
        mentioned_member: None,
        created_at: Utc.with_ymd_and_hms(2026, 10, 16, 10, 15, 0).unwrap(),
        link: "https://discord.com/channels/10/20/30".to_owned(),
    }
}

/// Same as `message`, but the author holds no permissions at all.
pub fn message_from_member(content: &str) -> IncomingMessage {
    let mut msg = message(content);
    if let Some(actor) = msg.actor.as_mut() {
        actor.permissions = Permissions::empty();
    }
    msg
}

pub fn message_event(msg: IncomingMessage) -> Event {
    Event::Message(msg)
}

pub fn joined_bot(id: u64, tag: &str) -> Event {
    let mut bot = user(id, tag);
    bot.bot = true;
    Event::MemberJoined(JoinedMember {
        guild_id: GUILD,
        guild_name: "Test Guild".to_owned(),
        owner_id: OWNER,
        user: bot,
    })
}

pub async fn dispatch(fake: &Arc<FakePlatform>, event: Event) {
    dispatch_with(fake, &Config::default(), event).await
}

pub async fn dispatch_with(fake: &Arc<FakePlatform>, cfg: &Config, event: Event) {
    event.handle(context(fake, cfg)).await
}

pub fn context<'a>(fake: &Arc<FakePlatform>, cfg: &'a Config) -> Context<'a> {
    Context {
        cfg,
        api: fake.clone(),
    }
}

/// Let spawned tasks run
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
