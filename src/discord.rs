//! The live `Platform`, backed by Serenity, and conversion of Serenity's models into ours.

use crate::{
    notice::{Notice, Reply},
    permission::{self, Reach, Standing},
    platform::*,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, ChannelType, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage,
    EditMember, GetMessages, Guild, GuildChannel, GuildId, Member, Message, MessageId, RoleId,
    Timestamp, User, UserId,
};
use std::collections::HashMap;
use serenity::model::guild::audit_log::{Action, MemberAction};

/// Discord refuses to bulk delete messages older than two weeks.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;
/// Most messages a single fetch or bulk delete accepts.
const PAGE_SIZE: usize = 100;

pub struct Discord {
    ctx: serenity::all::Context,
}

impl Discord {
    pub fn new(ctx: serenity::all::Context) -> Self {
        Self { ctx }
    }

    async fn my_member(&self, guild_id: GuildId) -> Result<Member> {
        let me = self.ctx.cache.current_user().id;
        Ok(guild_id.member(&self.ctx, me).await?)
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            tag: user.tag(),
            bot: user.bot,
            avatar_url: user.face(),
        }
    }
}

/// Where a member sits in the guild's role hierarchy.
fn standing(guild: &Guild, user_id: UserId, roles: &[RoleId]) -> Standing {
    let everyone = RoleId::new(guild.id.get());
    let member_roles = || roles.iter().filter_map(|id| guild.roles.get(id));

    let top_role = member_roles().map(|role| role.position).max().unwrap_or(0);
    let permissions = permission::guild_permissions(
        user_id == guild.owner_id,
        guild
            .roles
            .get(&everyone)
            .into_iter()
            .chain(member_roles())
            .map(|role| role.permissions),
    );

    Standing {
        id: user_id,
        top_role,
        permissions,
    }
}

fn is_bulk_deletable(created_unix: i64, now_unix: i64) -> bool {
    now_unix - created_unix < BULK_DELETE_MAX_AGE_SECS
}

/// How many messages to ask for on each page when fetching the newest `count`.
fn page_sizes(count: usize) -> Vec<usize> {
    let mut sizes = vec![PAGE_SIZE; count / PAGE_SIZE];
    if count % PAGE_SIZE > 0 {
        sizes.push(count % PAGE_SIZE);
    }
    sizes
}

#[derive(Debug, PartialEq)]
enum Deletion<'a> {
    Single(MessageId),
    Bulk(&'a [MessageId]),
}

/// The bulk endpoint wants between 2 and 100 messages, so a lone leftover goes on its own.
fn deletions(ids: &[MessageId]) -> Vec<Deletion<'_>> {
    ids.chunks(PAGE_SIZE)
        .map(|chunk| match chunk {
            [single] => Deletion::Single(*single),
            chunk => Deletion::Bulk(chunk),
        })
        .collect()
}

/// Name of a guild channel or thread.
fn channel_name<'a>(
    known: impl IntoIterator<Item = (ChannelId, &'a str)>,
    channel_id: ChannelId,
) -> Option<String> {
    known
        .into_iter()
        .find(|(id, _)| *id == channel_id)
        .map(|(_, name)| name.to_owned())
}

/// The executor as embedded in the audit log response, if Discord included them.
fn embedded_executor(users: &HashMap<UserId, User>, user_id: UserId) -> Option<UserRef> {
    users.get(&user_id).map(UserRef::from)
}

fn embed(notice: Notice) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(notice.title)
        .colour(notice.colour);

    if let Some(description) = notice.description {
        embed = embed.description(description);
    }
    for field in notice.fields {
        embed = embed.field(field.name, field.value, field.inline);
    }
    if let Some(footer) = notice.footer {
        let mut builder = CreateEmbedFooter::new(footer.text);
        if let Some(icon_url) = footer.icon_url {
            builder = builder.icon_url(icon_url);
        }
        embed = embed.footer(builder);
    }
    if let Some(author) = notice.author {
        let mut builder = CreateEmbedAuthor::new(author.name);
        if let Some(icon_url) = author.icon_url {
            builder = builder.icon_url(icon_url);
        }
        embed = embed.author(builder);
    }
    if let Some(thumbnail) = notice.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }
    if let Some(image) = notice.image {
        embed = embed.image(image);
    }
    if let Some(timestamp) = notice
        .timestamp
        .and_then(|t| Timestamp::from_unix_timestamp(t.timestamp()).ok())
    {
        embed = embed.timestamp(timestamp);
    }

    embed
}

fn message_builder(reply: Reply) -> CreateMessage {
    match reply {
        Reply::Text(text) => CreateMessage::new().content(text),
        Reply::Notice(notice) => CreateMessage::new().embed(embed(notice)),
    }
}

#[serenity::async_trait]
impl Platform for Discord {
    async fn bot_add_entries(&self, guild_id: GuildId, limit: u8) -> Result<Vec<AuditEntry>> {
        let logs = guild_id
            .audit_logs(
                &self.ctx.http,
                Some(Action::Member(MemberAction::BotAdd)),
                None,
                None,
                Some(limit),
            )
            .await?;

        let mut entries = Vec::with_capacity(logs.entries.len());
        for entry in logs.entries {
            let target_id = entry.target_id.map(|id| UserId::new(id.get()));
            let executor = match embedded_executor(&logs.users, entry.user_id) {
                Some(executor) => Some(executor),
                None => entry
                    .user_id
                    .to_user(&self.ctx)
                    .await
                    .ok()
                    .map(|user| UserRef::from(&user)),
            };
            entries.push(AuditEntry {
                target_id,
                executor,
            });
        }

        Ok(entries)
    }

    async fn target(&self, guild_id: GuildId, user_id: UserId) -> Result<Target> {
        let me = self.my_member(guild_id).await?;
        let member = guild_id.member(&self.ctx, user_id).await?;

        let guild = guild_id
            .to_guild_cached(&self.ctx.cache)
            .ok_or(anyhow!("Guild {} is not cached", guild_id))?;
        let reach = Reach::compute(
            guild.owner_id,
            standing(&guild, me.user.id, &me.roles),
            standing(&guild, member.user.id, &member.roles),
        );

        Ok(Target {
            id: member.user.id,
            tag: member.user.tag(),
            kickable: reach.kickable,
            bannable: reach.bannable,
            moderatable: reach.moderatable,
        })
    }

    async fn notification_channel(&self, guild_id: GuildId) -> Result<Option<ChannelId>> {
        let me = self.my_member(guild_id).await?;

        let guild = guild_id
            .to_guild_cached(&self.ctx.cache)
            .ok_or(anyhow!("Guild {} is not cached", guild_id))?;
        if let Some(system_channel_id) = guild.system_channel_id {
            return Ok(Some(system_channel_id));
        }

        let mut text_channels: Vec<&GuildChannel> = guild
            .channels
            .values()
            .filter(|channel| channel.kind == ChannelType::Text)
            .collect();
        text_channels.sort_by_key(|channel| (channel.position, channel.id));

        Ok(text_channels
            .into_iter()
            .find(|channel| guild.user_permissions_in(channel, &me).send_messages())
            .map(|channel| channel.id))
    }

    async fn kick(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()> {
        guild_id
            .kick_with_reason(&self.ctx.http, user_id, reason)
            .await?;
        Ok(())
    }

    async fn ban(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()> {
        guild_id
            .ban_with_reason(&self.ctx.http, user_id, 0, reason)
            .await?;
        Ok(())
    }

    async fn unban(&self, guild_id: GuildId, user_id: UserId) -> Result<()> {
        guild_id.unban(&self.ctx.http, user_id).await?;
        Ok(())
    }

    async fn timeout(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        duration_ms: u64,
        reason: &str,
    ) -> Result<()> {
        let duration = i64::try_from(duration_ms)?;
        let until = Utc::now() + chrono::Duration::milliseconds(duration);
        let until = Timestamp::from_unix_timestamp(until.timestamp())
            .map_err(|_| anyhow!("Timeout of {} ms is out of range", duration_ms))?;

        let edit = EditMember::new()
            .disable_communication_until_datetime(until)
            .audit_log_reason(reason);
        guild_id.edit_member(&self.ctx, user_id, edit).await?;
        Ok(())
    }

    async fn bulk_delete(&self, channel_id: ChannelId, count: u8) -> Result<usize> {
        let now = Utc::now().timestamp();
        let mut before: Option<MessageId> = None;
        let mut deletable = Vec::with_capacity(count as usize);

        for page_size in page_sizes(count as usize) {
            let mut request = GetMessages::new().limit(page_size as u8);
            if let Some(before) = before {
                request = request.before(before);
            }

            let page = channel_id.messages(&self.ctx, request).await?;
            let Some(oldest) = page.last() else {
                break;
            };
            before = Some(oldest.id);

            let exhausted = page.len() < page_size;
            deletable.extend(
                page.iter()
                    .filter(|msg| is_bulk_deletable(msg.timestamp.unix_timestamp(), now))
                    .map(|msg| msg.id),
            );
            if exhausted {
                break;
            }
        }

        for deletion in deletions(&deletable) {
            match deletion {
                Deletion::Single(id) => channel_id.delete_message(&self.ctx.http, id).await?,
                Deletion::Bulk(ids) => channel_id.delete_messages(&self.ctx.http, ids).await?,
            }
        }

        Ok(deletable.len())
    }

    async fn reply(&self, to: &IncomingMessage, reply: Reply) -> Result<()> {
        let builder = message_builder(reply).reference_message((to.channel_id, to.id));
        to.channel_id.send_message(&self.ctx, builder).await?;
        Ok(())
    }

    async fn send(&self, channel_id: ChannelId, reply: Reply) -> Result<MessageId> {
        let sent = channel_id
            .send_message(&self.ctx, message_builder(reply))
            .await?;
        Ok(sent.id)
    }

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<()> {
        channel_id
            .delete_message(&self.ctx.http, message_id)
            .await?;
        Ok(())
    }

    async fn direct_message(&self, user_id: UserId, reply: Reply) -> Result<()> {
        user_id
            .direct_message(&self.ctx, message_builder(reply))
            .await?;
        Ok(())
    }
}

/// Describe a member that just joined.
pub async fn joined_member(ctx: &serenity::all::Context, member: &Member) -> Result<JoinedMember> {
    let cached = member
        .guild_id
        .to_guild_cached(&ctx.cache)
        .map(|guild| (guild.name.clone(), guild.owner_id));

    let (guild_name, owner_id) = match cached {
        Some(cached) => cached,
        None => {
            let guild = member.guild_id.to_partial_guild(ctx).await?;
            (guild.name, guild.owner_id)
        }
    };

    Ok(JoinedMember {
        guild_id: member.guild_id,
        guild_name,
        owner_id,
        user: UserRef::from(&member.user),
    })
}

/// Describe a posted message.  Mentioned members are only resolved for commands, since
/// nothing else acts on them.
pub async fn incoming_message(
    ctx: &serenity::all::Context,
    msg: &Message,
    prefix: &str,
) -> Result<IncomingMessage> {
    let created_at =
        DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0).unwrap_or_else(Utc::now);
    let mut incoming = IncomingMessage {
        id: msg.id,
        channel_id: msg.channel_id,
        channel_name: "direct-message".to_owned(),
        guild_id: msg.guild_id,
        guild_name: String::new(),
        guild_icon_url: None,
        author: UserRef::from(&msg.author),
        actor: None,
        content: msg.content.clone(),
        mentions: msg.mentions.iter().map(UserRef::from).collect(),
        mentioned_member: None,
        created_at,
        link: msg.link(),
    };

    let Some(guild_id) = msg.guild_id else {
        return Ok(incoming);
    };
    if msg.author.bot {
        return Ok(incoming);
    }

    let author_roles = match &msg.member {
        Some(member) => member.roles.clone(),
        None => guild_id.member(ctx, msg.author.id).await?.roles,
    };

    let cached_channel_name = {
        let guild = guild_id
            .to_guild_cached(&ctx.cache)
            .ok_or(anyhow!("Guild {} is not cached", guild_id))?;
        let author = standing(&guild, msg.author.id, &author_roles);

        incoming.guild_name = guild.name.clone();
        incoming.guild_icon_url = guild.icon_url();
        incoming.actor = Some(Actor {
            permissions: author.permissions,
            is_owner: msg.author.id == guild.owner_id,
        });

        let known = guild.channels.values().chain(guild.threads.iter());
        channel_name(
            known.map(|channel| (channel.id, channel.name.as_str())),
            msg.channel_id,
        )
    };

    // Threads the cache hasn't seen yet
    incoming.channel_name = match cached_channel_name {
        Some(name) => name,
        None => msg
            .channel_id
            .name(ctx)
            .await
            .unwrap_or_else(|_| "unknown-channel".to_owned()),
    };

    if msg.content.starts_with(prefix) {
        if let Some(first) = msg.mentions.first() {
            // Mentioned users that aren't members can't be moderated
            incoming.mentioned_member = Discord::new(ctx.clone())
                .target(guild_id, first.id)
                .await
                .ok();
        }
    }

    Ok(incoming)
}
