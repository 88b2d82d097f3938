//! DM everyone mentioned in a message with a copy of it.

use crate::{
    config,
    context::Context,
    event::*,
    log_event, log_warn,
    logging::PrintColor,
    notice::{Notice, PINK},
    platform::{IncomingMessage, UserRef},
    plugin::*,
};
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use tokio::task::JoinHandle;

const EMPTY_CONTENT: &str = "*(no text content - may contain attachments or embeds)*";
const ELLIPSIS: &str = "...";

pub struct MentionNotify;

#[serenity::async_trait]
impl Plugin for MentionNotify {
    fn name(&self) -> &'static str {
        "mention_notify"
    }

    fn usage(&self, _prefix: &str) -> Option<Usage> {
        None
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };
        if !ctx.cfg.mention_notify.enabled {
            return Ok(EventHandled::No);
        }

        // Deliveries finish on their own
        let _ = notify(ctx, msg);

        Ok(EventHandled::No)
    }
}

/// Spawn one delivery per mentioned human.  A failed delivery only affects its own recipient.
pub fn notify(ctx: &Context, msg: &IncomingMessage) -> Vec<JoinHandle<()>> {
    if msg.author.bot || msg.guild_id.is_none() {
        return Vec::new();
    }

    msg.mentions
        .iter()
        .filter(|user| !user.bot)
        .map(|user| {
            let notice = render(&ctx.cfg.mention_notify, msg, user);
            let api = ctx.api.clone();
            let recipient = user.clone();
            let author = msg.author.clone();

            tokio::spawn(async move {
                match api.direct_message(recipient.id, notice.into()).await {
                    Ok(()) => log_event!(
                        "Sent DM to {} about mention from {}",
                        recipient.color(),
                        author.color()
                    ),
                    Err(err) => log_warn!("Could not send DM to {}: {:#}", recipient.color(), err),
                }
            })
        })
        .collect()
}

fn render(cfg: &config::MentionNotify, msg: &IncomingMessage, recipient: &UserRef) -> Notice {
    let when = local_time(msg.created_at, cfg.utc_offset_minutes);

    let mut notice = Notice::new("✨ Hey! Someone tagged you", PINK)
        .description(format!(
            "**{}** just mentioned you in **{}**\n\n💭 *Thought you'd want to know!*",
            msg.author.name, msg.guild_name
        ))
        .author(&msg.author.name, Some(msg.author.avatar_url.clone()))
        .thumbnail(&recipient.avatar_url)
        .field("🌟 Tagged by", format!("**{}**", msg.author.name), true)
        .field("🎯 That's you!", format!("**{}**", recipient.name), true)
        .field("\u{200B}", "\u{200B}", true)
        .field("💬 In channel", format!("#{}", msg.channel_name), true)
        .field(format!("🕐 When ({})", cfg.timezone_label), when, false)
        .field(
            "💌 What they said",
            excerpt(&msg.content, cfg.max_content_chars),
            false,
        )
        .field(
            "🚀 Quick Jump",
            format!("[Click here to see the message →]({})", msg.link),
            false,
        )
        .footer(
            format!("💫 {} • {}", msg.guild_name, msg.id),
            msg.guild_icon_url.clone(),
        )
        .timestamp(msg.created_at);

    if let Some(image) = &cfg.image_url {
        notice = notice.image(image);
    }

    notice
}

/// e.g. `Friday, 16 October 2026 at 3:45 pm`
fn local_time(at: DateTime<Utc>, utc_offset_minutes: i32) -> String {
    const FORMAT: &str = "%A, %-d %B %Y at %-I:%M %P";

    // Out of range offsets fall back to UTC
    match FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)) {
        Some(offset) => at.with_timezone(&offset).format(FORMAT).to_string(),
        None => at.format(FORMAT).to_string(),
    }
}

/// Trimmed message text, cut down to `max_chars` with an ellipsis when it's longer.
fn excerpt(content: &str, max_chars: usize) -> String {
    let content = content.trim();
    if content.is_empty() {
        return EMPTY_CONTENT.to_owned();
    }

    if content.chars().count() <= max_chars {
        return content.to_owned();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut cut: String = content.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}
