use crate::{
    context::Context, event::*, log_event, logging::PrintColor, notice::GREEN, notice::Notice,
    permission::admit, plugin::moderation::*, plugin::*,
};
use anyhow::Result;
use serenity::all::UserId;

pub struct Unban;

/// Banned users aren't members, so all we have is whatever ID the moderator typed.
fn parse_user_id(raw: &str) -> Option<UserId> {
    raw.parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .map(UserId::new)
}

#[serenity::async_trait]
impl Plugin for Unban {
    fn name(&self) -> &'static str {
        "unban"
    }

    fn usage(&self, prefix: &str) -> Option<Usage> {
        Some(Usage {
            syntax: format!("{}unban <user_id>", prefix),
            description: "Unban a member using their user ID",
        })
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, invocation)) = event.is_bot_cmd(ctx, &["unban"]) else {
            return Ok(EventHandled::No);
        };
        let Some(guild_id) = msg.guild_id else {
            return Ok(EventHandled::No);
        };

        if !admit(ctx, msg, &invocation.name).await? {
            return Ok(EventHandled::Yes);
        }

        let usage = format!("Usage: `{}unban <user_id>`", ctx.cfg.prefix());
        let Some(raw) = invocation.arg(0) else {
            decline(
                ctx,
                msg,
                &format!("Please provide a user ID to unban. {}", usage),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };
        let Some(user_id) = parse_user_id(raw) else {
            decline(
                ctx,
                msg,
                &format!("`{}` is not a valid user ID. {}", raw, usage),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };

        match ctx.api.unban(guild_id, user_id).await {
            Ok(()) => {
                let notice = Notice::new("✅ Member Unbanned", GREEN)
                    .description(format!("User with ID **{}** has been unbanned.", user_id))
                    .field("🔨 Moderator", &msg.author.tag, true);
                ctx.api.reply(msg, notice.into()).await?;
                log_event!("{} unbanned user ID {}", msg.author.color(), user_id);
            }
            Err(err) => failed(ctx, msg, "unban", err).await?,
        }

        Ok(EventHandled::Yes)
    }
}
