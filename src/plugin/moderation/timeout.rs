use crate::{
    context::Context, event::*, log_event, logging::PrintColor, notice::ORANGE,
    permission::admit, plugin::moderation::*, plugin::*,
};
use anyhow::Result;

/// Discord caps timeouts at 28 days.
const MAX_MINUTES: i64 = 28 * 24 * 60;
const MS_PER_MINUTE: u64 = 60 * 1000;

pub struct Timeout;

fn parse_minutes(raw: Option<&str>) -> Option<u64> {
    raw?.parse::<i64>()
        .ok()
        .filter(|minutes| (1..=MAX_MINUTES).contains(minutes))
        .map(|minutes| minutes as u64)
}

#[serenity::async_trait]
impl Plugin for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn usage(&self, prefix: &str) -> Option<Usage> {
        Some(Usage {
            syntax: format!("{}timeout @user <minutes> [reason]", prefix),
            description: "Timeout a member (1-40320 min), also `mute`",
        })
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, invocation)) = event.is_bot_cmd(ctx, &["timeout", "mute"]) else {
            return Ok(EventHandled::No);
        };
        let Some(guild_id) = msg.guild_id else {
            return Ok(EventHandled::No);
        };

        if !admit(ctx, msg, &invocation.name).await? {
            return Ok(EventHandled::Yes);
        }

        let usage = format!(
            "Usage: `{}{} @user <minutes> [reason]`",
            ctx.cfg.prefix(),
            invocation.name
        );

        let Some(target) = &msg.mentioned_member else {
            decline(
                ctx,
                msg,
                &format!("Please mention a user to timeout. {}", usage),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };

        let Some(minutes) = parse_minutes(invocation.arg(1)) else {
            decline(
                ctx,
                msg,
                &format!(
                    "Please provide a valid duration in minutes (1-{}). {}",
                    MAX_MINUTES, usage
                ),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };

        if !target.moderatable {
            out_of_reach(ctx, msg, "timeout").await?;
            return Ok(EventHandled::Yes);
        }

        let reason = reason(&invocation, 2);

        match ctx
            .api
            .timeout(guild_id, target.id, minutes * MS_PER_MINUTE, &reason)
            .await
        {
            Ok(()) => {
                let notice = confirmation(
                    "⏰ Member Timed Out",
                    ORANGE,
                    &target.tag,
                    "has been timed out.",
                    &msg.author.tag,
                )
                .field("⏱️ Duration", format!("{} minutes", minutes), true)
                .field("📝 Reason", &reason, false);
                ctx.api.reply(msg, notice.into()).await?;
                log_event!(
                    "{} timed out {} for {} minutes",
                    msg.author.color(),
                    target.color(),
                    minutes
                );
            }
            Err(err) => failed(ctx, msg, "timeout", err).await?,
        }

        Ok(EventHandled::Yes)
    }
}
