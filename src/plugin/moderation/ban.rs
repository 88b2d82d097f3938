use crate::{
    context::Context, event::*, log_event, logging::PrintColor, notice::RED, permission::admit,
    plugin::moderation::*, plugin::*,
};
use anyhow::Result;

pub struct Ban;

#[serenity::async_trait]
impl Plugin for Ban {
    fn name(&self) -> &'static str {
        "ban"
    }

    fn usage(&self, prefix: &str) -> Option<Usage> {
        Some(Usage {
            syntax: format!("{}ban @user [reason]", prefix),
            description: "Ban a member from the server",
        })
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, invocation)) = event.is_bot_cmd(ctx, &["ban"]) else {
            return Ok(EventHandled::No);
        };
        let Some(guild_id) = msg.guild_id else {
            return Ok(EventHandled::No);
        };

        if !admit(ctx, msg, &invocation.name).await? {
            return Ok(EventHandled::Yes);
        }

        let Some(target) = &msg.mentioned_member else {
            decline(
                ctx,
                msg,
                &format!(
                    "Please mention a user to ban. Usage: `{}ban @user [reason]`",
                    ctx.cfg.prefix()
                ),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };

        if !target.bannable {
            out_of_reach(ctx, msg, "ban").await?;
            return Ok(EventHandled::Yes);
        }

        let reason = reason(&invocation, 1);

        match ctx.api.ban(guild_id, target.id, &reason).await {
            Ok(()) => {
                let notice = confirmation(
                    "🔨 Member Banned",
                    RED,
                    &target.tag,
                    "has been banned from the server.",
                    &msg.author.tag,
                )
                .field("📝 Reason", &reason, false);
                ctx.api.reply(msg, notice.into()).await?;
                log_event!("{} banned {}", msg.author.color(), target.color());
            }
            Err(err) => failed(ctx, msg, "ban", err).await?,
        }

        Ok(EventHandled::Yes)
    }
}
