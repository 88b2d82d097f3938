use crate::{
    context::Context, event::*, log_event, logging::PrintColor, notice::SALMON,
    permission::admit, plugin::moderation::*, plugin::*,
};
use anyhow::Result;

pub struct Kick;

#[serenity::async_trait]
impl Plugin for Kick {
    fn name(&self) -> &'static str {
        "kick"
    }

    fn usage(&self, prefix: &str) -> Option<Usage> {
        Some(Usage {
            syntax: format!("{}kick @user [reason]", prefix),
            description: "Kick a member from the server",
        })
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, invocation)) = event.is_bot_cmd(ctx, &["kick"]) else {
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
                    "Please mention a user to kick. Usage: `{}kick @user [reason]`",
                    ctx.cfg.prefix()
                ),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };

        if !target.kickable {
            out_of_reach(ctx, msg, "kick").await?;
            return Ok(EventHandled::Yes);
        }

        let reason = reason(&invocation, 1);

        match ctx.api.kick(guild_id, target.id, &reason).await {
            Ok(()) => {
                let notice = confirmation(
                    "👢 Member Kicked",
                    SALMON,
                    &target.tag,
                    "has been kicked from the server.",
                    &msg.author.tag,
                )
                .field("📝 Reason", &reason, false);
                ctx.api.reply(msg, notice.into()).await?;
                log_event!("{} kicked {}", msg.author.color(), target.color());
            }
            Err(err) => failed(ctx, msg, "kick", err).await?,
        }

        Ok(EventHandled::Yes)
    }
}
