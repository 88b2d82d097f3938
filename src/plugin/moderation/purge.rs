use crate::{
    context::Context, event::*, log_error, log_event, log_internal, logging::PrintColor,
    permission::admit, plugin::moderation::*, plugin::*,
};
use anyhow::Result;
use std::time::Duration;

const MAX_PURGE: u8 = 100;

pub struct Purge;

fn parse_amount(raw: Option<&str>) -> Option<u8> {
    raw?.parse::<u8>()
        .ok()
        .filter(|amount| (1..=MAX_PURGE).contains(amount))
}

#[serenity::async_trait]
impl Plugin for Purge {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn usage(&self, prefix: &str) -> Option<Usage> {
        Some(Usage {
            syntax: format!("{}clear <amount>", prefix),
            description: "Delete multiple messages (1-100), also `purge`",
        })
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, invocation)) = event.is_bot_cmd(ctx, &["clear", "purge"]) else {
            return Ok(EventHandled::No);
        };

        if !admit(ctx, msg, &invocation.name).await? {
            return Ok(EventHandled::Yes);
        }

        let Some(amount) = parse_amount(invocation.arg(0)) else {
            decline(
                ctx,
                msg,
                &format!(
                    "Please provide a number between 1 and {}. Usage: `{}{} <amount>`",
                    MAX_PURGE,
                    ctx.cfg.prefix(),
                    invocation.name
                ),
            )
            .await?;
            return Ok(EventHandled::Yes);
        };

        // The command message itself goes too
        let result = async {
            let deleted = ctx.api.bulk_delete(msg.channel_id, amount + 1).await?;
            let deleted = deleted.saturating_sub(1);
            let confirmation_id = ctx
                .api
                .send(
                    msg.channel_id,
                    format!("✅ Successfully deleted {} messages.", deleted).into(),
                )
                .await?;
            anyhow::Ok((deleted, confirmation_id))
        }
        .await;

        let (deleted, confirmation_id) = match result {
            Ok(done) => done,
            Err(err) => {
                log_error!("{} failed to clear messages: {:#}", msg.author.color(), err);
                decline(ctx, msg, &format!("Failed to delete messages: {}", err)).await?;
                return Ok(EventHandled::Yes);
            }
        };

        log_event!(
            "{} cleared {} messages in {}",
            msg.author.color(),
            deleted,
            msg.color()
        );

        // The confirmation is transient
        let api = ctx.api.clone();
        let channel_id = msg.channel_id;
        let lifetime = Duration::from_secs(ctx.cfg.purge.confirmation_lifetime_secs);
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            if let Err(err) = api.delete_message(channel_id, confirmation_id).await {
                log_internal!("Could not remove clear confirmation: {:#}", err);
            }
        });

        Ok(EventHandled::Yes)
    }
}
