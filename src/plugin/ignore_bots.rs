use crate::{context::Context, event::*, plugin::*};
use anyhow::Result;

/// Swallows messages from bots and direct messages; neither may run commands or notify anyone.
pub struct IgnoreBots;

#[serenity::async_trait]
impl Plugin for IgnoreBots {
    fn name(&self) -> &'static str {
        "ignore_bots"
    }

    fn usage(&self, _prefix: &str) -> Option<Usage> {
        None
    }

    async fn handle(&self, _ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };

        if msg.author.bot || msg.guild_id.is_none() {
            Ok(EventHandled::Yes)
        } else {
            Ok(EventHandled::No)
        }
    }
}
