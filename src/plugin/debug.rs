use crate::{context::Context, event::*, log_event, logging::*, plugin::*};
use anyhow::Result;

/// Prints debug information about event to the log
pub struct Debug;

#[serenity::async_trait]
impl Plugin for Debug {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn usage(&self, _prefix: &str) -> Option<Usage> {
        None
    }

    async fn handle(&self, _ctx: &Context, event: &Event) -> Result<EventHandled> {
        match event {
            Event::Ready {
                user_tag,
                guild_count,
            } => {
                log_event!(
                    "Connected to {} server(s) as {}{}{}",
                    guild_count,
                    Color::User,
                    user_tag,
                    Color::Default,
                );
            }
            Event::MemberJoined(joined) => {
                log_event!(
                    "{} joined {}{}",
                    joined.user.color(),
                    joined.color(),
                    if joined.user.bot { " (bot)" } else { "" },
                );
            }
            Event::Message(msg) => {
                log::debug!(
                    "{} {}{} {}",
                    msg.color(),
                    msg.author.color(),
                    Glue.color(),
                    msg.content,
                );
            }
        }

        Ok(EventHandled::No)
    }
}
