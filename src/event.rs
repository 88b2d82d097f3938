//! The Serenity crate we're using for the Discord API is designed around callbacks to handle
//! events.  However, this does not mesh well with our plugin framework here.  To resolve this,
//! `crate::handler` translates the callbacks into a distinct Event enum.

use crate::{
    command::Invocation,
    context::Context,
    log_error,
    platform::{IncomingMessage, JoinedMember},
};

/// A Discord event
pub enum Event {
    Ready { user_tag: String, guild_count: usize },
    MemberJoined(JoinedMember),
    Message(IncomingMessage),
}

impl Event {
    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    //
    // A plugin that fails has claimed the event, so later plugins never see it.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => {
                    log_error!("Error in plugin {}: {:#}", plugin.name(), err);
                    return;
                }
            }
        }
    }

    // Check if a message should be interpreted as one of the given bot commands.
    //
    // These are prefixed with the configured prefix, e. g. `!cmd foo bar baz`.
    pub fn is_bot_cmd(
        &self,
        ctx: &Context,
        names: &[&str],
    ) -> Option<(&IncomingMessage, Invocation)> {
        let Event::Message(msg) = self else {
            return None;
        };

        let invocation = Invocation::parse(&msg.content, ctx.cfg.prefix())?;
        if names.contains(&invocation.name.as_str()) {
            Some((msg, invocation))
        } else {
            None
        }
    }
}

pub enum EventHandled {
    Yes,
    No,
}
