use crate::{context::Context, event::*};
use anyhow::Result;

mod auto_kick;
mod debug;
mod help;
mod ignore_bots;
mod mention_notify;
mod moderation;

/// One line of the help message
pub struct Usage {
    /// e.g. `!kick @user [reason]`
    pub syntax: String,
    pub description: &'static str,
}

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug, and as the command name for command plugins
    fn name(&self) -> &'static str;
    /// Help message line.  None if no help message
    fn usage(&self, prefix: &str) -> Option<Usage>;
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    ///   handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        // Core bot operations
        Box::new(debug::Debug),
        Box::new(ignore_bots::IgnoreBots),
        Box::new(auto_kick::AutoKick),
        // Commands
        Box::new(help::Help),
        Box::new(moderation::kick::Kick),
        Box::new(moderation::ban::Ban),
        Box::new(moderation::unban::Unban),
        Box::new(moderation::timeout::Timeout),
        Box::new(moderation::purge::Purge),
        // Anything that wasn't a command may still mention someone.
        // Keep last.
        Box::new(mention_notify::MentionNotify),
    ]
}
