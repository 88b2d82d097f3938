//! Prefix moderation commands.  Each follows the same order: permission gate, argument checks,
//! role hierarchy check, then the one call to Discord.

use crate::{
    command::Invocation, context::Context, log_error, logging::PrintColor, notice::Notice,
    platform::IncomingMessage,
};
use anyhow::{Error, Result};

pub mod ban;
pub mod kick;
pub mod purge;
pub mod timeout;
pub mod unban;

pub const DEFAULT_REASON: &str = "No reason provided";

/// Decline the request with a message to the invoker.
pub async fn decline(ctx: &Context<'_>, msg: &IncomingMessage, text: &str) -> Result<()> {
    ctx.api.reply(msg, format!("❌ {}", text).into()).await
}

/// The hierarchy check failed for `verb` (e.g. "kick").
pub async fn out_of_reach(ctx: &Context<'_>, msg: &IncomingMessage, verb: &str) -> Result<()> {
    decline(
        ctx,
        msg,
        &format!(
            "I cannot {} this user. They may have higher permissions than me.",
            verb
        ),
    )
    .await
}

/// Discord refused the action.  This is the only place its error reaches the invoker.
pub async fn failed(
    ctx: &Context<'_>,
    msg: &IncomingMessage,
    verb: &str,
    err: Error,
) -> Result<()> {
    log_error!("{} failed to {}: {:#}", msg.author.color(), verb, err);
    decline(ctx, msg, &format!("Failed to {} user: {}", verb, err)).await
}

/// Confirmation embed shared by the member actions.
pub fn confirmation(
    title: &str,
    colour: u32,
    target_tag: &str,
    outcome: &str,
    moderator_tag: &str,
) -> Notice {
    Notice::new(title, colour)
        .description(format!("**{}** {}", target_tag, outcome))
        .field("👤 User", target_tag, true)
        .field("🔨 Moderator", moderator_tag, true)
}

/// Free-text reason from argument `start` onward.
pub fn reason(args: &Invocation, start: usize) -> String {
    args.rest(start).unwrap_or_else(|| DEFAULT_REASON.to_owned())
}
