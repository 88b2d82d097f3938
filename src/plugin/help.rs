use crate::{
    context::Context,
    event::*,
    notice::{Notice, BLURPLE},
    plugin::*,
};
use anyhow::Result;

pub struct Help;

#[serenity::async_trait]
impl Plugin for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self, prefix: &str) -> Option<Usage> {
        Some(Usage {
            syntax: format!("{}help", prefix),
            description: "Show this help message",
        })
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Some((msg, _)) = event.is_bot_cmd(ctx, &[self.name()]) else {
            return Ok(EventHandled::No);
        };

        let prefix = ctx.cfg.prefix();
        let mut notice = Notice::new("📋 Moderation Commands", BLURPLE)
            .description("Here are the available moderation commands:")
            .footer("Use commands responsibly!", None);
        for plugin in crate::plugin::plugins() {
            if let Some(usage) = plugin.usage(prefix) {
                notice = notice.field(
                    format!("{}{}", prefix, plugin.name()),
                    format!("`{}` - {}", usage.syntax, usage.description),
                    false,
                );
            }
        }

        ctx.api.reply(msg, notice.into()).await?;
        Ok(EventHandled::Yes)
    }
}
