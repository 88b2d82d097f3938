use crate::{
    config::Config,
    context::Context,
    discord::{self, Discord},
    event::Event,
    log_error,
};
use serenity::all::{Member, Message, Ready};
use std::sync::Arc;

/// Discord event handler
pub struct Handler {
    cfg: Config,
}

impl Handler {
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    fn ctx(&self, discord_ctx: &serenity::all::Context) -> Context<'_> {
        Context {
            cfg: &self.cfg,
            api: Arc::new(Discord::new(discord_ctx.clone())),
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        Event::Ready {
            user_tag: ready.user.tag(),
            guild_count: ready.guilds.len(),
        }
        .handle(self.ctx(&discord_ctx))
        .await;
    }

    async fn guild_member_addition(&self, discord_ctx: serenity::all::Context, member: Member) {
        match discord::joined_member(&discord_ctx, &member).await {
            Ok(joined) => {
                Event::MemberJoined(joined)
                    .handle(self.ctx(&discord_ctx))
                    .await
            }
            Err(err) => log_error!("Could not read member join: {:#}", err),
        }
    }

    async fn message(&self, discord_ctx: serenity::all::Context, msg: Message) {
        match discord::incoming_message(&discord_ctx, &msg, self.cfg.prefix()).await {
            Ok(incoming) => {
                Event::Message(incoming)
                    .handle(self.ctx(&discord_ctx))
                    .await
            }
            Err(err) => log_error!("Could not read message {}: {:#}", msg.id, err),
        }
    }
}
