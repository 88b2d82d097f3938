mod command;
mod config;
mod context;
mod discord;
mod event;
mod handler;
mod logging;
mod notice;
mod permission;
mod platform;
mod plugin;
#[cfg(test)]
mod testing;

use serenity::{all::GatewayIntents, Client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let cfg = crate::config::Config::load().await?;
    let token = crate::config::Config::discord_token()?;
    let handler = handler::Handler::new(cfg);

    // Things we want discord to tell us about.
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MODERATION
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await?;
    if let Err(err) = client.start().await {
        log_error!("Discord client stopped: {:#}", err);
        return Err(err.into());
    }

    Ok(())
}
