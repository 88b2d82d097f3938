//! Only the guild owner may add bots.  Any other bot is kicked as soon as it joins.

use crate::{
    context::Context,
    event::*,
    log_event, log_internal, log_warn,
    logging::PrintColor,
    notice::{Notice, RED},
    plugin::*,
};
use anyhow::Result;
use std::time::Duration;

const KICK_REASON: &str = "Bot added by non-owner - Auto-kick enabled";

pub struct AutoKick;

#[serenity::async_trait]
impl Plugin for AutoKick {
    fn name(&self) -> &'static str {
        "auto_kick"
    }

    fn usage(&self, _prefix: &str) -> Option<Usage> {
        None
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        let Event::MemberJoined(joined) = event else {
            return Ok(EventHandled::No);
        };
        if !joined.user.bot || !ctx.cfg.auto_kick.enabled {
            return Ok(EventHandled::No);
        }

        // The audit log entry shows up shortly after the join event
        tokio::time::sleep(Duration::from_millis(ctx.cfg.auto_kick.audit_log_delay_ms)).await;

        let entries = ctx
            .api
            .bot_add_entries(joined.guild_id, ctx.cfg.auto_kick.audit_log_lookback)
            .await?;

        let Some(entry) = entries
            .into_iter()
            .find(|entry| entry.target_id == Some(joined.user.id))
        else {
            log_warn!(
                "Could not find audit log for bot {} in {}",
                joined.user.color(),
                joined.color()
            );
            return Ok(EventHandled::Yes);
        };

        let Some(executor) = entry.executor else {
            log_warn!("Could not identify who added bot {}", joined.user.color());
            return Ok(EventHandled::Yes);
        };

        if executor.id == joined.owner_id {
            log_internal!(
                "Bot {} was added by server owner, allowing it",
                joined.user.color()
            );
            return Ok(EventHandled::Yes);
        }

        let target = ctx.api.target(joined.guild_id, joined.user.id).await?;
        if !target.kickable {
            log_warn!(
                "Cannot kick bot {} - insufficient permissions",
                joined.user.color()
            );
            return Ok(EventHandled::Yes);
        }

        ctx.api.kick(joined.guild_id, joined.user.id, KICK_REASON).await?;
        log_event!(
            "Auto-kicked bot {} added by {}",
            joined.user.color(),
            executor.color()
        );

        let notice = Notice::new("🚫 Bot Auto-Kicked", RED)
            .description("A bot was automatically removed because it was added by a non-owner.")
            .field("🤖 Bot", &joined.user.tag, true)
            .field("👤 Added by", &executor.tag, true)
            .field("📋 Reason", "Only the server owner can add bots", false);

        // Nobody is waiting on this; failing to post is fine
        let posted = match ctx.api.notification_channel(joined.guild_id).await {
            Ok(Some(channel_id)) => ctx.api.send(channel_id, notice.into()).await.map(|_| ()),
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = posted {
            log::debug!("Could not post auto-kick notice: {:#}", err);
        }

        Ok(EventHandled::Yes)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        event::Event,
        platform::{AuditEntry, Target},
        testing::*,
    };
    use serenity::all::{ChannelId, UserId};
    use std::{sync::Arc, time::Duration};

    const BOT: u64 = 50;
    const ADDER: u64 = 7;

    fn entry(target: u64, executor: Option<u64>) -> AuditEntry {
        AuditEntry {
            target_id: Some(UserId::new(target)),
            executor: executor.map(|id| user(id, &format!("user{}", id))),
        }
    }

    fn bot_target() -> Target {
        target(BOT, "SpamBot#0000")
    }

    fn kicks(fake: &FakePlatform) -> usize {
        fake.count(|c| matches!(c, Call::Kick { .. }))
    }

    fn setup(entries: Vec<AuditEntry>) -> Arc<FakePlatform> {
        let fake = FakePlatform::new();
        *fake.audit_entries.lock().unwrap() = entries;
        fake.targets
            .lock()
            .unwrap()
            .insert(UserId::new(BOT), bot_target());
        fake
    }

    #[tokio::test(start_paused = true)]
    async fn kicks_bots_added_by_non_owners() {
        let fake = setup(vec![entry(99, Some(1)), entry(BOT, Some(ADDER))]);
        *fake.notification_channel.lock().unwrap() = Some(ChannelId::new(77));

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        let calls = fake.calls();
        assert_eq!(calls[0], Call::AuditLog { limit: 5 });
        assert!(calls.contains(&Call::Kick {
            user: UserId::new(BOT),
            reason: "Bot added by non-owner - Auto-kick enabled".to_owned(),
        }));
        let notice = calls
            .iter()
            .find_map(|c| match c {
                Call::Send { channel, reply } if *channel == ChannelId::new(77) => reply.notice(),
                _ => None,
            })
            .unwrap()
            .clone();
        assert_eq!(notice.field_value("🤖 Bot"), Some("SpamBot#0000"));
        assert_eq!(notice.field_value("👤 Added by"), Some("user7"));
    }

    #[tokio::test(start_paused = true)]
    async fn no_matching_entry_means_no_kick() {
        let fake = setup(vec![entry(99, Some(ADDER))]);

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_audit_log_means_no_kick() {
        let fake = setup(vec![]);

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_executor_means_no_kick() {
        let fake = setup(vec![entry(BOT, None)]);

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn owner_may_add_bots() {
        let fake = setup(vec![entry(BOT, Some(OWNER.get()))]);

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 0);
        // Kickability is irrelevant once the owner is known to be responsible
        assert_eq!(fake.count(|c| matches!(c, Call::Target(_))), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unkickable_bot_is_left_alone() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);
        let mut bot = bot_target();
        bot.kickable = false;
        fake.targets.lock().unwrap().insert(UserId::new(BOT), bot);

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn humans_are_ignored() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);
        let Event::MemberJoined(mut joined) = joined_bot(BOT, "Human") else {
            unreachable!()
        };
        joined.user.bot = false;

        dispatch(&fake, Event::MemberJoined(joined)).await;

        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn can_be_disabled() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);
        let cfg = Config::parse("[auto_kick]\nenabled = false\n").unwrap();

        dispatch_with(&fake, &cfg, joined_bot(BOT, "SpamBot#0000")).await;

        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_notice_is_swallowed() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);
        *fake.notification_channel.lock().unwrap() = Some(ChannelId::new(77));
        fake.fail("send", "Missing Access");

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_channel_means_no_notice() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 1);
        assert_eq!(fake.count(|c| matches!(c, Call::Send { .. })), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn audit_log_failure_is_contained() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);
        fake.fail("audit_log", "Missing Permissions");

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert_eq!(kicks(&fake), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_before_reading_the_audit_log() {
        let fake = setup(vec![entry(BOT, Some(ADDER))]);
        let start = tokio::time::Instant::now();

        dispatch(&fake, joined_bot(BOT, "SpamBot#0000")).await;

        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
