use crate::{config::Config, platform::Platform};
use std::sync::Arc;

/// Collection of data that is shared across events
pub struct Context<'a> {
    pub cfg: &'a Config,
    /// Outbound calls to Discord.  Shared so spawned tasks can outlive the event.
    pub api: Arc<dyn Platform>,
}
