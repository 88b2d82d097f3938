//! Logging to the terminal with colors
//!
//! The macros here go through the `log` facade; `init` installs `env_logger` as the backend.

use crate::platform::{IncomingMessage, JoinedMember, Target, UserRef};
use std::io::IsTerminal;
use std::sync::LazyLock;

const DEFAULT: &str = "\x1b[0m";
const FG_BLUE: &str = "\x1b[38;5;33m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GRAY: &str = "\x1b[90m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_RED: &str = "\x1b[31m";
const FG_YELLOW: &str = "\x1b[33m";

pub enum Color {
    Default,
    Event,
    Internal,
    Warning,
    User,
    Channel,
    Guild,
    Glue,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Only print colors when printing to a terminal
        //
        // This won't change during the program's execution, so we can cache it.
        static STDERR_IS_TERMINAL: LazyLock<bool> =
            LazyLock::new(|| std::io::stderr().is_terminal());

        if !*STDERR_IS_TERMINAL {
            return Ok(());
        }

        write!(
            f,
            "{}",
            match self {
                Color::Default => DEFAULT,
                Color::Event => FG_YELLOW,
                Color::Internal => FG_MAGENTA,
                Color::Warning => FG_RED,
                Color::User => FG_GREEN,
                Color::Channel => FG_CYAN,
                Color::Guild => FG_BLUE,
                Color::Glue => FG_GRAY,
            }
        )
    }
}

/// Install the terminal logger.  `RUST_LOG` overrides the default filter.
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,serenity=warn,tracing=warn"),
    )
    .format_target(false)
    .init();
}

#[macro_export]
macro_rules! log_event {
    // Case: Only format string, no arguments
    ($fmtstr:expr) => {{
        ::log::info!(
            concat!("{}*{} ", $fmtstr),
            $crate::logging::Color::Event,
            $crate::logging::Color::Default
        )
    }};

    // Case: Format string with arguments, with optional trailing comma
    ($fmtstr:expr, $($args:expr),* $(,)?) => {{
        ::log::info!(
            concat!("{}*{} ", $fmtstr),
            $crate::logging::Color::Event,
            $crate::logging::Color::Default,
            $($args),*
        )
    }};
}

#[macro_export]
macro_rules! log_internal {
    ($fmtstr:expr) => {{
        ::log::info!(
            concat!("{}+{} ", $fmtstr),
            $crate::logging::Color::Internal,
            $crate::logging::Color::Default
        )
    }};

    ($fmtstr:expr, $($args:expr),* $(,)?) => {{
        ::log::info!(
            concat!("{}+{} ", $fmtstr),
            $crate::logging::Color::Internal,
            $crate::logging::Color::Default,
            $($args),*
        )
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($fmtstr:expr) => {{
        ::log::warn!(
            concat!("{}!{} ", $fmtstr),
            $crate::logging::Color::Warning,
            $crate::logging::Color::Default
        )
    }};

    ($fmtstr:expr, $($args:expr),* $(,)?) => {{
        ::log::warn!(
            concat!("{}!{} ", $fmtstr),
            $crate::logging::Color::Warning,
            $crate::logging::Color::Default,
            $($args),*
        )
    }};
}

#[macro_export]
macro_rules! log_error {
    ($fmtstr:expr) => {{
        ::log::error!(
            concat!("{}x{} ", $fmtstr),
            $crate::logging::Color::Warning,
            $crate::logging::Color::Default
        )
    }};

    ($fmtstr:expr, $($args:expr),* $(,)?) => {{
        ::log::error!(
            concat!("{}x{} ", $fmtstr),
            $crate::logging::Color::Warning,
            $crate::logging::Color::Default,
            $($args),*
        )
    }};
}

pub trait PrintColor {
    fn color(&self) -> String;
}

// Field separator
pub struct Glue;
impl PrintColor for Glue {
    fn color(&self) -> String {
        format!("{}{}{}", Color::Glue, ":", Color::Default)
    }
}

impl PrintColor for UserRef {
    fn color(&self) -> String {
        format!("{}{}{}", Color::User, self.tag, Color::Default)
    }
}

impl PrintColor for Target {
    fn color(&self) -> String {
        format!("{}{}{}", Color::User, self.tag, Color::Default)
    }
}

impl PrintColor for JoinedMember {
    fn color(&self) -> String {
        format!("{}{}{}", Color::Guild, self.guild_name, Color::Default)
    }
}

/// `guild:#channel`
impl PrintColor for IncomingMessage {
    fn color(&self) -> String {
        let guild = match self.guild_id {
            Some(_) => self.guild_name.as_str(),
            None => "<direct-message>",
        };

        format!(
            "{}{}{}{}{}#{}{}",
            Color::Guild,
            guild,
            Color::Default,
            Glue.color(),
            Color::Channel,
            self.channel_name,
            Color::Default
        )
    }
}
