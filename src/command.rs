//! Prefix command parsing

/// One parsed command, e.g. `!kick @someone spamming` becomes `kick` with
/// `["<@123>", "spamming"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Always lowercase
    pub name: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Returns `None` if `content` isn't a command.
    pub fn parse(content: &str, prefix: &str) -> Option<Self> {
        let rest = content.strip_prefix(prefix)?;
        let mut tokens = rest.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        let args = tokens.map(str::to_owned).collect();

        Some(Self { name, args })
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments from `start` onward joined back with single spaces, or `None` if there are none.
    pub fn rest(&self, start: usize) -> Option<String> {
        match self.args.get(start..) {
            Some(rest) if !rest.is_empty() => Some(rest.join(" ")),
            _ => None,
        }
    }
}
