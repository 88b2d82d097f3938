//! Embeds, described independently of Serenity's builders.

use chrono::{DateTime, Utc};

pub const RED: u32 = 0xFF_00_00;
pub const SALMON: u32 = 0xFF_6B_6B;
pub const ORANGE: u32 = 0xFF_A5_00;
pub const GREEN: u32 = 0x4C_AF_50;
pub const BLURPLE: u32 = 0x58_65_F2;
pub const PINK: u32 = 0xFF_69_B4;

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Footer {
    pub text: String,
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub colour: u32,
    pub fields: Vec<Field>,
    pub footer: Option<Footer>,
    pub author: Option<Author>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Notice {
    pub fn new(title: impl Into<String>, colour: u32) -> Self {
        Self {
            title: title.into(),
            colour,
            timestamp: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>, icon_url: Option<String>) -> Self {
        self.footer = Some(Footer {
            text: text.into(),
            icon_url,
        });
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(Author {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Value of the first field with this name
    #[cfg(test)]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Body of an outgoing message.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Text(String),
    Notice(Notice),
}

#[cfg(test)]
impl Reply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Notice(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Reply::Text(_) => None,
            Reply::Notice(notice) => Some(notice),
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_owned())
    }
}

impl From<Notice> for Reply {
    fn from(notice: Notice) -> Self {
        Reply::Notice(notice)
    }
}
