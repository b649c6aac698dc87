use std::time::SystemTime;

/// A single named field of an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the platform may lay the field out next to its neighbours.
    pub inline: bool,
}

/// # Board Embed
///
/// A fully rendered message body. The reconciler and the registry pass it
/// through untouched; only the platform adapter turns it into a wire embed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardEmbed {
    /// Embed title.
    pub title: String,
    /// Main body (the ranking table).
    pub description: String,
    /// Large image shown under the body.
    pub image_url: Option<String>,
    /// Ordered fields under the body.
    pub fields: Vec<EmbedField>,
    /// Footer text.
    pub footer: Option<String>,
    /// Time the board was rendered.
    pub timestamp: Option<SystemTime>,
}

impl BoardEmbed {
    /// Creates an embed with a title and body and nothing else.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Sets the image URL.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Appends a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Sets the footer text.
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, at: SystemTime) -> Self {
        self.timestamp = Some(at);
        self
    }
}
