use serde::{Deserialize, Serialize};

/// Title used when a markup block carries no `[TITLE_START]…[TITLE_END]` pair.
pub const UNTITLED_SLIDE: &str = "Untitled Slide";

/// One parsed slide: a title plus its ordered, non-blank content lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide title (trimmed).
    pub title: String,
    /// Body lines, each trimmed and non-empty.
    pub content: Vec<String>,
}

impl SlideRecord {
    /// Build a record, trimming every content line and dropping blank ones.
    pub fn new<I, S>(title: impl Into<String>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            title: title.into(),
            content: content
                .into_iter()
                .filter_map(|line| {
                    let line = line.as_ref().trim();
                    (!line.is_empty()).then(|| line.to_owned())
                })
                .collect(),
        }
    }

    /// A record without a title block.
    pub fn untitled<I, S>(content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(UNTITLED_SLIDE, content)
    }
}
