use std::path::Path;

use crate::{
    foundation::error::{SlidecastError, SlidecastResult},
    markup::model::{SlideRecord, UNTITLED_SLIDE},
};

/// Opens a slide block.
pub const SLIDE_START: &str = "[SLIDE_START]";
/// Closes a slide block; blocks without it are skipped.
pub const SLIDE_END: &str = "[SLIDE_END]";
/// Opens the optional title of a block.
pub const TITLE_START: &str = "[TITLE_START]";
/// Closes the optional title of a block.
pub const TITLE_END: &str = "[TITLE_END]";

/// Parse slide markup into ordered slide records.
///
/// The grammar is delimiter based and split driven, not balanced:
///
/// - the document is split on [`SLIDE_START`]; a fragment is a slide only if it contains
///   [`SLIDE_END`], and everything after its first [`SLIDE_END`] is ignored
/// - a block with both title delimiters takes its title from the first
///   [`TITLE_START`]…[`TITLE_END`] span and its content from what follows the first
///   [`TITLE_END`]; otherwise the title is [`UNTITLED_SLIDE`]
/// - content lines are trimmed and blank lines dropped
///
/// Malformed blocks never produce an error; they are simply absent from the result.
pub fn parse(text: &str) -> Vec<SlideRecord> {
    text.split(SLIDE_START).filter_map(parse_block).collect()
}

/// Read `path` as UTF-8 and [`parse`] it.
///
/// Unreadable or non-UTF-8 input is reported as [`SlidecastError::Parse`].
pub fn parse_file(path: &Path) -> SlidecastResult<Vec<SlideRecord>> {
    tracing::info!(path = %path.display(), "parsing slides");

    let text = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read slide markup");
        SlidecastError::parse(format!("failed to read '{}': {e}", path.display()))
    })?;

    let slides = parse(&text);
    tracing::info!(count = slides.len(), "parsed slides");
    Ok(slides)
}

fn parse_block(block: &str) -> Option<SlideRecord> {
    let (body, _) = block.split_once(SLIDE_END)?;
    let body = body.trim();

    if body.contains(TITLE_START) && body.contains(TITLE_END) {
        let title = body
            .split(TITLE_START)
            .nth(1)
            .and_then(|s| s.split(TITLE_END).next())
            .unwrap_or_default()
            .trim();
        let content = body.split(TITLE_END).nth(1).unwrap_or_default().trim();
        Some(SlideRecord::new(title, content.split('\n')))
    } else {
        tracing::debug!("slide block has no title, using default");
        Some(SlideRecord::new(UNTITLED_SLIDE, body.split('\n')))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/parser.rs"]
mod tests;
