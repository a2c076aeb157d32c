/// Greedy word wrap of a single paragraph.
///
/// Words are whitespace separated and joined by one space. A word is appended to the current
/// line while the joined length stays within `max_chars`; otherwise it starts a new line. A word
/// longer than `max_chars` is never split and occupies a line of its own. Lengths count `char`s.
///
/// Whitespace-only input yields a single empty line so paragraph breaks survive wrapping.
pub fn wrap_words(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    lines.push(current);
    lines
}

/// Wrap multi-paragraph text: every `\n`-separated paragraph is wrapped on its own, so blank
/// lines are kept as empty output lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|paragraph| wrap_words(paragraph, max_chars))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
