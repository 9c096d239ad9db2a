//! Width-constrained greedy word wrapping for the nroff backend.
//!
//! The wrapper collapses runs of whitespace (unless the caller is laying
//! down a verbatim bullet prefix), restores two-space sentence gaps, and
//! substitutes non-breaking placeholder characters with their nroff escape
//! sequences before any width accounting happens.

pub struct Wrapper {
    pub width: usize,
    /// Placeholder characters mapped to backend escape sequences. Applied
    /// to the whole text before tokenization: NBSP and friends count as
    /// whitespace to `char::is_whitespace`, so substituting first is what
    /// keeps them non-breaking.
    pub post_break_replacements: Vec<(&'static str, &'static str)>,
}

impl Wrapper {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            post_break_replacements: Vec::new(),
        }
    }

    /// Wrap `text` into lines no wider than `width` display columns.
    ///
    /// `fix_doublespace` collapses every inter-word gap to a single space;
    /// it is turned off when a bullet prefix with significant spacing was
    /// prepended to the text. `fix_sentence_endings` widens the gap after
    /// `[a-z][.!?]["']?` to two spaces.
    pub fn wrap(
        &self,
        text: &str,
        width: usize,
        fix_doublespace: bool,
        fix_sentence_endings: bool,
    ) -> Vec<String> {
        let mut text = text.to_string();
        for (from, to) in &self.post_break_replacements {
            if text.contains(from) {
                text = text.replace(from, to);
            }
        }

        // Tokenize, remembering the whitespace run before each word so
        // verbatim spacing survives when fix_doublespace is off.
        let mut words: Vec<&str> = Vec::new();
        let mut gaps: Vec<usize> = Vec::new();
        let mut empties = 0usize;
        for piece in text.split(|c: char| c.is_whitespace()) {
            if piece.is_empty() {
                empties += 1;
                continue;
            }
            gaps.push(if words.is_empty() { 0 } else { empties + 1 });
            words.push(piece);
            empties = 0;
        }

        let mut lines: Vec<String> = Vec::new();
        let mut line = String::new();
        let mut line_w = 0usize;
        for (i, word) in words.iter().enumerate() {
            let ww = display_width(word);
            if line.is_empty() {
                line.push_str(word);
                line_w = ww;
                continue;
            }
            let mut gap = if fix_doublespace { 1 } else { gaps[i] };
            if fix_sentence_endings && gap < 2 && ends_sentence(words[i - 1]) {
                gap = 2;
            }
            if line_w + gap + ww <= width {
                for _ in 0..gap {
                    line.push(' ');
                }
                line.push_str(word);
                line_w += gap + ww;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_w = ww;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

impl Default for Wrapper {
    fn default() -> Self {
        Wrapper::new(72)
    }
}

/// Display columns of a wrapped word. nroff escapes are not one column per
/// char: `\%` and `\&` print nothing, `\0` prints a digit-width space and
/// `\-` a hyphen, `\\` a single backslash.
pub fn display_width(s: &str) -> usize {
    let mut w = 0usize;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('%') | Some('&') => {}
                Some(_) => w += 1,
                None => w += 1,
            }
        } else {
            w += 1;
        }
    }
    w
}

// Mirrors the classic sentence-ending heuristic: a lowercase letter, one of
// ".!?", and an optional closing quote at the end of the word.
fn ends_sentence(word: &str) -> bool {
    let mut rev = word.chars().rev().peekable();
    if matches!(rev.peek(), Some('"') | Some('\'')) {
        rev.next();
    }
    matches!(rev.next(), Some('.' | '!' | '?'))
        && matches!(rev.next(), Some(c) if c.is_ascii_lowercase())
}
