use docroff::wrap::{Wrapper, display_width};

fn nroff_wrapper() -> Wrapper {
    let mut w = Wrapper::new(69);
    w.post_break_replacements = vec![
        ("\u{00A0}", "\\0"),
        ("\u{2011}", "\\-"),
        ("\u{2060}", ""),
    ];
    w
}

#[test]
fn lines_stay_within_width() {
    let w = Wrapper::new(20);
    let text = "the quick brown fox jumps over the lazy dog again and again and again";
    let lines = w.wrap(text, 20, true, true);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(display_width(line) <= 20, "{line:?} is too wide");
    }
    assert_eq!(lines.join(" ").split_whitespace().count(), 14);
}

#[test]
fn whitespace_runs_collapse() {
    let w = Wrapper::new(69);
    let lines = w.wrap("too   many\n   gaps here", 69, true, false);
    assert_eq!(lines, vec!["too many gaps here"]);
}

#[test]
fn bullet_spacing_survives_without_collapse() {
    let w = Wrapper::new(69);
    let lines = w.wrap("1.  numbered item", 69, false, true);
    assert_eq!(lines, vec!["1.  numbered item"]);
}

#[test]
fn sentence_endings_get_two_spaces() {
    let w = Wrapper::new(69);
    let lines = w.wrap("It ends here. Another begins.", 69, true, true);
    assert_eq!(lines, vec!["It ends here.  Another begins."]);
}

#[test]
fn abbreviation_gap_is_not_widened() {
    // The dot follows an uppercase letter, so this is not a sentence end
    let w = Wrapper::new(69);
    let lines = w.wrap("per RFC. guidance applies", 69, true, true);
    assert_eq!(lines, vec!["per RFC. guidance applies"]);
}

#[test]
fn quoted_sentence_end_is_recognized() {
    let w = Wrapper::new(69);
    let lines = w.wrap("he said \"stop.\" then left", 69, true, true);
    assert_eq!(lines, vec!["he said \"stop.\"  then left"]);
}

#[test]
fn nbsp_becomes_escape_and_stays_unbroken() {
    let w = nroff_wrapper();
    let lines = w.wrap("see RFC\u{00A0}2119 now", 69, true, true);
    assert_eq!(lines, vec!["see RFC\\02119 now"]);

    // Even narrower than the joined token, the token is never split
    let lines = w.wrap("RFC\u{00A0}2119", 4, true, true);
    assert_eq!(lines, vec!["RFC\\02119"]);
}

#[test]
fn non_breaking_hyphen_and_word_joiner() {
    let w = nroff_wrapper();
    let lines = w.wrap("x\u{2011}y a\u{2060}b", 69, true, true);
    assert_eq!(lines, vec!["x\\-y ab"]);
}

#[test]
fn display_width_skips_zero_width_escapes() {
    assert_eq!(display_width("plain"), 5);
    assert_eq!(display_width("\\%http://x"), 8);
    assert_eq!(display_width("\\&.cmd"), 4);
    assert_eq!(display_width("x\\-y"), 3);
    assert_eq!(display_width("a\\\\b"), 3);
}
