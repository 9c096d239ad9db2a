use docroff::nroff::{BlockClass, LayoutBuffer, PAGE_CAPACITY, paginate};

fn push_lines(buf: &mut LayoutBuffer, n: usize, tag: &str) {
    for i in 0..n {
        buf.push(format!("{tag}{i}"));
    }
}

/// Content line counts of each page segment between break commands.
fn segments(output: &[String]) -> Vec<usize> {
    let mut segs = vec![0usize];
    for line in output {
        if line == ".bp" {
            segs.push(0);
        } else {
            *segs.last_mut().unwrap() += 1;
        }
    }
    segs
}

#[test]
fn hard_capacity_break_without_hints() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 120, "x");

    let out = paginate(&buf, true);

    assert_eq!(segments(&out), vec![55, 55, 10]);
    assert_eq!(out[55], ".bp");
    assert_eq!(out[111], ".bp");
}

#[test]
fn segments_never_exceed_capacity() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 40, "a");
    buf.record_hint(40, 30, BlockClass::Flow);
    push_lines(&mut buf, 30, "b");
    buf.record_hint(70, 12, BlockClass::Raw);
    push_lines(&mut buf, 12, "c");
    push_lines(&mut buf, 80, "d");

    let out = paginate(&buf, true);

    for seg in segments(&out) {
        assert!(seg <= PAGE_CAPACITY, "segment of {seg} lines exceeds capacity");
    }
    let content: Vec<&String> = out.iter().filter(|l| *l != ".bp").collect();
    assert_eq!(content.len(), buf.lines.len(), "every line emitted exactly once");
}

#[test]
fn raw_block_that_does_not_fit_starts_fresh() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 50, "x");
    buf.record_hint(50, 10, BlockClass::Raw);
    push_lines(&mut buf, 10, "r");

    let out = paginate(&buf, true);

    assert_eq!(out[50], ".bp");
    // the block is contiguous on the new page
    let start = out.iter().position(|l| l == "r0").unwrap();
    for i in 0..10 {
        assert_eq!(out[start + i], format!("r{i}"));
    }
}

#[test]
fn raw_block_filling_exact_page_is_not_broken() {
    let mut buf = LayoutBuffer::new();
    buf.record_hint(0, PAGE_CAPACITY, BlockClass::Raw);
    push_lines(&mut buf, PAGE_CAPACITY, "r");
    buf.push("after".to_string());

    let out = paginate(&buf, true);

    assert_eq!(out[0], "r0");
    assert_eq!(out[PAGE_CAPACITY], ".bp");
    assert_eq!(out[PAGE_CAPACITY + 1], "after");
}

#[test]
fn flow_overflowing_by_many_lines_is_not_relocated() {
    // available=5, needed=10: leftover on both sides is >= 2 lines, so
    // relocating the block start gains nothing
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 50, "x");
    buf.record_hint(50, 10, BlockClass::Flow);
    push_lines(&mut buf, 10, "p");

    let out = paginate(&buf, true);

    assert_eq!(out[50], "p0", "no heuristic break before the block");
    assert_eq!(out[55], ".bp", "hard capacity break mid-block instead");
    assert_eq!(segments(&out), vec![55, 5]);
}

#[test]
fn flow_with_two_available_lines_is_not_relocated() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 53, "x");
    buf.record_hint(53, 10, BlockClass::Flow);
    push_lines(&mut buf, 10, "p");

    let out = paginate(&buf, true);

    assert_eq!(out[53], "p0");
    assert_eq!(out[55], ".bp");
}

#[test]
fn flow_with_one_available_line_is_relocated() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 54, "x");
    buf.record_hint(54, 10, BlockClass::Flow);
    push_lines(&mut buf, 10, "p");

    let out = paginate(&buf, true);

    assert_eq!(out[54], ".bp");
    assert_eq!(out[55], "p0");
    assert_eq!(segments(&out), vec![54, 10]);
}

#[test]
fn blank_hinted_line_is_discounted_from_both_sides() {
    // Same geometry as the two-available case, but the block starts with
    // a blank line: the discount leaves one protected line, which flips
    // the decision to a break.
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 53, "x");
    buf.record_hint(53, 10, BlockClass::Flow);
    buf.push(String::new());
    push_lines(&mut buf, 9, "p");

    let out = paginate(&buf, true);

    assert_eq!(out[53], ".bp");
    assert_eq!(out[54], "");
}

#[test]
fn autobreaks_off_disables_the_heuristic() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 54, "x");
    buf.record_hint(54, 10, BlockClass::Flow);
    push_lines(&mut buf, 10, "p");

    let out = paginate(&buf, false);

    assert_eq!(out[54], "p0", "no heuristic break with autobreaks off");
    assert_eq!(out[55], ".bp", "hard capacity break still applies");
}

#[test]
fn forced_hint_always_breaks() {
    let mut buf = LayoutBuffer::new();
    push_lines(&mut buf, 10, "x");
    buf.record_hint(10, 0, BlockClass::Forced);
    buf.push(String::new());
    push_lines(&mut buf, 5, "p");

    let out = paginate(&buf, true);

    assert_eq!(out[10], ".bp");
    assert_eq!(out[11], "");
}

#[test]
fn later_hint_for_same_offset_overwrites() {
    let mut buf = LayoutBuffer::new();
    buf.record_hint(0, 100, BlockClass::Raw);
    buf.record_hint(0, 1, BlockClass::Flow);
    buf.push("only".to_string());

    let out = paginate(&buf, true);

    assert_eq!(out, vec!["only".to_string()]);
}
