//! Pagination over a rendered layout buffer.
//!
//! Rendering and pagination are two strictly sequential phases: the
//! renderer appends lines and break hints to a [`LayoutBuffer`], then
//! [`paginate`] walks the finished buffer exactly once and decides where
//! to inject `.bp` commands. Keeping the phases separate keeps the break
//! heuristics testable against synthetic buffers.

/// Maximum content lines between two `.bp` commands. Independent of the
/// nominal `.pl` page length, which only drives the backend's numbering.
pub const PAGE_CAPACITY: usize = 55;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlockClass {
    /// Reflowable prose; may straddle a page boundary under pressure.
    Flow,
    /// Pre-formatted block; never split when it fits within one page.
    Raw,
    /// Explicit break request.
    Forced,
}

#[derive(Clone, Copy, Debug)]
pub struct BreakHint {
    pub lines_needed: usize,
    pub class: BlockClass,
}

/// Append-only line buffer with break hints keyed by the offset of each
/// block's first line. Offsets are stable indexes into `lines`, so the
/// ledger is a sorted vector rather than a map.
#[derive(Default)]
pub struct LayoutBuffer {
    pub lines: Vec<String>,
    pub hints: Vec<(usize, BreakHint)>,
}

impl LayoutBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// A later hint for the same offset overwrites the earlier one.
    pub fn record_hint(&mut self, offset: usize, lines_needed: usize, class: BlockClass) {
        let hint = BreakHint {
            lines_needed,
            class,
        };
        match self.hints.last_mut() {
            Some(last) if last.0 == offset => last.1 = hint,
            _ => self.hints.push((offset, hint)),
        }
    }
}

/// Single forward pass: copy the buffer into the output sequence with
/// `.bp` page-break commands inserted.
///
/// At each hinted offset the block either fits in the space left on the
/// current page or a break is considered: FORCED always breaks, RAW breaks
/// whenever the block does not fit, and FLOW breaks only in
/// automatic-break mode when relocating the block start actually helps
/// (the leftover on either side of the boundary would be under 2 lines).
/// A blank line at the hinted offset is discounted from both sides since a
/// leading blank needs no protection. Independently, a hard capacity
/// ceiling breaks before any line that would be the 56th on its page.
pub fn paginate(buf: &LayoutBuffer, autobreaks: bool) -> Vec<String> {
    let mut output: Vec<String> = Vec::with_capacity(buf.lines.len() + buf.lines.len() / PAGE_CAPACITY + 1);
    let mut page_len: i64 = 0;
    let mut hint_idx = 0usize;

    for (line_num, line) in buf.lines.iter().enumerate() {
        while hint_idx < buf.hints.len() && buf.hints[hint_idx].0 < line_num {
            hint_idx += 1;
        }
        if hint_idx < buf.hints.len() && buf.hints[hint_idx].0 == line_num {
            let hint = buf.hints[hint_idx].1;
            let mut available = PAGE_CAPACITY as i64 - page_len;
            let mut needed = hint.lines_needed as i64;
            if line.trim().is_empty() {
                available -= 1;
                needed -= 1;
            }
            let break_before = match hint.class {
                BlockClass::Forced => true,
                BlockClass::Raw => needed > available,
                BlockClass::Flow => {
                    autobreaks
                        && needed > available
                        && (needed - available < 2 || available < 2)
                }
            };
            if break_before {
                output.push(".bp".to_string());
                page_len = 0;
            }
        }
        if page_len + 1 > PAGE_CAPACITY as i64 {
            output.push(".bp".to_string());
            page_len = 0;
        }
        output.push(line.clone());
        page_len += 1;
    }
    output
}
