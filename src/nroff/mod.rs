//! nroff rendering: document frame, block rendering into a layout buffer,
//! and pagination into the final output sequence.
//!
//! The backend is the classic line-printer nroff dialect: persistent
//! (`.in`) and temporary (`.ti`) indents, fill toggles (`.nf`/`.fi`),
//! scoped centering (`.ce N`), page breaks (`.bp`) and string registers
//! for the running headers and footers. Lines whose first character is one
//! of the two command sentinels (`.` and `'`) must be escaped before they
//! reach the backend.

mod paginate;

pub use paginate::{BlockClass, BreakHint, LayoutBuffer, PAGE_CAPACITY, paginate};

use std::borrow::Cow;
use std::collections::HashMap;

use crate::model::{
    Align, Block, Document, FrontMatter, Inline, ListStyle, RefItem, Section, Settings,
    XrefFormat,
};
use crate::wrap::Wrapper;

const WIDTH: usize = 72;

const SETTINGS_HEADER: [&str; 8] = [
    ".pl 10.0i",   // page length
    ".po 0",       // page offset
    ".ll 7.2i",    // line length
    ".lt 7.2i",    // title length
    ".nr LL 7.2i", // printer line length
    ".nr LT 7.2i", // printer title length
    ".hy 0",       // disable hyphenation
    ".ad l",       // left margin adjustment only
];

/// Neutralize a leading command sentinel: `'` gets a plain backslash, `.`
/// gets the zero-width `\&` so the character still prints. Called exactly
/// once per line, at the point the line is finalized.
pub fn escape_linestart(line: &str) -> Cow<'_, str> {
    match line.chars().next() {
        Some('\'') => Cow::Owned(format!("\\{line}")),
        Some('.') => Cow::Owned(format!("\\&{line}")),
        _ => Cow::Borrowed(line),
    }
}

#[derive(Clone, Copy)]
pub struct TextOptions<'a> {
    pub indent: usize,
    /// Hanging indent for continuation lines; defaults to the bullet width.
    pub sub_indent: Option<usize>,
    pub bullet: &'a str,
    pub align: Align,
    pub leading_blankline: bool,
    /// Render an edit-mark counter instead of the leading blank line when
    /// the document has editing mode on.
    pub edit: bool,
    pub width: Option<usize>,
    pub fix_sentence_endings: bool,
}

impl Default for TextOptions<'_> {
    fn default() -> Self {
        Self {
            indent: 0,
            sub_indent: None,
            bullet: "",
            align: Align::Left,
            leading_blankline: false,
            edit: false,
            width: None,
            fix_sentence_endings: true,
        }
    }
}

/// Renders semantic blocks into a [`LayoutBuffer`], recording a break hint
/// at each block's starting offset. Consumed by [`paginate`] once the
/// whole document has been written.
pub struct Renderer {
    buf: LayoutBuffer,
    // Last emitted .in level; an indent command is only written on change
    curr_indent: usize,
    edit_counter: u32,
    width: usize,
    wrapper: Wrapper,
    settings: Settings,
    refs: HashMap<String, RefItem>,
}

impl Renderer {
    pub fn new(settings: Settings, refs: HashMap<String, RefItem>) -> Self {
        let mut wrapper = Wrapper::new(WIDTH - 3);
        wrapper.post_break_replacements = vec![
            ("\u{00A0}", "\\0"), // nbsp
            ("\u{2011}", "\\-"), // non-breaking hyphen
            ("\u{2060}", ""),    // word joiner
        ];
        Self {
            buf: LayoutBuffer::new(),
            curr_indent: 0,
            edit_counter: 0,
            width: WIDTH,
            wrapper,
            settings,
            refs,
        }
    }

    /// A line carrying nroff commands; no escaping.
    fn write_nroff(&mut self, line: impl Into<String>) {
        self.buf.push(line.into());
    }

    /// A content line; escaped if it starts with a command sentinel.
    fn write_line(&mut self, line: &str) {
        self.buf.push(escape_linestart(line).into_owned());
    }

    fn lb(&mut self) {
        self.buf.push(String::new());
    }

    fn indent(&mut self, amount: usize) {
        if amount != self.curr_indent {
            self.write_nroff(format!(".in {amount}"));
            self.curr_indent = amount;
        }
    }

    /// Static per-document header: generated-by comment, nroff settings,
    /// and the running header/footer string registers.
    pub fn write_frame(&mut self, front: &FrontMatter) {
        let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        // Written raw: feeding the comment through the escaper would turn
        // the comment introducer into visible text.
        self.write_nroff(format!(
            ".\\\" automatically generated by docroff v{} on {}",
            env!("CARGO_PKG_VERSION"),
            stamp
        ));
        self.lb();
        for line in SETTINGS_HEADER {
            self.write_nroff(line);
        }
        let center = front.abbrev.as_deref().unwrap_or(&front.title);
        self.write_nroff(format!(
            ".ds LH {}",
            front.doc_name.as_deref().unwrap_or("")
        ));
        self.write_nroff(format!(".ds CH {center}"));
        self.write_nroff(format!(".ds RH {}", front.date));
        self.write_nroff(format!(".ds LF {}", front.author.as_deref().unwrap_or("")));
        self.write_nroff(format!(
            ".ds CF {}",
            front.category.as_deref().unwrap_or("")
        ));
        self.write_nroff(".ds RF FORMFEED[Page %]");
    }

    /// Render one semantic text block: optional leading blank (or edit
    /// mark), wrapped and escaped body lines, alignment or indent
    /// commands, and the bullet's temporary indent. Records a FLOW hint
    /// spanning everything this call appended.
    pub fn write_text(&mut self, text: &str, opts: TextOptions) {
        let begin = self.buf.len();

        if opts.leading_blankline {
            if opts.edit && self.settings.editing {
                self.edit_counter += 1;
                self.write_line(&format!("<{}>", self.edit_counter));
            } else {
                self.lb();
            }
        }

        let has_bullet = !opts.bullet.trim().is_empty();
        let mut par: Vec<String> = Vec::new();
        if !text.is_empty() {
            let trimmed = text.trim_start();
            // Bullets are inserted verbatim, so their spacing must survive
            // the whitespace collapse
            let (full, fix_doublespace) = if has_bullet {
                (format!("{}{}", opts.bullet, trimmed), false)
            } else {
                (trimmed.to_string(), true)
            };
            let width = opts.width.unwrap_or(self.wrapper.width);
            par = self
                .wrapper
                .wrap(&full, width, fix_doublespace, opts.fix_sentence_endings);
            for line in &mut par {
                if line.starts_with(['.', '\'']) {
                    *line = escape_linestart(line).into_owned();
                }
            }
            let full_indent = match opts.sub_indent {
                Some(sub) => opts.indent + sub,
                None => opts.indent + opts.bullet.len(),
            };
            if opts.align == Align::Center {
                self.write_nroff(format!(".ce {}", par.len()));
            } else {
                self.indent(full_indent);
            }
        }

        if has_bullet {
            // The bullet line starts at the base indent; continuation
            // lines keep the deeper persistent indent
            self.write_nroff(format!(".ti {}", opts.indent));
            if text.is_empty() {
                par.push(escape_linestart(opts.bullet).into_owned());
            }
        }

        for line in par {
            self.buf.push(line);
        }

        self.buf
            .record_hint(begin, self.buf.len() - begin, BlockClass::Flow);
    }

    pub fn write_title(&mut self, text: &str, doc_name: Option<&str>) {
        self.lb();
        self.write_text(
            text,
            TextOptions {
                align: Align::Center,
                ..Default::default()
            },
        );
        if let Some(doc_name) = doc_name {
            self.write_text(
                doc_name,
                TextOptions {
                    align: Align::Center,
                    ..Default::default()
                },
            );
        }
    }

    /// Headings use a temporary zero indent instead of the bullet
    /// mechanism. When the numbered heading overflows the content width,
    /// the persistent indent is widened to the number's width so wrapped
    /// text aligns under the heading text.
    pub fn write_heading(&mut self, text: &str, bullet: &str) {
        let begin = self.buf.len();
        self.lb();
        let bullet = if bullet.is_empty() {
            String::new()
        } else {
            format!("{bullet}  ")
        };
        if bullet.len() + text.len() > self.width - 3 {
            self.indent(bullet.len());
        }
        self.write_nroff(".ti 0");
        self.write_line(&format!("{bullet}{text}"));
        self.buf
            .record_hint(begin, self.buf.len() - begin, BlockClass::Flow);
    }

    /// Verbatim block wrapped in a no-fill region. The RAW hint covers the
    /// content lines plus the surrounding control lines, so the paginator
    /// keeps the whole region on one page whenever it fits.
    pub fn write_raw(&mut self, text: &str, indent: usize) {
        let begin = self.buf.len();
        self.indent(indent);
        self.write_nroff(".nf");
        self.lb();
        for line in text.lines() {
            self.write_line(line);
        }
        self.write_nroff(".fi");
        self.buf
            .record_hint(begin, self.buf.len() - begin, BlockClass::Raw);
    }

    /// Pre-built TOC entry lines in a no-fill region at indent 3, under a
    /// zero-indent caption. One FLOW hint covers the whole block.
    pub fn write_toc(&mut self, entries: &[String]) {
        let begin = self.buf.len();
        self.lb();
        self.write_nroff(".ti 0");
        self.write_line("Table of Contents");
        self.lb();
        self.indent(3);
        self.write_nroff(".nf");
        for entry in entries {
            self.write_line(entry);
        }
        self.write_nroff(".fi");
        self.buf
            .record_hint(begin, self.buf.len() - begin, BlockClass::Flow);
    }

    /// Explicit page break before whatever is rendered next. The hint
    /// rides on its own blank line so the next block's hint cannot
    /// overwrite it.
    pub fn write_break(&mut self) {
        let begin = self.buf.len();
        self.buf.push(String::new());
        self.buf.record_hint(begin, 0, BlockClass::Forced);
    }

    /// Text representation of a cross-reference. Unknown anchors and the
    /// `none` format fall back to the bracketed target; target texts
    /// containing `.` or `-` get a `\%` guard so nroff never hyphenates
    /// them at a line break.
    pub fn expand_xref(
        &self,
        target: &str,
        format: XrefFormat,
        lead_text: Option<&str>,
    ) -> String {
        let item = self.refs.get(target);
        let mut target_text = match (item, format) {
            (None, _) | (_, XrefFormat::None) => format!("[{target}]"),
            (Some(item), XrefFormat::Counter) => item.counter.clone(),
            (Some(item), XrefFormat::Title) => item.title.clone(),
            (Some(item), XrefFormat::Default) => item.auto_name.clone(),
        };
        match lead_text {
            Some(text) if !text.is_empty() => {
                if !target_text.starts_with('[') {
                    target_text = format!("({target_text})");
                } else if target_text.contains('.') || target_text.contains('-') {
                    target_text = format!("\\%{target_text}");
                }
                format!("{} {}", text.trim_end(), target_text)
            }
            _ => {
                if target_text.contains('.') || target_text.contains('-') {
                    target_text = format!("\\%{target_text}");
                }
                target_text
            }
        }
    }

    /// Flatten mixed paragraph content into a single string, expanding
    /// cross-references against the resolved anchor table.
    pub fn flatten(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(t) => out.push_str(t),
                Inline::Xref {
                    target,
                    format,
                    text,
                } => {
                    let format = format.unwrap_or(self.settings.xref_format);
                    out.push_str(&self.expand_xref(target, format, text.as_deref()));
                }
            }
        }
        out
    }

    pub fn finish(self) -> LayoutBuffer {
        self.buf
    }
}

fn urlkeep(text: &str) -> String {
    text.replace("http://", "\\%http://")
        .replace("https://", "\\%https://")
}

/// Number sections depth-first and figures globally, producing the anchor
/// table cross-references resolve against.
fn resolve_anchors(doc: &Document) -> HashMap<String, RefItem> {
    fn walk(
        sections: &[Section],
        prefix: &str,
        refs: &mut HashMap<String, RefItem>,
        fig_num: &mut usize,
    ) {
        for (i, section) in sections.iter().enumerate() {
            let number = if prefix.is_empty() {
                (i + 1).to_string()
            } else {
                format!("{prefix}.{}", i + 1)
            };
            if let Some(anchor) = &section.anchor {
                refs.insert(
                    anchor.clone(),
                    RefItem {
                        counter: number.clone(),
                        title: section.title.clone(),
                        auto_name: format!("Section {number}"),
                    },
                );
            }
            for block in &section.blocks {
                if let Block::Figure(figure) = block {
                    *fig_num += 1;
                    if let Some(anchor) = &figure.anchor {
                        refs.insert(
                            anchor.clone(),
                            RefItem {
                                counter: fig_num.to_string(),
                                title: figure.title.clone().unwrap_or_default(),
                                auto_name: format!("Figure {fig_num}"),
                            },
                        );
                    }
                }
            }
            walk(&section.subsections, &number, refs, fig_num);
        }
    }
    let mut refs = HashMap::new();
    let mut fig_num = 0usize;
    walk(&doc.sections, "", &mut refs, &mut fig_num);
    refs
}

fn toc_entries(sections: &[Section]) -> Vec<String> {
    fn walk(sections: &[Section], prefix: &str, depth: usize, out: &mut Vec<String>) {
        for (i, section) in sections.iter().enumerate() {
            let number = if prefix.is_empty() {
                (i + 1).to_string()
            } else {
                format!("{prefix}.{}", i + 1)
            };
            out.push(format!(
                "{:indent$}{}.  {}",
                "",
                number,
                section.title,
                indent = 3 * depth
            ));
            walk(&section.subsections, &number, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(sections, "", 0, &mut out);
    out
}

fn render_section(r: &mut Renderer, section: &Section, number: &str, fig_num: &mut usize) {
    r.write_heading(&section.title, &format!("{number}."));
    for block in &section.blocks {
        match block {
            Block::Paragraph(para) => {
                let text = urlkeep(&r.flatten(&para.inlines));
                r.write_text(
                    &text,
                    TextOptions {
                        indent: 3,
                        leading_blankline: true,
                        edit: true,
                        ..Default::default()
                    },
                );
            }
            Block::Figure(figure) => {
                *fig_num += 1;
                r.write_raw(&figure.artwork, 3);
                if let Some(title) = &figure.title {
                    let caption = format!("Figure {}: {}", fig_num, title);
                    r.write_text(
                        &caption,
                        TextOptions {
                            align: Align::Center,
                            leading_blankline: true,
                            ..Default::default()
                        },
                    );
                }
            }
            Block::List(list) => {
                for (i, item) in list.items.iter().enumerate() {
                    let bullet = match list.style {
                        ListStyle::Numbers => format!("{}.  ", i + 1),
                        ListStyle::Symbols => "o  ".to_string(),
                        ListStyle::Empty => String::new(),
                    };
                    let text = urlkeep(&r.flatten(&item.inlines));
                    r.write_text(
                        &text,
                        TextOptions {
                            indent: 3,
                            bullet: &bullet,
                            leading_blankline: true,
                            edit: true,
                            ..Default::default()
                        },
                    );
                }
            }
            Block::PageBreak => r.write_break(),
        }
    }
    for (i, sub) in section.subsections.iter().enumerate() {
        render_section(r, sub, &format!("{number}.{}", i + 1), fig_num);
    }
}

/// Render a whole document: frame, title, optional TOC, then every
/// section in order, followed by the pagination pass. Returns the final
/// text with per-line trailing whitespace stripped.
pub fn render(doc: &Document) -> String {
    let refs = resolve_anchors(doc);
    let mut r = Renderer::new(doc.settings, refs);
    r.write_frame(&doc.front);
    r.write_title(&doc.front.title, doc.front.doc_name.as_deref());
    if doc.settings.toc {
        r.write_toc(&toc_entries(&doc.sections));
    }
    let mut fig_num = 0usize;
    for (i, section) in doc.sections.iter().enumerate() {
        render_section(&mut r, section, &(i + 1).to_string(), &mut fig_num);
    }

    let layout = r.finish();
    let lines = paginate(&layout, doc.settings.autobreaks);

    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in &lines {
        out.push_str(line.trim_end_matches([' ', '\t']));
        out.push('\n');
    }
    out
}
