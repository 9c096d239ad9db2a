#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum XrefFormat {
    None,
    Counter,
    Title,
    Default,
}

/// Per-document rendering options, populated from `<?rfc key="value"?>`
/// processing instructions and overridable by the CLI.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    pub editing: bool,
    pub autobreaks: bool,
    pub toc: bool,
    pub xref_format: XrefFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editing: false,
            autobreaks: true,
            toc: false,
            xref_format: XrefFormat::Default,
        }
    }
}

pub struct FrontMatter {
    pub title: String,
    pub abbrev: Option<String>,
    pub doc_name: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub date: String,
}

#[derive(Clone, Debug)]
pub enum Inline {
    Text(String),
    Xref {
        target: String,
        /// None means the document-level default applies.
        format: Option<XrefFormat>,
        text: Option<String>,
    },
}

pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ListStyle {
    Numbers,
    Symbols,
    Empty,
}

pub struct List {
    pub style: ListStyle,
    pub items: Vec<Paragraph>,
}

pub struct Figure {
    pub artwork: String,
    pub anchor: Option<String>,
    pub title: Option<String>,
}

pub enum Block {
    Paragraph(Paragraph),
    Figure(Figure),
    List(List),
    PageBreak,
}

pub struct Section {
    pub title: String,
    pub anchor: Option<String>,
    pub blocks: Vec<Block>,
    pub subsections: Vec<Section>,
}

pub struct Document {
    pub front: FrontMatter,
    pub sections: Vec<Section>,
    pub settings: Settings,
}

/// Resolved display forms for one anchored element, keyed by anchor in the
/// reference table the renderer consumes.
pub struct RefItem {
    pub counter: String,
    pub title: String,
    pub auto_name: String,
}
