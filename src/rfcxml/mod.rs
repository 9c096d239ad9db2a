//! Parser for the simplified RFC-style XML vocabulary.
//!
//! `<rfc docName category>` wraps a `<front>` (title, author, date) and a
//! `<middle>` of nested sections. Section content is `<t>` paragraphs with
//! inline `<xref>`, `<figure>`/`<artwork>` verbatim blocks, `<list>`
//! items, and `<pagebreak/>`. Rendering options come from
//! `<?rfc key="value"?>` processing instructions.

use std::path::Path;

use crate::error::Error;
use crate::model::{
    Block, Document, Figure, FrontMatter, Inline, List, ListStyle, Paragraph, Section, Settings,
    XrefFormat,
};

fn child<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn elem_children<'a>(
    node: roxmltree::Node<'a, 'a>,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> {
    node.children().filter(|n| n.is_element())
}

/// Backslash is the nroff escape character; double every one coming from
/// source text so it survives as a literal.
fn escape_backslashes(text: &str) -> String {
    text.replace('\\', "\\\\")
}

pub fn parse(path: &Path) -> Result<Document, Error> {
    let xml = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_str(&xml)
}

pub fn parse_str(xml: &str) -> Result<Document, Error> {
    let tree =
        roxmltree::Document::parse(xml).map_err(|e| Error::InvalidXml(e.to_string()))?;
    let root = tree.root_element();
    if root.tag_name().name() != "rfc" {
        return Err(Error::InvalidXml(format!(
            "root element must be <rfc>, found <{}>",
            root.tag_name().name()
        )));
    }

    let settings = parse_pis(&tree);

    let front_node = child(root, "front")
        .ok_or_else(|| Error::InvalidXml("missing <front> element".into()))?;
    let front = parse_front(front_node, root)?;

    let middle = child(root, "middle")
        .ok_or_else(|| Error::InvalidXml("missing <middle> element".into()))?;
    let sections = elem_children(middle)
        .filter(|n| n.tag_name().name() == "section")
        .map(parse_section)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document {
        front,
        sections,
        settings,
    })
}

fn parse_pis(tree: &roxmltree::Document) -> Settings {
    let mut settings = Settings::default();
    for node in tree.root().descendants().filter(|n| n.is_pi()) {
        let pi = match node.pi() {
            Some(pi) if pi.target == "rfc" => pi,
            _ => continue,
        };
        let Some(value) = pi.value else { continue };
        for pair in value.split_whitespace() {
            let Some((key, val)) = pair.split_once('=') else {
                continue;
            };
            let val = val.trim_matches('"');
            let on = val == "yes";
            match key {
                "editing" => settings.editing = on,
                "autobreaks" => settings.autobreaks = on,
                "toc" => settings.toc = on,
                "xref-format" => settings.xref_format = parse_xref_format(val),
                _ => log::warn!("ignoring unknown processing instruction: {key}"),
            }
        }
    }
    settings
}

fn parse_front(front: roxmltree::Node, rfc: roxmltree::Node) -> Result<FrontMatter, Error> {
    let title_node =
        child(front, "title").ok_or_else(|| Error::InvalidXml("missing <title> element".into()))?;
    let title = title_node.text().unwrap_or("").trim().to_string();
    if title.is_empty() {
        return Err(Error::InvalidXml("<title> must not be empty".into()));
    }
    let abbrev = title_node.attribute("abbrev").map(str::to_string);

    let author = child(front, "author").and_then(|a| {
        a.attribute("surname")
            .or_else(|| a.attribute("fullname"))
            .map(str::to_string)
    });

    let date = child(front, "date")
        .map(|d| {
            let month = d.attribute("month").unwrap_or("");
            let year = d.attribute("year").unwrap_or("");
            format!("{month} {year}").trim().to_string()
        })
        .unwrap_or_default();

    Ok(FrontMatter {
        title,
        abbrev,
        doc_name: rfc.attribute("docName").map(str::to_string),
        category: rfc.attribute("category").map(str::to_string),
        author,
        date,
    })
}

fn parse_section(node: roxmltree::Node) -> Result<Section, Error> {
    let title = node
        .attribute("title")
        .ok_or_else(|| Error::InvalidXml("<section> missing title attribute".into()))?
        .to_string();
    let anchor = node.attribute("anchor").map(str::to_string);

    let mut blocks = Vec::new();
    let mut subsections = Vec::new();
    for item in elem_children(node) {
        match item.tag_name().name() {
            "t" => blocks.push(Block::Paragraph(parse_t(item))),
            "figure" => blocks.push(Block::Figure(parse_figure(item))),
            "list" => blocks.push(Block::List(parse_list(item))),
            "pagebreak" => blocks.push(Block::PageBreak),
            "section" => subsections.push(parse_section(item)?),
            other => log::warn!("skipping unknown element <{other}> in section {title:?}"),
        }
    }

    Ok(Section {
        title,
        anchor,
        blocks,
        subsections,
    })
}

fn parse_t(node: roxmltree::Node) -> Paragraph {
    let mut inlines = Vec::new();
    for item in node.children() {
        if item.is_text() {
            if let Some(text) = item.text() {
                inlines.push(Inline::Text(escape_backslashes(text)));
            }
        } else if item.is_element() && item.tag_name().name() == "xref" {
            // A missing target degrades to "[]" downstream rather than
            // failing the whole document
            let target = item.attribute("target").unwrap_or("").to_string();
            let format = item.attribute("format").map(parse_xref_format);
            let text = item
                .text()
                .map(escape_backslashes)
                .filter(|t| !t.trim().is_empty());
            inlines.push(Inline::Xref {
                target,
                format,
                text,
            });
        } else if item.is_element() {
            log::warn!(
                "skipping unknown inline element <{}>",
                item.tag_name().name()
            );
        }
    }
    Paragraph { inlines }
}

fn parse_figure(node: roxmltree::Node) -> Figure {
    let artwork = child(node, "artwork")
        .and_then(|a| a.text())
        .map(|t| escape_backslashes(t.trim_matches('\n')))
        .unwrap_or_default();
    Figure {
        artwork,
        anchor: node.attribute("anchor").map(str::to_string),
        title: node.attribute("title").map(str::to_string),
    }
}

fn parse_list(node: roxmltree::Node) -> List {
    let style = match node.attribute("style") {
        Some("numbers") => ListStyle::Numbers,
        Some("empty") => ListStyle::Empty,
        None | Some("symbols") => ListStyle::Symbols,
        Some(other) => {
            log::warn!("unknown list style {other:?}, using symbols");
            ListStyle::Symbols
        }
    };
    let items = elem_children(node)
        .filter(|n| n.tag_name().name() == "t")
        .map(parse_t)
        .collect();
    List { style, items }
}

// Unknown formats fall back to the default representation instead of
// aborting the render.
fn parse_xref_format(value: &str) -> XrefFormat {
    match value {
        "none" => XrefFormat::None,
        "counter" => XrefFormat::Counter,
        "title" => XrefFormat::Title,
        "default" => XrefFormat::Default,
        other => {
            log::warn!("unknown xref format {other:?}, using default");
            XrefFormat::Default
        }
    }
}
