//! Paragraph-like blocks and their inline content.

use log::debug;

use super::{Converter, Element, Inline, ParagraphElement, TextRun};
use crate::diagnostics::Degradation;
use crate::node::{DocumentNode, MarkKind, NodeKind};
use crate::options::Alignment;

impl Converter<'_> {
    pub(super) fn convert_paragraph(&self, node: &DocumentNode) -> ParagraphElement {
        let mut para = ParagraphElement {
            children: self.convert_inlines(&node.content),
            ..Default::default()
        };
        para.alignment = node
            .attrs
            .str("textAlign")
            .and_then(Alignment::from_text_align);
        para
    }

    pub(super) fn convert_heading(&self, node: &DocumentNode) -> ParagraphElement {
        let level = node.attrs.positive("level").unwrap_or(1).clamp(1, 6);
        let mut para = self.convert_paragraph(node);
        para.style = Some(format!("Heading{level}"));
        para
    }

    pub(super) fn convert_blockquote(&self, node: &DocumentNode) -> Vec<Element> {
        let mut elements = Vec::new();
        for block in &node.content {
            if block.is(&NodeKind::Paragraph) {
                elements.push(self.convert_paragraph(block).style("Blockquote").into());
            } else {
                elements.extend(self.convert_node(block));
            }
        }
        elements
    }

    /// Emits one paragraph per source line, preserving line breaks.
    pub(super) fn convert_code_block(&self, node: &DocumentNode) -> Vec<Element> {
        let code = plain_text(node);
        code.split('\n')
            .map(|line| {
                let mut run = TextRun::new(line);
                run.code = true;
                ParagraphElement::new()
                    .style("CodeBlock")
                    .add(Inline::Text(run))
                    .into()
            })
            .collect()
    }

    /// Converts inline nodes into runs.
    pub(super) fn convert_inlines(&self, nodes: &[DocumentNode]) -> Vec<Inline> {
        let mut inlines = Vec::new();
        for node in nodes {
            self.convert_inline(node, &mut inlines);
        }
        inlines
    }

    fn convert_inline(&self, node: &DocumentNode, out: &mut Vec<Inline>) {
        match &node.kind {
            Some(NodeKind::Text) => {
                let text = node.text.as_deref().unwrap_or_default();
                if text.is_empty() {
                    return;
                }
                let (run, href) = styled_run(node, text);
                match href {
                    Some(url) => out.push(Inline::Hyperlink {
                        url,
                        runs: vec![run],
                    }),
                    None => out.push(Inline::Text(run)),
                }
            }
            Some(NodeKind::HardBreak) => out.push(Inline::Break),
            Some(NodeKind::Image) => {
                let (Ok(image) | Err(image)) = self.image_run(node);
                out.push(Inline::Image(image));
            }
            Some(NodeKind::Malformed { name, reason }) => {
                self.report(Degradation::MalformedTree(format!("`{name}`: {reason}")));
                out.push(Inline::Text(TextRun::new(super::unsupported_text(name))));
            }
            Some(kind) => {
                debug!("flattening inline node `{}`", kind.name());
                for child in &node.content {
                    self.convert_inline(child, out);
                }
            }
            None => {}
        }
    }
}

/// Builds a run from the marks of a text node, returning the link target
/// separately.
fn styled_run(node: &DocumentNode, text: &str) -> (TextRun, Option<String>) {
    let mut run = TextRun::new(text);
    let mut href = None;
    for mark in &node.marks {
        match mark.kind() {
            MarkKind::Bold => run.bold = true,
            MarkKind::Italic => run.italic = true,
            MarkKind::Underline => run.underline = true,
            MarkKind::Strike => run.strike = true,
            MarkKind::Code => run.code = true,
            MarkKind::Subscript => run.subscript = true,
            MarkKind::Superscript => run.superscript = true,
            MarkKind::Link => href = mark.attrs.str("href").map(str::to_owned),
            MarkKind::Highlight => {
                run.highlight = Some(
                    mark.attrs
                        .str("color")
                        .and_then(highlight_name)
                        .unwrap_or("yellow")
                        .to_owned(),
                )
            }
            MarkKind::TextStyle => run.color = mark.attrs.str("color").and_then(hex_color),
            MarkKind::Other => debug!("ignoring mark `{}`", mark.name),
        }
    }
    (run, href)
}

/// Concatenates the text of all descendant text nodes.
pub(super) fn plain_text(node: &DocumentNode) -> String {
    node.descendants()
        .filter(|n| n.is(&NodeKind::Text))
        .filter_map(|n| n.text.as_deref())
        .collect()
}

/// Normalizes a CSS hex color to six upper-case digits without `#`.
fn hex_color(color: &str) -> Option<String> {
    let hex = color.trim().strip_prefix('#')?;
    let hex = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_owned(),
        _ => return None,
    };
    hex.chars()
        .all(|c| c.is_ascii_hexdigit())
        .then(|| hex.to_ascii_uppercase())
}

/// Maps a highlight color onto the fixed highlight palette of word
/// processors.
fn highlight_name(color: &str) -> Option<&'static str> {
    const NAMED: [&str; 8] = [
        "yellow", "green", "cyan", "magenta", "blue", "red", "black", "white",
    ];
    let lower = color.trim().to_ascii_lowercase();
    if let Some(name) = NAMED.iter().find(|name| **name == lower) {
        return Some(*name);
    }

    let hex = hex_color(&lower)?;
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let on = |v: u8| v >= 0x80;
    Some(match (on(r), on(g), on(b)) {
        (true, true, false) => "yellow",
        (false, true, false) => "green",
        (false, true, true) => "cyan",
        (true, false, true) => "magenta",
        (false, false, true) => "blue",
        (true, false, false) => "red",
        (false, false, false) => "black",
        (true, true, true) => "white",
    })
}
