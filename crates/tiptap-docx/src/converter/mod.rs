//! Conversion of a document tree to output elements.
//!
//! This module is organized into several main components:
//! - Dispatcher: maps each node type to its conversion rule
//! - Text: paragraphs, headings, quotes, code blocks and inline runs
//! - Lists: bullet, ordered and task lists
//! - Tables: tables, rows and the cell/header resolver
//! - Images: the image rule with its placeholder fallback
//! - Types: the output element structure

mod image;
mod list;
mod table;
mod text;
pub mod types;

use log::debug;

use crate::diagnostics::{Degradation, DiagnosticCollector};
use crate::media::ImageStore;
use crate::node::{DocumentNode, NodeKind};
use crate::options::DocxOptions;

pub use types::*;

/// Converts the nodes of one document.
///
/// Images must have been resolved beforehand, see
/// [`crate::media::ImageResolver::resolve_tree`].
pub struct Converter<'a> {
    options: &'a DocxOptions,
    images: &'a ImageStore,
    diagnostics: &'a DiagnosticCollector,
}

impl<'a> Converter<'a> {
    /// Create a new converter
    pub fn new(
        options: &'a DocxOptions,
        images: &'a ImageStore,
        diagnostics: &'a DiagnosticCollector,
    ) -> Self {
        Self {
            options,
            images,
            diagnostics,
        }
    }

    /// Converts the children of a container node, in order.
    pub fn convert_document(&self, tree: &DocumentNode) -> Vec<Element> {
        self.convert_blocks(&tree.content)
    }

    fn convert_blocks(&self, nodes: &[DocumentNode]) -> Vec<Element> {
        nodes
            .iter()
            .flat_map(|node| self.convert_node(node))
            .collect()
    }

    /// Converts a single block node to zero or more elements.
    pub fn convert_node(&self, node: &DocumentNode) -> Vec<Element> {
        let Some(kind) = &node.kind else {
            debug!("skipping node without type");
            return Vec::new();
        };

        match kind {
            NodeKind::Paragraph => vec![self.convert_paragraph(node).into()],
            NodeKind::Heading => vec![self.convert_heading(node).into()],
            NodeKind::Blockquote => self.convert_blockquote(node),
            NodeKind::CodeBlock => self.convert_code_block(node),
            NodeKind::Image => vec![self.convert_image(node).into()],
            NodeKind::Table => vec![self.convert_table(node).into()],
            NodeKind::BulletList => self.convert_list(node, false, 0),
            NodeKind::OrderedList => self.convert_list(node, true, 0),
            NodeKind::ListItem => self.convert_list_item(node, &list::bullet(), 0),
            NodeKind::TaskList => self.convert_task_list(node, 0),
            NodeKind::TaskItem => self.convert_task_item(node, 0),
            // A break cannot stand alone at block level.
            NodeKind::HardBreak => vec![ParagraphElement::new().add(Inline::Break).into()],
            NodeKind::Doc
            | NodeKind::Text
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::TableHeader => {
                self.report(Degradation::MalformedTree(format!(
                    "`{}` outside of its container",
                    kind.name()
                )));
                vec![unsupported(kind.name())]
            }
            NodeKind::Unknown(name) => {
                self.report(Degradation::UnsupportedNodeType(name.clone()));
                vec![unsupported(name)]
            }
            NodeKind::Malformed { name, reason } => {
                self.report(Degradation::MalformedTree(format!("`{name}`: {reason}")));
                vec![unsupported(name)]
            }
        }
    }

    fn report(&self, degradation: Degradation) {
        self.diagnostics.report(degradation);
    }
}

/// The placeholder of a node without a conversion rule.
fn unsupported(name: &str) -> Element {
    ParagraphElement::text(unsupported_text(name)).into()
}

fn unsupported_text(name: &str) -> String {
    format!("[Unsupported: {name}]")
}
