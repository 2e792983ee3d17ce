//! Bullet, ordered and task lists.
//!
//! Every list paragraph uses level 0 of its numbering definition; nesting
//! is expressed through the left indent.

use super::{Converter, Element, Inline, NumberingRef, ParagraphElement, TextRun};
use crate::node::{DocumentNode, NodeKind};
use crate::numbering::{
    BULLET_REFERENCE, LIST_INDENT, ordered_list_reference, ordered_list_start,
};
use crate::options::Indent;

const UNCHECKED: &str = "☐ ";
const CHECKED: &str = "☒ ";

pub(super) fn bullet() -> NumberingRef {
    NumberingRef {
        reference: BULLET_REFERENCE.to_owned(),
        level: 0,
    }
}

fn indent(depth: u32) -> Indent {
    Indent {
        left: Some(LIST_INDENT * (depth as i32 + 1)),
        right: None,
    }
}

impl Converter<'_> {
    pub(super) fn convert_list(
        &self,
        node: &DocumentNode,
        ordered: bool,
        depth: u32,
    ) -> Vec<Element> {
        let numbering = if ordered {
            NumberingRef {
                reference: ordered_list_reference(ordered_list_start(node)),
                level: 0,
            }
        } else {
            bullet()
        };

        let mut elements = Vec::new();
        for item in &node.content {
            if item.is(&NodeKind::ListItem) {
                elements.extend(self.convert_list_item(item, &numbering, depth));
            } else {
                elements.extend(self.convert_nested(item, depth));
            }
        }
        elements
    }

    /// The first paragraph of an item carries the marker, the following
    /// ones are only indented.
    pub(super) fn convert_list_item(
        &self,
        node: &DocumentNode,
        numbering: &NumberingRef,
        depth: u32,
    ) -> Vec<Element> {
        let mut marker = Some(numbering.clone());
        let mut elements = Vec::new();

        for block in &node.content {
            if block.is(&NodeKind::Paragraph) {
                let mut para = self.convert_paragraph(block);
                match marker.take() {
                    Some(numbering) => {
                        para.numbering = Some(numbering);
                        if depth > 0 {
                            para.indent = Some(indent(depth));
                        }
                    }
                    None => para.indent = Some(indent(depth)),
                }
                elements.push(para.into());
            } else {
                elements.extend(self.convert_nested(block, depth));
            }
        }

        if let Some(numbering) = marker {
            let mut para = ParagraphElement::new();
            para.numbering = Some(numbering);
            if depth > 0 {
                para.indent = Some(indent(depth));
            }
            elements.push(para.into());
        }
        elements
    }

    pub(super) fn convert_task_list(&self, node: &DocumentNode, depth: u32) -> Vec<Element> {
        let mut elements = Vec::new();
        for item in &node.content {
            if item.is(&NodeKind::TaskItem) {
                elements.extend(self.convert_task_item(item, depth));
            } else {
                elements.extend(self.convert_nested(item, depth));
            }
        }
        elements
    }

    pub(super) fn convert_task_item(&self, node: &DocumentNode, depth: u32) -> Vec<Element> {
        let checked = node.attrs.bool("checked").unwrap_or(false);
        let mut checkbox = Some(TextRun::new(if checked { CHECKED } else { UNCHECKED }));
        let mut elements = Vec::new();

        for block in &node.content {
            if block.is(&NodeKind::Paragraph) {
                let mut para = self.convert_paragraph(block);
                if let Some(checkbox) = checkbox.take() {
                    para.children.insert(0, Inline::Text(checkbox));
                }
                para.indent = Some(indent(depth));
                elements.push(para.into());
            } else {
                elements.extend(self.convert_nested(block, depth));
            }
        }

        if let Some(checkbox) = checkbox {
            let mut para = ParagraphElement::new().add(Inline::Text(checkbox));
            para.indent = Some(indent(depth));
            elements.push(para.into());
        }
        elements
    }

    /// Converts a block inside a list, one level deeper when it is a list.
    fn convert_nested(&self, block: &DocumentNode, depth: u32) -> Vec<Element> {
        match &block.kind {
            Some(NodeKind::BulletList) => self.convert_list(block, false, depth + 1),
            Some(NodeKind::OrderedList) => self.convert_list(block, true, depth + 1),
            Some(NodeKind::TaskList) => self.convert_task_list(block, depth + 1),
            _ => self.convert_node(block),
        }
    }
}
