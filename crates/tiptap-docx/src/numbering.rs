//! Numbering definitions for the lists of a document.
//!
//! The synthesis is a pure pre-pass over the whole tree: every distinct
//! ordered-list start value gets its own decimal definition, so that lists
//! restarting at the same value share one definition.

use indexmap::IndexSet;

use crate::node::{DocumentNode, NodeKind};

/// Reference of the bullet definition.
pub const BULLET_REFERENCE: &str = "bullet-list";
/// Reference of the decimal definition starting at 1.
pub const ORDERED_REFERENCE: &str = "ordered-list";

/// Left indent of a list paragraph, in twips (0.5in).
pub const LIST_INDENT: i32 = 720;
/// Hanging indent of the list marker, in twips (0.25in).
pub const LIST_HANGING: i32 = 360;

/// The marker format of a numbering level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    /// A bullet glyph.
    Bullet,
    /// Arabic numerals.
    Decimal,
}

impl LevelFormat {
    /// The format name used in the document markup.
    pub fn as_str(self) -> &'static str {
        match self {
            LevelFormat::Bullet => "bullet",
            LevelFormat::Decimal => "decimal",
        }
    }

    /// The marker text template.
    pub fn text(self) -> &'static str {
        match self {
            LevelFormat::Bullet => "•",
            LevelFormat::Decimal => "%1.",
        }
    }
}

/// A named list-formatting rule referenced by list paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingDefinition {
    /// Unique reference of the definition.
    pub reference: String,
    /// The level, always 0.
    pub level: u32,
    /// The marker format.
    pub format: LevelFormat,
    /// The first number, only meaningful for decimal definitions.
    pub start: u32,
}

impl NumberingDefinition {
    fn bullet() -> Self {
        Self {
            reference: BULLET_REFERENCE.to_owned(),
            level: 0,
            format: LevelFormat::Bullet,
            start: 1,
        }
    }

    fn decimal(start: u32) -> Self {
        Self {
            reference: ordered_list_reference(Some(start)),
            level: 0,
            format: LevelFormat::Decimal,
            start,
        }
    }
}

/// The reference an ordered list with the given start value uses.
pub fn ordered_list_reference(start: Option<u32>) -> String {
    match start {
        None | Some(1) => ORDERED_REFERENCE.to_owned(),
        Some(start) => format!("{ORDERED_REFERENCE}-start-{start}"),
    }
}

/// The start value of an ordered list node, when set.
pub fn ordered_list_start(node: &DocumentNode) -> Option<u32> {
    node.attrs.positive("start")
}

/// Collects the distinct start values of all ordered lists, in the order
/// they are first met by a pre-order traversal.
pub fn collect_list_starts(tree: &DocumentNode) -> IndexSet<u32> {
    tree.descendants()
        .filter(|node| node.is(&NodeKind::OrderedList))
        .filter_map(ordered_list_start)
        .collect()
}

/// Synthesizes the numbering definitions of a document: the bullet
/// definition, the default decimal definition, then one decimal definition
/// per distinct start value other than 1.
pub fn synthesize_numbering(tree: &DocumentNode) -> Vec<NumberingDefinition> {
    let starts = collect_list_starts(tree);

    let mut definitions = Vec::with_capacity(starts.len() + 2);
    definitions.push(NumberingDefinition::bullet());
    definitions.push(NumberingDefinition::decimal(1));
    definitions.extend(
        starts
            .into_iter()
            .filter(|start| *start != 1)
            .map(NumberingDefinition::decimal),
    );
    definitions
}
