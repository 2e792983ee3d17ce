//! The document tree produced by the rich-text editor.
//!
//! Trees are read from the editor's JSON shape (`type`, `attrs`, `content`,
//! `marks`, `text`). Deserialization is lenient: `null` children and nodes
//! without a `type` are kept as typeless nodes, which the converter skips.
//! A node whose fields have the wrong shape becomes a
//! [`NodeKind::Malformed`] node instead of failing the whole tree.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::Result;

/// The type of a [`DocumentNode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root.
    Doc,
    /// A paragraph of inline content.
    Paragraph,
    /// A heading, `attrs.level` in `1..=6`.
    Heading,
    /// A block quote wrapping block content.
    Blockquote,
    /// A code block of plain text.
    CodeBlock,
    /// An image, see [`ImageAttributes`].
    Image,
    /// A table of rows.
    Table,
    /// A table row of cells.
    TableRow,
    /// A body cell, see [`TableCellAttributes`].
    TableCell,
    /// A header cell, see [`TableCellAttributes`].
    TableHeader,
    /// An unordered list.
    BulletList,
    /// An ordered list, optional `attrs.start`.
    OrderedList,
    /// An item of a bullet or ordered list.
    ListItem,
    /// A list of checkable items.
    TaskList,
    /// A checkable item, `attrs.checked`.
    TaskItem,
    /// A line break inside inline content.
    HardBreak,
    /// A run of text carrying marks.
    Text,
    /// Any type without a conversion rule.
    Unknown(String),
    /// A node whose JSON shape cannot be read.
    Malformed {
        /// The type name, or the raw `type` value when it is not a string.
        name: String,
        /// What is wrong with the node.
        reason: String,
    },
}

impl NodeKind {
    /// Maps an editor type name to its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "blockquote" => NodeKind::Blockquote,
            "codeBlock" => NodeKind::CodeBlock,
            "image" => NodeKind::Image,
            "table" => NodeKind::Table,
            "tableRow" => NodeKind::TableRow,
            "tableCell" => NodeKind::TableCell,
            "tableHeader" => NodeKind::TableHeader,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "taskList" => NodeKind::TaskList,
            "taskItem" => NodeKind::TaskItem,
            "hardBreak" => NodeKind::HardBreak,
            "text" => NodeKind::Text,
            other => NodeKind::Unknown(other.to_owned()),
        }
    }

    /// The editor type name.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Blockquote => "blockquote",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::Image => "image",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::TableHeader => "tableHeader",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::TaskList => "taskList",
            NodeKind::TaskItem => "taskItem",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::Text => "text",
            NodeKind::Unknown(name) => name,
            NodeKind::Malformed { name, .. } => name,
        }
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentNode {
    /// The node type, `None` when the source omitted it.
    pub kind: Option<NodeKind>,
    /// Type-dependent attributes.
    pub attrs: Attrs,
    /// Children in source order.
    pub content: Vec<DocumentNode>,
    /// Inline formatting of a text node.
    pub marks: Vec<Mark>,
    /// The text of a text node.
    pub text: Option<String>,
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Value::deserialize(d).map(DocumentNode::from)
    }
}

impl From<Value> for DocumentNode {
    fn from(value: Value) -> Self {
        let mut fields = match value {
            Value::Null => return Self::default(),
            Value::Object(fields) => fields,
            other => {
                return Self::malformed(describe(&other), "node is not an object".into());
            }
        };

        let kind = match fields.remove("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) if name.is_empty() => None,
            Some(Value::String(name)) => Some(NodeKind::from_name(&name)),
            Some(other) => {
                return Self::malformed(describe(&other), "`type` is not a string".into());
            }
        };
        // Typeless nodes are skipped anyway, whatever their shape.
        let fail = |reason: &str| match &kind {
            Some(kind) => Self::malformed(kind.name().to_owned(), reason.to_owned()),
            None => Self::default(),
        };

        let attrs = match read_attrs(fields.remove("attrs")) {
            Ok(attrs) => attrs,
            Err(reason) => return fail(reason),
        };
        let marks = match read_marks(fields.remove("marks")) {
            Ok(marks) => marks,
            Err(reason) => return fail(reason),
        };
        let text = match fields.remove("text") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(_) => return fail("`text` is not a string"),
        };
        let content = match fields.remove("content") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(children)) => children.into_iter().map(DocumentNode::from).collect(),
            Some(_) => return fail("`content` is not an array"),
        };

        Self {
            kind,
            attrs,
            content,
            marks,
            text,
        }
    }
}

impl DocumentNode {
    /// Parses a tree from the editor's JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a tree from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The type name, or `None` for typeless nodes.
    pub fn type_name(&self) -> Option<&str> {
        self.kind.as_ref().map(NodeKind::name)
    }

    /// Whether the node has the given kind.
    pub fn is(&self, kind: &NodeKind) -> bool {
        self.kind.as_ref() == Some(kind)
    }

    fn malformed(name: String, reason: String) -> Self {
        Self {
            kind: Some(NodeKind::Malformed { name, reason }),
            ..Self::default()
        }
    }

    /// Iterates over the node and all its descendants in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = &DocumentNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.content.iter().rev());
            Some(node)
        })
    }
}

/// Attributes of a node or mark.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Attrs(Map<String, Value>);

impl Attrs {
    /// Gets a non-null attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Gets a string attribute.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Gets a numeric attribute, accepting numeric strings as produced by
    /// markup parsing.
    pub fn number(&self, key: &str) -> Option<f64> {
        as_number(self.get(key)?)
    }

    /// Gets a positive integer attribute, rounding fractional values.
    pub fn positive(&self, key: &str) -> Option<u32> {
        to_positive(self.number(key)?)
    }

    /// Gets a boolean attribute.
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Value::is_null)
    }
}

impl FromIterator<(String, Value)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Attrs(iter.into_iter().collect())
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n: f64 = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches("px").parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn to_positive(n: f64) -> Option<u32> {
    let n = n.round();
    (n >= 1.0 && n <= u32::MAX as f64).then_some(n as u32)
}

/// The kind of an inline mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    /// `bold`
    Bold,
    /// `italic`
    Italic,
    /// `underline`
    Underline,
    /// `strike`
    Strike,
    /// `code`
    Code,
    /// `link`, `attrs.href`
    Link,
    /// `subscript`
    Subscript,
    /// `superscript`
    Superscript,
    /// `highlight`, optional `attrs.color`
    Highlight,
    /// `textStyle`, optional `attrs.color`
    TextStyle,
    /// Anything else.
    Other,
}

/// An inline formatting tag on a text node.
#[derive(Debug, Clone, Default)]
pub struct Mark {
    /// The mark type name.
    pub name: String,
    /// Type-dependent attributes.
    pub attrs: Attrs,
}

impl Mark {
    /// Classifies the mark.
    pub fn kind(&self) -> MarkKind {
        match self.name.as_str() {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "underline" => MarkKind::Underline,
            "strike" => MarkKind::Strike,
            "code" => MarkKind::Code,
            "link" => MarkKind::Link,
            "subscript" => MarkKind::Subscript,
            "superscript" => MarkKind::Superscript,
            "highlight" => MarkKind::Highlight,
            "textStyle" => MarkKind::TextStyle,
            _ => MarkKind::Other,
        }
    }
}

/// Attributes of an image node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAttributes {
    /// A remote locator or an inline-encoded payload.
    pub src: String,
    /// Explicit width in pixels.
    pub width: Option<u32>,
    /// Explicit height in pixels.
    pub height: Option<u32>,
    /// Alternative text.
    pub alt: Option<String>,
}

impl From<&Attrs> for ImageAttributes {
    fn from(attrs: &Attrs) -> Self {
        let text = |key| attrs.str(key).filter(|s| !s.is_empty()).map(str::to_owned);
        Self {
            src: attrs.str("src").unwrap_or_default().to_owned(),
            width: attrs.positive("width"),
            height: attrs.positive("height"),
            alt: text("alt"),
        }
    }
}

/// Attributes of a table cell or header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCellAttributes {
    /// Number of grid columns spanned.
    pub colspan: u32,
    /// Number of rows spanned.
    pub rowspan: u32,
    /// Explicit width in twentieths of a point.
    pub colwidth: Option<u32>,
}

impl Default for TableCellAttributes {
    fn default() -> Self {
        Self {
            colspan: 1,
            rowspan: 1,
            colwidth: None,
        }
    }
}

impl From<&Attrs> for TableCellAttributes {
    fn from(attrs: &Attrs) -> Self {
        // The editor stores one width per spanned column.
        let colwidth = match attrs.get("colwidth") {
            Some(Value::Array(widths)) => {
                let widths = widths.iter().filter_map(as_number).collect::<Vec<_>>();
                (!widths.is_empty())
                    .then(|| widths.iter().sum::<f64>())
                    .and_then(to_positive)
            }
            Some(value) => as_number(value).and_then(to_positive),
            None => None,
        };

        Self {
            colspan: attrs.positive("colspan").unwrap_or(1),
            rowspan: attrs.positive("rowspan").unwrap_or(1),
            colwidth,
        }
    }
}

/// The JSON text of a value, cut short for display.
fn describe(value: &Value) -> String {
    let text = value.to_string();
    match text.char_indices().nth(32) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text,
    }
}

fn read_attrs(value: Option<Value>) -> Result<Attrs, &'static str> {
    match value {
        None | Some(Value::Null) => Ok(Attrs::default()),
        Some(Value::Object(attrs)) => Ok(Attrs(attrs)),
        Some(_) => Err("`attrs` is not an object"),
    }
}

fn read_marks(value: Option<Value>) -> Result<Vec<Mark>, &'static str> {
    let marks = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(marks)) => marks,
        Some(_) => return Err("`marks` is not an array"),
    };

    marks
        .into_iter()
        .filter(|mark| !mark.is_null())
        .map(|mark| {
            let Value::Object(mut fields) = mark else {
                return Err("mark is not an object");
            };
            let name = match fields.remove("type") {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(name)) => name,
                Some(_) => return Err("mark `type` is not a string"),
            };
            Ok(Mark {
                name,
                attrs: read_attrs(fields.remove("attrs"))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lenient_children() {
        let node = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [null, { "attrs": null }, { "type": "fooBar", "marks": null }],
        }))
        .unwrap();

        assert_eq!(node.kind, Some(NodeKind::Doc));
        assert_eq!(node.content.len(), 3);
        assert_eq!(node.content[0].kind, None);
        assert_eq!(node.content[1].kind, None);
        assert_eq!(
            node.content[2].kind,
            Some(NodeKind::Unknown("fooBar".into()))
        );
    }

    #[test]
    fn malformed_nodes_keep_siblings() {
        let node = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [
                { "type": 42 },
                { "type": "paragraph", "attrs": [1, 2] },
                { "type": "text", "marks": [{ "type": "bold" }, 7] },
                { "type": "heading", "content": "title" },
                "loose",
                { "attrs": 3 },
                { "type": "paragraph", "content": [{ "type": "text", "text": "kept" }] },
            ],
        }))
        .unwrap();

        let kinds = node
            .content
            .iter()
            .map(|child| match &child.kind {
                Some(NodeKind::Malformed { name, .. }) => format!("malformed {name}"),
                Some(kind) => kind.name().to_owned(),
                None => "none".to_owned(),
            })
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                "malformed 42",
                "malformed paragraph",
                "malformed text",
                "malformed heading",
                "malformed \"loose\"",
                "none",
                "paragraph",
            ]
        );
        assert_eq!(node.content[6].content[0].text.as_deref(), Some("kept"));
    }

    #[test]
    fn marks_are_read() {
        let node = DocumentNode::from_value(json!({
            "type": "text",
            "text": "x",
            "marks": [{ "type": "link", "attrs": { "href": "https://a.b" } }, null, { "attrs": null }],
        }))
        .unwrap();

        assert_eq!(node.marks.len(), 2);
        assert_eq!(node.marks[0].kind(), MarkKind::Link);
        assert_eq!(node.marks[0].attrs.str("href"), Some("https://a.b"));
        assert_eq!(node.marks[1].kind(), MarkKind::Other);
    }

    #[test]
    fn cell_attributes() {
        let attrs = |v: Value| TableCellAttributes::from(&serde_json::from_value::<Attrs>(v).unwrap());

        assert_eq!(attrs(json!({})), TableCellAttributes::default());
        assert_eq!(
            attrs(json!({ "colspan": 2, "rowspan": 3, "colwidth": [100, 50] })),
            TableCellAttributes {
                colspan: 2,
                rowspan: 3,
                colwidth: Some(150),
            }
        );
        assert_eq!(attrs(json!({ "colwidth": 2400 })).colwidth, Some(2400));
        assert_eq!(attrs(json!({ "colwidth": [null] })).colwidth, None);
        assert_eq!(attrs(json!({ "colspan": 0 })).colspan, 1);
    }

    #[test]
    fn image_attributes() {
        let attrs: Attrs =
            serde_json::from_value(json!({ "src": "a.png", "width": "320", "height": 0, "alt": "" }))
                .unwrap();
        let image = ImageAttributes::from(&attrs);
        assert_eq!(image.width, Some(320));
        assert_eq!(image.height, None);
        assert_eq!(image.alt, None);
    }

    #[test]
    fn descendants_in_pre_order() {
        let node = DocumentNode::from_value(json!({
            "type": "doc",
            "content": [
                { "type": "bulletList", "content": [{ "type": "listItem" }] },
                { "type": "paragraph" },
            ],
        }))
        .unwrap();
        let names = node
            .descendants()
            .filter_map(DocumentNode::type_name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["doc", "bulletList", "listItem", "paragraph"]);
    }
}
