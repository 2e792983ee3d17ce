//! Document structure representation before converting to DOCX

use std::fmt;

use crate::media::ImageType;
use crate::options::{
    Alignment, CellKind, Indent, ParagraphOptions, Spacing, TablePropertiesOptions, VerticalAlign,
    Width,
};

/// A top-level block of the output document.
#[derive(Clone, Debug)]
pub enum Element {
    /// A paragraph.
    Paragraph(ParagraphElement),
    /// A table.
    Table(TableElement),
}

impl Element {
    /// The paragraph, if this is one.
    pub fn as_paragraph(&self) -> Option<&ParagraphElement> {
        match self {
            Element::Paragraph(para) => Some(para),
            Element::Table(_) => None,
        }
    }

    /// The table, if this is one.
    pub fn as_table(&self) -> Option<&TableElement> {
        match self {
            Element::Table(table) => Some(table),
            Element::Paragraph(_) => None,
        }
    }
}

impl From<ParagraphElement> for Element {
    fn from(para: ParagraphElement) -> Self {
        Element::Paragraph(para)
    }
}

impl From<TableElement> for Element {
    fn from(table: TableElement) -> Self {
        Element::Table(table)
    }
}

/// A reference to a numbering definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberingRef {
    /// The definition reference.
    pub reference: String,
    /// The level within the definition.
    pub level: u32,
}

/// A paragraph of inline content.
#[derive(Clone, Debug, Default)]
pub struct ParagraphElement {
    /// Paragraph style id.
    pub style: Option<String>,
    /// Alignment.
    pub alignment: Option<Alignment>,
    /// Spacing.
    pub spacing: Option<Spacing>,
    /// Indentation.
    pub indent: Option<Indent>,
    /// List numbering.
    pub numbering: Option<NumberingRef>,
    /// Inline content.
    pub children: Vec<Inline>,
}

impl ParagraphElement {
    /// Creates an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a paragraph holding one plain run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().add(Inline::Text(TextRun::new(text)))
    }

    /// Sets the paragraph style.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Appends inline content.
    pub fn add(mut self, inline: Inline) -> Self {
        self.children.push(inline);
        self
    }

    /// Applies the overrides that are set.
    pub fn apply(&mut self, options: &ParagraphOptions) {
        if let Some(alignment) = options.alignment {
            self.alignment = Some(alignment);
        }
        if let Some(spacing) = options.spacing {
            self.spacing = Some(spacing);
        }
        if let Some(indent) = options.indent {
            self.indent = Some(indent);
        }
        if let Some(style) = &options.style {
            self.style = Some(style.clone());
        }
    }

    /// The plain text of the paragraph.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Inline::Text(run) => text.push_str(&run.text),
                Inline::Hyperlink { runs, .. } => runs.iter().for_each(|r| text.push_str(&r.text)),
                Inline::Break => text.push('\n'),
                Inline::Image(_) => {}
            }
        }
        text
    }

    /// The images of the paragraph.
    pub fn images(&self) -> impl Iterator<Item = &ImageRun> {
        self.children.iter().filter_map(|child| match child {
            Inline::Image(image) => Some(image),
            _ => None,
        })
    }
}

/// Inline content representation
#[derive(Clone, Debug)]
pub enum Inline {
    /// Formatted text.
    Text(TextRun),
    /// A line break.
    Break,
    /// An image.
    Image(ImageRun),
    /// A hyperlink around formatted text.
    Hyperlink {
        /// The link target.
        url: String,
        /// The linked text.
        runs: Vec<TextRun>,
    },
}

/// A run of uniformly formatted text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRun {
    /// The text.
    pub text: String,
    /// Bold.
    pub bold: bool,
    /// Italic.
    pub italic: bool,
    /// Single underline.
    pub underline: bool,
    /// Strikethrough.
    pub strike: bool,
    /// Inline code.
    pub code: bool,
    /// Superscript.
    pub superscript: bool,
    /// Subscript.
    pub subscript: bool,
    /// Highlight color name.
    pub highlight: Option<String>,
    /// Hex color without `#`.
    pub color: Option<String>,
}

impl TextRun {
    /// Creates an unformatted run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// An embedded image.
#[derive(Clone)]
pub struct ImageRun {
    /// The image payload, empty for placeholders.
    pub data: Vec<u8>,
    /// The probed payload type, or the one inferred from the source.
    pub format: ImageType,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Alternative text.
    pub alt: String,
}

impl fmt::Debug for ImageRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRun")
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alt", &self.alt)
            .finish()
    }
}

/// A table.
#[derive(Clone, Debug, Default)]
pub struct TableElement {
    /// Table-level properties.
    pub properties: TablePropertiesOptions,
    /// Rows in source order.
    pub rows: Vec<TableRowElement>,
}

/// A table row.
#[derive(Clone, Debug, Default)]
pub struct TableRowElement {
    /// Cells in source order.
    pub cells: Vec<TableCellElement>,
    /// Height in twips.
    pub height: Option<u32>,
    /// Repeated on each page.
    pub header: bool,
}

/// A table cell.
#[derive(Clone, Debug)]
pub struct TableCellElement {
    /// Whether the cell came from a header node.
    pub kind: CellKind,
    /// Cell paragraphs, possibly none.
    pub paragraphs: Vec<ParagraphElement>,
    /// Number of grid columns spanned, set only above 1.
    pub column_span: Option<u32>,
    /// Number of rows spanned, set only above 1.
    pub row_span: Option<u32>,
    /// Cell width.
    pub width: Option<Width>,
    /// Background fill.
    pub shading: Option<String>,
    /// Vertical alignment.
    pub vertical_align: Option<VerticalAlign>,
}

impl TableCellElement {
    /// Creates an empty cell.
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            paragraphs: Vec::new(),
            column_span: None,
            row_span: None,
            width: None,
            shading: None,
            vertical_align: None,
        }
    }

    /// The grid columns the cell occupies.
    pub fn grid_columns(&self) -> usize {
        self.column_span.unwrap_or(1) as usize
    }
}

// Outline rendering, used to inspect conversions.

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Paragraph(para) => write!(f, "{para}"),
            Element::Table(table) => write!(f, "{table}"),
        }
    }
}

impl fmt::Display for ParagraphElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("paragraph")?;
        let mut props = Vec::new();
        if let Some(style) = &self.style {
            props.push(style.clone());
        }
        if let Some(alignment) = self.alignment {
            props.push(format!("{alignment:?}").to_lowercase());
        }
        if let Some(numbering) = &self.numbering {
            props.push(format!("{}@{}", numbering.reference, numbering.level));
        }
        if let Some(left) = self.indent.and_then(|indent| indent.left) {
            props.push(format!("indent={left}"));
        }
        if !props.is_empty() {
            write!(f, "[{}]", props.join(","))?;
        }
        if self.children.is_empty() {
            return Ok(());
        }
        f.write_str(":")?;
        for child in &self.children {
            write!(f, " {child}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Inline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inline::Text(run) => write!(f, "{run}"),
            Inline::Break => f.write_str("<br>"),
            Inline::Image(image) => {
                write!(
                    f,
                    "<image {}x{} {} {:?}",
                    image.width,
                    image.height,
                    image.format.as_str(),
                    image.alt
                )?;
                if image.data.is_empty() {
                    f.write_str(" empty")?;
                }
                f.write_str(">")
            }
            Inline::Hyperlink { url, runs } => {
                write!(f, "<link {url}")?;
                for run in runs {
                    write!(f, " {run}")?;
                }
                f.write_str(">")
            }
        }
    }
}

impl fmt::Display for TextRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.text)?;
        let mut marks = Vec::new();
        for (set, name) in [
            (self.bold, "b"),
            (self.italic, "i"),
            (self.underline, "u"),
            (self.strike, "s"),
            (self.code, "code"),
            (self.superscript, "sup"),
            (self.subscript, "sub"),
        ] {
            if set {
                marks.push(name.to_owned());
            }
        }
        if let Some(highlight) = &self.highlight {
            marks.push(format!("hl={highlight}"));
        }
        if let Some(color) = &self.color {
            marks.push(format!("color={color}"));
        }
        if !marks.is_empty() {
            write!(f, "({})", marks.join(","))?;
        }
        Ok(())
    }
}

impl fmt::Display for TableElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("table")?;
        for row in &self.rows {
            f.write_str("\n  row")?;
            if row.header {
                f.write_str("[header]")?;
            }
            for cell in &row.cells {
                f.write_str("\n    ")?;
                f.write_str(match cell.kind {
                    CellKind::Body => "cell",
                    CellKind::Header => "th",
                })?;
                let mut props = Vec::new();
                if let Some(span) = cell.column_span {
                    props.push(format!("colspan={span}"));
                }
                if let Some(span) = cell.row_span {
                    props.push(format!("rowspan={span}"));
                }
                if let Some(width) = cell.width {
                    props.push(format!("width={}{:?}", width.size, width.unit).to_lowercase());
                }
                if !props.is_empty() {
                    write!(f, "[{}]", props.join(","))?;
                }
                for para in &cell.paragraphs {
                    write!(f, "\n      {para}")?;
                }
            }
        }
        Ok(())
    }
}
