//! Conversion and document options.
//!
//! Options are read from camelCase JSON. Formatting overrides cascade from
//! the document over tables and rows down to cells; see
//! [`TableOptions::cell_paragraph`] for the resolution order.

use serde::Deserialize;

use crate::Result;

/// Options of a whole conversion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocxOptions {
    /// Document title, `"Document"` when unset.
    pub title: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document author.
    pub creator: Option<String>,
    /// Document keywords.
    pub keywords: Option<String>,
    /// Document description.
    pub description: Option<String>,
    /// Last author.
    pub last_modified_by: Option<String>,
    /// Revision number, 1 when unset.
    pub revision: Option<u32>,
    /// Additional custom document properties.
    pub custom_properties: Vec<CustomProperty>,
    /// Document default styles.
    pub styles: Option<StylesOptions>,
    /// Page layout of the single section.
    pub section: Option<SectionOptions>,
    /// Options of image paragraphs.
    pub image: ImageOptions,
    /// Options of tables.
    pub table: TableOptions,
}

impl DocxOptions {
    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the document title unless one is already set.
    pub fn or_title(mut self, title: impl FnOnce() -> String) -> Self {
        self.title.get_or_insert_with(title);
        self
    }

    /// The default paragraph formatting of the document.
    pub fn default_paragraph(&self) -> Option<&ParagraphOptions> {
        self.document_style()?.paragraph.as_ref()
    }

    /// The default run formatting of the document.
    pub fn default_run(&self) -> Option<&RunOptions> {
        self.document_style()?.run.as_ref()
    }

    fn document_style(&self) -> Option<&DocumentStyleOptions> {
        self.styles.as_ref()?.default.as_ref()?.document.as_ref()
    }
}

/// A custom document property.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomProperty {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: String,
}

/// `styles` of [`DocxOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StylesOptions {
    /// Defaults applied to the whole document.
    pub default: Option<DefaultStylesOptions>,
}

/// `styles.default` of [`DocxOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefaultStylesOptions {
    /// Document-wide defaults.
    pub document: Option<DocumentStyleOptions>,
}

/// `styles.default.document` of [`DocxOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentStyleOptions {
    /// Default paragraph formatting.
    pub paragraph: Option<ParagraphOptions>,
    /// Default run formatting.
    pub run: Option<RunOptions>,
}

/// Run formatting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Font size in half-points.
    pub size: Option<u32>,
    /// Font family.
    pub font: Option<String>,
    /// Hex color without `#`.
    pub color: Option<String>,
}

/// Horizontal alignment of paragraphs and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    /// Left, or the start in left-to-right text.
    #[serde(alias = "start")]
    Left,
    /// Centered.
    Center,
    /// Right, or the end in left-to-right text.
    #[serde(alias = "end")]
    Right,
    /// Justified.
    #[serde(alias = "both", alias = "justified")]
    Justify,
}

impl Alignment {
    /// Parses an editor `textAlign` attribute.
    pub fn from_text_align(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Paragraph spacing in twips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// Space before.
    pub before: Option<u32>,
    /// Space after.
    pub after: Option<u32>,
    /// Line height, 240 being single spacing.
    pub line: Option<u32>,
}

/// Paragraph indentation in twips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Indent {
    /// Left indent.
    pub left: Option<i32>,
    /// Right indent.
    pub right: Option<i32>,
}

/// Paragraph formatting overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParagraphOptions {
    /// Alignment.
    pub alignment: Option<Alignment>,
    /// Spacing.
    pub spacing: Option<Spacing>,
    /// Indentation.
    pub indent: Option<Indent>,
    /// Paragraph style id.
    pub style: Option<String>,
}

/// Options with no effect when nothing is set.
pub trait Overrides {
    /// Whether no override is set.
    fn is_empty(&self) -> bool;
}

impl Overrides for ParagraphOptions {
    fn is_empty(&self) -> bool {
        self == &ParagraphOptions::default()
    }
}

impl Overrides for CellOptions {
    fn is_empty(&self) -> bool {
        self == &CellOptions::default()
    }
}

/// Picks the first source that is present and not empty.
pub fn first_non_empty<'a, T: Overrides + 'a>(
    sources: impl IntoIterator<Item = Option<&'a T>>,
) -> Option<&'a T> {
    sources
        .into_iter()
        .flatten()
        .find(|source| !source.is_empty())
}

/// `section` of [`DocxOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionOptions {
    /// Page geometry.
    pub page: Option<PageOptions>,
}

/// Page geometry in twips.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    /// Page size.
    pub size: Option<PageSize>,
    /// Page margins.
    pub margin: Option<PageMargin>,
}

/// Page size in twips.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageSize {
    /// Page width.
    pub width: u32,
    /// Page height.
    pub height: u32,
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PageMargin {
    /// Top margin.
    pub top: Option<i32>,
    /// Right margin.
    pub right: Option<i32>,
    /// Bottom margin.
    pub bottom: Option<i32>,
    /// Left margin.
    pub left: Option<i32>,
}

/// `image` of [`DocxOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Overrides of the paragraph wrapping each image.
    pub paragraph: Option<ParagraphOptions>,
}

/// Unit of a width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidthUnit {
    /// Twentieths of a point.
    Dxa,
    /// Fiftieths of a percent in the document markup; here, whole percents.
    Pct,
    /// Sized by content.
    Auto,
}

/// A width with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Width {
    /// The magnitude.
    pub size: u32,
    /// The unit.
    #[serde(rename = "type")]
    pub unit: WidthUnit,
}

impl Width {
    /// A width in twentieths of a point.
    pub fn dxa(size: u32) -> Self {
        Self {
            size,
            unit: WidthUnit::Dxa,
        }
    }
}

/// Column layout algorithm of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableLayout {
    /// Columns resize to fit content.
    Autofit,
    /// Columns keep their widths.
    Fixed,
}

/// Vertical alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    /// Top.
    Top,
    /// Center.
    Center,
    /// Bottom.
    Bottom,
}

/// `table` of [`DocxOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Table-level properties.
    pub properties: Option<TablePropertiesOptions>,
    /// Paragraph overrides for all cells.
    pub paragraph: Option<ParagraphOptions>,
    /// Row overrides.
    pub row: Option<RowOptions>,
    /// Body cell overrides.
    pub cell: Option<CellOptions>,
    /// Header cell overrides.
    pub header: Option<CellOptions>,
}

/// Which kind of cell is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// A body cell.
    Body,
    /// A header cell.
    Header,
}

impl TableOptions {
    /// The cell-scope overrides for a cell kind.
    pub fn cell_options(&self, kind: CellKind) -> Option<&CellOptions> {
        match kind {
            CellKind::Body => self.cell.as_ref(),
            CellKind::Header => self.header.as_ref(),
        }
    }

    /// Resolves the paragraph overrides of a cell: the cell (or header)
    /// scope, then the row scope, then the table scope.
    pub fn cell_paragraph(&self, kind: CellKind) -> Option<&ParagraphOptions> {
        let own = self.cell_options(kind).and_then(|c| c.paragraph.as_ref());
        let row = self.row.as_ref().and_then(|r| r.paragraph.as_ref());
        first_non_empty([own, row, self.paragraph.as_ref()])
    }
}

/// `table.properties` of [`DocxOptions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TablePropertiesOptions {
    /// Table width.
    pub width: Option<Width>,
    /// Table alignment.
    pub alignment: Option<Alignment>,
    /// Column layout.
    pub layout: Option<TableLayout>,
    /// Table style id.
    pub style: Option<String>,
}

/// `table.row` of [`DocxOptions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RowOptions {
    /// Paragraph overrides of the row's cells.
    pub paragraph: Option<ParagraphOptions>,
    /// Row height in twips.
    pub height: Option<u32>,
    /// Repeat the row on each page.
    pub table_header: Option<bool>,
}

/// `table.cell` and `table.header` of [`DocxOptions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellOptions {
    /// Paragraph overrides of the cell.
    pub paragraph: Option<ParagraphOptions>,
    /// Background fill, hex without `#`.
    pub shading: Option<String>,
    /// Vertical alignment.
    pub vertical_align: Option<VerticalAlign>,
    /// Default width, superseded by the node's `colwidth`.
    pub width: Option<Width>,
}
