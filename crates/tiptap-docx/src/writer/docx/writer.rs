//! DOCX document writer implementation

use std::io::Cursor;

use docx_rs::*;

use crate::converter::{
    Element, Inline, ParagraphElement, TableCellElement, TableElement, TextRun,
};
use crate::numbering::NumberingDefinition;
use crate::options::{DocxOptions, TableLayout, VerticalAlign, Width, WidthUnit};
use crate::{Error, Result};

use super::image_processor::DocxImageProcessor;
use super::numbering::DocxNumbering;
use super::styles::{alignment_type, initialize_defaults, initialize_styles};

/// Title of documents without one.
pub const DEFAULT_TITLE: &str = "Document";

/// Renders converted elements into a packaged DOCX file.
pub struct DocxWriter<'a> {
    options: &'a DocxOptions,
    numbering: DocxNumbering,
    image_processor: DocxImageProcessor,
}

impl<'a> DocxWriter<'a> {
    /// Creates a writer for one document.
    pub fn new(options: &'a DocxOptions) -> Self {
        Self {
            options,
            numbering: DocxNumbering::default(),
            image_processor: DocxImageProcessor,
        }
    }

    /// A text run, colored by the document default unless it has a color.
    fn process_text_run(&self, text: &TextRun) -> Run {
        let run = self.format_run(text);
        let default_color = self.options.default_run().and_then(|run| run.color.as_ref());
        match default_color {
            Some(color) if text.color.is_none() => run.color(color),
            _ => run,
        }
    }

    /// A run inside a hyperlink, which takes its color from the link style.
    fn process_link_run(&self, text: &TextRun) -> Run {
        let run = self.format_run(text);
        if text.code { run } else { run.style("Hyperlink") }
    }

    fn format_run(&self, text: &TextRun) -> Run {
        let mut run = Run::new().add_text(&text.text);
        if text.code {
            run = run.style("CodeInline");
        }
        if text.bold {
            run = run.bold();
        }
        if text.italic {
            run = run.italic();
        }
        if text.underline {
            run = run.underline("single");
        }
        if text.strike {
            run = run.strike();
        }
        if text.superscript {
            run.run_property = run.run_property.vert_align(VertAlignType::SuperScript);
        } else if text.subscript {
            run.run_property = run.run_property.vert_align(VertAlignType::SubScript);
        }
        if let Some(highlight) = &text.highlight {
            run = run.highlight(highlight);
        }
        if let Some(color) = &text.color {
            run = run.color(color);
        }
        run
    }

    /// Process paragraph
    ///
    /// Style, alignment and indent fall back to the document defaults. A
    /// numbered paragraph keeps the indent of its numbering level.
    fn process_paragraph(&self, element: &ParagraphElement) -> Paragraph {
        let mut para = Paragraph::new();
        let defaults = self.options.default_paragraph();

        if let Some(style) = element
            .style
            .as_ref()
            .or_else(|| defaults?.style.as_ref())
        {
            para = para.style(style);
        }
        if let Some(alignment) = element.alignment.or_else(|| defaults?.alignment) {
            para = para.align(alignment_type(alignment));
        }
        if let Some(spacing) = element.spacing {
            let mut line_spacing = LineSpacing::new();
            if let Some(before) = spacing.before {
                line_spacing = line_spacing.before(before);
            }
            if let Some(after) = spacing.after {
                line_spacing = line_spacing.after(after);
            }
            if let Some(line) = spacing.line {
                line_spacing = line_spacing.line(line as _);
            }
            para = para.line_spacing(line_spacing);
        }
        if let Some(numbering) = &element.numbering {
            para = self.numbering.apply(para, numbering);
        }
        // Overrides the indent of the numbering level.
        let indent = match &element.numbering {
            Some(_) => element.indent,
            None => element.indent.or_else(|| defaults?.indent),
        };
        if let Some(indent) = indent {
            para = para.indent(indent.left, None, indent.right, None);
        }

        for child in &element.children {
            match child {
                Inline::Text(text) => para = para.add_run(self.process_text_run(text)),
                Inline::Break => para = para.add_run(Run::new().add_break(BreakType::TextWrapping)),
                Inline::Image(image) => {
                    para = para.add_run(self.image_processor.process_inline_image(Run::new(), image))
                }
                Inline::Hyperlink { url, runs } => {
                    let mut hyperlink = Hyperlink::new(url, HyperlinkType::External);
                    for text in runs {
                        hyperlink = hyperlink.add_run(self.process_link_run(text));
                    }
                    para = para.add_hyperlink(hyperlink);
                }
            }
        }
        para
    }

    /// Process table
    ///
    /// Row spans become vertical merges: the spanning cell restarts the
    /// merge and each following row receives a continuation cell in its
    /// place.
    fn process_table(&self, element: &TableElement) -> Table {
        let columns = grid_width(element);
        let properties = &element.properties;

        let mut table = Table::new(vec![]).style(properties.style.as_deref().unwrap_or("Table"));
        if let Some(width) = properties.width {
            let (size, ty) = width_of(width);
            table = table.width(size, ty);
        }
        if let Some(alignment) = properties.alignment {
            table = table.align(match alignment {
                crate::options::Alignment::Center => TableAlignmentType::Center,
                crate::options::Alignment::Right => TableAlignmentType::Right,
                _ => TableAlignmentType::Left,
            });
        }
        if let Some(layout) = properties.layout {
            table = table.layout(match layout {
                TableLayout::Fixed => TableLayoutType::Fixed,
                TableLayout::Autofit => TableLayoutType::Autofit,
            });
        }

        // Remaining rows and grid span of the merge starting at a column.
        let mut vmerge: Vec<Option<(usize, usize)>> = vec![None; columns];

        for row in &element.rows {
            let mut cells = Vec::new();
            let mut col_index = 0;
            let mut cell_iter = row.cells.iter();

            while col_index < columns {
                if let Some((remaining, span)) = vmerge[col_index] {
                    let mut continuation = TableCell::new()
                        .add_paragraph(Paragraph::new())
                        .vertical_merge(VMergeType::Continue);
                    if span > 1 {
                        continuation = continuation.grid_span(span);
                    }
                    cells.push(continuation);
                    vmerge[col_index] = (remaining > 1).then_some((remaining - 1, span));
                    col_index += span;
                    continue;
                }

                if let Some(cell) = cell_iter.next() {
                    let span = cell.grid_columns().min(columns - col_index);
                    let mut table_cell = self.build_table_cell(cell);
                    if span > 1 {
                        table_cell = table_cell.grid_span(span);
                    }
                    if let Some(rows) = cell.row_span {
                        table_cell = table_cell.vertical_merge(VMergeType::Restart);
                        vmerge[col_index] = Some((rows as usize - 1, span));
                    }
                    cells.push(table_cell);
                    col_index += span;
                } else {
                    cells.push(TableCell::new().add_paragraph(Paragraph::new()));
                    col_index += 1;
                }
            }

            let mut table_row = TableRow::new(cells);
            if let Some(height) = row.height {
                table_row = table_row.row_height(height as _);
            }
            table = table.add_row(table_row);
        }
        table
    }

    fn build_table_cell(&self, cell: &TableCellElement) -> TableCell {
        let mut table_cell = TableCell::new();
        for para in &cell.paragraphs {
            table_cell = table_cell.add_paragraph(self.process_paragraph(para));
        }
        // Every cell needs a paragraph in the markup, empty cells included.
        if cell.paragraphs.is_empty() {
            table_cell = table_cell.add_paragraph(Paragraph::new());
        }

        if let Some(width) = cell.width {
            let (size, ty) = width_of(width);
            table_cell = table_cell.width(size, ty);
        }
        if let Some(fill) = &cell.shading {
            table_cell = table_cell.shading(Shading::new().fill(fill));
        }
        if let Some(align) = cell.vertical_align {
            table_cell = table_cell.vertical_align(match align {
                VerticalAlign::Top => VAlignType::Top,
                VerticalAlign::Center => VAlignType::Center,
                VerticalAlign::Bottom => VAlignType::Bottom,
            });
        }
        table_cell
    }

    /// Writes the document properties.
    fn process_metadata(&self, mut docx: Docx) -> Docx {
        let options = self.options;
        let title = options.title.as_deref().unwrap_or(DEFAULT_TITLE);
        let revision = options.revision.unwrap_or(1).to_string();

        docx = docx
            .custom_property("title", title)
            .custom_property("revision", revision);
        for (name, value) in [
            ("subject", &options.subject),
            ("creator", &options.creator),
            ("keywords", &options.keywords),
            ("description", &options.description),
            ("lastModifiedBy", &options.last_modified_by),
        ] {
            if let Some(value) = value {
                docx = docx.custom_property(name, value);
            }
        }
        for property in &options.custom_properties {
            docx = docx.custom_property(&property.name, &property.value);
        }
        docx
    }

    /// Applies the page geometry of the single section.
    fn process_section(&self, mut docx: Docx) -> Docx {
        let Some(page) = self.options.section.as_ref().and_then(|s| s.page.as_ref()) else {
            return docx;
        };

        if let Some(size) = page.size {
            docx = docx.page_size(size.width, size.height);
        }
        if let Some(margin) = page.margin {
            let mut page_margin = PageMargin::new();
            if let Some(top) = margin.top {
                page_margin = page_margin.top(top);
            }
            if let Some(right) = margin.right {
                page_margin = page_margin.right(right);
            }
            if let Some(bottom) = margin.bottom {
                page_margin = page_margin.bottom(bottom);
            }
            if let Some(left) = margin.left {
                page_margin = page_margin.left(left);
            }
            docx = docx.page_margin(page_margin);
        }
        docx
    }

    /// Generate DOCX document
    pub fn generate_docx(
        &mut self,
        elements: &[Element],
        numbering: &[NumberingDefinition],
    ) -> Result<Vec<u8>> {
        let mut docx = initialize_styles(Docx::new());
        docx = initialize_defaults(docx, self.options);
        docx = self.numbering.initialize_numbering(docx, numbering);
        docx = self.process_metadata(docx);
        docx = self.process_section(docx);

        for element in elements {
            docx = match element {
                Element::Paragraph(para) => docx.add_paragraph(self.process_paragraph(para)),
                Element::Table(table) => docx.add_table(self.process_table(table)),
            };
        }

        let mut buffer = Vec::new();
        docx.build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|e| Error::pack(e.to_string()))?;

        Ok(buffer)
    }
}

/// Whole percents are written in fiftieths of a percent.
fn width_of(width: Width) -> (usize, WidthType) {
    match width.unit {
        WidthUnit::Dxa => (width.size as usize, WidthType::Dxa),
        WidthUnit::Pct => (width.size as usize * 50, WidthType::Pct),
        WidthUnit::Auto => (0, WidthType::Auto),
    }
}

/// The number of grid columns a table needs, accounting for spans.
fn grid_width(table: &TableElement) -> usize {
    let mut columns = 0;
    // Remaining rows and grid span of the merge starting at a column.
    let mut merges: Vec<Option<(usize, usize)>> = Vec::new();

    for row in &table.rows {
        let mut col_index = 0;
        let mut cell_iter = row.cells.iter().peekable();

        while cell_iter.peek().is_some() || merges.iter().skip(col_index).any(Option::is_some) {
            if merges.len() <= col_index {
                merges.resize(col_index + 1, None);
            }
            if let Some((remaining, span)) = merges[col_index] {
                merges[col_index] = (remaining > 1).then_some((remaining - 1, span));
                col_index += span;
                continue;
            }

            match cell_iter.next() {
                Some(cell) => {
                    let span = cell.grid_columns();
                    if let Some(rows) = cell.row_span {
                        merges[col_index] = Some((rows as usize - 1, span));
                    }
                    col_index += span;
                }
                None => col_index += 1,
            }
        }
        columns = columns.max(col_index);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::TableRowElement;
    use crate::options::CellKind;

    fn cell(column_span: Option<u32>, row_span: Option<u32>) -> TableCellElement {
        let mut cell = TableCellElement::new(CellKind::Body);
        cell.column_span = column_span;
        cell.row_span = row_span;
        cell
    }

    fn table(rows: Vec<Vec<TableCellElement>>) -> TableElement {
        TableElement {
            rows: rows
                .into_iter()
                .map(|cells| TableRowElement {
                    cells,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn run_xml(text: TextRun) -> String {
        let options = DocxOptions::default();
        let run = DocxWriter::new(&options).process_text_run(&text);
        String::from_utf8(run.build()).unwrap()
    }

    #[test]
    fn vertical_alignment() {
        let xml = run_xml(TextRun {
            superscript: true,
            ..TextRun::new("2")
        });
        assert!(xml.contains(r#"<w:vertAlign w:val="superscript""#), "{xml}");

        let xml = run_xml(TextRun {
            subscript: true,
            ..TextRun::new("i")
        });
        assert!(xml.contains(r#"<w:vertAlign w:val="subscript""#), "{xml}");

        assert!(!run_xml(TextRun::new("x")).contains("w:vertAlign"));
    }

    #[test]
    fn document_defaults() {
        let options = DocxOptions::from_json(
            r#"{ "styles": { "default": { "document": {
                "paragraph": { "alignment": "justify", "indent": { "left": 360 }, "style": "BodyText" },
                "run": { "color": "333333" }
            } } } }"#,
        )
        .unwrap();
        let writer = DocxWriter::new(&options);

        let body = ParagraphElement::text("body").add(Inline::Hyperlink {
            url: "https://example.com".into(),
            runs: vec![TextRun::new("link")],
        });
        let xml = String::from_utf8(writer.process_paragraph(&body).build()).unwrap();
        assert!(xml.contains(r#"<w:pStyle w:val="BodyText""#), "{xml}");
        assert!(xml.contains(r#"<w:jc w:val="both""#), "{xml}");
        assert!(xml.contains(r#"w:left="360""#), "{xml}");
        // The link keeps the color of its style.
        assert_eq!(xml.matches(r#"<w:color w:val="333333""#).count(), 1, "{xml}");

        let mut heading = ParagraphElement::text("title").style("Heading1");
        heading.alignment = Some(crate::options::Alignment::Center);
        let xml = String::from_utf8(writer.process_paragraph(&heading).build()).unwrap();
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1""#), "{xml}");
        assert!(xml.contains(r#"<w:jc w:val="center""#), "{xml}");
    }

    #[test]
    fn grid_width_counts_spans() {
        let plain = table(vec![vec![cell(None, None), cell(None, None)]]);
        assert_eq!(grid_width(&plain), 2);

        let spanned = table(vec![
            vec![cell(Some(2), None), cell(None, None)],
            vec![cell(None, None)],
        ]);
        assert_eq!(grid_width(&spanned), 3);
    }

    #[test]
    fn grid_width_counts_merged_columns() {
        let merged = table(vec![
            vec![cell(None, Some(3)), cell(None, None)],
            vec![cell(None, None)],
            vec![cell(None, None)],
        ]);
        assert_eq!(grid_width(&merged), 2);
    }

    #[test]
    fn widths() {
        assert_eq!(width_of(Width::dxa(2400)).0, 2400);
        let pct = Width {
            size: 100,
            unit: WidthUnit::Pct,
        };
        assert_eq!(width_of(pct).0, 5000);
    }
}
