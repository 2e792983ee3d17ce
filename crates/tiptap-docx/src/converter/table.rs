//! Tables, rows and cells.

use super::{Converter, Element, ParagraphElement, TableCellElement, TableElement, TableRowElement};
use crate::diagnostics::Degradation;
use crate::node::{DocumentNode, NodeKind, TableCellAttributes};
use crate::options::{CellKind, Width};

impl Converter<'_> {
    pub(super) fn convert_table(&self, node: &DocumentNode) -> TableElement {
        let table = &self.options.table;
        let mut rows = Vec::new();
        for child in &node.content {
            if child.is(&NodeKind::TableRow) {
                rows.push(self.convert_table_row(child));
            } else if child.kind.is_some() {
                self.report(Degradation::MalformedTree(format!(
                    "`{}` inside of `table`",
                    child.type_name().unwrap_or_default()
                )));
            }
        }

        TableElement {
            properties: table.properties.clone().unwrap_or_default(),
            rows,
        }
    }

    fn convert_table_row(&self, node: &DocumentNode) -> TableRowElement {
        let row_options = self.options.table.row.as_ref();
        let mut cells = Vec::new();
        for child in &node.content {
            match &child.kind {
                Some(NodeKind::TableCell) => cells.push(self.convert_table_cell(child, CellKind::Body)),
                Some(NodeKind::TableHeader) => {
                    cells.push(self.convert_table_cell(child, CellKind::Header))
                }
                Some(kind) => self.report(Degradation::MalformedTree(format!(
                    "`{}` inside of `tableRow`",
                    kind.name()
                ))),
                None => {}
            }
        }

        let all_headers =
            !cells.is_empty() && cells.iter().all(|cell| cell.kind == CellKind::Header);
        TableRowElement {
            height: row_options.and_then(|row| row.height),
            header: all_headers || row_options.and_then(|row| row.table_header) == Some(true),
            cells,
        }
    }

    /// Converts a cell or header node.
    ///
    /// Spans are set only above 1 and the width only when the node carries
    /// a `colwidth`; otherwise the configured cell width applies.
    pub(super) fn convert_table_cell(&self, node: &DocumentNode, kind: CellKind) -> TableCellElement {
        let table = &self.options.table;
        let paragraph_options = table.cell_paragraph(kind);

        let mut cell = TableCellElement::new(kind);
        for block in &node.content {
            if block.is(&NodeKind::Paragraph) {
                let mut para = self.convert_paragraph(block);
                if let Some(options) = paragraph_options {
                    para.apply(options);
                }
                cell.paragraphs.push(para);
            } else {
                cell.paragraphs.extend(self.convert_node(block).into_iter().flat_map(flatten));
            }
        }

        let attrs = TableCellAttributes::from(&node.attrs);
        if attrs.colspan > 1 {
            cell.column_span = Some(attrs.colspan);
        }
        if attrs.rowspan > 1 {
            cell.row_span = Some(attrs.rowspan);
        }

        if let Some(options) = table.cell_options(kind) {
            cell.width = options.width;
            cell.shading = options.shading.clone();
            cell.vertical_align = options.vertical_align;
        }
        if let Some(colwidth) = attrs.colwidth {
            cell.width = Some(Width::dxa(colwidth));
        }
        cell
    }
}

/// Cells hold paragraphs only, so nested tables are unrolled cell by cell.
fn flatten(element: Element) -> Vec<ParagraphElement> {
    match element {
        Element::Paragraph(para) => vec![para],
        Element::Table(table) => table
            .rows
            .into_iter()
            .flat_map(|row| row.cells)
            .flat_map(|cell| cell.paragraphs)
            .collect(),
    }
}
