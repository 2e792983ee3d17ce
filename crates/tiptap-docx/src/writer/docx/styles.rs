//! Document style management for DOCX conversion

use docx_rs::*;

use crate::options::DocxOptions;

/// Create a heading style with the specified parameters
fn create_heading_style(name: &str, display_name: &str, size: usize) -> Style {
    Style::new(name, StyleType::Paragraph)
        .name(display_name)
        .size(size)
        .bold()
}

/// Registers the styles every converted document refers to.
pub fn initialize_styles(docx: Docx) -> Docx {
    let heading1 = create_heading_style("Heading1", "Heading 1", 32);
    let heading2 = create_heading_style("Heading2", "Heading 2", 28);
    let heading3 = create_heading_style("Heading3", "Heading 3", 26);
    let heading4 = create_heading_style("Heading4", "Heading 4", 24);
    let heading5 = create_heading_style("Heading5", "Heading 5", 22);
    let heading6 = create_heading_style("Heading6", "Heading 6", 20);

    let courier_fonts = RunFonts::new()
        .ascii("Courier New")
        .hi_ansi("Courier New")
        .east_asia("Courier New")
        .cs("Courier New");

    let code_block = Style::new("CodeBlock", StyleType::Paragraph)
        .name("Code Block")
        .fonts(courier_fonts.clone())
        .size(18);

    let code_inline = Style::new("CodeInline", StyleType::Character)
        .name("Code Inline")
        .fonts(courier_fonts)
        .size(18);

    let hyperlink = Style::new("Hyperlink", StyleType::Character)
        .name("Hyperlink")
        .color("0000FF")
        .underline("single");

    let blockquote = Style::new("Blockquote", StyleType::Paragraph)
        .name("Block Quote")
        .indent(Some(720), None, None, None)
        .italic();

    let table = Style::new("Table", StyleType::Table)
        .name("Table")
        .table_align(TableAlignmentType::Center);

    docx.add_style(heading1)
        .add_style(heading2)
        .add_style(heading3)
        .add_style(heading4)
        .add_style(heading5)
        .add_style(heading6)
        .add_style(code_block)
        .add_style(code_inline)
        .add_style(hyperlink)
        .add_style(blockquote)
        .add_style(table)
}

/// Applies the document-wide defaults of the options.
pub fn initialize_defaults(mut docx: Docx, options: &DocxOptions) -> Docx {
    if let Some(run) = options.default_run() {
        if let Some(size) = run.size {
            docx = docx.default_size(size as usize);
        }
        if let Some(font) = &run.font {
            docx = docx.default_fonts(
                RunFonts::new()
                    .ascii(font)
                    .hi_ansi(font)
                    .east_asia(font)
                    .cs(font),
            );
        }
    }

    if let Some(spacing) = options.default_paragraph().and_then(|p| p.spacing) {
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
        docx = docx.default_line_spacing(line_spacing);
    }
    docx
}

/// Maps an alignment onto the markup alignment.
pub fn alignment_type(alignment: crate::options::Alignment) -> AlignmentType {
    use crate::options::Alignment;

    match alignment {
        Alignment::Left => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Right => AlignmentType::Right,
        Alignment::Justify => AlignmentType::Both,
    }
}

