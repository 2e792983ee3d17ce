//! Writers of converted documents.

pub mod docx;

pub use self::docx::DocxWriter;
