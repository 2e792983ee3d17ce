//! DOCX rendering of converted elements using docx-rs
//!
//! This module is organized into several main components:
//! - Writer: renders paragraphs and tables, realizing spans as merges
//! - Styles: the registered styles and document defaults
//! - Numbering: the numbering definitions and their ids
//! - Image processor: picture payloads and placeholders

mod image_processor;
mod numbering;
mod styles;
mod writer;

pub use writer::{DEFAULT_TITLE, DocxWriter};
