//! # tiptap-docx
//!
//! Converts rich-text editor document trees into DOCX files.
//!
//! A conversion runs in three stages:
//! - numbering synthesis, a pure pass collecting the list definitions,
//! - image resolution, fetching and probing every image source with bounded
//!   concurrency,
//! - the conversion walk, mapping each node to output elements in order.
//!
//! Nodes that cannot be converted faithfully degrade to placeholder output
//! and are reported as [`Degradation`]s; only unreadable input and
//! packaging failures abort a conversion.

pub mod converter;
pub mod diagnostics;
mod error;
pub mod media;
pub mod node;
pub mod numbering;
pub mod options;
pub mod writer;

use std::sync::Arc;

pub use error::*;

pub use crate::converter::{Converter, Element};
pub use crate::diagnostics::{Degradation, DiagnosticCollector};
pub use crate::media::{FetchConfig, Fetcher, HttpFetcher, ImageProbe, ImageResolver, MetadataProbe};
pub use crate::node::DocumentNode;
pub use crate::numbering::{NumberingDefinition, synthesize_numbering};
pub use crate::options::DocxOptions;
use crate::writer::DocxWriter;

/// The result type for tiptap-docx.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;

/// The number of image sources resolved at once by default.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// The outcome of converting a tree, before packaging.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The output elements, in document order.
    pub elements: Vec<Element>,
    /// The numbering definitions the list paragraphs refer to.
    pub numbering: Vec<NumberingDefinition>,
    /// Every degradation met during the conversion.
    pub degradations: Vec<Degradation>,
}

/// Task builder for converting a document tree to DOCX.
#[derive(Clone)]
pub struct DocxExporter {
    /// Options of the conversion.
    options: DocxOptions,
    /// Fetches remote images.
    fetcher: Arc<dyn Fetcher>,
    /// Reads image metadata.
    probe: Arc<dyn MetadataProbe>,
    /// Image sources resolved at once.
    fetch_concurrency: usize,
}

impl DocxExporter {
    /// Creates an exporter fetching images over HTTP.
    pub fn new(options: DocxOptions) -> Result<Self> {
        let fetcher = HttpFetcher::new(&FetchConfig::default())?;
        Ok(Self {
            options,
            fetcher: Arc::new(fetcher),
            probe: Arc::new(ImageProbe),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        })
    }

    /// Sets the image fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Sets the image metadata probe.
    pub fn with_probe(mut self, probe: Arc<dyn MetadataProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Sets how many image sources are resolved at once.
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// The options of the conversion.
    pub fn options(&self) -> &DocxOptions {
        &self.options
    }

    /// Converts a tree to output elements.
    ///
    /// Dropping the future cancels in-flight image fetches; no partial
    /// output is kept.
    pub async fn convert(&self, tree: &DocumentNode) -> Conversion {
        let numbering = synthesize_numbering(tree);

        let diagnostics = DiagnosticCollector::default();
        let resolver = ImageResolver::new(
            self.fetcher.clone(),
            self.probe.clone(),
            diagnostics.clone(),
        );
        let images = resolver.resolve_tree(tree, self.fetch_concurrency).await;
        log::debug!("resolved {} image sources", images.len());

        let elements = Converter::new(&self.options, &images, &diagnostics).convert_document(tree);
        Conversion {
            elements,
            numbering,
            degradations: diagnostics.snapshot(),
        }
    }

    /// Converts a tree and packages the result as a DOCX file.
    pub async fn to_docx(&self, tree: &DocumentNode) -> Result<Vec<u8>> {
        let conversion = self.convert(tree).await;
        write_docx(&conversion, &self.options)
    }
}

/// Converts a tree to output elements, fetching images over HTTP.
pub async fn convert_tree(tree: &DocumentNode, options: &DocxOptions) -> Result<Conversion> {
    Ok(DocxExporter::new(options.clone())?.convert(tree).await)
}

/// Converts a tree and packages it as a DOCX file, fetching images over
/// HTTP.
pub async fn generate_docx(tree: &DocumentNode, options: &DocxOptions) -> Result<Vec<u8>> {
    DocxExporter::new(options.clone())?.to_docx(tree).await
}

/// Packages converted elements as a DOCX file.
pub fn write_docx(conversion: &Conversion, options: &DocxOptions) -> Result<Vec<u8>> {
    DocxWriter::new(options).generate_docx(&conversion.elements, &conversion.numbering)
}
