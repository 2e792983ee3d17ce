//! Image resolution: turns an image source into bytes plus best-effort
//! metadata.

mod fetch;
mod probe;
pub mod sizing;

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use futures::{StreamExt, stream};
use indexmap::IndexSet;
use log::debug;

pub use fetch::{FetchConfig, FetchError, Fetcher, HttpFetcher};
pub use image::metadata::Orientation;
pub use probe::{ImageProbe, MetadataProbe, ProbeError};

use crate::diagnostics::{Degradation, DiagnosticCollector};
use crate::node::{DocumentNode, NodeKind};

/// Raster formats known to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// PNG
    Png,
    /// JPEG
    Jpeg,
    /// GIF
    Gif,
    /// BMP
    Bmp,
    /// TIFF
    Tiff,
    /// WebP
    WebP,
}

impl ImageType {
    /// Parses a format name or file extension.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(ImageType::Png),
            "jpg" | "jpeg" => Some(ImageType::Jpeg),
            "gif" => Some(ImageType::Gif),
            "bmp" => Some(ImageType::Bmp),
            "tif" | "tiff" => Some(ImageType::Tiff),
            "webp" => Some(ImageType::WebP),
            _ => None,
        }
    }

    /// Maps a format detected by the `image` crate.
    pub fn from_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(ImageType::Png),
            image::ImageFormat::Jpeg => Some(ImageType::Jpeg),
            image::ImageFormat::Gif => Some(ImageType::Gif),
            image::ImageFormat::Bmp => Some(ImageType::Bmp),
            image::ImageFormat::Tiff => Some(ImageType::Tiff),
            image::ImageFormat::WebP => Some(ImageType::WebP),
            _ => None,
        }
    }

    /// The short name of the format.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpeg => "jpg",
            ImageType::Gif => "gif",
            ImageType::Bmp => "bmp",
            ImageType::Tiff => "tiff",
            ImageType::WebP => "webp",
        }
    }
}

/// Infers an image type from a source string: the media type of an inline
/// payload, or the extension of a locator. Defaults to PNG.
pub fn image_type_from_src(src: &str) -> ImageType {
    let name = if let Some(rest) = src.strip_prefix("data:") {
        rest.strip_prefix("image/")
            .and_then(|rest| rest.split([';', ',']).next())
    } else {
        let path = src.split(['?', '#']).next().unwrap_or_default();
        path.rsplit_once('.').map(|(_, ext)| ext)
    };
    name.and_then(ImageType::from_name)
        .unwrap_or(ImageType::Png)
}

/// The type of an image: the probed type, then the type inferred from the
/// source.
pub fn resolve_type(meta: Option<ImageType>, src: &str) -> ImageType {
    meta.unwrap_or_else(|| image_type_from_src(src))
}

/// Metadata probed from image bytes. Every field may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// Detected format.
    pub kind: Option<ImageType>,
    /// EXIF orientation.
    pub orientation: Option<Orientation>,
}

impl ImageMetadata {
    /// Metadata carrying only a format, used when probing fails.
    pub fn fallback(kind: ImageType) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Both dimensions, when known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }
}

/// The kind of an image source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// A remote locator.
    Remote(&'a str),
    /// An inline-encoded payload, split at the first comma.
    Inline {
        /// The part between `data:` and the comma.
        header: &'a str,
        /// The encoded payload.
        payload: &'a str,
    },
    /// Anything else.
    Unsupported(&'a str),
}

impl<'a> ImageSource<'a> {
    /// Classifies a source string.
    pub fn parse(src: &'a str) -> Self {
        let lower = src.get(..8).unwrap_or(src).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Remote(src)
        } else if let Some(rest) = src.strip_prefix("data:") {
            let (header, payload) = rest.split_once(',').unwrap_or((rest, ""));
            ImageSource::Inline { header, payload }
        } else {
            ImageSource::Unsupported(src)
        }
    }
}

/// Image bytes with their metadata.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    /// The raw bytes.
    pub data: Vec<u8>,
    /// Best-effort metadata.
    pub meta: ImageMetadata,
}

/// Resolves image sources, reporting degradations to a collector.
#[derive(Clone)]
pub struct ImageResolver {
    fetcher: Arc<dyn Fetcher>,
    probe: Arc<dyn MetadataProbe>,
    diagnostics: DiagnosticCollector,
}

impl ImageResolver {
    /// Creates a resolver over the given collaborators.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        probe: Arc<dyn MetadataProbe>,
        diagnostics: DiagnosticCollector,
    ) -> Self {
        Self {
            fetcher,
            probe,
            diagnostics,
        }
    }

    /// Obtains the bytes of an image. Fails only when no bytes can be
    /// obtained; metadata problems fall back to inferred metadata.
    pub async fn resolve(&self, src: &str) -> Result<ResolvedImage, Degradation> {
        match ImageSource::parse(src) {
            ImageSource::Remote(url) => {
                let data =
                    self.fetcher
                        .fetch(url)
                        .await
                        .map_err(|err| Degradation::ImageFetchFailure {
                            src: url.to_owned(),
                            reason: err.to_string(),
                        })?;
                let meta = self.probe_or(src, &data, image_type_from_src(url));
                Ok(ResolvedImage { data, meta })
            }
            ImageSource::Inline { header, payload } => {
                let data = decode_inline(header, payload).map_err(|reason| {
                    Degradation::ImageDecodeFailure {
                        src: truncate(src).to_owned(),
                        reason,
                    }
                })?;
                let meta = self.probe_or(src, &data, ImageType::Png);
                Ok(ResolvedImage { data, meta })
            }
            ImageSource::Unsupported(src) => Err(Degradation::UnsupportedImageReference(
                truncate(src).to_owned(),
            )),
        }
    }

    /// Resolves every distinct image source of a tree, running at most
    /// `concurrency` resolutions at once.
    ///
    /// Dropping the returned future abandons all in-flight fetches.
    pub async fn resolve_tree(&self, tree: &DocumentNode, concurrency: usize) -> ImageStore {
        let sources = tree
            .descendants()
            .filter(|node| node.is(&NodeKind::Image))
            .map(|node| node.attrs.str("src").unwrap_or_default())
            .collect::<IndexSet<_>>();

        let images = stream::iter(sources)
            .map(|src| async move { (src.to_owned(), self.resolve(src).await) })
            .buffer_unordered(concurrency.max(1))
            .collect::<HashMap<_, _>>()
            .await;
        ImageStore { images }
    }

    fn probe_or(&self, src: &str, data: &[u8], fallback: ImageType) -> ImageMetadata {
        match self.probe.probe(data) {
            Ok(meta) => meta,
            Err(err) => {
                self.diagnostics.report(Degradation::MetadataProbeFailure {
                    src: truncate(src).to_owned(),
                    reason: err.to_string(),
                });
                ImageMetadata::fallback(fallback)
            }
        }
    }
}

/// The outcome of resolving each image source of a tree.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<String, Result<ResolvedImage, Degradation>>,
}

impl ImageStore {
    /// Looks up a source. Sources that were never resolved count as failed
    /// fetches.
    pub fn get(&self, src: &str) -> Result<&ResolvedImage, Degradation> {
        match self.images.get(src) {
            Some(Ok(image)) => Ok(image),
            Some(Err(err)) => Err(err.clone()),
            None => Err(Degradation::ImageFetchFailure {
                src: truncate(src).to_owned(),
                reason: "image was not resolved".into(),
            }),
        }
    }

    /// Records the outcome of a source.
    pub fn insert(&mut self, src: impl Into<String>, image: Result<ResolvedImage, Degradation>) {
        self.images.insert(src.into(), image);
    }

    /// The number of distinct sources.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no source was resolved.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn decode_inline(header: &str, payload: &str) -> Result<Vec<u8>, String> {
    if payload.is_empty() {
        return Err("empty payload".into());
    }
    if !header.split(';').any(|param| param.eq_ignore_ascii_case("base64")) {
        debug!("inline image payload is not base64, embedding it verbatim");
        return Ok(payload.as_bytes().to_vec());
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(&payload)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE.decode(&payload))
        .map_err(|err| err.to_string())
}

fn truncate(src: &str) -> &str {
    match src.char_indices().nth(40) {
        Some((idx, _)) => &src[..idx],
        None => src,
    }
}
