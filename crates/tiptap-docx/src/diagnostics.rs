//! Non-fatal degradations observed during a conversion.

use std::fmt;
use std::sync::Arc;

use log::warn;
use parking_lot::Mutex;

/// A per-node failure that was contained by emitting fallback output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// A node type without a conversion rule, rendered as placeholder text.
    UnsupportedNodeType(String),
    /// Image bytes could not be fetched from a remote locator.
    ImageFetchFailure {
        /// The image source.
        src: String,
        /// Why the fetch failed.
        reason: String,
    },
    /// An inline payload could not be decoded.
    ImageDecodeFailure {
        /// The image source, truncated.
        src: String,
        /// Why decoding failed.
        reason: String,
    },
    /// Image bytes were obtained but their metadata could not be probed.
    MetadataProbeFailure {
        /// The image source, truncated.
        src: String,
        /// Why probing failed.
        reason: String,
    },
    /// The image source is neither a remote locator nor an inline payload.
    UnsupportedImageReference(String),
    /// A node whose shape could not be recognized.
    MalformedTree(String),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::UnsupportedNodeType(ty) => write!(f, "unsupported node type `{ty}`"),
            Degradation::ImageFetchFailure { src, reason } => {
                write!(f, "failed to fetch image from {src}: {reason}")
            }
            Degradation::ImageDecodeFailure { src, reason } => {
                write!(f, "failed to decode image {src}: {reason}")
            }
            Degradation::MetadataProbeFailure { src, reason } => {
                write!(f, "failed to extract image metadata of {src}: {reason}")
            }
            Degradation::UnsupportedImageReference(src) => {
                write!(f, "unsupported image source format: {src}...")
            }
            Degradation::MalformedTree(msg) => write!(f, "malformed tree: {msg}"),
        }
    }
}

/// Shared collector for degradations emitted during conversion.
#[derive(Clone, Default)]
pub struct DiagnosticCollector {
    inner: Arc<Mutex<Vec<Degradation>>>,
}

impl DiagnosticCollector {
    /// Records a degradation and mirrors it to the log.
    pub fn report(&self, degradation: Degradation) {
        warn!("{degradation}");
        self.inner.lock().push(degradation);
    }

    /// Clone all collected degradations into a standalone vector.
    pub fn snapshot(&self) -> Vec<Degradation> {
        self.inner.lock().clone()
    }

    /// Whether nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl fmt::Debug for DiagnosticCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.lock().iter()).finish()
    }
}
