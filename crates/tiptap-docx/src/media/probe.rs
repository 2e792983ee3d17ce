//! Probing image metadata from raw bytes.

use std::fmt;
use std::io::Cursor;

use image::{ImageDecoder, ImageReader};

use super::{ImageMetadata, ImageType};

/// Why a probe failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The bytes are not an image format the probe knows.
    UnrecognizedFormat,
    /// The header of a known format could not be read.
    Malformed(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::UnrecognizedFormat => f.write_str("unrecognized image format"),
            ProbeError::Malformed(msg) => write!(f, "malformed image: {msg}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Reads image metadata without decoding pixels.
pub trait MetadataProbe: Send + Sync {
    /// Probes `data`.
    fn probe(&self, data: &[u8]) -> Result<ImageMetadata, ProbeError>;
}

/// Probes with the `image` crate's format detection and header decoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProbe;

impl MetadataProbe for ImageProbe {
    fn probe(&self, data: &[u8]) -> Result<ImageMetadata, ProbeError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;
        let format = reader.format().ok_or(ProbeError::UnrecognizedFormat)?;

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ProbeError::Malformed(e.to_string()))?;
        let (width, height) = decoder.dimensions();
        let orientation = decoder.orientation().ok();

        Ok(ImageMetadata {
            width: (width > 0).then_some(width),
            height: (height > 0).then_some(height),
            kind: ImageType::from_format(format),
            orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn probe_png() {
        let meta = ImageProbe.probe(&png(12, 7)).unwrap();
        assert_eq!(meta.dimensions(), Some((12, 7)));
        assert_eq!(meta.kind, Some(ImageType::Png));
    }

    #[test]
    fn probe_garbage() {
        assert_eq!(
            ImageProbe.probe(b"definitely not an image"),
            Err(ProbeError::UnrecognizedFormat)
        );
        assert!(ImageProbe.probe(&[]).is_err());
    }
}
