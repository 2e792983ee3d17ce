//! The image rule.

use super::{Converter, ImageRun, Inline, ParagraphElement};
use crate::media::sizing::{PLACEHOLDER_SIZE, resolve_size};
use crate::media::{ImageType, resolve_type};
use crate::node::{DocumentNode, ImageAttributes};
use crate::options::Alignment;

/// Alt text of placeholders for images without their own.
pub const FAILED_IMAGE_ALT: &str = "Failed to load image";

impl Converter<'_> {
    /// Wraps an image in a paragraph, centered unless overridden.
    ///
    /// Images that cannot be loaded still produce exactly one paragraph,
    /// holding a placeholder.
    pub(super) fn convert_image(&self, node: &DocumentNode) -> ParagraphElement {
        match self.image_run(node) {
            Ok(image) => {
                let mut para = ParagraphElement::new().add(Inline::Image(image));
                para.alignment = Some(Alignment::Center);
                if let Some(options) = &self.options.image.paragraph {
                    para.apply(options);
                }
                para
            }
            Err(placeholder) => ParagraphElement::new().add(Inline::Image(placeholder)),
        }
    }

    /// Builds the image run of a node, or a placeholder run on failure.
    pub(super) fn image_run(&self, node: &DocumentNode) -> Result<ImageRun, ImageRun> {
        let attrs = ImageAttributes::from(&node.attrs);

        let image = match self.images.get(&attrs.src) {
            Ok(image) => image,
            Err(degradation) => {
                self.report(degradation);
                let (width, height) = PLACEHOLDER_SIZE;
                return Err(ImageRun {
                    data: Vec::new(),
                    format: ImageType::Png,
                    width,
                    height,
                    alt: attrs.alt.unwrap_or_else(|| FAILED_IMAGE_ALT.to_owned()),
                });
            }
        };

        let meta = &image.meta;
        let (width, height) = resolve_size((attrs.width, attrs.height), (meta.width, meta.height));
        Ok(ImageRun {
            data: image.data.clone(),
            format: resolve_type(meta.kind, &attrs.src),
            width,
            height,
            alt: attrs.alt.unwrap_or_default(),
        })
    }
}
