use std::path::Path;

use anyhow::{Context, Result};
use ap_core::frame::FrameBuffer;
use ap_core::traits::FrameSource;

/// Source d'image statique : délivre exactement une frame puis signale
/// la fin de flux. Le pipeline rend un tick et sort proprement, l'art
/// reste affiché.
///
/// # Example
/// ```no_run
/// use ap_source::image::ImageSource;
/// use std::path::Path;
/// let source = ImageSource::new(Path::new("photo.png")).unwrap();
/// ```
pub struct ImageSource {
    frame: FrameBuffer,
    delivered: bool,
}

impl ImageSource {
    /// Load an image from disk (PNG, JPEG, BMP, GIF) and convert it to
    /// the capture channel order.
    ///
    /// # Errors
    /// Returns an error if the image cannot be opened or decoded.
    pub fn new(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("Impossible de charger {}", path.display()))?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        // image décode en RGB ; le pipeline attend l'ordre capture BGR
        let mut frame = FrameBuffer::new(width, height);
        for (dst, src) in frame.data.chunks_exact_mut(3).zip(rgb.as_raw().chunks_exact(3)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
        }

        log::info!("ImageSource: {width}x{height} — {}", path.display());
        Ok(Self {
            frame,
            delivered: false,
        })
    }
}

impl FrameSource for ImageSource {
    fn next_frame(&mut self) -> Option<&FrameBuffer> {
        if self.delivered {
            return None;
        }
        self.delivered = true;
        Some(&self.frame)
    }

    fn native_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn is_live(&self) -> bool {
        false
    }
}
