use anyhow::{Context, Result};
use ap_core::frame::FrameBuffer;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};

/// Resizer réutilisable wrappant fast_image_resize.
///
/// Filtre Box = moyenne de zone : chaque cellule terminal reçoit la
/// moyenne des pixels source qu'elle recouvre. Pas de correction
/// d'aspect — la grille de cellules EST la résolution cible.
///
/// # Example
/// ```
/// use ap_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch buffer for the source (fir requires `&mut` on input).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a new resizer with area-averaging options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new()
                .resize_alg(ResizeAlg::Convolution(FilterType::Box)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if either buffer has invalid dimensions or the
    /// resize operation fails.
    ///
    /// # Example
    /// ```
    /// use ap_source::resize::Resizer;
    /// use ap_core::frame::FrameBuffer;
    /// let mut r = Resizer::new();
    /// let src = FrameBuffer::new(100, 100);
    /// let mut dst = FrameBuffer::new(50, 50);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &FrameBuffer, dst: &mut FrameBuffer) -> Result<()> {
        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x3)
                .context("Dimensions source invalides")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x3)
                .context("Dimensions destination invalides")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize échoué")?;

        Ok(())
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_resize_is_a_copy() {
        let mut src = FrameBuffer::new(4, 4);
        src.data = (0u8..48).collect();
        let mut dst = FrameBuffer::new(4, 4);
        Resizer::new().resize_into(&src, &mut dst).unwrap();
        assert_eq!(dst.data, src.data);
    }

    #[test]
    fn downscale_averages_area() {
        // 2×2 uniform gray → 1×1 must stay that gray
        let mut src = FrameBuffer::new(2, 2);
        src.data = vec![100u8; 12];
        let mut dst = FrameBuffer::new(1, 1);
        Resizer::new().resize_into(&src, &mut dst).unwrap();
        assert_eq!(dst.data, vec![100, 100, 100]);
    }

    #[test]
    fn box_filter_mixes_halves() {
        // left column black, right column white → 1×1 lands mid-gray
        let mut src = FrameBuffer::new(2, 1);
        src.data = vec![0, 0, 0, 255, 255, 255];
        let mut dst = FrameBuffer::new(1, 1);
        Resizer::new().resize_into(&src, &mut dst).unwrap();
        for &c in &dst.data {
            assert!((100..=155).contains(&c), "expected mid-gray, got {c}");
        }
    }
}
