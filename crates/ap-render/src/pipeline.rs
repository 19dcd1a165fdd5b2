use std::io::Write;

use anyhow::Result;
use ap_core::config::RenderConfig;
use ap_core::frame::{Canvas, Cell, FrameBuffer};
use ap_core::luminance::LuminanceMode;
use ap_core::ramp::ShadeRamp;
use ap_core::traits::FrameSource;
use ap_source::resize::Resizer;

use crate::term;

/// Pipeline frame → glyphes : resize à la grille terminal, quantization
/// de la luminance vers la rampe, colorisation truecolor par pixel.
///
/// Un seul pipeline paramétré — rampe, politique de luminance et
/// couleur sont des champs de configuration, pas des variantes copiées.
///
/// # Example
/// ```
/// use ap_core::config::RenderConfig;
/// use ap_render::pipeline::GlyphPipeline;
/// let pipeline = GlyphPipeline::new(&RenderConfig::default());
/// ```
pub struct GlyphPipeline {
    ramp: ShadeRamp,
    luminance: LuminanceMode,
    color_enabled: bool,
    resizer: Resizer,
    /// Frame redimensionnée à la grille terminal, réallouée au resize du terminal.
    scratch: FrameBuffer,
    /// Copie miroir pour les sources caméra.
    mirror_buf: FrameBuffer,
}

impl GlyphPipeline {
    /// Construit le pipeline depuis la configuration de session.
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        Self::with_ramp(
            ShadeRamp::from_mode(config.shade),
            config.luminance,
            config.color_enabled,
        )
    }

    /// Construit le pipeline avec une rampe arbitraire.
    #[must_use]
    pub fn with_ramp(ramp: ShadeRamp, luminance: LuminanceMode, color_enabled: bool) -> Self {
        Self {
            ramp,
            luminance,
            color_enabled,
            resizer: Resizer::new(),
            scratch: FrameBuffer::new(1, 1),
            mirror_buf: FrameBuffer::new(1, 1),
        }
    }

    /// Rend une frame en un seul repaint ANSI pour une grille
    /// (width × height). `mirror` applique le miroir AVANT le resize.
    ///
    /// # Errors
    /// Propage un échec du resize (dimensions invalides).
    pub fn render(
        &mut self,
        frame: &FrameBuffer,
        width: u16,
        height: u16,
        mirror: bool,
    ) -> Result<String> {
        if self.scratch.width != u32::from(width) || self.scratch.height != u32::from(height) {
            self.scratch = FrameBuffer::new(u32::from(width), u32::from(height));
        }

        if mirror {
            self.mirror_buf.clone_from_frame(frame);
            self.mirror_buf.flip_horizontal();
        }
        let src = if mirror { &self.mirror_buf } else { frame };
        self.resizer.resize_into(src, &mut self.scratch)?;

        let canvas = rasterize(&self.scratch, &self.ramp, self.luminance, self.color_enabled);
        Ok(canvas.to_ansi())
    }

    /// Boucle de session : poll de la taille terminal à chaque tick,
    /// lecture bloquante, repaint en place.
    ///
    /// Termine proprement à la fin de flux (`None`) — unique condition
    /// d'arrêt. La source est relâchée par Drop chez l'appelant.
    ///
    /// # Errors
    /// Propage les erreurs I/O du sink terminal.
    pub fn run<S: FrameSource, W: Write>(&mut self, source: &mut S, out: &mut W) -> Result<()> {
        let mirror = source.is_live();
        log::debug!("GlyphPipeline: session démarrée (mirror={mirror})");
        term::session_start(out)?;

        loop {
            // Taille relue à CHAQUE frame : le terminal peut être
            // redimensionné entre deux ticks.
            let (width, height) = term::canvas_size();
            let Some(frame) = source.next_frame() else {
                break;
            };
            let payload = self.render(frame, width, height, mirror)?;
            term::repaint(out, &payload)?;
        }

        term::session_end(out)?;
        Ok(())
    }
}

/// Quantize + colorise une frame déjà aux dimensions de la grille.
///
/// Cœur pur du pipeline, sans resize ni I/O — c'est lui que les tests
/// de propriétés exercent.
#[must_use]
pub fn rasterize(
    frame: &FrameBuffer,
    ramp: &ShadeRamp,
    luminance: LuminanceMode,
    color_enabled: bool,
) -> Canvas {
    let width = frame.width as u16;
    let height = frame.height as u16;
    let mut canvas = Canvas::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = frame.rgb(u32::from(x), u32::from(y));
            let lum = luminance.of_rgb(r, g, b);
            let ch = ramp.glyph(lum);
            let fg = color_enabled.then_some((r, g, b));
            canvas.set(x, y, Cell { ch, fg });
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::frame::CURSOR_HOME;

    /// Source qui échoue dès la première lecture.
    struct DeadSource;

    impl FrameSource for DeadSource {
        fn next_frame(&mut self) -> Option<&FrameBuffer> {
            None
        }
        fn native_size(&self) -> (u32, u32) {
            (0, 0)
        }
        fn is_live(&self) -> bool {
            true
        }
    }

    #[test]
    fn black_frame_renders_spaces_with_home_prefix() {
        // 2×2 tout noir, rampe " #", luminance pondérée
        let frame = FrameBuffer::new(2, 2);
        let ramp = ShadeRamp::new(" #").unwrap();
        let canvas = rasterize(&frame, &ramp, LuminanceMode::Weighted, true);
        let out = canvas.to_ansi();

        let black_space = "\x1b[38;2;0;0;0m \x1b[0m";
        let expected = format!(
            "{CURSOR_HOME}{black_space}{black_space}\n{black_space}{black_space}"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn bright_frame_picks_dense_glyph() {
        let mut frame = FrameBuffer::new(1, 1);
        frame.data = vec![255, 255, 255];
        let ramp = ShadeRamp::new(" .#").unwrap();
        let canvas = rasterize(&frame, &ramp, LuminanceMode::Mean, false);
        assert_eq!(canvas.get(0, 0).ch, '#');
        assert_eq!(canvas.get(0, 0).fg, None);
    }

    #[test]
    fn color_disabled_leaves_cells_uncolored() {
        let mut frame = FrameBuffer::new(1, 1);
        frame.data = vec![10, 20, 30];
        let ramp = ShadeRamp::new(" .#").unwrap();
        let canvas = rasterize(&frame, &ramp, LuminanceMode::Weighted, false);
        assert!(canvas.to_ansi().ends_with(canvas.get(0, 0).ch.to_string().as_str()));
        assert!(!canvas.to_ansi().contains("38;2"));
    }

    #[test]
    fn cell_color_matches_source_pixel() {
        let mut frame = FrameBuffer::new(1, 1);
        // BGR storage : bleu=1, vert=2, rouge=3
        frame.data = vec![1, 2, 3];
        let ramp = ShadeRamp::new(" #").unwrap();
        let canvas = rasterize(&frame, &ramp, LuminanceMode::Weighted, true);
        assert_eq!(canvas.get(0, 0).fg, Some((3, 2, 1)));
    }

    #[test]
    fn failed_first_read_exits_without_canvas_output() {
        let mut pipeline = GlyphPipeline::new(&RenderConfig::default());
        let mut out: Vec<u8> = Vec::new();
        pipeline.run(&mut DeadSource, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(
            !text.contains(CURSOR_HOME),
            "no repaint must be emitted when the first read fails"
        );
        assert!(!text.contains("38;2"));
    }

    #[test]
    fn render_mirrors_live_frames_before_resize() {
        // 2×1 : pixel gauche noir, pixel droit blanc
        let mut frame = FrameBuffer::new(2, 1);
        frame.data = vec![0, 0, 0, 255, 255, 255];
        let ramp = ShadeRamp::new(" #").unwrap();
        let mut pipeline = GlyphPipeline::with_ramp(ramp, LuminanceMode::Mean, false);

        let plain = pipeline.render(&frame, 2, 1, false).unwrap();
        let mirrored = pipeline.render(&frame, 2, 1, true).unwrap();
        assert_eq!(plain, "\x1b[H #");
        assert_eq!(mirrored, "\x1b[H# ");
    }
}
