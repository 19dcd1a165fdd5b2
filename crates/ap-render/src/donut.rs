// Rasterizer de surface : tore en rotation, échantillonné en (θ, φ),
// projeté en perspective, occlusion par Z-buffer en profondeur inverse.
// Mathématique d'après donut.c (a1k0n), re-paramétrée : la taille du
// terminal est relue à chaque frame au lieu d'être figée à 80×22.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use ap_core::config::DonutConfig;
use ap_core::frame::{Canvas, Cell};

use crate::term;

/// Rampe fixe de 12 glyphes du rasterizer, indexée par bucket 0..=11.
pub const DONUT_RAMP: [char; 12] = ['.', ',', '-', '~', ':', ';', '=', '!', '*', '#', '$', '@'];

/// Rayon mineur (section du tube).
const R1: f32 = 1.0;
/// Rayon majeur (révolution).
const R2: f32 = 2.0;
/// Distance de l'observateur à l'origine.
const K2: f32 = 5.0;
/// Pas angulaire θ (section du tube) — le plus grossier.
const THETA_STEP: f32 = 0.07;
/// Pas angulaire φ (révolution) — environ un tiers du pas θ.
const PHI_STEP: f32 = 0.02;

const TAU: f32 = std::f32::consts::TAU;

/// Z-buffer en profondeur INVERSE : 0.0 = rien peint, infiniment loin ;
/// une valeur plus grande = plus proche de l'observateur.
///
/// # Example
/// ```
/// use ap_render::donut::ZBuffer;
/// let mut z = ZBuffer::new(4, 4);
/// assert!(z.test_and_set(1, 1, 0.5));
/// assert!(!z.test_and_set(1, 1, 0.4)); // plus loin : refusé
/// assert!(z.test_and_set(1, 1, 0.6));  // plus proche : accepté
/// ```
pub struct ZBuffer {
    depth: Vec<f32>,
    width: u16,
    height: u16,
}

impl ZBuffer {
    /// Crée un buffer remis à zéro.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            depth: vec![0.0; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Remise à zéro en début de frame : tout est "infiniment loin".
    pub fn reset(&mut self) {
        self.depth.fill(0.0);
    }

    /// Accepte l'échantillon si sa profondeur inverse dépasse STRICTEMENT
    /// la valeur stockée (les échantillons plus proches gagnent), et la
    /// stocke. Refuse hors bornes.
    #[inline]
    pub fn test_and_set(&mut self, x: u16, y: u16, inv_depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.width as usize + x as usize;
        if inv_depth > self.depth[idx] {
            self.depth[idx] = inv_depth;
            true
        } else {
            false
        }
    }
}

/// Échantillon de surface projeté en espace écran.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceSample {
    /// Colonne écran (flottante, peut être hors bornes).
    pub x: f32,
    /// Ligne écran (flottante, peut être hors bornes).
    pub y: f32,
    /// Profondeur inverse (plus grand = plus proche).
    pub inv_depth: f32,
    /// Luminance signée ; ≤ 0 = face arrière.
    pub lum: f32,
}

/// Projette un point (θ, φ) du tore sous la rotation (a, b) vers la
/// grille (width × height) : rotation A autour de X, B autour de Z,
/// division perspective, échelle y réduite de moitié (aspect des
/// cellules terminal ≈ 2:1).
#[must_use]
pub fn project_sample(theta: f32, phi: f32, a: f32, b: f32, width: u16, height: u16) -> SurfaceSample {
    // Échelle écran calée sur la plus petite dimension effective
    let effective = f32::from(width.min(height.saturating_mul(2)));
    let k1 = effective * K2 * 3.0 / (8.0 * (R1 + R2));
    let xc = f32::from(width) / 2.0;
    let yc = f32::from(height) / 2.0;

    let (sin_a, cos_a) = a.sin_cos();
    let (sin_b, cos_b) = b.sin_cos();
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();

    // Cercle générateur avant révolution
    let circle_x = R2 + R1 * cos_t;
    let circle_y = R1 * sin_t;

    let inv_depth = 1.0 / (sin_p * circle_x * sin_a + circle_y * cos_a + K2);
    let t = sin_p * circle_x * cos_a - circle_y * sin_a;

    let x = xc + k1 * inv_depth * (cos_p * circle_x * cos_b - t * sin_b);
    let y = yc + (k1 / 2.0) * inv_depth * (cos_p * circle_x * sin_b + t * cos_b);

    // Alignement de la normale avec la direction de lumière fixe
    let lum = (sin_t * sin_a - sin_p * cos_t * cos_a) * cos_b
        - sin_p * cos_t * sin_a
        - sin_t * cos_a
        - cos_p * cos_t * sin_b;

    SurfaceSample {
        x,
        y,
        inv_depth,
        lum,
    }
}

/// Rend UNE frame du tore aux angles de rotation (a, b) dans `canvas`.
///
/// Balaye θ et φ sur [0, 2π), projette chaque échantillon, élimine les
/// faces arrière (luminance ≤ 0 → rejet AVANT rasterization) puis
/// résout l'occlusion cellule par cellule via le Z-buffer.
///
/// `canvas` et `z` doivent avoir les mêmes dimensions ; tous deux sont
/// remis à zéro ici.
pub fn render_torus(a: f32, b: f32, canvas: &mut Canvas, z: &mut ZBuffer) {
    canvas.clear();
    z.reset();

    let width = canvas.width;
    let height = canvas.height;
    if width == 0 || height == 0 {
        return;
    }

    let mut theta = 0.0f32;
    while theta < TAU {
        let mut phi = 0.0f32;
        while phi < TAU {
            let s = project_sample(theta, phi, a, b, width, height);

            // Face arrière : rejet avant toute écriture
            if s.lum <= 0.0 {
                phi += PHI_STEP;
                continue;
            }

            if s.x >= 0.0 && s.y >= 0.0 {
                let (px, py) = (s.x as u16, s.y as u16);
                if px < width && py < height && z.test_and_set(px, py, s.inv_depth) {
                    // lum ∈ (0, √2] → bucket ∈ 0..=11
                    let bucket = ((s.lum * 8.0) as usize).min(DONUT_RAMP.len() - 1);
                    canvas.set(
                        px,
                        py,
                        Cell {
                            ch: DONUT_RAMP[bucket],
                            fg: None,
                        },
                    );
                }
            }

            phi += PHI_STEP;
        }
        theta += THETA_STEP;
    }
}

/// Paramètres de boucle du rasterizer.
#[derive(Clone, Copy, Debug)]
pub struct DonutParams {
    /// Incrément de l'angle A par frame (rotation autour de l'axe X).
    pub a_step: f32,
    /// Incrément de l'angle B par frame (rotation autour de l'axe Z).
    pub b_step: f32,
    /// Pause entre deux frames.
    pub frame_delay: Duration,
}

impl From<DonutConfig> for DonutParams {
    fn from(config: DonutConfig) -> Self {
        Self {
            a_step: config.a_step,
            b_step: config.b_step,
            frame_delay: Duration::from_millis(config.frame_delay_ms),
        }
    }
}

/// Boucle infinie du donut : poll de la taille terminal, rendu, repaint,
/// accumulation des angles, sleep. Seule une interruption externe
/// (Ctrl-C) arrête cette boucle.
///
/// # Errors
/// Propage les erreurs I/O du sink terminal.
pub fn run<W: Write>(params: DonutParams, out: &mut W) -> Result<()> {
    term::session_start(out)?;

    let (mut width, mut height) = term::canvas_size();
    let mut canvas = Canvas::new(width, height);
    let mut z = ZBuffer::new(width, height);

    let mut a = 0.0f32;
    let mut b = 0.0f32;

    loop {
        // Taille relue à chaque frame ; réallocation uniquement au changement
        let (w, h) = term::canvas_size();
        if (w, h) != (width, height) {
            log::debug!("donut: grille {width}x{height} → {w}x{h}");
            (width, height) = (w, h);
            canvas = Canvas::new(width, height);
            z = ZBuffer::new(width, height);
        }

        render_torus(a, b, &mut canvas, &mut z);
        term::repaint(out, &canvas.to_ansi())?;

        a += params.a_step;
        b += params.b_step;
        std::thread::sleep(params.frame_delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u16 = 60;
    const H: u16 = 20;

    fn painted_cells(canvas: &Canvas) -> usize {
        canvas.cells.iter().filter(|c| c.ch != ' ').count()
    }

    /// Rejoue le balayage de render_torus et retourne tous les
    /// échantillons, sans culling ni occlusion.
    fn sweep(a: f32, b: f32) -> Vec<SurfaceSample> {
        let mut out = Vec::new();
        let mut theta = 0.0f32;
        while theta < TAU {
            let mut phi = 0.0f32;
            while phi < TAU {
                out.push(project_sample(theta, phi, a, b, W, H));
                phi += PHI_STEP;
            }
            theta += THETA_STEP;
        }
        out
    }

    fn cell_of(s: &SurfaceSample) -> Option<(u16, u16)> {
        if s.x >= 0.0 && s.y >= 0.0 {
            let (px, py) = (s.x as u16, s.y as u16);
            if px < W && py < H {
                return Some((px, py));
            }
        }
        None
    }

    #[test]
    fn identity_rotation_paints_something() {
        let mut canvas = Canvas::new(80, 22);
        let mut z = ZBuffer::new(80, 22);
        render_torus(0.0, 0.0, &mut canvas, &mut z);
        assert!(painted_cells(&canvas) > 0, "torus degenerated at (0, 0)");
    }

    #[test]
    fn painted_glyphs_come_from_the_ramp() {
        let mut canvas = Canvas::new(W, H);
        let mut z = ZBuffer::new(W, H);
        render_torus(1.3, 0.7, &mut canvas, &mut z);
        assert!(painted_cells(&canvas) > 0);
        for cell in canvas.cells.iter().filter(|c| c.ch != ' ') {
            assert!(DONUT_RAMP.contains(&cell.ch), "glyph {} not in ramp", cell.ch);
            assert_eq!(cell.fg, None, "torus cells carry no color");
        }
    }

    #[test]
    fn closer_sample_wins_regardless_of_order() {
        let mut z = ZBuffer::new(3, 3);
        // loin puis proche
        assert!(z.test_and_set(2, 2, 0.1));
        assert!(z.test_and_set(2, 2, 0.9));
        // proche déjà en place : le lointain est refusé
        assert!(!z.test_and_set(2, 2, 0.1));
        // égalité exacte : refusée (strictement supérieur requis)
        assert!(!z.test_and_set(2, 2, 0.9));
    }

    #[test]
    fn zbuffer_rejects_out_of_bounds() {
        let mut z = ZBuffer::new(2, 2);
        assert!(!z.test_and_set(2, 0, 1.0));
        assert!(!z.test_and_set(0, 2, 1.0));
    }

    #[test]
    fn reset_forgets_previous_frame() {
        let mut z = ZBuffer::new(2, 2);
        assert!(z.test_and_set(0, 0, 0.8));
        z.reset();
        assert!(z.test_and_set(0, 0, 0.1));
    }

    #[test]
    fn canvas_matches_closest_front_facing_sample() {
        // Pour chaque cellule : le glyphe rendu doit être celui de
        // l'échantillon FRONT-FACING de profondeur inverse maximale,
        // quel que soit l'ordre de traitement — et une cellule qui ne
        // reçoit que des faces arrière doit rester vide (culling).
        for (a, b) in [(0.0f32, 0.0f32), (0.5, 1.1), (3.0, 2.2)] {
            let mut canvas = Canvas::new(W, H);
            let mut z = ZBuffer::new(W, H);
            render_torus(a, b, &mut canvas, &mut z);

            let mut best: Vec<Option<SurfaceSample>> = vec![None; W as usize * H as usize];
            let mut has_backface_only = vec![false; W as usize * H as usize];
            for s in sweep(a, b) {
                let Some((px, py)) = cell_of(&s) else { continue };
                let idx = py as usize * W as usize + px as usize;
                if s.lum > 0.0 {
                    let replace = best[idx].is_none_or(|prev| s.inv_depth > prev.inv_depth);
                    if replace {
                        best[idx] = Some(s);
                    }
                    has_backface_only[idx] = false;
                } else if best[idx].is_none() {
                    has_backface_only[idx] = true;
                }
            }

            for py in 0..H {
                for px in 0..W {
                    let idx = py as usize * W as usize + px as usize;
                    let rendered = canvas.get(px, py).ch;
                    match best[idx] {
                        Some(s) => {
                            let bucket = ((s.lum * 8.0) as usize).min(DONUT_RAMP.len() - 1);
                            assert_eq!(
                                rendered, DONUT_RAMP[bucket],
                                "cell ({px},{py}) at rotation ({a},{b})"
                            );
                        }
                        None => {
                            assert_eq!(
                                rendered, ' ',
                                "backface-only or empty cell ({px},{py}) must stay blank \
                                 (backface_only={})",
                                has_backface_only[idx]
                            );
                        }
                    }
                }
            }
        }
    }
}
