/// Buffer de pixels en provenance d'une source de capture.
///
/// Stocke les pixels en BGR row-major, 3 bytes par pixel — l'ordre des
/// canaux est celui du flux de capture, pas celui de l'affichage.
///
/// # Example
/// ```
/// use ap_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 300);
/// ```
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    /// Pixels BGR, row-major, 3 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer pré-alloué (noir) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use ap_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; (width * height * 3) as usize],
            width,
            height,
        }
    }

    /// Accès au pixel (x, y) dans l'ordre logique → (r, g, b).
    ///
    /// # Example
    /// ```
    /// use ap_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(1, 1);
    /// fb.data.copy_from_slice(&[255, 0, 0]); // blue in BGR storage
    /// assert_eq!(fb.rgb(0, 0), (0, 0, 255));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y * self.width + x) * 3) as usize;
        if idx + 2 >= self.data.len() {
            return (0, 0, 0);
        }
        (self.data[idx + 2], self.data[idx + 1], self.data[idx])
    }

    /// Miroir gauche-droite in place (convention "webcam").
    ///
    /// # Example
    /// ```
    /// use ap_core::frame::FrameBuffer;
    /// let mut fb = FrameBuffer::new(2, 1);
    /// fb.data.copy_from_slice(&[1, 2, 3, 4, 5, 6]);
    /// fb.flip_horizontal();
    /// assert_eq!(fb.data, vec![4, 5, 6, 1, 2, 3]);
    /// ```
    pub fn flip_horizontal(&mut self) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(w * 3) {
            let mut left = 0;
            let mut right = w.saturating_sub(1);
            while left < right {
                for c in 0..3 {
                    row.swap(left * 3 + c, right * 3 + c);
                }
                left += 1;
                right -= 1;
            }
        }
    }

    /// Recopie `other` dans ce buffer, en se redimensionnant si besoin.
    pub fn clone_from_frame(&mut self, other: &FrameBuffer) {
        self.width = other.width;
        self.height = other.height;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }
}

/// Single cell in the terminal canvas: a glyph plus an optional
/// 24-bit foreground color. `None` means "no truecolor escape".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur foreground (RGB), ou `None` pour un glyphe non colorisé.
    pub fg: Option<(u8, u8, u8)>,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', fg: None }
    }
}

/// Grille de sortie terminal. Redimensionnée à chaque frame — la taille
/// du terminal peut changer entre deux ticks, elle n'est jamais mise en
/// cache pour la session.
///
/// # Example
/// ```
/// use ap_core::frame::{Canvas, Cell};
/// let mut canvas = Canvas::new(80, 24);
/// canvas.set(0, 0, Cell { ch: '@', fg: Some((255, 0, 0)) });
/// assert_eq!(canvas.get(0, 0).ch, '@');
/// ```
#[derive(Clone)]
pub struct Canvas {
    /// Flat array of cells, row-major.
    pub cells: Vec<Cell>,
    /// Width in characters.
    pub width: u16,
    /// Height in characters.
    pub height: u16,
}

/// Escape curseur home — chaque frame réécrit par-dessus la précédente
/// au lieu d'effacer l'écran (pas de flicker, pas de scrollback).
pub const CURSOR_HOME: &str = "\x1b[H";

/// Reset des attributs après chaque glyphe colorisé.
pub const SGR_RESET: &str = "\x1b[0m";

impl Canvas {
    /// Crée une grille pré-allouée de cellules vides.
    ///
    /// # Example
    /// ```
    /// use ap_core::frame::Canvas;
    /// let canvas = Canvas::new(80, 24);
    /// assert_eq!(canvas.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Cell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> &Cell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Reset all cells to default (space, no color).
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }

    /// Sérialise la grille en un seul repaint ANSI.
    ///
    /// Chaque cellule colorisée devient `\x1b[38;2;R;G;BmCHAR\x1b[0m`,
    /// les lignes sont jointes par `\n`, et le tout est préfixé par
    /// l'escape curseur-home (jamais un clear).
    ///
    /// # Example
    /// ```
    /// use ap_core::frame::{Canvas, Cell};
    /// let mut canvas = Canvas::new(1, 1);
    /// canvas.set(0, 0, Cell { ch: '#', fg: Some((1, 2, 3)) });
    /// assert_eq!(canvas.to_ansi(), "\x1b[H\x1b[38;2;1;2;3m#\x1b[0m");
    /// ```
    #[must_use]
    pub fn to_ansi(&self) -> String {
        // ~20 bytes par cellule colorisée + home escape
        let mut out = String::with_capacity(self.cells.len() * 20 + 8);
        out.push_str(CURSOR_HOME);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width {
                let cell = self.get(x, y);
                match cell.fg {
                    Some((r, g, b)) => {
                        out.push_str("\x1b[38;2;");
                        push_u8(&mut out, r);
                        out.push(';');
                        push_u8(&mut out, g);
                        out.push(';');
                        push_u8(&mut out, b);
                        out.push('m');
                        out.push(cell.ch);
                        out.push_str(SGR_RESET);
                    }
                    None => out.push(cell.ch),
                }
            }
        }
        out
    }
}

/// Append a u8 in decimal without going through `format!`.
#[inline(always)]
fn push_u8(out: &mut String, v: u8) {
    let mut buf = [0u8; 3];
    let mut i = 3;
    let mut v = u32::from(v);
    loop {
        i -= 1;
        buf[i] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    for &b in &buf[i..] {
        out.push(b as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involutive() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.data = (0u8..18).collect();
        let original = fb.data.clone();
        fb.flip_horizontal();
        assert_ne!(fb.data, original);
        fb.flip_horizontal();
        assert_eq!(fb.data, original);
    }

    #[test]
    fn rgb_swaps_bgr_storage() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.data = vec![10, 20, 30, 40, 50, 60];
        assert_eq!(fb.rgb(0, 0), (30, 20, 10));
        assert_eq!(fb.rgb(1, 0), (60, 50, 40));
    }

    #[test]
    fn ansi_uncolored_cell_is_bare_glyph() {
        let mut canvas = Canvas::new(2, 1);
        canvas.set(0, 0, Cell { ch: 'a', fg: None });
        canvas.set(1, 0, Cell { ch: 'b', fg: None });
        assert_eq!(canvas.to_ansi(), "\x1b[Hab");
    }

    #[test]
    fn ansi_rows_joined_by_newline() {
        let canvas = Canvas::new(2, 2);
        assert_eq!(canvas.to_ansi(), "\x1b[H  \n  ");
    }

    #[test]
    fn push_u8_full_range() {
        for v in [0u8, 7, 42, 99, 100, 255] {
            let mut s = String::new();
            push_u8(&mut s, v);
            assert_eq!(s, v.to_string());
        }
    }
}
