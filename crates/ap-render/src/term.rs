use std::io::Write;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

/// Taille de repli quand le terminal ne répond pas (pipe, CI).
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Taille courante du terminal en cellules (width, height).
///
/// Interrogée une fois PAR FRAME par les boucles de rendu — la taille
/// peut changer entre deux ticks, elle n'est jamais mise en cache.
#[must_use]
pub fn canvas_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((w, h)) if w > 0 && h > 0 => (w, h),
        _ => FALLBACK_SIZE,
    }
}

/// Écrit un repaint complet et flush immédiatement.
///
/// Le payload est préfixé par l'escape curseur-home côté producteur ;
/// ici on ne fait qu'écrire et flusher d'un bloc.
///
/// # Errors
/// Propage l'erreur I/O du sink.
pub fn repaint<W: Write>(out: &mut W, payload: &str) -> std::io::Result<()> {
    out.write_all(payload.as_bytes())?;
    out.flush()
}

/// Prépare le terminal pour une session : un seul clear au démarrage
/// (les frames suivantes réécrivent en place), curseur masqué.
///
/// # Errors
/// Propage l'erreur I/O du terminal.
pub fn session_start<W: Write>(out: &mut W) -> std::io::Result<()> {
    execute!(out, Clear(ClearType::All), Hide)
}

/// Restaure le terminal en fin de session : curseur visible, saut de
/// ligne pour ne pas laisser le prompt au milieu du rendu.
///
/// # Errors
/// Propage l'erreur I/O du terminal.
pub fn session_end<W: Write>(out: &mut W) -> std::io::Result<()> {
    execute!(out, Show)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repaint_writes_and_flushes() {
        let mut sink: Vec<u8> = Vec::new();
        repaint(&mut sink, "\x1b[Habc").unwrap();
        assert_eq!(sink, b"\x1b[Habc");
    }

    #[test]
    fn fallback_size_is_sane() {
        let (w, h) = canvas_size();
        assert!(w > 0 && h > 0);
    }
}
