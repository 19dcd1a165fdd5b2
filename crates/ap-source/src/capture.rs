// Capture via ffmpeg en subprocess (std::process::Command) : ffmpeg décode
// webcam ou fichier vidéo et écrit des frames BGR24 brutes sur stdout.
// Prérequis : `ffmpeg` (et `ffprobe` pour les fichiers) dans le PATH.
//
// Architecture :
//   - `probe_video`      : interroge ffprobe pour obtenir width/height/fps
//   - `spawn_ffmpeg_*`   : lance ffmpeg → flux raw BGR24 sur stdout
//   - `CaptureSource`    : lecture bloquante frame par frame, Drop tue ffmpeg
//
// Tout est single-thread : la boucle de rendu possède le handle en exclusivité
// et alterne strictement lecture / rendu.

use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result};
use ap_core::error::CoreError;
use ap_core::frame::FrameBuffer;
use ap_core::traits::FrameSource;

/// Taille maximale du pipe de décodage. Le rendu re-resize vers la grille
/// terminal à chaque tick, inutile de payer la pleine résolution :
/// 1920×1080@30fps ≈ 186 MB/s en BGR24, 640×360@30fps ≈ 20 MB/s.
const MAX_PIPE_WIDTH: u32 = 640;
const MAX_PIPE_HEIGHT: u32 = 360;

/// Résolution de capture caméra par défaut.
const CAMERA_WIDTH: u32 = 640;
const CAMERA_HEIGHT: u32 = 480;

/// Métadonnées extraites via ffprobe.
#[derive(Clone, Copy, Debug)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Images par seconde (ex: 23.976, 24.0, 30.0, 60.0).
    pub fps: f64,
}

/// Interroge `ffprobe` pour obtenir les métadonnées du flux vidéo principal.
///
/// # Errors
/// Retourne une erreur si `ffprobe` est introuvable ou si le fichier
/// ne contient aucun flux vidéo décodable.
pub fn probe_video(path: &Path) -> Result<VideoInfo> {
    let path_str = path.to_str().context("Chemin vidéo invalide (non-UTF8)")?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1",
            "-i",
            path_str,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .context(
            "Impossible de lancer ffprobe. Vérifiez que ffprobe est installé et dans le PATH.",
        )?;

    let text = String::from_utf8_lossy(&output.stdout);

    let mut width: u32 = 0;
    let mut height: u32 = 0;
    let mut fps: f64 = 30.0;

    for line in text.lines() {
        if let Some(val) = line.strip_prefix("width=") {
            width = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("height=") {
            height = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("r_frame_rate=") {
            // Format: "24/1" ou "30000/1001"
            let mut parts = val.trim().splitn(2, '/');
            let num: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(30.0);
            let den: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1.0);
            if den > 0.0 {
                fps = num / den;
            }
        }
    }

    if width == 0 || height == 0 {
        anyhow::bail!(
            "ffprobe n'a trouvé aucun flux vidéo dans {}",
            path.display()
        );
    }

    log::info!(
        "probe_video: {width}x{height} @ {fps:.3}fps — {}",
        path.display()
    );

    Ok(VideoInfo { width, height, fps })
}

/// Lit exactement `buf.len()` bytes depuis `reader`.
///
/// # Errors
/// `Ok(true)` si lu avec succès, `Ok(false)` sur EOF avant complétion,
/// `Err` sur erreur I/O fatale.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Ok(false), // EOF
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Source de frames adossée à un subprocess ffmpeg.
///
/// Le handle est possédé en exclusivité par la boucle de rendu pour
/// toute sa durée de vie ; `Drop` tue et moissonne le process sur tous
/// les chemins de sortie, y compris un échec d'acquisition précoce.
#[derive(Debug)]
pub struct CaptureSource {
    child: Child,
    stdout: ChildStdout,
    frame: FrameBuffer,
    live: bool,
    exhausted: bool,
}

impl CaptureSource {
    /// Ouvre un fichier vidéo local.
    ///
    /// ffmpeg décode en temps réel (`-re`) pour que la lecture bloquante
    /// cadence naturellement la boucle au fps natif du fichier.
    ///
    /// # Errors
    /// `CoreError::SourceUnavailable` (via anyhow) si le fichier n'existe
    /// pas, ne contient pas de flux vidéo, ou si ffmpeg ne démarre pas.
    /// Fatal avant la boucle — jamais de retry.
    pub fn open_video(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::SourceUnavailable(format!(
                "fichier introuvable : {}",
                path.display()
            ))
            .into());
        }
        let info = probe_video(path)?;
        let (w, h) = pipe_size(info.width, info.height);
        let path_str = path.to_str().context("Chemin vidéo invalide (non-UTF8)")?;
        let scale_filter = format!("scale={w}:{h}:flags=area");

        let child = Command::new("ffmpeg")
            .args([
                "-re", // décode au fps natif → cadence la boucle
                "-i",
                path_str,
                "-vf",
                &scale_filter,
                "-f",
                "rawvideo",
                "-pix_fmt",
                "bgr24", // convention capture : B, G, R
                "-an",
                "-hide_banner",
                "-loglevel",
                "error",
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Impossible de lancer ffmpeg. Vérifiez qu'il est dans le PATH.")?;

        log::info!("CaptureSource: vidéo {} → pipe {w}x{h}", path.display());
        Self::from_child(child, w, h, false)
    }

    /// Ouvre une caméra live par index (miroir activé côté pipeline).
    ///
    /// # Errors
    /// `CoreError::SourceUnavailable` si la plateforme n'a pas de backend
    /// caméra connu ou si ffmpeg ne démarre pas.
    pub fn open_camera(index: u32) -> Result<Self> {
        let (w, h) = (CAMERA_WIDTH, CAMERA_HEIGHT);
        let size = format!("{w}x{h}");

        let mut cmd = Command::new("ffmpeg");
        if cfg!(target_os = "linux") {
            let device = format!("/dev/video{index}");
            cmd.args(["-f", "v4l2", "-video_size", &size, "-i", &device]);
        } else if cfg!(target_os = "macos") {
            let device = index.to_string();
            cmd.args([
                "-f",
                "avfoundation",
                "-framerate",
                "30",
                "-video_size",
                &size,
                "-i",
                &device,
            ]);
        } else {
            return Err(CoreError::SourceUnavailable(format!(
                "pas de backend caméra pour cette plateforme (index {index})"
            ))
            .into());
        }

        let scale_filter = format!("scale={w}:{h}:flags=area");
        let child = cmd
            .args([
                "-vf",
                &scale_filter,
                "-f",
                "rawvideo",
                "-pix_fmt",
                "bgr24",
                "-an",
                "-hide_banner",
                "-loglevel",
                "error",
                "pipe:1",
            ])
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Impossible de lancer ffmpeg. Vérifiez qu'il est dans le PATH.")?;

        log::info!("CaptureSource: caméra {index} → pipe {w}x{h}");
        Self::from_child(child, w, h, true)
    }

    fn from_child(mut child: Child, width: u32, height: u32, live: bool) -> Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CoreError::SourceUnavailable("stdout ffmpeg absent".into()))?;
        Ok(Self {
            child,
            stdout,
            frame: FrameBuffer::new(width, height),
            live,
            exhausted: false,
        })
    }
}

impl FrameSource for CaptureSource {
    fn next_frame(&mut self) -> Option<&FrameBuffer> {
        if self.exhausted {
            return None;
        }
        match read_exact_or_eof(&mut self.stdout, &mut self.frame.data) {
            Ok(true) => Some(&self.frame),
            Ok(false) => {
                log::info!("CaptureSource: fin de flux");
                self.exhausted = true;
                None
            }
            Err(e) => {
                // Erreur I/O en cours de flux : sortie propre, pas une panique
                log::warn!("CaptureSource: lecture échouée : {e}");
                self.exhausted = true;
                None
            }
        }
    }

    fn native_size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for CaptureSource {
    fn drop(&mut self) {
        // Libération garantie sur tous les chemins de sortie
        let _ = self.child.kill();
        let _ = self.child.wait();
        log::debug!("CaptureSource: ffmpeg arrêté");
    }
}

/// Dimensions du pipe de décodage, plafonnées pour limiter la bande passante.
fn pipe_size(native_w: u32, native_h: u32) -> (u32, u32) {
    (
        native_w.clamp(1, MAX_PIPE_WIDTH),
        native_h.clamp(1, MAX_PIPE_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_exact_handles_split_reads() {
        let data = vec![7u8; 10];
        let mut cursor = Cursor::new(data);
        let mut buf = [0u8; 10];
        assert!(read_exact_or_eof(&mut cursor, &mut buf).unwrap());
        assert_eq!(buf, [7u8; 10]);
    }

    #[test]
    fn read_exact_reports_eof() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 5];
        assert!(!read_exact_or_eof(&mut cursor, &mut buf).unwrap());
    }

    #[test]
    fn pipe_size_caps_large_sources() {
        assert_eq!(pipe_size(1920, 1080), (640, 360));
        assert_eq!(pipe_size(320, 240), (320, 240));
    }

    #[test]
    fn missing_video_file_fails_fast() {
        let err = CaptureSource::open_video(Path::new("/nonexistent/clip.mkv")).unwrap_err();
        assert!(err.to_string().contains("introuvable"));
    }
}
