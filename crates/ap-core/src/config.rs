use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::luminance::LuminanceMode;
use crate::ramp::ShadeMode;

/// Configuration complète du rendu, sérialisable en TOML.
///
/// Chaque champ a une valeur par défaut saine : un fichier partiel est
/// valide, les clés absentes prennent leur défaut.
///
/// # Example
/// ```
/// use ap_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert!(config.color_enabled);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Preset de densité de glyphes : "ascii" | "solid" | "dot".
    pub shade: ShadeMode,
    /// Politique de luminance : "mean" | "weighted".
    pub luminance: LuminanceMode,
    /// Coloriser chaque glyphe avec le RGB du pixel source (truecolor).
    pub color_enabled: bool,
    /// Index de la caméra par défaut.
    pub camera_index: u32,
    /// Paramètres du rasterizer de surface.
    pub donut: DonutConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shade: ShadeMode::Ascii,
            luminance: LuminanceMode::Weighted,
            color_enabled: true,
            camera_index: 0,
            donut: DonutConfig::default(),
        }
    }
}

/// Paramètres de la boucle du donut.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DonutConfig {
    /// Incrément de l'angle A (axe X) par frame, en radians.
    pub a_step: f32,
    /// Incrément de l'angle B (axe Z) par frame, en radians.
    pub b_step: f32,
    /// Pause entre deux frames, en millisecondes.
    pub frame_delay_ms: u64,
}

impl Default for DonutConfig {
    fn default() -> Self {
        Self {
            a_step: 0.04,
            b_step: 0.08,
            frame_delay_ms: 30,
        }
    }
}

/// Charge une configuration TOML depuis le disque.
///
/// # Errors
/// Retourne une erreur si le fichier est illisible ou mal formé.
///
/// # Example
/// ```no_run
/// use ap_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config: RenderConfig =
        toml::from_str(&text).with_context(|| format!("TOML invalide : {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_round_trip() {
        let config = RenderConfig {
            shade: ShadeMode::Dot,
            luminance: LuminanceMode::Mean,
            color_enabled: false,
            camera_index: 2,
            donut: DonutConfig {
                a_step: 0.01,
                b_step: 0.02,
                frame_delay_ms: 16,
            },
        };
        let text = toml::to_string(&config).unwrap();
        let back: RenderConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.shade, ShadeMode::Dot);
        assert_eq!(back.luminance, LuminanceMode::Mean);
        assert!(!back.color_enabled);
        assert_eq!(back.camera_index, 2);
        assert_eq!(back.donut.frame_delay_ms, 16);
    }

    #[test]
    fn partial_file_takes_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "shade = \"solid\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.shade, ShadeMode::Solid);
        // clés absentes → défauts
        assert_eq!(config.luminance, LuminanceMode::Weighted);
        assert!(config.color_enabled);
        assert_eq!(config.donut.frame_delay_ms, 30);
    }

    #[test]
    fn unknown_shade_value_is_rejected() {
        let result = toml::from_str::<RenderConfig>("shade = \"plasma\"");
        assert!(result.is_err());
    }
}
