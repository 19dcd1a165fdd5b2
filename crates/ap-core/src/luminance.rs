use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Politique de calcul de la luminance d'un pixel.
///
/// Choisie une fois par session ; ne change jamais en cours de rendu.
/// Les poids perceptuels s'appliquent aux canaux logiques R, G, B quel
/// que soit l'ordre de stockage de la source (BGR pour la capture).
///
/// # Example
/// ```
/// use ap_core::luminance::LuminanceMode;
/// assert_eq!(LuminanceMode::Mean.of_rgb(30, 60, 90), 60.0);
/// let w = LuminanceMode::Weighted.of_rgb(255, 255, 255);
/// assert!((w - 255.0).abs() < 0.1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LuminanceMode {
    /// Moyenne des trois canaux. Légèrement plus rapide.
    Mean,
    /// Pondération perceptuelle ITU-R BT.601 : 0.299 R + 0.587 G + 0.114 B.
    /// Un peu plus lente, résultats plus fidèles.
    #[default]
    Weighted,
}

impl LuminanceMode {
    /// Luminance [0, 255] d'un pixel donné en ordre logique (r, g, b).
    #[inline(always)]
    #[must_use]
    pub fn of_rgb(self, r: u8, g: u8, b: u8) -> f32 {
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        match self {
            Self::Mean => (r + g + b) / 3.0,
            Self::Weighted => 0.299 * r + 0.587 * g + 0.114 * b,
        }
    }
}

impl FromStr for LuminanceMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            // "default" est le nom historique du mode pondéré
            "weighted" | "default" => Ok(Self::Weighted),
            other => Err(CoreError::Config(format!(
                "mode de luminance inconnu : {other} (attendu : mean, weighted)"
            ))),
        }
    }
}
