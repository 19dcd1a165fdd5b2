use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 29 caractères — rampe historique du mode webcam.
pub const RAMP_ASCII: &str = " _.,-=+;:cba!?0123456789$W#@Ñ";

/// Bloc plein — chaque cellule est un "pixel" coloré.
pub const RAMP_SOLID: &str = "█";

/// Point unique — rendu pointilliste.
pub const RAMP_DOT: &str = "•";

/// Preset de densité de glyphes sélectionnable par l'utilisateur.
///
/// # Example
/// ```
/// use ap_core::ramp::ShadeMode;
/// let mode: ShadeMode = "ascii".parse().unwrap();
/// assert_eq!(mode, ShadeMode::Ascii);
/// assert!("pixel".parse::<ShadeMode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeMode {
    /// Rampe complète 29 glyphes.
    #[default]
    Ascii,
    /// Bloc plein.
    Solid,
    /// Point.
    Dot,
}

impl ShadeMode {
    /// Glyphes du preset, du plus sombre au plus dense.
    #[must_use]
    pub fn glyphs(self) -> &'static str {
        match self {
            Self::Ascii => RAMP_ASCII,
            Self::Solid => RAMP_SOLID,
            Self::Dot => RAMP_DOT,
        }
    }
}

impl FromStr for ShadeMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Self::Ascii),
            "solid" => Ok(Self::Solid),
            "dot" => Ok(Self::Dot),
            other => Err(CoreError::Config(format!(
                "mode de densité inconnu : {other} (attendu : ascii, solid, dot)"
            ))),
        }
    }
}

/// Rampe de luminance : suite ordonnée de glyphes (sombre → brillant)
/// avec ses points de référence, espacés linéairement sur [0, 255].
///
/// La longueur est figée pour toute la session. Une rampe de longueur 1
/// court-circuite la quantization : bucket 0 quelle que soit la luminance.
///
/// # Example
/// ```
/// use ap_core::ramp::ShadeRamp;
/// let ramp = ShadeRamp::new(" .#").unwrap();
/// assert_eq!(ramp.len(), 3);
/// assert_eq!(ramp.glyph(0.0), ' ');
/// assert_eq!(ramp.glyph(255.0), '#');
/// ```
#[derive(Clone, Debug)]
pub struct ShadeRamp {
    glyphs: Vec<char>,
    refs: Vec<f32>,
}

impl ShadeRamp {
    /// Construit une rampe depuis une chaîne de glyphes.
    ///
    /// # Errors
    /// `CoreError::Config` si la chaîne est vide.
    pub fn new(glyphs: &str) -> Result<Self, CoreError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(CoreError::Config("rampe de glyphes vide".into()));
        }
        let n = glyphs.len();
        let refs = if n == 1 {
            vec![0.0]
        } else {
            (0..n).map(|i| 255.0 * i as f32 / (n - 1) as f32).collect()
        };
        Ok(Self { glyphs, refs })
    }

    /// Rampe d'un preset built-in. Infaillible : les presets sont non vides.
    #[must_use]
    pub fn from_mode(mode: ShadeMode) -> Self {
        // Les presets sont des constantes non vides, new() ne peut pas échouer.
        Self::new(mode.glyphs()).unwrap_or(Self {
            glyphs: vec![' '],
            refs: vec![0.0],
        })
    }

    /// Nombre de buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Toujours `false` : une rampe valide contient au moins un glyphe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Quantize une luminance [0, 255] vers un index de bucket.
    ///
    /// Plus proche voisin parmi les points de référence ; en cas
    /// d'égalité exacte, l'index inférieur gagne.
    ///
    /// # Example
    /// ```
    /// use ap_core::ramp::ShadeRamp;
    /// let ramp = ShadeRamp::new(" .#").unwrap();
    /// assert_eq!(ramp.bucket(127.5), 1);
    /// // exactement à mi-chemin entre 0 et 127.5 → index inférieur
    /// assert_eq!(ramp.bucket(63.75), 0);
    /// ```
    #[inline]
    #[must_use]
    pub fn bucket(&self, luminance: f32) -> usize {
        if self.refs.len() == 1 {
            return 0;
        }
        let mut best = 0usize;
        let mut best_diff = f32::INFINITY;
        for (i, &r) in self.refs.iter().enumerate() {
            let diff = (luminance - r).abs();
            if diff < best_diff {
                best_diff = diff;
                best = i;
            }
        }
        best
    }

    /// Glyphe correspondant à une luminance [0, 255].
    #[inline]
    #[must_use]
    pub fn glyph(&self, luminance: f32) -> char {
        self.glyphs[self.bucket(luminance)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ramp_rejected() {
        assert!(ShadeRamp::new("").is_err());
    }

    #[test]
    fn length_one_always_bucket_zero() {
        let ramp = ShadeRamp::new("█").unwrap();
        for lum in [0.0, 1.0, 127.5, 254.9, 255.0] {
            assert_eq!(ramp.bucket(lum), 0);
            assert_eq!(ramp.glyph(lum), '█');
        }
    }

    #[test]
    fn reference_points_map_exactly() {
        let ramp = ShadeRamp::new(RAMP_ASCII).unwrap();
        let n = ramp.len();
        for i in 0..n {
            let r = 255.0 * i as f32 / (n - 1) as f32;
            assert_eq!(ramp.bucket(r), i, "reference {r} must land on bucket {i}");
        }
    }

    #[test]
    fn halfway_breaks_to_lower_index() {
        // refs pour " .#" : 0, 127.5, 255
        let ramp = ShadeRamp::new(" .#").unwrap();
        assert_eq!(ramp.bucket(63.75), 0);
        assert_eq!(ramp.bucket(191.25), 1);
    }

    #[test]
    fn monotonic_over_full_range() {
        let ramp = ShadeRamp::new(RAMP_ASCII).unwrap();
        let mut prev = 0usize;
        for lum in 0..=255u32 {
            let b = ramp.bucket(lum as f32);
            assert!(b >= prev, "bucket regressed at luminance {lum}");
            prev = b;
        }
        assert_eq!(prev, ramp.len() - 1);
    }

    #[test]
    fn unknown_shade_mode_is_config_error() {
        let err = "neon".parse::<ShadeMode>().unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
