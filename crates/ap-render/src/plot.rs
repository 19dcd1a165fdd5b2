// Plot cartésien one-shot : deux séries numériques → grille ASCII fixe
// écrite dans n'importe quel sink `Write`. Indépendant de la taille
// réelle du terminal, ne boucle jamais.

use std::io::Write;

/// Largeur fixe du canvas de plot, en cellules.
pub const PLOT_WIDTH: usize = 80;
/// Hauteur fixe du canvas de plot, en cellules.
pub const PLOT_HEIGHT: usize = 12;

/// Glyphe marquant un point de données.
const MARK: char = '•';

/// Epsilon du dénominateur min-max : une série constante se normalise
/// à plat au lieu de diviser par zéro.
const RANGE_EPSILON: f64 = 1e-8;

/// Resample une série à `target_len` points par interpolation linéaire
/// sur un paramètre partagé dans [0, 1].
///
/// Identité quand `target_len == values.len()` — les valeurs d'origine
/// sont retournées inchangées.
///
/// # Example
/// ```
/// use ap_render::plot::resample;
/// let v = vec![0.0, 1.0, 2.0];
/// assert_eq!(resample(&v, 3), v);
/// assert_eq!(resample(&v, 5), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
/// ```
#[must_use]
pub fn resample(values: &[f64], target_len: usize) -> Vec<f64> {
    if values.len() == target_len {
        return values.to_vec();
    }
    if values.is_empty() || target_len == 0 {
        return Vec::new();
    }
    if values.len() == 1 {
        return vec![values[0]; target_len];
    }
    if target_len == 1 {
        return vec![values[0]];
    }

    let last = values.len() - 1;
    (0..target_len)
        .map(|i| {
            let t = i as f64 / (target_len - 1) as f64;
            let pos = t * last as f64;
            let j = (pos.floor() as usize).min(last - 1);
            let frac = pos - j as f64;
            values[j] * (1.0 - frac) + values[j + 1] * frac
        })
        .collect()
}

/// Normalise min-max vers [0, 1], epsilon au dénominateur.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min) + RANGE_EPSILON;
    values.iter().map(|v| (v - min) / range).collect()
}

/// Trace un nuage de points (x, y) sur le canvas fixe 80×12 et l'écrit
/// dans `out`, une ligne par rangée, haut vers bas. La ligne 0 porte les
/// y maximaux (axe inversé par rapport à l'ordre d'écriture).
///
/// Les séries sont resamplées à la largeur du canvas quand leurs
/// longueurs diffèrent ou dépassent la largeur. Les points superposés
/// se replient sur un seul glyphe. Une série vide produit un canvas
/// vide, sans faute.
///
/// La capacité d'écriture du sink est exigée par le type (`W: Write`) —
/// l'équivalent compile-time du contrat "le sink doit savoir écrire".
///
/// # Errors
/// Propage les erreurs I/O du sink.
///
/// # Example
/// ```
/// use ap_render::plot::render_graph;
/// let x: Vec<f64> = (0..50).map(f64::from).collect();
/// let y: Vec<f64> = x.iter().map(|v| (v / 8.0).sin()).collect();
/// let mut out = Vec::new();
/// render_graph(&x, &y, &mut out, true).unwrap();
/// assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), 12);
/// ```
pub fn render_graph<W: Write>(x: &[f64], y: &[f64], out: &mut W, flush: bool) -> std::io::Result<()> {
    let mut canvas = [[' '; PLOT_WIDTH]; PLOT_HEIGHT];

    if !x.is_empty() && !y.is_empty() {
        let (x, y) = if x.len() != y.len() || x.len() > PLOT_WIDTH {
            (resample(x, PLOT_WIDTH), resample(y, PLOT_WIDTH))
        } else {
            (x.to_vec(), y.to_vec())
        };

        let x_norm = normalize(&x);
        let y_norm = normalize(&y);

        for (xn, yn) in x_norm.iter().zip(y_norm.iter()) {
            // round, pas trunc : l'epsilon du dénominateur ne doit pas
            // priver les extrêmes de la première/dernière cellule
            let col = ((xn * (PLOT_WIDTH - 1) as f64).round() as usize).min(PLOT_WIDTH - 1);
            let yi = ((yn * (PLOT_HEIGHT - 1) as f64).round() as usize).min(PLOT_HEIGHT - 1);
            // rangée 0 = haut = valeur maximale
            let row = PLOT_HEIGHT - 1 - yi;
            canvas[row][col] = MARK;
        }
    }

    let mut line = String::with_capacity(PLOT_WIDTH * MARK.len_utf8() + 1);
    for row in &canvas {
        line.clear();
        line.extend(row.iter());
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }

    if flush {
        out.flush()?;
    }
    Ok(())
}
