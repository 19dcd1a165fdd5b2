use std::time::Duration;

use anyhow::Result;
use ap_core::config::RenderConfig;
use ap_render::donut::DonutParams;
use ap_render::pipeline::GlyphPipeline;
use ap_render::{donut, plot, term};
use ap_source::capture::CaptureSource;
use ap_source::image::ImageSource;
use clap::Parser;

pub mod cli;

use cli::Command;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config (fichier partiel ou absent → défauts)
    let config = resolve_config(&cli)?;

    // 4. Ctrl-C : restaurer le terminal avant de quitter — seule façon
    //    d'arrêter la boucle du donut.
    ctrlc::set_handler(|| {
        let mut out = std::io::stdout();
        let _ = term::session_end(&mut out);
        std::process::exit(0);
    })?;

    // Pas de lock persistant : le handler Ctrl-C doit pouvoir écrire
    // la restauration du terminal depuis son propre thread.
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Webcam {
            shade,
            grayscale,
            cam,
            no_color,
        } => {
            let config = with_overrides(config, shade.as_deref(), grayscale.as_deref(), no_color)?;
            let index = cam.unwrap_or(config.camera_index);
            let mut source = CaptureSource::open_camera(index)?;
            GlyphPipeline::new(&config).run(&mut source, &mut stdout)
        }

        Command::Play {
            path,
            shade,
            grayscale,
            no_color,
        } => {
            let config = with_overrides(config, shade.as_deref(), grayscale.as_deref(), no_color)?;
            let mut source = CaptureSource::open_video(&path)?;
            GlyphPipeline::new(&config).run(&mut source, &mut stdout)
        }

        Command::Image {
            path,
            shade,
            grayscale,
            no_color,
        } => {
            let config = with_overrides(config, shade.as_deref(), grayscale.as_deref(), no_color)?;
            let mut source = ImageSource::new(&path)?;
            GlyphPipeline::new(&config).run(&mut source, &mut stdout)
        }

        Command::Donut { a, b, speed } => {
            let mut params = DonutParams::from(config.donut);
            if let Some(a) = a {
                params.a_step = a;
            }
            if let Some(b) = b {
                params.b_step = b;
            }
            if let Some(speed) = speed {
                params.frame_delay = Duration::from_secs_f32(speed.max(0.0));
            }
            donut::run(params, &mut stdout)
        }

        Command::Graph { x, y } => {
            let (x, y) = match (x, y) {
                (Some(x), Some(y)) => (x, y),
                // Démo historique : longueurs volontairement différentes,
                // le resampling fait le raccord.
                _ => (linspace(0.0, 10.0, 50), sine_demo(100)),
            };
            plot::render_graph(&x, &y, &mut stdout, true)?;
            Ok(())
        }
    }
}

/// Applique les overrides CLI sur la config de session.
///
/// Un mode inconnu est fatal ici, avant toute frame.
fn with_overrides(
    mut config: RenderConfig,
    shade: Option<&str>,
    grayscale: Option<&str>,
    no_color: bool,
) -> Result<RenderConfig> {
    if let Some(s) = shade {
        config.shade = s.parse()?;
    }
    if let Some(g) = grayscale {
        config.luminance = g.parse()?;
    }
    if no_color {
        config.color_enabled = false;
    }
    Ok(config)
}

/// Charge la config depuis le fichier, ou les défauts s'il n'existe pas.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        ap_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![start; n];
    }
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

fn sine_demo(n: usize) -> Vec<f64> {
    linspace(0.0, 10.0, n).into_iter().map(f64::sin).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::luminance::LuminanceMode;
    use ap_core::ramp::ShadeMode;

    #[test]
    fn overrides_replace_config_fields() {
        let config = with_overrides(RenderConfig::default(), Some("dot"), Some("mean"), true).unwrap();
        assert_eq!(config.shade, ShadeMode::Dot);
        assert_eq!(config.luminance, LuminanceMode::Mean);
        assert!(!config.color_enabled);
    }

    #[test]
    fn unknown_override_is_fatal_before_any_frame() {
        assert!(with_overrides(RenderConfig::default(), Some("plasma"), None, false).is_err());
        assert!(with_overrides(RenderConfig::default(), None, Some("gamma"), false).is_err());
    }

    #[test]
    fn linspace_hits_both_endpoints() {
        let v = linspace(0.0, 10.0, 50);
        assert_eq!(v.len(), 50);
        assert!((v[0] - 0.0).abs() < 1e-12);
        assert!((v[49] - 10.0).abs() < 1e-12);
    }
}
