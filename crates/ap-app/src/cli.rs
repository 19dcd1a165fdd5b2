use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// apollo — webcam, vidéos et donuts en ASCII dans le terminal.
#[derive(Parser, Debug)]
#[command(name = "apollo", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Affiche le flux webcam en ASCII art (miroir activé).
    Webcam {
        /// Style de densité : ascii, solid, dot.
        #[arg(long)]
        shade: Option<String>,

        /// Politique de luminance : mean, weighted.
        #[arg(long)]
        grayscale: Option<String>,

        /// Index de la caméra.
        #[arg(long)]
        cam: Option<u32>,

        /// Désactiver la couleur truecolor.
        #[arg(long, default_value_t = false)]
        no_color: bool,
    },

    /// Joue un fichier vidéo local en ASCII art.
    Play {
        /// Chemin du fichier vidéo.
        path: PathBuf,

        /// Style de densité : ascii, solid, dot.
        #[arg(long)]
        shade: Option<String>,

        /// Politique de luminance : mean, weighted.
        #[arg(long)]
        grayscale: Option<String>,

        /// Désactiver la couleur truecolor.
        #[arg(long, default_value_t = false)]
        no_color: bool,
    },

    /// Rend une image fixe (PNG, JPEG, BMP, GIF) en ASCII art.
    Image {
        /// Chemin de l'image.
        path: PathBuf,

        /// Style de densité : ascii, solid, dot.
        #[arg(long)]
        shade: Option<String>,

        /// Politique de luminance : mean, weighted.
        #[arg(long)]
        grayscale: Option<String>,

        /// Désactiver la couleur truecolor.
        #[arg(long, default_value_t = false)]
        no_color: bool,
    },

    /// donut.c — tore en rotation avec Z-buffer.
    Donut {
        /// Incrément de rotation autour de l'axe X, par frame.
        #[arg(short, long)]
        a: Option<f32>,

        /// Incrément de rotation autour de l'axe Z, par frame.
        #[arg(short, long)]
        b: Option<f32>,

        /// Pause entre deux frames, en secondes.
        #[arg(long)]
        speed: Option<f32>,
    },

    /// Trace un nuage de points ASCII (80×12) sur stdout.
    Graph {
        /// Valeurs x, séparées par des virgules. Défaut : rampe 0..50.
        #[arg(long, value_delimiter = ',')]
        x: Option<Vec<f64>>,

        /// Valeurs y, séparées par des virgules. Défaut : sinus démo.
        #[arg(long, value_delimiter = ',')]
        y: Option<Vec<f64>>,
    },
}
