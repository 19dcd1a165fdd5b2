use thiserror::Error;

/// Errors originating from the core render pipeline.
///
/// End-of-stream is deliberately absent : une lecture qui échoue en
/// cours de boucle termine proprement la session, ce n'est pas une erreur.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value (shade mode, luminance mode, ...).
    /// Fatal au démarrage de session, avant toute frame.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Frame source could not be opened. Fatal, non-retryable.
    #[error("Source indisponible : {0}")]
    SourceUnavailable(String),
}
