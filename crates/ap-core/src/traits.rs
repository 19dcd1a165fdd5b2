use crate::frame::FrameBuffer;

/// Fournit des frames pixel au pipeline de rendu.
///
/// Implémenté par : `CaptureSource` (webcam, vidéo), `ImageSource`.
///
/// Le producteur et le consommateur alternent strictement dans un seul
/// thread : la lecture bloque jusqu'à la frame suivante, et `None`
/// signale la fin de flux — unique condition d'arrêt de la boucle.
///
/// # Example
/// ```
/// use ap_core::traits::FrameSource;
/// use ap_core::frame::FrameBuffer;
///
/// struct OneBlack(Option<FrameBuffer>);
/// impl FrameSource for OneBlack {
///     fn next_frame(&mut self) -> Option<&FrameBuffer> {
///         // take() : une seule frame puis fin de flux
///         self.0 = None;
///         self.0.as_ref()
///     }
///     fn native_size(&self) -> (u32, u32) { (2, 2) }
///     fn is_live(&self) -> bool { false }
/// }
/// ```
pub trait FrameSource {
    /// Lecture bloquante de la prochaine frame.
    ///
    /// Retourne `None` si la source est épuisée (fin de vidéo, capture
    /// interrompue). Un échec de lecture en cours de flux se traduit par
    /// `None`, jamais par une panique.
    fn next_frame(&mut self) -> Option<&FrameBuffer>;

    /// Dimensions natives de la source (avant resize terminal).
    fn native_size(&self) -> (u32, u32);

    /// `true` si la source est une caméra live (déclenche le miroir
    /// horizontal), `false` pour un fichier vidéo ou une image.
    fn is_live(&self) -> bool;
}
