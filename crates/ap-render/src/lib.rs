/// The three apollo renderers — frame-to-glyph pipeline, torus surface
/// rasterizer, cartesian plot — plus terminal helpers (size polling,
/// cursor-home repaint, session setup/teardown).

pub mod donut;
pub mod pipeline;
pub mod plot;
pub mod term;

pub use donut::DonutParams;
pub use pipeline::GlyphPipeline;
