/// Configuration, types, and shared structures for apollo.
///
/// This crate contains all shared types, traits, and configuration logic
/// used across the apollo workspace: pixel frames, the terminal canvas,
/// shade ramps, luminance policies, and the error taxonomy.

pub mod config;
pub mod error;
pub mod frame;
pub mod luminance;
pub mod ramp;
pub mod traits;

pub use config::RenderConfig;
pub use error::CoreError;
pub use frame::{Canvas, Cell, FrameBuffer};
pub use luminance::LuminanceMode;
pub use ramp::{ShadeMode, ShadeRamp};
pub use traits::FrameSource;
