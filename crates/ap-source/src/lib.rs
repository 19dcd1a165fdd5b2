/// Frame acquisition for apollo (webcam, video file, still image)
/// plus the terminal-sized area-averaging resize.

pub mod capture;
pub mod image;
pub mod resize;

pub use capture::CaptureSource;
pub use image::ImageSource;
pub use resize::Resizer;
