//! Utility modules

pub mod image;
pub mod render;

pub use image::ImageUtils;
