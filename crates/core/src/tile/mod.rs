//! Tile image types

mod image;
mod pixel;

pub use image::TileImage;
pub use pixel::PixelType;
