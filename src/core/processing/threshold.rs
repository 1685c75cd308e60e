use crate::core::image::{BinaryImage, GrayImage, Palette, PaletteImage};

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

/// Samples strictly above `threshold` become white, everything else black.
pub fn binarize(image: &GrayImage, threshold: u8) -> BinaryImage {
    let pixels = image
        .as_array()
        .mapv(|v| if v > threshold { WHITE } else { BLACK });
    BinaryImage::new_unchecked(pixels)
}

/// Map a two-level raster onto the black/white palette: black -> 0, white -> 1.
pub fn to_palette(image: &BinaryImage) -> PaletteImage {
    let indices = image
        .as_array()
        .iter()
        .map(|&v| u8::from(v == WHITE))
        .collect();
    PaletteImage::new(image.width(), image.height(), indices, Palette::MONOCHROME)
}
