use ndarray::{Axis, s};

use crate::core::image::RgbImage;
use crate::types::Rotation;

/// Rotate an RGB raster clockwise by a multiple of 90 degrees.
///
/// 90 and 270 degree rotations swap width and height. The result is always
/// in standard (row-major) layout.
pub fn rotate_rgb(image: RgbImage, rotation: Rotation) -> RgbImage {
    if rotation == Rotation::Deg0 {
        return image;
    }
    let pixels = image.as_array();
    let rotated = match rotation {
        Rotation::Deg0 => pixels.to_owned(),
        // new[r][c] = old[h - 1 - c][r]
        Rotation::Deg90 => pixels
            .view()
            .permuted_axes([1, 0, 2])
            .slice_move(s![.., ..;-1, ..])
            .as_standard_layout()
            .into_owned(),
        Rotation::Deg180 => pixels
            .slice(s![..;-1, ..;-1, ..])
            .as_standard_layout()
            .into_owned(),
        // new[r][c] = old[c][w - 1 - r]
        Rotation::Deg270 => {
            let mut view = pixels.view().permuted_axes([1, 0, 2]);
            view.invert_axis(Axis(0));
            view.as_standard_layout().into_owned()
        }
    };
    // Channel axis is untouched, so the shape stays (rows, cols, 3)
    RgbImage::new_unchecked(rotated)
}
