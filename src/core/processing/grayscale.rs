use ndarray::Array2;

use crate::core::image::{GrayImage, RgbImage};

/// BT.601 luma in 8.8 fixed point: `(77 R + 150 G + 29 B + 128) >> 8`.
///
/// This approximates round(0.299 R + 0.587 G + 0.114 B) and may differ from
/// it by one (pure green gives 149, not 150). The weights sum to 256, so a
/// uniform gray maps to itself.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

pub fn rgb_to_gray(image: &RgbImage) -> GrayImage {
    let rgb = image.as_array();
    let (rows, cols, _) = rgb.dim();
    let gray = Array2::from_shape_fn((rows, cols), |(r, c)| {
        luma(rgb[[r, c, 0]], rgb[[r, c, 1]], rgb[[r, c, 2]])
    });
    GrayImage::from_array(gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_input_is_preserved() {
        for v in [0u8, 1, 127, 128, 200, 254, 255] {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn primaries_follow_bt601_weights() {
        assert_eq!(luma(255, 0, 0), 77);
        assert_eq!(luma(0, 255, 0), 149);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn dimensions_are_kept() {
        let rgb = RgbImage::from_vec(3, 2, vec![200; 18]).unwrap();
        let gray = rgb_to_gray(&rgb);
        assert_eq!((gray.width(), gray.height()), (3, 2));
        assert!(gray.as_array().iter().all(|&v| v == 200));
    }
}
