use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use tracing::debug;

use crate::core::image::GrayImage;
use crate::error::{Error, Result};
use crate::types::ResizeFilter;

pub fn resize_alg(filter: ResizeFilter) -> ResizeAlg {
    match filter {
        ResizeFilter::Nearest => ResizeAlg::Nearest,
        ResizeFilter::Box => ResizeAlg::Convolution(FilterType::Box),
        ResizeFilter::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        ResizeFilter::CatmullRom => ResizeAlg::Convolution(FilterType::CatmullRom),
        ResizeFilter::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
    }
}

pub fn resize_u8_image(
    resizer: &mut Resizer,
    data: Vec<u8>,
    original_cols: u32,
    original_rows: u32,
    target_cols: u32,
    target_rows: u32,
    filter: ResizeFilter,
) -> Result<Vec<u8>> {
    let resize_options = ResizeOptions::new().resize_alg(resize_alg(filter));

    let src_image = Image::from_vec_u8(original_cols, original_rows, data, PixelType::U8)
        .map_err(Error::resize)?;
    let mut dst_image = Image::new(target_cols, target_rows, PixelType::U8);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(Error::resize)?;

    Ok(dst_image.into_vec())
}

/// Scale a luma raster to exactly `target_cols` x `target_rows`.
///
/// The display raster is fixed, so aspect ratio is not preserved. A raster
/// already at the target size is passed through untouched.
pub fn resize_gray(
    resizer: &mut Resizer,
    image: GrayImage,
    target_cols: u32,
    target_rows: u32,
    filter: ResizeFilter,
) -> Result<GrayImage> {
    let (cols, rows) = (image.width(), image.height());
    if cols == target_cols && rows == target_rows {
        return Ok(image);
    }
    if target_cols == 0 || target_rows == 0 {
        return Err(Error::Resize(format!(
            "target size must be non-zero, got {}x{}",
            target_cols, target_rows
        )));
    }

    debug!(
        "Resizing {}x{} -> {}x{} ({})",
        cols, rows, target_cols, target_rows, filter
    );
    let resized = resize_u8_image(
        resizer,
        image.into_vec(),
        cols,
        rows,
        target_cols,
        target_rows,
        filter,
    )?;
    GrayImage::from_vec(target_cols, target_rows, resized)
}
