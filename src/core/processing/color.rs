use tracing::debug;

use crate::core::image::{Plane, RawFrame, RgbImage};
use crate::error::{Error, Result};

/// Bytes spanned by one row of `cols` samples, or `None` on overflow.
fn row_span(plane: &Plane, cols: usize) -> Option<usize> {
    (cols - 1).checked_mul(plane.pixel_stride)?.checked_add(1)
}

/// Smallest buffer that can hold `rows` x `cols` samples at the given strides.
fn required_len(plane: &Plane, cols: usize, rows: usize) -> Option<usize> {
    (rows - 1)
        .checked_mul(plane.row_stride)?
        .checked_add(row_span(plane, cols)?)
}

fn check_plane(name: &str, plane: &Plane, cols: usize, rows: usize) -> Result<()> {
    if plane.pixel_stride == 0 {
        return Err(Error::malformed(format!("{name} plane has zero pixel stride")));
    }
    let Some(span) = row_span(plane, cols) else {
        return Err(Error::malformed(format!(
            "{name} plane pixel stride {} overflows a row of {cols} samples",
            plane.pixel_stride
        )));
    };
    if plane.row_stride < span {
        return Err(Error::malformed(format!(
            "{name} plane row stride {} is shorter than a row of {cols} samples",
            plane.row_stride
        )));
    }
    let Some(needed) = required_len(plane, cols, rows) else {
        return Err(Error::malformed(format!(
            "{name} plane row stride {} overflows {rows} rows",
            plane.row_stride
        )));
    };
    if plane.bytes.len() < needed {
        return Err(Error::malformed(format!(
            "{name} plane holds {} bytes, needs {needed} for {cols}x{rows}",
            plane.bytes.len()
        )));
    }
    Ok(())
}

/// Converts a YUV420 semi-planar frame to RGB.
///
/// Each chroma sample covers a 2x2 block of luma samples. Conversion uses
/// BT.601 full-swing coefficients:
/// - R = Y + 1.370705 * (V - 128)
/// - G = Y - 0.698001 * (V - 128) - 0.337633 * (U - 128)
/// - B = Y + 1.732446 * (U - 128)
///
/// Channels are clamped to [0, 255] and truncated.
///
/// # Errors
///
/// Returns `Error::MalformedFrame` if the frame has a zero dimension or a
/// plane whose strides or length cannot address every sample.
pub fn yuv420_to_rgb(frame: &RawFrame) -> Result<RgbImage> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    if width == 0 || height == 0 {
        return Err(Error::malformed(format!(
            "frame has zero dimension {}x{}",
            frame.width(),
            frame.height()
        )));
    }

    let y_plane = frame.y_plane();
    let u_plane = frame.u_plane();
    let v_plane = frame.v_plane();

    // Luma is addressed as y * stride + x
    if y_plane.pixel_stride != 1 {
        return Err(Error::malformed(format!(
            "Y plane pixel stride {} is not 1",
            y_plane.pixel_stride
        )));
    }
    check_plane("Y", y_plane, width, height)?;
    let chroma_cols = width.div_ceil(2);
    let chroma_rows = height.div_ceil(2);
    check_plane("U", u_plane, chroma_cols, chroma_rows)?;
    check_plane("V", v_plane, chroma_cols, chroma_rows)?;

    let mut rgb = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let luma_row = y * y_plane.row_stride;
        let u_row = (y / 2) * u_plane.row_stride;
        let v_row = (y / 2) * v_plane.row_stride;
        for x in 0..width {
            let luma = y_plane.bytes[luma_row + x] as f32;
            let u = u_plane.bytes[u_row + (x / 2) * u_plane.pixel_stride] as f32 - 128.0;
            let v = v_plane.bytes[v_row + (x / 2) * v_plane.pixel_stride] as f32 - 128.0;

            let r = (luma + 1.370705 * v).clamp(0.0, 255.0) as u8;
            let g = (luma - 0.698001 * v - 0.337633 * u).clamp(0.0, 255.0) as u8;
            let b = (luma + 1.732446 * u).clamp(0.0, 255.0) as u8;
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    debug!("Converted {}x{} {} frame to RGB", width, height, frame.format());
    RgbImage::from_vec(frame.width(), frame.height(), rgb)
}
