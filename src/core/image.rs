//! Frame and raster containers passed between pipeline stages.
//!
//! Each stage consumes the previous container and produces the next one, so
//! no intermediate raster outlives the processing of its frame.
use std::time::Duration;

use ndarray::{Array2, Array3};

use crate::error::{Error, Result};
use crate::types::PixelFormat;

/// One plane of a raw sensor frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    pub bytes: Vec<u8>,
    /// Bytes between the starts of two consecutive rows
    pub row_stride: usize,
    /// Bytes between two horizontally adjacent samples
    pub pixel_stride: usize,
}

impl Plane {
    pub fn new(bytes: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            bytes,
            row_stride,
            pixel_stride,
        }
    }
}

/// A raw YUV420 frame as delivered by the frame producer.
#[derive(Debug, Clone)]
pub struct RawFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    planes: [Plane; 3],
    timestamp: Duration,
}

impl RawFrame {
    /// Planes are ordered Y, U, V. Geometry is checked by the converter.
    pub fn new(width: u32, height: u32, planes: [Plane; 3], timestamp: Duration) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Yuv420SemiPlanar,
            planes,
            timestamp,
        }
    }

    /// Build a frame over a packed NV12 buffer: full luma plane followed by
    /// interleaved UV pairs at half resolution.
    pub fn from_nv12(width: u32, height: u32, data: &[u8], timestamp: Duration) -> Result<Self> {
        let w = width as usize;
        let h = height as usize;
        let chroma_row = w.div_ceil(2) * 2;
        let luma_len = w * h;
        let chroma_len = chroma_row * h.div_ceil(2);
        if w == 0 || h == 0 || data.len() < luma_len + chroma_len {
            return Err(Error::malformed(format!(
                "NV12 buffer of {} bytes is too short for {}x{}",
                data.len(),
                width,
                height
            )));
        }

        let chroma = &data[luma_len..luma_len + chroma_len];
        let y = Plane::new(data[..luma_len].to_vec(), w, 1);
        let u = Plane::new(chroma.to_vec(), chroma_row, 2);
        let v = Plane::new(chroma[1..].to_vec(), chroma_row, 2);
        Ok(Self::new(width, height, [y, u, v], timestamp))
    }

    /// A frame where every sample of each plane holds the same value.
    pub fn uniform(width: u32, height: u32, y: u8, u: u8, v: u8, timestamp: Duration) -> Self {
        let w = width as usize;
        let h = height as usize;
        let cw = w.div_ceil(2);
        let ch = h.div_ceil(2);
        Self::new(
            width,
            height,
            [
                Plane::new(vec![y; w * h], w, 1),
                Plane::new(vec![u; cw * ch], cw, 1),
                Plane::new(vec![v; cw * ch], cw, 1),
            ],
            timestamp,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn y_plane(&self) -> &Plane {
        &self.planes[0]
    }

    pub fn u_plane(&self) -> &Plane {
        &self.planes[1]
    }

    pub fn v_plane(&self) -> &Plane {
        &self.planes[2]
    }
}

/// Interleaved RGB raster, indexed `[row, col, channel]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pixels: Array3<u8>,
}

impl RgbImage {
    pub(crate) fn new_unchecked(pixels: Array3<u8>) -> Self {
        Self { pixels }
    }

    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let pixels = Array3::from_shape_vec((height as usize, width as usize, 3), data)?;
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let (r, c) = (y as usize, x as usize);
        [
            self.pixels[[r, c, 0]],
            self.pixels[[r, c, 1]],
            self.pixels[[r, c, 2]],
        ]
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.pixels
    }
}

/// Single-channel luma raster, indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    pixels: Array2<u8>,
}

impl GrayImage {
    pub fn from_array(pixels: Array2<u8>) -> Self {
        Self { pixels }
    }

    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let pixels = Array2::from_shape_vec((height as usize, width as usize), data)?;
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[[y as usize, x as usize]]
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.pixels
    }

    /// Row-major samples.
    pub fn into_vec(self) -> Vec<u8> {
        if self.pixels.is_standard_layout() {
            self.pixels.into_raw_vec()
        } else {
            self.pixels.iter().copied().collect()
        }
    }
}

/// Two-level raster: every sample is either 0 or 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    pixels: Array2<u8>,
}

impl BinaryImage {
    /// Callers must only pass samples in {0, 255}.
    pub(crate) fn new_unchecked(pixels: Array2<u8>) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.pixels[[y as usize, x as usize]]
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.pixels
    }
}

/// The fixed black/white color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette([[u8; 3]; 2]);

impl Palette {
    pub const BLACK: [u8; 3] = [0, 0, 0];
    pub const WHITE: [u8; 3] = [255, 255, 255];
    pub const MONOCHROME: Palette = Palette([Self::BLACK, Self::WHITE]);

    pub fn entries(&self) -> &[[u8; 3]; 2] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// PLTE-style flat `r, g, b, r, g, b` bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.0.iter().flatten().copied().collect()
    }
}

/// Raster of palette indices, one byte per pixel, every index 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palette: Palette,
}

impl PaletteImage {
    pub(crate) fn new(width: u32, height: u32, indices: Vec<u8>, palette: Palette) -> Self {
        Self {
            width,
            height,
            indices,
            palette,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

/// Losslessly encoded indexed bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBitmap {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl EncodedBitmap {
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
