use tracing::warn;

use crate::core::image::EncodedBitmap;

/// Two palette entries need one bit per pixel.
pub const BITS_PER_PIXEL: usize = 1;

/// Uncompressed size of a `width` x `height` raster at `bits_per_pixel`,
/// rounded up to whole bytes.
pub fn theoretical_size_bytes(width: u32, height: u32, bits_per_pixel: usize) -> usize {
    (width as usize * height as usize * bits_per_pixel).div_ceil(8)
}

/// An encoded bitmap that fits the receiving display's raw-size budget.
///
/// Only [`validate_size`] constructs one, so holding a `ValidatedBitmap` is
/// proof the frame passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBitmap(EncodedBitmap);

impl ValidatedBitmap {
    pub fn bitmap(&self) -> &EncodedBitmap {
        &self.0
    }

    pub fn bytes(&self) -> &[u8] {
        self.0.bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeCheck {
    Accepted(ValidatedBitmap),
    Rejected { theoretical_bytes: usize, cap: usize },
}

/// Gate on the theoretical 1bpp size, independent of the encoded byte count.
pub fn validate_size(bitmap: EncodedBitmap, cap: usize) -> SizeCheck {
    let theoretical_bytes =
        theoretical_size_bytes(bitmap.width(), bitmap.height(), BITS_PER_PIXEL);
    if theoretical_bytes > cap {
        warn!(
            "Rejecting {}x{} bitmap: {} bytes at {}bpp exceeds cap of {} bytes",
            bitmap.width(),
            bitmap.height(),
            theoretical_bytes,
            BITS_PER_PIXEL,
            cap
        );
        return SizeCheck::Rejected {
            theoretical_bytes,
            cap,
        };
    }
    SizeCheck::Accepted(ValidatedBitmap(bitmap))
}
