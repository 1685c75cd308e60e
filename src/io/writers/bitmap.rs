use std::io::Cursor;

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::core::image::{EncodedBitmap, PaletteImage};
use crate::error::{Error, Result};

/// Pack 0/1 indices into MSB-first 1-bit rows, each row padded to a byte.
fn pack_1bpp(indices: &[u8], cols: usize) -> Vec<u8> {
    let row_bytes = cols.div_ceil(8);
    let rows = if cols == 0 { 0 } else { indices.len() / cols };
    let mut packed = vec![0u8; row_bytes * rows];
    for (row, chunk) in indices.chunks_exact(cols).enumerate() {
        let out = &mut packed[row * row_bytes..(row + 1) * row_bytes];
        for (col, &index) in chunk.iter().enumerate() {
            if index != 0 {
                out[col / 8] |= 0x80 >> (col % 8);
            }
        }
    }
    packed
}

/// Encode a palette raster as an indexed 1-bit PNG with a 2-entry PLTE chunk.
pub fn encode_palette_png(image: &PaletteImage) -> Result<EncodedBitmap> {
    let packed = pack_1bpp(image.indices(), image.width() as usize);

    let mut bytes = Vec::new();
    {
        let mut encoder = Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::One);
        encoder.set_palette(image.palette().to_rgb_bytes());
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&packed)?;
        writer.finish()?;
    }

    Ok(EncodedBitmap::new(image.width(), image.height(), bytes))
}

/// Indexed raster read back from an encoded bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    pub width: u32,
    pub height: u32,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
    pub palette: Vec<[u8; 3]>,
}

/// Decode an indexed PNG without expanding the palette.
pub fn decode_palette_png(bytes: &[u8]) -> Result<DecodedBitmap> {
    let mut decoder = Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(Error::decode)?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(Error::decode)?;

    if frame.color_type != ColorType::Indexed {
        return Err(Error::Decode(format!(
            "expected an indexed PNG, got {:?}",
            frame.color_type
        )));
    }
    let bits = match frame.bit_depth {
        BitDepth::One => 1,
        BitDepth::Two => 2,
        BitDepth::Four => 4,
        BitDepth::Eight => 8,
        BitDepth::Sixteen => {
            return Err(Error::Decode("indexed PNG cannot be 16-bit".to_string()));
        }
    };

    let palette: Vec<[u8; 3]> = reader
        .info()
        .palette
        .as_ref()
        .ok_or_else(|| Error::Decode("indexed PNG has no PLTE chunk".to_string()))?
        .chunks_exact(3)
        .map(|rgb| [rgb[0], rgb[1], rgb[2]])
        .collect();

    let (width, height) = (frame.width as usize, frame.height as usize);
    let per_byte = 8 / bits;
    let mask = ((1u16 << bits) - 1) as u8;
    let mut indices = Vec::with_capacity(width * height);
    for row in buf[..frame.line_size * height].chunks_exact(frame.line_size) {
        for col in 0..width {
            let byte = row[col / per_byte];
            let shift = 8 - bits * (col % per_byte + 1);
            indices.push((byte >> shift) & mask);
        }
    }

    Ok(DecodedBitmap {
        width: frame.width,
        height: frame.height,
        indices,
        palette,
    })
}
