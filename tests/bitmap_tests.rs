use monocast::core::processing::threshold::{binarize, to_palette};
use monocast::{GrayImage, decode_palette_png, encode_palette_png};

fn checkerboard(width: u32, height: u32) -> GrayImage {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { 255 } else { 0 }))
        .collect();
    GrayImage::from_vec(width, height, data).unwrap()
}

#[test]
fn indexed_png_round_trips_indices_and_palette() {
    // 13 columns: rows do not end on a byte boundary
    let indexed = to_palette(&binarize(&checkerboard(13, 7), 128));
    let encoded = encode_palette_png(&indexed).unwrap();
    assert_eq!((encoded.width(), encoded.height()), (13, 7));
    assert_eq!(&encoded.bytes()[1..4], b"PNG");

    let decoded = decode_palette_png(encoded.bytes()).unwrap();
    assert_eq!((decoded.width, decoded.height), (13, 7));
    assert_eq!(decoded.indices, indexed.indices());
    assert_eq!(decoded.palette, vec![[0, 0, 0], [255, 255, 255]]);
}

#[test]
fn display_raster_compresses_well_below_raw_budget() {
    let indexed = to_palette(&binarize(&checkerboard(280, 280), 128));
    let encoded = encode_palette_png(&indexed).unwrap();
    // A regular pattern deflates far below the 9,800 raw bytes
    assert!(encoded.len() < 9_800, "encoded {} bytes", encoded.len());
    let decoded = decode_palette_png(encoded.bytes()).unwrap();
    assert_eq!(decoded.indices.len(), 280 * 280);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_palette_png(b"not a png at all").unwrap_err();
    assert!(matches!(err, monocast::Error::Decode(_)));
}
