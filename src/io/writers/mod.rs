//! Output writers: the indexed PNG bitmap codec and the diagnostic persister.
pub mod bitmap;
pub mod diagnostic;

pub use bitmap::{DecodedBitmap, decode_palette_png, encode_palette_png};
pub use diagnostic::{DIAGNOSTIC_FILE_NAME, DiagnosticPersister};
