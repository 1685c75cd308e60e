#![doc = r#"
MONOCAST — camera frames to 1-bit bitmaps for constrained displays.

This crate turns a live stream of YUV420 sensor frames into tiny monochrome,
palette-indexed PNG bitmaps that fit the memory and bandwidth budget of an
external display. It powers the MONOCAST CLI and can be embedded in your own
capture application.

Pipeline
--------
Every frame offered to a session goes through, in order:

1. rate limiting (one frame per interval, default 4 s; extras are dropped),
2. YUV420 semi-planar to RGB (BT.601),
3. rotation for the sensor mounting (default 270° clockwise),
4. BT.601 luma reduction,
5. resizing to the display raster (default 280x280, bilinear),
6. binarization (luma above 128 is white),
7. mapping onto a 2-entry black/white palette,
8. lossless indexed PNG encoding (1 bit per pixel),
9. a hard budget on the theoretical raw size (default 25,000 bytes).

Accepted bitmaps are published as the preview, optionally written to a
scoped diagnostic file and sent to the display transport.

Quick start: render a single frame
----------------------------------
```rust
use std::time::Duration;
use monocast::{render_frame, FrameOutcome, PipelineConfig, RawFrame};

fn main() -> monocast::Result<()> {
    let frame = RawFrame::uniform(64, 48, 200, 128, 128, Duration::ZERO);
    match render_frame(&frame, &PipelineConfig::default())? {
        FrameOutcome::Accepted(bitmap) => println!("{} bytes", bitmap.len()),
        other => println!("not delivered: {other:?}"),
    }
    Ok(())
}
```

Run a session
-------------
```rust,no_run
use std::time::Duration;
use monocast::{ChannelFrameSource, ChannelSink, PipelineConfig, RawFrame, Session};

async fn capture() -> monocast::Result<()> {
    let (producer, source) = ChannelFrameSource::channel(4);
    let (sink, mut display) = ChannelSink::channel(4);
    let (mut session, handle) = Session::new(PipelineConfig::default(), source, sink);

    // Camera callback side
    producer.push(RawFrame::uniform(640, 480, 90, 128, 128, Duration::ZERO));
    drop(producer);

    let report = session.run().await?;
    while let Ok(message) = display.try_recv() {
        println!("opcode {:#04x}", message.opcode());
    }
    println!("delivered={} state={}", report.delivered, handle.state());
    Ok(())
}
```

Error handling
--------------
All fallible functions return `monocast::Result<T>`. Inside a running session
per-frame errors are logged and the frame dropped; only a source that fails
to start surfaces from `Session::run`.

Useful modules
--------------
- [`api`] — the capture session and one-shot helpers.
- [`core`] — raster containers, per-stage transforms and `PipelineConfig`.
- [`io`] — frame sources, the PNG bitmap codec and the diagnostic persister.
- [`transport`] — display messages and sinks.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod transport;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::image::{
    BinaryImage, EncodedBitmap, GrayImage, Palette, PaletteImage, Plane, RawFrame, RgbImage,
};
pub use crate::core::params::PipelineConfig;
pub use crate::core::processing::budget::ValidatedBitmap;
pub use crate::core::processing::pipeline::{FrameOutcome, FramePipeline};
pub use crate::core::processing::rate::RateLimiter;
pub use error::{Error, Result};
pub use types::{PixelFormat, ResizeFilter, Rotation, SessionState};

// Sources, writers and sinks
pub use io::source::{ChannelFrameSource, FileFrameSource, FrameProducer, FrameSource};
pub use io::writers::{DecodedBitmap, DiagnosticPersister, decode_palette_png, encode_palette_png};
pub use transport::{ChannelSink, DirectorySink, DisplayMessage, TransportSink};

// High-level API re-exports
pub use api::{Session, SessionHandle, SessionReport, render_frame};
