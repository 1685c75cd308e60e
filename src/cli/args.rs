use clap::Parser;
use std::path::PathBuf;

use monocast::{ResizeFilter, Rotation};

#[derive(Parser)]
#[command(name = "monocast", version, about = "MONOCAST CLI")]
pub struct CliArgs {
    /// Directory of raw NV12 frame dumps (*.yuv, *.nv12), replayed in name order
    #[arg(short, long)]
    pub input_dir: PathBuf,

    /// Directory receiving one PNG per delivered frame
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Width of the raw frames in pixels
    #[arg(long)]
    pub width: u32,

    /// Height of the raw frames in pixels
    #[arg(long)]
    pub height: u32,

    /// JSON pipeline config; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Capture spacing between consecutive dumps, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub frame_spacing_ms: u64,

    /// Minimum spacing between admitted frames, in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Clockwise rotation correcting the sensor mounting (0, 90, 180, 270)
    #[arg(long, value_enum)]
    pub rotation: Option<Rotation>,

    /// Square display raster side in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Luma threshold; brighter samples become white
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Resampling filter used for resizing
    #[arg(long, value_enum)]
    pub filter: Option<ResizeFilter>,

    /// Keep the latest accepted bitmap in a scoped temp directory
    #[arg(long, default_value_t = false)]
    pub diagnostics: bool,

    /// Enable logging (RUST_LOG overrides the default debug level)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
