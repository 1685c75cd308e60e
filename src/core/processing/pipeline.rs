use fast_image_resize::Resizer;
use tracing::debug;

use crate::core::image::RawFrame;
use crate::core::params::PipelineConfig;
use crate::core::processing::budget::{SizeCheck, ValidatedBitmap, validate_size};
use crate::core::processing::color::yuv420_to_rgb;
use crate::core::processing::grayscale::rgb_to_gray;
use crate::core::processing::rate::RateLimiter;
use crate::core::processing::resize::resize_gray;
use crate::core::processing::rotate::rotate_rgb;
use crate::core::processing::threshold::{binarize, to_palette};
use crate::error::Result;
use crate::io::writers::bitmap::encode_palette_png;

/// What happened to a single frame offered to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Arrived inside the rate-limit interval.
    Dropped,
    /// Encoded, but the raw raster exceeds the display budget.
    Rejected { theoretical_bytes: usize, cap: usize },
    Accepted(ValidatedBitmap),
}

/// Frame-to-bitmap transform: rate limit, YUV to RGB, rotate, gray, resize,
/// threshold, palette, PNG encode and the size gate.
///
/// Owns the rate limiter and a reusable resizer, so one instance should be
/// driven by a single task.
pub struct FramePipeline {
    config: PipelineConfig,
    limiter: RateLimiter,
    resizer: Resizer,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            limiter: RateLimiter::new(config.interval()),
            config,
            resizer: Resizer::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Rate-limit `frame`, then render it if admitted.
    pub fn process(&mut self, frame: &RawFrame) -> Result<FrameOutcome> {
        if !self.limiter.admit(frame.timestamp()) {
            debug!(
                "Dropping frame at {:?}: inside {:?} interval",
                frame.timestamp(),
                self.limiter.interval()
            );
            return Ok(FrameOutcome::Dropped);
        }
        self.render(frame)
    }

    /// Run every transform stage on `frame`, bypassing the rate limiter.
    pub fn render(&mut self, frame: &RawFrame) -> Result<FrameOutcome> {
        let config = &self.config;
        let rgb = yuv420_to_rgb(frame)?;
        let rotated = rotate_rgb(rgb, config.rotation);
        let gray = rgb_to_gray(&rotated);
        let resized = resize_gray(
            &mut self.resizer,
            gray,
            config.target_width,
            config.target_height,
            config.resize_filter,
        )?;
        let binary = binarize(&resized, config.threshold);
        let indexed = to_palette(&binary);
        let encoded = encode_palette_png(&indexed)?;
        debug!(
            "Encoded {}x{} frame into {} bytes",
            encoded.width(),
            encoded.height(),
            encoded.len()
        );

        Ok(match validate_size(encoded, config.size_cap_bytes) {
            SizeCheck::Accepted(bitmap) => FrameOutcome::Accepted(bitmap),
            SizeCheck::Rejected {
                theoretical_bytes,
                cap,
            } => FrameOutcome::Rejected {
                theoretical_bytes,
                cap,
            },
        })
    }
}
