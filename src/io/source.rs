//! Frame sources feeding a capture session.
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::image::RawFrame;
use crate::error::{Error, Result};

/// Async producer of raw frames.
///
/// `start` brings the source up; a failure there is fatal to the session.
/// `next_frame` yields frames until the stream ends with `None`.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    async fn start(&mut self) -> Result<()> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<RawFrame>;
}

/// Producer half of a [`ChannelFrameSource`].
#[derive(Debug, Clone)]
pub struct FrameProducer {
    tx: mpsc::Sender<RawFrame>,
}

impl FrameProducer {
    /// Hand a frame over without waiting. Returns false if the consumer is
    /// busy or gone; the frame is then discarded.
    pub fn push(&self, frame: RawFrame) -> bool {
        self.tx.try_send(frame).is_ok()
    }

    /// Hand a frame over, waiting for room in the channel.
    pub async fn send(&self, frame: RawFrame) -> Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| Error::FrameChannelClosed)
    }
}

/// Frames pushed by an external producer, e.g. a camera callback.
#[derive(Debug)]
pub struct ChannelFrameSource {
    rx: mpsc::Receiver<RawFrame>,
}

impl ChannelFrameSource {
    pub fn channel(capacity: usize) -> (FrameProducer, ChannelFrameSource) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (FrameProducer { tx }, ChannelFrameSource { rx })
    }
}

impl FrameSource for ChannelFrameSource {
    async fn next_frame(&mut self) -> Option<RawFrame> {
        self.rx.recv().await
    }
}

fn is_raw_dump(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yuv") || ext.eq_ignore_ascii_case("nv12"))
}

/// Replays NV12 dumps (`*.yuv`, `*.nv12`) from a directory in name order.
///
/// Frame `n` is stamped `n * spacing`, so the rate limiter sees the same
/// timeline a live camera at that spacing would produce.
#[derive(Debug)]
pub struct FileFrameSource {
    dir: PathBuf,
    width: u32,
    height: u32,
    spacing: Duration,
    pending: VecDeque<PathBuf>,
    index: u32,
}

impl FileFrameSource {
    pub fn new(dir: impl Into<PathBuf>, width: u32, height: u32, spacing: Duration) -> Self {
        Self {
            dir: dir.into(),
            width,
            height,
            spacing,
            pending: VecDeque::new(),
            index: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for FileFrameSource {
    async fn start(&mut self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::SourceInit(format!(
                "frame size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::SourceInit(format!("cannot read {:?}: {}", self.dir, e)))?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_raw_dump(&path) {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(Error::SourceInit(format!(
                "no .yuv or .nv12 frames in {:?}",
                self.dir
            )));
        }
        files.sort();

        info!("Replaying {} frames from {:?}", files.len(), self.dir);
        self.pending = files.into();
        self.index = 0;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<RawFrame> {
        while let Some(path) = self.pending.pop_front() {
            let timestamp = self.spacing * self.index;
            self.index += 1;
            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    warn!("Skipping unreadable frame {:?}: {}", path, e);
                    continue;
                }
            };
            match RawFrame::from_nv12(self.width, self.height, &data, timestamp) {
                Ok(frame) => return Some(frame),
                Err(e) => warn!("Skipping frame {:?}: {}", path, e),
            }
        }
        None
    }
}
