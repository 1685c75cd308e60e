//! Messages emitted to the external display link and the sinks that carry them.
//!
//! The link itself (pairing, reconnects, retries) lives outside this crate;
//! the session only ever emits a bitmap message per accepted frame and a
//! single teardown message on shutdown.
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::info;

use crate::core::processing::budget::ValidatedBitmap;
use crate::error::{Error, Result};

pub const OPCODE_TEARDOWN: u8 = 0x10;
pub const OPCODE_BITMAP: u8 = 0x20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayMessage {
    Bitmap(ValidatedBitmap),
    Teardown(u8),
}

impl DisplayMessage {
    pub fn opcode(&self) -> u8 {
        match self {
            DisplayMessage::Bitmap(_) => OPCODE_BITMAP,
            DisplayMessage::Teardown(_) => OPCODE_TEARDOWN,
        }
    }

    /// Wire form: opcode byte followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            DisplayMessage::Bitmap(bitmap) => {
                let mut out = Vec::with_capacity(bitmap.len() + 1);
                out.push(OPCODE_BITMAP);
                out.extend_from_slice(bitmap.bytes());
                out
            }
            DisplayMessage::Teardown(value) => vec![OPCODE_TEARDOWN, *value],
        }
    }
}

/// Async consumer of display messages.
#[allow(async_fn_in_trait)]
pub trait TransportSink {
    async fn send(&mut self, message: DisplayMessage) -> Result<()>;
}

/// Forwards messages to an in-process receiver.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<DisplayMessage>,
}

impl ChannelSink {
    pub fn channel(capacity: usize) -> (ChannelSink, mpsc::Receiver<DisplayMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (ChannelSink { tx }, rx)
    }
}

impl TransportSink for ChannelSink {
    async fn send(&mut self, message: DisplayMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| Error::Transport("display link receiver dropped".to_string()))
    }
}

/// Writes every bitmap to `frame_NNNNN.png` in an output directory.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
    teardown: Option<u8>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: 0,
            teardown: None,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn teardown(&self) -> Option<u8> {
        self.teardown
    }
}

impl TransportSink for DirectorySink {
    async fn send(&mut self, message: DisplayMessage) -> Result<()> {
        match message {
            DisplayMessage::Bitmap(bitmap) => {
                let path = self.dir.join(format!("frame_{:05}.png", self.written));
                tokio::fs::write(&path, bitmap.bytes()).await?;
                self.written += 1;
                info!("Wrote {} bytes to {:?}", bitmap.len(), path);
            }
            DisplayMessage::Teardown(value) => {
                info!(
                    "Teardown (opcode {:#04x}, value {}) after {} bitmaps",
                    OPCODE_TEARDOWN, value, self.written
                );
                self.teardown = Some(value);
            }
        }
        Ok(())
    }
}
