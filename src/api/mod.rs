//! High-level library API: a capture `Session` that drives frames from a
//! `FrameSource` through the pipeline into a `TransportSink`, plus one-shot
//! helpers for rendering a single frame. Prefer these entrypoints over the
//! low-level processing modules when integrating MONOCAST.
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::core::image::RawFrame;
use crate::core::params::PipelineConfig;
use crate::core::processing::budget::ValidatedBitmap;
use crate::core::processing::pipeline::{FrameOutcome, FramePipeline};
use crate::error::Result;
use crate::io::source::FrameSource;
use crate::io::writers::diagnostic::DiagnosticPersister;
use crate::transport::{DisplayMessage, TransportSink};
use crate::types::SessionState;

/// Render one frame with `config`, ignoring the rate limiter.
pub fn render_frame(frame: &RawFrame, config: &PipelineConfig) -> Result<FrameOutcome> {
    FramePipeline::new(config.clone())?.render(frame)
}

/// Per-session frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Frames that passed the rate limiter
    pub admitted: usize,
    /// Frames discarded by the rate limiter
    pub dropped: usize,
    /// Admitted frames over the size budget
    pub rejected: usize,
    /// Bitmaps handed to the transport sink
    pub delivered: usize,
    /// Admitted frames lost to a processing or transport error
    pub failed: usize,
}

/// Control and observation side of a [`Session`].
#[derive(Debug)]
pub struct SessionHandle {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<SessionState>,
    preview_rx: watch::Receiver<Option<ValidatedBitmap>>,
}

impl SessionHandle {
    /// Ask the running session to stop. A frame already in flight is finished
    /// first.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Latest bitmap that passed the size gate.
    pub fn preview(&self) -> Option<ValidatedBitmap> {
        self.preview_rx.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub fn subscribe_preview(&self) -> watch::Receiver<Option<ValidatedBitmap>> {
        self.preview_rx.clone()
    }

    /// Wait until the session reaches `state`. Returns false if the session
    /// was dropped first.
    pub async fn wait_for_state(&mut self, state: SessionState) -> bool {
        self.state_rx.wait_for(|s| *s == state).await.is_ok()
    }
}

/// Drives frames from a source through the pipeline into a display sink.
///
/// The session is the single owner of the rate limiter and the preview, so
/// frames are processed strictly one at a time.
pub struct Session<S, T> {
    config: PipelineConfig,
    source: S,
    sink: T,
    diagnostics: Option<DiagnosticPersister>,
    stop_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<SessionState>,
    preview_tx: watch::Sender<Option<ValidatedBitmap>>,
    report: SessionReport,
}

impl<S: FrameSource, T: TransportSink> Session<S, T> {
    pub fn new(config: PipelineConfig, source: S, sink: T) -> (Self, SessionHandle) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let (preview_tx, preview_rx) = watch::channel(None);
        let session = Self {
            config,
            source,
            sink,
            diagnostics: None,
            stop_rx,
            state_tx,
            preview_tx,
            report: SessionReport::default(),
        };
        let handle = SessionHandle {
            stop_tx,
            state_rx,
            preview_rx,
        };
        (session, handle)
    }

    /// Persist accepted bitmaps through `persister` instead of a fresh temp dir.
    pub fn with_diagnostics(mut self, persister: DiagnosticPersister) -> Self {
        self.diagnostics = Some(persister);
        self
    }

    pub fn state(&self) -> SessionState {
        *self.state_tx.borrow()
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn diagnostics(&self) -> Option<&DiagnosticPersister> {
        self.diagnostics.as_ref()
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state_tx.send_replace(state);
        debug!("Session state {} -> {}", previous, state);
    }

    /// Run until the source ends or a stop is requested.
    ///
    /// A source that fails to start is fatal: the error is returned and the
    /// session goes back to `Idle` without processing anything. Once running,
    /// per-frame failures are logged and the frame dropped. The teardown
    /// message is sent exactly once on the way out.
    ///
    /// A session can be run again after it returns. Only a stop requested
    /// while a run is in progress ends that run.
    pub async fn run(&mut self) -> Result<SessionReport> {
        self.report = SessionReport::default();
        self.set_state(SessionState::Initializing);
        // A stop that ended an earlier run does not carry over
        self.stop_rx.borrow_and_update();

        let mut pipeline = match FramePipeline::new(self.config.clone()) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                self.set_state(SessionState::Idle);
                return Err(e);
            }
        };
        if let Err(e) = self.source.start().await {
            error!("Frame source failed to start: {}", e);
            self.set_state(SessionState::Idle);
            return Err(e);
        }
        if self.config.diagnostics && self.diagnostics.is_none() {
            match DiagnosticPersister::new() {
                Ok(persister) => {
                    info!("Diagnostic bitmaps go to {:?}", persister.path());
                    self.diagnostics = Some(persister);
                }
                Err(e) => warn!("Diagnostics disabled, cannot create temp dir: {}", e),
            }
        }

        self.set_state(SessionState::Running);
        info!(
            "Session running: {}x{} target, {} rotation, one frame per {} ms",
            self.config.target_width,
            self.config.target_height,
            self.config.rotation,
            self.config.interval_ms
        );

        let mut stop_open = true;
        loop {
            // Stop is only observed between frames
            let next = tokio::select! {
                biased;
                changed = self.stop_rx.changed(), if stop_open => {
                    if changed.is_ok() {
                        info!("Stop requested");
                        break;
                    }
                    stop_open = false;
                    continue;
                }
                frame = self.source.next_frame() => frame,
            };
            let Some(frame) = next else {
                info!("Frame stream ended");
                break;
            };
            self.handle_frame(&mut pipeline, frame).await;
        }

        self.set_state(SessionState::Stopping);
        let teardown = DisplayMessage::Teardown(self.config.teardown_value);
        if let Err(e) = self.sink.send(teardown).await {
            warn!("Failed to send teardown message: {}", e);
        }
        self.set_state(SessionState::Idle);

        let report = self.report;
        info!(
            "Session stopped: admitted={} dropped={} rejected={} delivered={} failed={}",
            report.admitted, report.dropped, report.rejected, report.delivered, report.failed
        );
        Ok(report)
    }

    async fn handle_frame(&mut self, pipeline: &mut FramePipeline, frame: RawFrame) {
        let timestamp = frame.timestamp();
        let (width, height) = (frame.width(), frame.height());
        let outcome = pipeline.process(&frame);
        drop(frame);

        match outcome {
            Ok(FrameOutcome::Dropped) => self.report.dropped += 1,
            Ok(FrameOutcome::Rejected { .. }) => {
                self.report.admitted += 1;
                self.report.rejected += 1;
            }
            Ok(FrameOutcome::Accepted(bitmap)) => {
                self.report.admitted += 1;
                self.deliver(bitmap, timestamp).await;
            }
            Err(e) => {
                self.report.admitted += 1;
                self.report.failed += 1;
                error!(
                    "Dropping {}x{} frame at {:?}: {}",
                    width, height, timestamp, e
                );
            }
        }
    }

    async fn deliver(&mut self, bitmap: ValidatedBitmap, timestamp: Duration) {
        self.preview_tx.send_replace(Some(bitmap.clone()));

        if let Some(diagnostics) = &self.diagnostics {
            if let Err(e) = diagnostics.persist(&bitmap).await {
                warn!("Diagnostic write to {:?} failed: {}", diagnostics.path(), e);
            }
        }

        let size = bitmap.len();
        match self.sink.send(DisplayMessage::Bitmap(bitmap)).await {
            Ok(()) => {
                self.report.delivered += 1;
                info!("Delivered {}-byte bitmap for frame at {:?}", size, timestamp);
            }
            Err(e) => {
                self.report.failed += 1;
                error!("Failed to deliver frame at {:?}: {}", timestamp, e);
            }
        }
    }
}
