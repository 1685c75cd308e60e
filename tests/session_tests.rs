use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use monocast::transport::{OPCODE_BITMAP, OPCODE_TEARDOWN};
use monocast::{
    ChannelFrameSource, ChannelSink, DiagnosticPersister, DirectorySink, DisplayMessage, Error,
    FileFrameSource, FrameSource, PipelineConfig, RawFrame, Session, SessionState, TransportSink,
    decode_palette_png,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn bright(t: u64) -> RawFrame {
    RawFrame::uniform(8, 6, 200, 128, 128, ms(t))
}

struct FailingSource;

impl FrameSource for FailingSource {
    async fn start(&mut self) -> monocast::Result<()> {
        Err(Error::SourceInit("camera unavailable".to_string()))
    }

    async fn next_frame(&mut self) -> Option<RawFrame> {
        None
    }
}

/// Parks inside every bitmap send until released.
struct ParkingSink {
    entered: Arc<Notify>,
    release: Arc<Notify>,
    opcodes: Vec<u8>,
}

impl TransportSink for ParkingSink {
    async fn send(&mut self, message: DisplayMessage) -> monocast::Result<()> {
        if let DisplayMessage::Bitmap(_) = message {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.opcodes.push(message.opcode());
        Ok(())
    }
}

struct BrokenLink;

impl TransportSink for BrokenLink {
    async fn send(&mut self, _message: DisplayMessage) -> monocast::Result<()> {
        Err(Error::Transport("link down".to_string()))
    }
}

#[tokio::test]
async fn delivers_rate_limited_frames_then_tears_down() {
    let (producer, source) = ChannelFrameSource::channel(16);
    let (sink, mut display) = ChannelSink::channel(16);
    let (mut session, handle) = Session::new(PipelineConfig::default(), source, sink);

    for t in [0, 1000, 3999, 4001, 6000, 8001] {
        producer.send(bright(t)).await.unwrap();
    }
    drop(producer);

    let report = session.run().await.unwrap();
    assert_eq!(report.admitted, 3);
    assert_eq!(report.dropped, 3);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(handle.state(), SessionState::Idle);

    let mut opcodes = Vec::new();
    while let Ok(message) = display.try_recv() {
        opcodes.push(message.opcode());
    }
    assert_eq!(
        opcodes,
        vec![OPCODE_BITMAP, OPCODE_BITMAP, OPCODE_BITMAP, OPCODE_TEARDOWN]
    );

    let preview = handle.preview().expect("preview after delivery");
    let decoded = decode_palette_png(preview.bytes()).unwrap();
    assert!(decoded.indices.iter().all(|&i| i == 1));
}

#[tokio::test]
async fn malformed_frame_does_not_stop_the_session() {
    let (producer, source) = ChannelFrameSource::channel(4);
    let (sink, mut display) = ChannelSink::channel(4);
    let (mut session, _handle) = Session::new(PipelineConfig::default(), source, sink);

    let broken = RawFrame::new(
        8,
        8,
        [
            monocast::Plane::new(vec![0; 4], 8, 1),
            monocast::Plane::new(vec![0; 16], 4, 1),
            monocast::Plane::new(vec![0; 16], 4, 1),
        ],
        ms(0),
    );
    producer.send(broken).await.unwrap();
    producer.send(bright(5000)).await.unwrap();
    drop(producer);

    let report = session.run().await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 1);

    assert!(matches!(display.recv().await, Some(DisplayMessage::Bitmap(_))));
    assert_eq!(display.recv().await, Some(DisplayMessage::Teardown(0)));
}

#[tokio::test]
async fn oversized_frames_are_rejected_without_side_effects() {
    let (producer, source) = ChannelFrameSource::channel(4);
    let (sink, mut display) = ChannelSink::channel(4);
    let config = PipelineConfig {
        target_width: 1000,
        target_height: 1000,
        teardown_value: 7,
        ..PipelineConfig::default()
    };
    let (mut session, handle) = Session::new(config, source, sink);

    producer.send(bright(0)).await.unwrap();
    drop(producer);

    let report = session.run().await.unwrap();
    assert_eq!(report.admitted, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(report.delivered, 0);
    assert!(handle.preview().is_none());
    assert_eq!(display.recv().await, Some(DisplayMessage::Teardown(7)));
}

#[tokio::test]
async fn source_start_failure_is_fatal() {
    let (sink, mut display) = ChannelSink::channel(4);
    let (mut session, handle) = Session::new(PipelineConfig::default(), FailingSource, sink);

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, Error::SourceInit(_)));
    assert_eq!(handle.state(), SessionState::Idle);
    // Never reached Running, so nothing is torn down
    assert!(display.try_recv().is_err());
}

#[tokio::test]
async fn transport_failure_counts_frame_as_failed() {
    let (producer, source) = ChannelFrameSource::channel(4);
    let (mut session, _handle) = Session::new(PipelineConfig::default(), source, BrokenLink);

    producer.send(bright(0)).await.unwrap();
    producer.send(bright(4000)).await.unwrap();
    drop(producer);

    let report = session.run().await.unwrap();
    assert_eq!(report.admitted, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.delivered, 0);
}

#[tokio::test]
async fn stop_finishes_in_flight_frame_first() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let sink = ParkingSink {
        entered: entered.clone(),
        release: release.clone(),
        opcodes: Vec::new(),
    };
    let (producer, source) = ChannelFrameSource::channel(4);
    let (mut session, handle) = Session::new(PipelineConfig::default(), source, sink);

    // The second frame is queued but must never be processed
    producer.send(bright(0)).await.unwrap();
    producer.send(bright(4000)).await.unwrap();

    let control = async {
        entered.notified().await;
        handle.stop();
        release.notify_one();
    };

    let (report, ()) = tokio::join!(session.run(), control);
    let report = report.unwrap();
    assert_eq!(report.admitted, 1);
    assert_eq!(report.delivered, 1);
    assert_eq!(session.sink().opcodes, vec![OPCODE_BITMAP, OPCODE_TEARDOWN]);
    assert_eq!(handle.state(), SessionState::Idle);
    drop(producer);
}

#[tokio::test]
async fn stopped_session_can_run_again() {
    let (producer, source) = ChannelFrameSource::channel(4);
    let (sink, mut display) = ChannelSink::channel(8);
    let (mut session, mut handle) = Session::new(PipelineConfig::default(), source, sink);
    let mut states = handle.subscribe_state();

    let control = async {
        states
            .wait_for(|s| *s == SessionState::Running)
            .await
            .unwrap();
        handle.stop();
    };
    let (first, ()) = tokio::join!(session.run(), control);
    assert_eq!(first.unwrap().admitted, 0);
    assert_eq!(display.recv().await, Some(DisplayMessage::Teardown(0)));

    producer.send(bright(0)).await.unwrap();
    drop(producer);
    let second = session.run().await.unwrap();
    assert_eq!(second.delivered, 1);
    assert!(matches!(display.recv().await, Some(DisplayMessage::Bitmap(_))));
    assert_eq!(display.recv().await, Some(DisplayMessage::Teardown(0)));
    assert!(handle.wait_for_state(SessionState::Idle).await);
}

#[tokio::test]
async fn diagnostics_keep_latest_accepted_bitmap() {
    let scratch = tempfile::tempdir().unwrap();
    let persister = DiagnosticPersister::new_in(scratch.path()).unwrap();
    let path = persister.path().to_path_buf();

    let (producer, source) = ChannelFrameSource::channel(4);
    let (sink, _display) = ChannelSink::channel(4);
    let (session, handle) = Session::new(PipelineConfig::default(), source, sink);
    let mut session = session.with_diagnostics(persister);
    let previews = handle.subscribe_preview();

    producer.send(bright(0)).await.unwrap();
    drop(producer);
    session.run().await.unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    let latest = previews.borrow().clone().expect("preview after delivery");
    assert_eq!(on_disk, latest.bytes());
    assert!(session.diagnostics().is_some());
}

#[tokio::test]
async fn diagnostic_write_failure_does_not_block_delivery() {
    let scratch = tempfile::tempdir().unwrap();
    let persister = DiagnosticPersister::new_in(scratch.path()).unwrap();
    // Writes into a directory that no longer exists fail
    std::fs::remove_dir_all(persister.dir()).unwrap();

    let (producer, source) = ChannelFrameSource::channel(4);
    let (sink, mut display) = ChannelSink::channel(4);
    let (session, _handle) = Session::new(PipelineConfig::default(), source, sink);
    let mut session = session.with_diagnostics(persister);

    producer.send(bright(0)).await.unwrap();
    drop(producer);
    let report = session.run().await.unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 0);
    assert!(matches!(display.recv().await, Some(DisplayMessage::Bitmap(_))));
    assert_eq!(display.recv().await, Some(DisplayMessage::Teardown(0)));
}

#[tokio::test]
async fn directory_sink_writes_numbered_bitmaps() {
    let out = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(out.path().join("frames")).unwrap();
    let config = PipelineConfig {
        teardown_value: 3,
        ..PipelineConfig::default()
    };
    let (producer, source) = ChannelFrameSource::channel(4);
    let (mut session, _handle) = Session::new(config, source, sink);

    producer.send(bright(0)).await.unwrap();
    producer.send(bright(4000)).await.unwrap();
    drop(producer);
    let report = session.run().await.unwrap();
    assert_eq!(report.delivered, 2);

    let sink = session.sink();
    assert_eq!(sink.written(), 2);
    assert_eq!(sink.teardown(), Some(3));
    for name in ["frame_00000.png", "frame_00001.png"] {
        let bytes = std::fs::read(sink.dir().join(name)).unwrap();
        let decoded = decode_palette_png(&bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (280, 280));
        assert!(decoded.indices.iter().all(|&i| i == 1));
    }
    assert!(!sink.dir().join("frame_00002.png").exists());
}

#[tokio::test]
async fn file_source_requires_frames() {
    let empty = tempfile::tempdir().unwrap();
    let mut source = FileFrameSource::new(empty.path(), 4, 4, ms(1000));
    assert!(matches!(source.start().await, Err(Error::SourceInit(_))));

    let mut missing = FileFrameSource::new(empty.path().join("nope"), 4, 4, ms(1000));
    assert!(matches!(missing.start().await, Err(Error::SourceInit(_))));
}

#[tokio::test]
async fn file_source_replays_dumps_in_order() {
    let dir = tempfile::tempdir().unwrap();
    // 4x4 NV12: 16 luma bytes + 8 interleaved chroma bytes
    for (name, luma) in [("b.yuv", 40u8), ("a.nv12", 200u8)] {
        let mut data = vec![luma; 16];
        data.extend_from_slice(&[128; 8]);
        std::fs::write(dir.path().join(name), data).unwrap();
    }
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let mut source = FileFrameSource::new(dir.path(), 4, 4, ms(2500));
    source.start().await.unwrap();
    assert_eq!(source.remaining(), 2);

    let first = source.next_frame().await.unwrap();
    assert_eq!(first.y_plane().bytes[0], 200);
    assert_eq!(first.timestamp(), ms(0));
    let second = source.next_frame().await.unwrap();
    assert_eq!(second.y_plane().bytes[0], 40);
    assert_eq!(second.timestamp(), ms(2500));
    assert!(source.next_frame().await.is_none());
}
