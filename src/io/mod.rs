//! I/O layer: frame sources feeding the session and `writers` for the
//! encoded bitmap and its diagnostic copy.
pub mod source;
pub use source::{ChannelFrameSource, FileFrameSource, FrameProducer, FrameSource};

pub mod writers;
