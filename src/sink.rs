//! Frame output towards the downstream consumer.

use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes one frame per relay cycle to the output stream.
///
/// Every frame is flushed before `emit` returns so the consumer sees it
/// before the next cycle starts; the consumer's real-time pacing depends on
/// wall-clock-spaced delivery, not on total throughput.
pub struct FrameSink<W> {
    out: W,
}

impl<W: AsyncWrite + Unpin> FrameSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write `frame` and flush it through to the consumer.
    pub async fn emit(&mut self, frame: &[u8]) -> io::Result<()> {
        self.out.write_all(frame).await?;
        self.out.flush().await
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
