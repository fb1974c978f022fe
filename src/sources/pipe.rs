//! Named pipe source, opened in non-blocking mode.

use super::{FrameRead, FrameSource};
use crate::constants::FRAME_BYTES;
use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::net::unix::pipe;

/// Read end of the producer's FIFO.
///
/// Opening never waits for a writer to appear and reads never block; the
/// relay polls readiness with a timeout instead.
pub struct PipeSource {
    rx: pipe::Receiver,
    buf: Vec<u8>,
}

impl PipeSource {
    /// Open `path` for reading without waiting for a writer.
    ///
    /// Fails with `NotFound` while the producer has not created the FIFO
    /// yet; the caller treats that as routine and retries.
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let rx = pipe::OpenOptions::new().open_receiver(path)?;
        debug!("Opened pipe in non-blocking mode: {}", path.display());

        Ok(Self {
            rx,
            buf: vec![0; FRAME_BYTES],
        })
    }
}

#[async_trait]
impl FrameSource for PipeSource {
    async fn read_frame(&mut self, timeout: Duration) -> io::Result<FrameRead> {
        match tokio::time::timeout(timeout, self.rx.readable()).await {
            // Budget elapsed with no data, the steady-state idle outcome
            Err(_) => Ok(FrameRead::Idle),
            Ok(Err(e)) => Err(e),
            Ok(Ok(())) => match self.rx.try_read(&mut self.buf) {
                // Zero-byte read: the writer count dropped to zero
                Ok(0) => Ok(FrameRead::Closed),
                Ok(n) => Ok(FrameRead::Audio(Bytes::copy_from_slice(&self.buf[..n]))),
                // Readiness can outrun the pipe under O_NONBLOCK; a raced
                // read counts as no data, not as a failure
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(FrameRead::Idle),
                Err(e) => Err(e),
            },
        }
    }
}
