//! Test infrastructure for pcm-relay integration tests.
//!
//! Provides real FIFO fixtures, a producer-side pipe writer, and a harness
//! that runs the relay against an in-memory sink.

use byteorder::{LittleEndian, WriteBytesExt};
use pcm_relay::constants::{FRAME_BYTES, FRAME_SAMPLES};
use pcm_relay::relay::Relay;
use pcm_relay::sink::FrameSink;
use rand::RngCore;
use std::ffi::CString;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, DuplexStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Deadline for any single expectation against the output stream.
pub const STREAM_DEADLINE: Duration = Duration::from_secs(10);

/// Create a FIFO inside `dir` and return its path.
pub fn make_fifo(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let cpath = CString::new(path.as_os_str().as_bytes()).unwrap();

    let rc = unsafe { libc::mkfifo(cpath.as_ptr(), 0o644) };
    assert_eq!(rc, 0, "mkfifo({}) failed", path.display());

    path
}

/// Producer side of a FIFO.
///
/// Opened read-write so the open never blocks and the pipe keeps a writer
/// until the struct is dropped, mirroring a producer that is attached but
/// possibly idle.
pub struct PipeWriter {
    file: std::fs::File,
}

impl PipeWriter {
    pub fn attach(path: &Path) -> Self {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .expect("failed to open FIFO for writing");

        Self { file }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.file.write_all(bytes).expect("failed to write to FIFO");
    }
}

/// Relay under test: runs in a background task with its output captured
/// through an in-memory duplex stream.
pub struct RelayHarness {
    output: DuplexStream,
    shutdown: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

pub fn spawn_relay(path: PathBuf) -> RelayHarness {
    let (output, sink_end) = tokio::io::duplex(FRAME_BYTES * 256);
    let shutdown = CancellationToken::new();

    let token = shutdown.clone();
    let handle = tokio::spawn(async move {
        let mut relay = Relay::new(path, FrameSink::new(sink_end));
        relay.run(token).await
    });

    RelayHarness {
        output,
        shutdown,
        handle,
    }
}

impl RelayHarness {
    /// Read exactly `len` bytes of relay output.
    pub async fn read_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];

        tokio::time::timeout(STREAM_DEADLINE, self.output.read_exact(&mut buf))
            .await
            .expect("timed out waiting for relay output")
            .expect("relay output ended early");

        buf
    }

    /// Read `count` frames' worth of output, split at frame size.
    pub async fn read_frames(&mut self, count: usize) -> Vec<Vec<u8>> {
        let mut frames = Vec::with_capacity(count);
        for _ in 0..count {
            frames.push(self.read_bytes(FRAME_BYTES).await);
        }
        frames
    }

    /// Read frame-sized chunks until `payload` has appeared somewhere in
    /// the accumulated stream, up to `max_bytes`.
    pub async fn read_until_contains(&mut self, payload: &[u8], max_bytes: usize) -> Vec<u8> {
        let mut stream = Vec::new();

        while stream.len() < max_bytes {
            stream.extend(self.read_bytes(FRAME_BYTES).await);
            if find_subslice(&stream, payload).is_some() {
                return stream;
            }
        }

        panic!(
            "payload never appeared in {} bytes of relay output",
            stream.len()
        );
    }

    /// Request shutdown and wait for the relay task to finish.
    pub async fn stop(self) -> anyhow::Result<()> {
        self.shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("relay did not stop in time")
            .expect("relay task panicked")
    }
}

/// Position of the first occurrence of `needle` in `haystack`.
pub fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// One frame of s16le samples forming a ramp, non-zero at every sample.
pub fn ramp_frame() -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_BYTES);

    for i in 0..FRAME_SAMPLES {
        let value = (i % 1000) as i16 + 1;
        frame.write_i16::<LittleEndian>(value).unwrap();
        frame.write_i16::<LittleEndian>(-value).unwrap();
    }

    frame
}

/// One frame of random noise samples.
pub fn noise_frame() -> Vec<u8> {
    let mut frame = vec![0u8; FRAME_BYTES];
    rand::rng().fill_bytes(&mut frame);
    frame
}
