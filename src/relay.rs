//! The continuity-guaranteeing relay loop.
//!
//! Drives pipe acquisition, bounded reads and frame emission in a single
//! control loop. Whatever the upstream producer does, exactly one frame
//! (real audio or silence) leaves the sink per cycle, so the downstream
//! consumer never observes a stream interruption.

use crate::constants::{
    AUDIO_LOG_INTERVAL, BRIDGE_FRAMES, FRAME_DURATION, READ_TIMEOUT, SILENCE_LOG_INTERVAL,
};
use crate::frame::silent_frame;
use crate::sink::FrameSink;
use crate::sources::pipe::PipeSource;
use crate::sources::{FrameRead, FrameSource};
use anyhow::Result;
use std::io;
use std::path::PathBuf;
use tokio::io::AsyncWrite;
use tokio_util::sync::CancellationToken;

/// Where the relay currently is in the pipe lifecycle.
enum State {
    /// No pipe handle, trying to open one.
    Acquiring,
    /// Pipe open, forwarding audio and substituting silence.
    Streaming(PipeSource),
    /// Pipe lost, emitting a fixed burst of silence before reopening.
    Bridging,
}

/// Outcome of one streaming cycle.
#[derive(Debug, PartialEq)]
pub enum Pumped {
    /// A frame went out, keep reading from the same source.
    Continue,
    /// The source is gone or broken; close it and bridge.
    Disconnected,
}

/// Relays PCM frames from a named pipe to the sink, bridging every upstream
/// failure with silence.
pub struct Relay<W> {
    path: PathBuf,
    sink: FrameSink<W>,
    audio_streak: u64,
    silent_streak: u64,
}

impl<W: AsyncWrite + Unpin> Relay<W> {
    pub fn new(path: PathBuf, sink: FrameSink<W>) -> Self {
        Self {
            path,
            sink,
            audio_streak: 0,
            silent_streak: 0,
        }
    }

    /// Current run of consecutive forwarded audio frames.
    pub fn audio_streak(&self) -> u64 {
        self.audio_streak
    }

    /// Current run of consecutive substituted silent frames.
    pub fn silent_streak(&self) -> u64 {
        self.silent_streak
    }

    /// Consume the relay and return its sink.
    pub fn into_sink(self) -> FrameSink<W> {
        self.sink
    }

    /// Run until `shutdown` is cancelled or the downstream consumer goes
    /// away. Upstream failures never end the loop.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<()> {
        let mut state = State::Acquiring;

        loop {
            let step = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Interrupted, closing pipe and stopping");
                    return Ok(());
                }
                step = self.step(state) => step,
            };

            state = match step {
                Ok(next) => next,
                Err(e) if is_broken_pipe(&e) => {
                    info!("Output consumer closed the stream, stopping");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };
        }
    }

    /// Advance the state machine by one transition.
    async fn step(&mut self, state: State) -> Result<State> {
        match state {
            State::Acquiring => self.acquire().await,
            State::Streaming(mut source) => match self.pump(&mut source).await? {
                Pumped::Continue => Ok(State::Streaming(source)),
                // Dropping the source closes the stale handle
                Pumped::Disconnected => Ok(State::Bridging),
            },
            State::Bridging => {
                self.bridge().await?;
                Ok(State::Acquiring)
            }
        }
    }

    /// Try to open the pipe. Failure is routine: emit a bridging burst of
    /// silence and stay in acquisition.
    async fn acquire(&mut self) -> Result<State> {
        debug!("Trying to open pipe: {}", self.path.display());

        match PipeSource::acquire(&self.path) {
            Ok(source) => {
                info!("Pipe opened, starting to read: {}", self.path.display());
                Ok(State::Streaming(source))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(
                    "Pipe not found: {}, streaming silence while waiting",
                    self.path.display()
                );
                self.bridge().await?;
                Ok(State::Acquiring)
            }
            Err(e) => {
                warn!(
                    "Failed to open pipe {}: {e}, retrying after silence",
                    self.path.display()
                );
                self.bridge().await?;
                Ok(State::Acquiring)
            }
        }
    }

    /// One streaming cycle: a bounded read followed by exactly one emitted
    /// frame, real if the pipe delivered data and silent otherwise.
    pub async fn pump<S: FrameSource>(&mut self, source: &mut S) -> Result<Pumped> {
        match source.read_frame(READ_TIMEOUT).await {
            Ok(FrameRead::Audio(data)) => {
                self.sink.emit(&data).await?;

                if self.silent_streak > 0 {
                    info!(
                        "Audio resumed after {} silent frames ({:.1}s)",
                        self.silent_streak,
                        streak_secs(self.silent_streak)
                    );
                }
                self.silent_streak = 0;
                self.audio_streak += 1;

                if self.audio_streak % AUDIO_LOG_INTERVAL == 0 {
                    info!("Streaming audio... ({:.1}s)", streak_secs(self.audio_streak));
                }

                Ok(Pumped::Continue)
            }
            Ok(FrameRead::Idle) => {
                self.sink.emit(&silent_frame()).await?;

                if self.audio_streak > 0 {
                    info!(
                        "No audio data, streaming silence (was active for {:.1}s)",
                        streak_secs(self.audio_streak)
                    );
                }
                self.audio_streak = 0;
                self.silent_streak += 1;

                if self.silent_streak % SILENCE_LOG_INTERVAL == 1 {
                    info!(
                        "Streaming silence... ({:.1}s)",
                        streak_secs(self.silent_streak)
                    );
                }

                Ok(Pumped::Continue)
            }
            Ok(FrameRead::Closed) => {
                info!("Writer closed the pipe, reconnecting");
                Ok(Pumped::Disconnected)
            }
            Err(e) => {
                warn!("Pipe error: {e}, reconnecting");
                Ok(Pumped::Disconnected)
            }
        }
    }

    /// Emit a fixed burst of silent frames at the output cadence, bridging
    /// the gap while no pipe is connected. Streaks do not span a bridge.
    pub async fn bridge(&mut self) -> Result<()> {
        self.audio_streak = 0;
        self.silent_streak = 0;

        debug!("Bridging output with {BRIDGE_FRAMES} silent frames");

        for _ in 0..BRIDGE_FRAMES {
            self.sink.emit(&silent_frame()).await?;
            tokio::time::sleep(FRAME_DURATION).await;
        }

        Ok(())
    }
}

/// Streak length expressed in seconds of audio.
fn streak_secs(frames: u64) -> f64 {
    frames as f64 * FRAME_DURATION.as_secs_f64()
}

/// True if `e` is an I/O broken pipe, i.e. the downstream consumer is gone.
fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .map(|e| e.kind() == io::ErrorKind::BrokenPipe)
        .unwrap_or(false)
}
