//! Audio frame sources for the relay.
//!
//! A source produces at most one frame per bounded read; the relay
//! substitutes silence whenever a source has nothing to offer.

pub mod pipe;

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::time::Duration;

/// Outcome of one bounded read against a source.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameRead {
    /// Real audio, at most one frame's worth of bytes.
    Audio(Bytes),
    /// Nothing arrived within the time budget.
    Idle,
    /// The writer closed its end of the source.
    Closed,
}

/// A source of raw PCM data read under a strict time budget.
#[async_trait]
pub trait FrameSource: Send {
    /// Wait up to `timeout` for data, then read at most one frame.
    ///
    /// Returns `Idle` when the budget elapses with nothing to read and
    /// `Closed` once the writer has gone away. An error means the source is
    /// unusable and must be reopened.
    async fn read_frame(&mut self, timeout: Duration) -> io::Result<FrameRead>;
}
