//! The shared silent frame.
//!
//! Silence is substituted byte-for-byte whenever the pipe has nothing to
//! offer, so the same immutable buffer is handed out for every emission.

use crate::constants::FRAME_BYTES;
use bytes::Bytes;
use lazy_static::lazy_static;

lazy_static! {
    static ref SILENCE: Bytes = Bytes::from(vec![0u8; FRAME_BYTES]);
}

/// One frame of silence. Clones share the same storage.
pub fn silent_frame() -> Bytes {
    SILENCE.clone()
}

/// True if every byte in `frame` is zero.
pub fn is_silent(frame: &[u8]) -> bool {
    frame.iter().all(|&b| b == 0)
}
