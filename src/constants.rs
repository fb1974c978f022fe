use std::time::Duration;

// Define some constants for the audio parameters
pub const SAMPLE_RATE: u32 = 44100; // 44.1 kHz sample rate
pub const CHANNELS: u16 = 2; // Stereo channel
pub const SAMPLE_BYTES: usize = 2; // 16 bits per sample

/// Samples in one output frame (0.1 s of audio).
pub const FRAME_SAMPLES: usize = SAMPLE_RATE as usize / 10;

/// Size of one output frame on the wire.
pub const FRAME_BYTES: usize = FRAME_SAMPLES * CHANNELS as usize * SAMPLE_BYTES;

/// Wall-clock duration of one frame.
pub const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Budget for a single pipe read. Matching the frame duration caps the
/// latency the relay can add at one frame period.
pub const READ_TIMEOUT: Duration = FRAME_DURATION;

/// Silent frames emitted while no pipe is connected, one per frame period.
pub const BRIDGE_FRAMES: u32 = 10;

/// Consecutive audio frames between streaming progress log lines (~10 s).
pub const AUDIO_LOG_INTERVAL: u64 = 100;

/// Consecutive silent frames between silence progress log lines (~30 s).
pub const SILENCE_LOG_INTERVAL: u64 = 300;

/// Pipe read when no path is given on the command line.
pub const DEFAULT_PIPE_PATH: &str = "/tmp/audio/librespot.pcm";
