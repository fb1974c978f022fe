use anyhow::Result;
use log::info;
use pcm_relay::constants::{
    CHANNELS, DEFAULT_PIPE_PATH, FRAME_BYTES, FRAME_DURATION, FRAME_SAMPLES, SAMPLE_RATE,
};
use pcm_relay::relay::Relay;
use pcm_relay::sink::FrameSink;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PIPE_PATH.to_string());

    info!("Starting stream relay for pipe: {path}");
    info!("Audio format: s16le, {SAMPLE_RATE}Hz, {CHANNELS} channels");
    info!(
        "Frame size: {FRAME_BYTES} bytes ({FRAME_SAMPLES} samples, {:.3}s)",
        FRAME_DURATION.as_secs_f64()
    );

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    let mut relay = Relay::new(path.into(), FrameSink::new(tokio::io::stdout()));
    relay.run(shutdown).await
}
