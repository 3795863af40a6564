//! Attach to the backend log stream and print frames until interrupted.

use tokio::sync::broadcast::error::RecvError;

use viral_core::AppConfig;
use viral_gateway::{EngineClient, LogStream};

pub async fn run(client: &EngineClient, config: &AppConfig) -> anyhow::Result<()> {
    let url = client.logs_url()?;
    let handle = LogStream::connect(url, config.ws_reconnect_delay(), config.log_buffer_capacity);
    let mut frames = handle.subscribe();

    println!("Streaming backend logs (Ctrl-C to stop)...");
    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Ok(frame) => println!("{} [{}] {}", frame.timestamp, frame.level, frame.message),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "log stream lagged"),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Deliberate shutdown: no reconnect after this.
    handle.close();
    Ok(())
}
