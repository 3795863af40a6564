//! Social platform connections and publishing.
//!
//! `connect` prints the OAuth URL for a browser and then polls the backend
//! until the platform reports connected; the browser flow itself (popup,
//! postMessage) is the web dashboard's concern.

use std::time::Duration;

use viral_gateway::EngineClient;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_POLL: Duration = Duration::from_secs(2);

pub async fn status(client: &EngineClient) -> anyhow::Result<()> {
    let mut platforms: Vec<_> = client.social_status().await?.into_iter().collect();
    platforms.sort_by(|a, b| a.0.cmp(&b.0));
    if platforms.is_empty() {
        println!("no platforms configured");
        return Ok(());
    }
    for (platform, connection) in platforms {
        if connection.connected {
            match connection.connected_at {
                Some(at) => {
                    println!("{platform}: connected since {}", at.format("%Y-%m-%d %H:%M"));
                }
                None => println!("{platform}: connected"),
            }
        } else {
            println!("{platform}: not connected");
        }
    }
    Ok(())
}

pub async fn connect(client: &EngineClient, platform: &str) -> anyhow::Result<()> {
    let url = client.connect_url(platform)?;
    println!("Open this URL in a browser to link your {platform} account:");
    println!("  {url}");
    println!("Waiting for the connection to be confirmed...");

    let deadline = tokio::time::Instant::now() + CONNECT_TIMEOUT;
    loop {
        tokio::time::sleep(CONNECT_POLL).await;
        if let Ok(status) = client.social_status().await {
            if status.get(platform).is_some_and(|c| c.connected) {
                println!("{platform} connected.");
                return Ok(());
            }
        }
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("timed out waiting for {platform} to connect");
        }
    }
}

pub async fn disconnect(client: &EngineClient, platform: &str) -> anyhow::Result<()> {
    client.disconnect_social(platform).await?;
    println!("{platform} disconnected.");
    Ok(())
}

pub async fn publish(client: &EngineClient, platform: &str, id: &str) -> anyhow::Result<()> {
    let reply = client.publish_to_social(platform, id).await?;
    println!("published to {platform}: {}", reply.share_url);
    Ok(())
}
