//! Read-only access to the backend's campaign history store.

use viral_gateway::EngineClient;

pub async fn list(client: &EngineClient) -> anyhow::Result<()> {
    let entries = client.list_generations().await?;
    if entries.is_empty() {
        println!("no campaigns yet");
        return Ok(());
    }
    for entry in entries {
        let started = entry
            .started_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:10} {:12} {:>4}%  {:16} {}",
            entry.id,
            entry.status.to_string(),
            entry.progress,
            started,
            entry.topic
        );
    }
    Ok(())
}

pub async fn delete(client: &EngineClient, id: &str) -> anyhow::Result<()> {
    client.delete_generation(id).await?;
    println!("deleted {id}");
    Ok(())
}
