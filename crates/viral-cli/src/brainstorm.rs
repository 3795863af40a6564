//! One-shot agent chat.

use viral_gateway::EngineClient;

pub async fn run(client: &EngineClient, agent: &str, prompt: &str) -> anyhow::Result<()> {
    let reply = client.brainstorm(agent, prompt).await?;
    println!("{}", reply.content);
    Ok(())
}
