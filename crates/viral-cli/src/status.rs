//! One-shot status snapshot print.

use viral_gateway::EngineClient;

pub async fn run(client: &EngineClient, id: Option<&str>) -> anyhow::Result<()> {
    let snapshot = client.generation_status(id).await?;
    println!("status:   {}", snapshot.status);
    println!("progress: {}%", snapshot.progress);
    if let Some(phase) = &snapshot.phase {
        println!("phase:    {phase}");
    }
    if let Some(id) = &snapshot.generation_id {
        println!("job:      {id}");
    }
    if let Some(topic) = &snapshot.topic {
        println!("topic:    {topic}");
    }
    if let Some(error) = &snapshot.error {
        println!("error:    {error}");
    }
    if let Some(script) = &snapshot.script_data {
        println!("script:   {} scenes", script.script_columns.len());
    }
    if let Some(result) = &snapshot.result {
        println!("result:   {} ({} products)", result.topic, result.products.len());
    }
    Ok(())
}
