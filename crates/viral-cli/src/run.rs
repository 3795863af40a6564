//! Interactive end-to-end campaign run.
//!
//! Drives the controller through both phases, rendering its events as
//! terminal output. Unless `--auto` is given, the run pauses at the script
//! checkpoint: the draft is written to a JSON file, the user edits it, and
//! the edited rows are read back and submitted verbatim.

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

use viral_campaign::{CampaignController, CampaignEvent, CampaignStatus, Notice, NoticeLevel};
use viral_core::AppConfig;
use viral_gateway::{EngineClient, SceneRow};

/// Display labels for the known pipeline phases. Unknown phases are shown
/// raw: the label set is backend-controlled and open-ended.
fn phase_label(phase: &str) -> &str {
    match phase {
        "initializing" => "Initializing pipeline...",
        "infrastructure_check" => "Checking infrastructure...",
        "trend_hunting" => "Agent Alpha: Hunting trends on TikTok & YouTube...",
        "script_generation" => "Agent Beta: Writing viral script from trends...",
        "script_ready" => "Script ready for review",
        "media_generation" => "Agent Gamma: Downloading footage & generating narration...",
        "monetization" => "Agent Delta: Building monetization strategy...",
        "done" => "Pipeline complete!",
        "error" => "Pipeline encountered an error",
        other => other,
    }
}

fn print_notice(notice: &Notice) {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    match &notice.detail {
        Some(detail) => println!("[{tag}] {}: {detail}", notice.title),
        None => println!("[{tag}] {}", notice.title),
    }
}

pub async fn run(
    client: Arc<EngineClient>,
    config: &AppConfig,
    topic: &str,
    auto: bool,
    script_file: &Path,
) -> anyhow::Result<()> {
    let controller = CampaignController::new(Arc::clone(&client), config.poll_interval());
    let mut events = controller.subscribe();
    controller.start_campaign(topic).await?;

    let checkpoint = wait_for_outcome(&mut events).await?;
    if checkpoint != CampaignStatus::ScriptReady {
        return finish(&client, &controller, checkpoint);
    }

    let draft = controller.draft().unwrap_or_default();
    let edited = if auto {
        draft
    } else {
        review_script(&draft, script_file).await?
    };
    controller.proceed_with_script(edited).await?;

    let final_status = wait_for_outcome(&mut events).await?;
    finish(&client, &controller, final_status)
}

/// Renders events until the campaign parks at the checkpoint or a terminal
/// status.
async fn wait_for_outcome(
    events: &mut Receiver<CampaignEvent>,
) -> anyhow::Result<CampaignStatus> {
    loop {
        match events.recv().await {
            Ok(CampaignEvent::StatusChanged(
                status @ (CampaignStatus::ScriptReady
                | CampaignStatus::Completed
                | CampaignStatus::Failed),
            )) => return Ok(status),
            Ok(CampaignEvent::StatusChanged(_)) => {}
            Ok(CampaignEvent::Progress { phase, percent }) => {
                tracing::info!(percent, "{}", phase_label(&phase));
            }
            Ok(CampaignEvent::Notice(notice)) => print_notice(&notice),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event stream lagged");
            }
            Err(RecvError::Closed) => anyhow::bail!("controller event stream closed"),
        }
    }
}

/// Writes the draft to disk, waits for the user to edit it, and reads the
/// edited rows back.
async fn review_script(
    draft: &[SceneRow],
    script_file: &Path,
) -> anyhow::Result<Vec<SceneRow>> {
    let json = serde_json::to_string_pretty(draft)?;
    tokio::fs::write(script_file, json).await?;
    println!("Script draft written to {}.", script_file.display());
    println!("Edit it as needed, then press Enter to render the video.");

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    let edited = tokio::fs::read_to_string(script_file).await?;
    let scenes: Vec<SceneRow> = serde_json::from_str(&edited)?;
    Ok(scenes)
}

fn finish(
    client: &EngineClient,
    controller: &CampaignController,
    status: CampaignStatus,
) -> anyhow::Result<()> {
    let view = controller.snapshot();
    match status {
        CampaignStatus::Completed => {
            let result = view
                .result
                .ok_or_else(|| anyhow::anyhow!("completed without a result bundle"))?;
            println!("Campaign complete: {}", result.topic);
            println!("  script:   {} chars", result.script.len());
            println!("  captions: {}", result.captions.len());
            println!("  products: {}", result.products.len());
            if let Some(earnings) = &result.earnings_projection {
                println!(
                    "  earnings: {} conservative / {} viral",
                    earnings.conservative, earnings.viral
                );
            }
            if let Some(path) = &result.video_path {
                println!("  video:    {}", client.video_url(path)?);
            }
            if !result.monetization_brief.is_empty() {
                println!("\n{}", result.monetization_brief);
            }
            Ok(())
        }
        CampaignStatus::Failed => anyhow::bail!(
            "generation failed: {}",
            view.error.unwrap_or_else(|| "unknown error".to_string())
        ),
        other => anyhow::bail!("unexpected terminal status: {other}"),
    }
}
