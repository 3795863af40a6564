//! Command line console for the Viral Engine backend.

mod brainstorm;
mod history;
mod logs;
mod run;
mod social;
mod status;
mod suggest;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use viral_gateway::EngineClient;

#[derive(Debug, Parser)]
#[command(name = "viral")]
#[command(about = "Campaign console for the Viral Engine backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full campaign: generate, review the script, render.
    Run {
        /// Campaign topic.
        topic: String,
        /// Proceed with the generated script without pausing for edits.
        #[arg(long)]
        auto: bool,
        /// Where the editable script draft is written while paused.
        #[arg(long, default_value = "script.json")]
        script_file: PathBuf,
    },
    /// Print the status snapshot for a job (or the backend's current job).
    Status {
        #[arg(long)]
        id: Option<String>,
    },
    /// Browse or prune past campaigns.
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Manage social platform connections and publishing.
    Social {
        #[command(subcommand)]
        command: SocialCommands,
    },
    /// One-shot chat with a pipeline agent.
    Brainstorm { agent: String, prompt: String },
    /// Stream backend agent logs until interrupted.
    Logs,
    /// Print curated topic suggestions.
    Suggest {
        #[arg(long, default_value = "en")]
        language: String,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryCommands {
    List,
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum SocialCommands {
    Status,
    Connect { platform: String },
    Disconnect { platform: String },
    Publish {
        platform: String,
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = viral_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let client = Arc::new(EngineClient::new(&config)?);

    match cli.command {
        Commands::Run {
            topic,
            auto,
            script_file,
        } => run::run(client, &config, &topic, auto, &script_file).await,
        Commands::Status { id } => status::run(&client, id.as_deref()).await,
        Commands::History { command } => match command {
            HistoryCommands::List => history::list(&client).await,
            HistoryCommands::Delete { id } => history::delete(&client, &id).await,
        },
        Commands::Social { command } => match command {
            SocialCommands::Status => social::status(&client).await,
            SocialCommands::Connect { platform } => social::connect(&client, &platform).await,
            SocialCommands::Disconnect { platform } => {
                social::disconnect(&client, &platform).await
            }
            SocialCommands::Publish { platform, id } => {
                social::publish(&client, &platform, &id).await
            }
        },
        Commands::Brainstorm { agent, prompt } => brainstorm::run(&client, &agent, &prompt).await,
        Commands::Logs => logs::run(&client, &config).await,
        Commands::Suggest { language } => {
            suggest::run(&language);
            Ok(())
        }
    }
}
