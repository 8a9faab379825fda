mod leads;
mod lookup;
mod render;
mod search;
mod session;

use chrono::Utc;
use clap::{Parser, Subcommand};
use leadscout_core::{JsonFileStorage, LeadStore};
use leadscout_gemini::GeminiClient;
use tracing_subscriber::EnvFilter;

use crate::leads::{run_leads_command, LeadsCommands};
use crate::search::run_search_command;

#[derive(Debug, Parser)]
#[command(name = "leadscout")]
#[command(about = "Find restaurants without a website and track outreach calls")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan an area for restaurants that have no website
    Search {
        /// Neighborhood, city or zip code, e.g. "West Village, NY"
        #[arg(required = true, num_args = 1..)]
        location: Vec<String>,
        /// Save every result to the saved-leads list
        #[arg(long)]
        save_all: bool,
    },
    /// Manage saved leads
    Leads {
        #[command(subcommand)]
        command: LeadsCommands,
    },
    /// Interactive prompt holding search results and saved leads
    Session {
        /// Keep saved leads in memory only for this session
        #[arg(long)]
        ephemeral: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = leadscout_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search { location, save_all }) => {
            let client = GeminiClient::from_config(&config)?;
            let mut store = LeadStore::open(JsonFileStorage::new(&config.storage_path));
            let output =
                run_search_command(&client, &mut store, &location.join(" "), save_all).await?;
            print!("{output}");
        }
        Some(Commands::Leads { command }) => {
            let mut store = LeadStore::open(JsonFileStorage::new(&config.storage_path));
            let output = run_leads_command(
                &mut store,
                command,
                &config.export_dir,
                Utc::now().date_naive(),
            )?;
            println!("{output}");
        }
        Some(Commands::Session { ephemeral }) => {
            session::run_session(&config, ephemeral).await?;
        }
        None => println!("leadscout ready; run `leadscout --help` for commands"),
    }

    Ok(())
}
