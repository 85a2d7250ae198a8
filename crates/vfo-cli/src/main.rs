use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vfo_application::Workspace;
use vfo_core::records::DraftStatus;
use vfo_infrastructure::ConfigService;

mod commands;

use commands::{
    bookings::BookingsAction, catalog::CatalogAction, pipeline::PipelineAction,
    rules::RulesAction, sequences::SequencesAction, templates::TemplatesAction,
    vault::VaultAction, workflows::WorkflowsAction,
};

#[derive(Parser)]
#[command(name = "vfo")]
#[command(about = "VFO CLI - client pipeline, automation rules and nurture sequences", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the store and seed it if the config allows
    Init,
    /// Seed demo bookings and default content (safe to repeat)
    Seed,
    /// Client records
    Bookings {
        #[command(subcommand)]
        action: BookingsAction,
    },
    /// Move a booking to another stage and run matching rules
    Transition { booking_id: String, stage: String },
    /// Pipeline views and definitions
    Pipeline {
        #[command(subcommand)]
        action: PipelineAction,
    },
    /// Email templates
    Templates {
        #[command(subcommand)]
        action: TemplatesAction,
    },
    /// Automation rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Nurture sequences
    Sequences {
        #[command(subcommand)]
        action: SequencesAction,
    },
    /// Imported workflow definitions
    Workflows {
        #[command(subcommand)]
        action: WorkflowsAction,
    },
    /// Product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Document versions, funding checklist and annual reviews
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },
    /// Drafting queue
    Drafting {
        #[command(subcommand)]
        action: DraftingAction,
    },
    /// Emails produced by automations
    Outbox,
    /// Automation audit log
    Logs,
}

#[derive(Subcommand)]
enum DraftingAction {
    /// Create the drafting pack for every signed booking without tasks
    Spawn,
    /// Show the queue
    List,
    /// Queued, "In Progress" or Done
    Status { task_id: String, status: DraftStatus },
}

fn init_tracing(default_level: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new().context("Failed to resolve config location")?,
    };
    let config = config_service
        .get_config()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    init_tracing(&config.log_level);
    tracing::debug!("[Config] Using {}", config_service.path().display());

    let ws = Workspace::open(&config_service).context("Failed to open store")?;

    match cli.command {
        Commands::Init => commands::print_json(&ws.init()?)?,
        Commands::Seed => commands::print_json(&ws.seed()?)?,
        Commands::Bookings { action } => commands::bookings::run(&ws, action)?,
        Commands::Transition { booking_id, stage } => {
            commands::print_json(&ws.pipeline.transition(&booking_id, &stage)?)?
        }
        Commands::Pipeline { action } => commands::pipeline::run(&ws, action)?,
        Commands::Templates { action } => commands::templates::run(&ws, action)?,
        Commands::Rules { action } => commands::rules::run(&ws, action)?,
        Commands::Sequences { action } => commands::sequences::run(&ws, action)?,
        Commands::Workflows { action } => commands::workflows::run(&ws, action)?,
        Commands::Catalog { action } => commands::catalog::run(&ws, action)?,
        Commands::Vault { action } => commands::vault::run(&ws, action)?,
        Commands::Drafting { action } => match action {
            DraftingAction::Spawn => {
                let created = ws
                    .lifecycle
                    .spawn_drafting_tasks_for_signed(&ws.records.list()?)?;
                println!("Created {} drafting task(s)", created);
            }
            DraftingAction::List => commands::print_json(&ws.lifecycle.drafting_queue())?,
            DraftingAction::Status { task_id, status } => {
                commands::print_json(&ws.lifecycle.set_draft_status(&task_id, status)?)?
            }
        },
        Commands::Outbox => commands::print_json(&ws.activity.outbox())?,
        Commands::Logs => commands::print_json(&ws.activity.logs())?,
    }

    Ok(())
}
