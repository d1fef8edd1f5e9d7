use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;
mod render;

use bootstrap::{AppBootstrap, ModelOverrides};

#[derive(Parser)]
#[command(name = "agentspark")]
#[command(about = "AgentSpark - interview-driven AI agent team generator", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and projects/
    #[arg(long, global = true, env = "AGENTSPARK_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Model chain to use instead of the configured one
    #[arg(long, global = true)]
    chain: Option<String>,

    /// Primary model id instead of the configured one
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one orchestrated call and show its trace
    Call {
        #[arg(long)]
        system: String,
        #[arg(long)]
        message: String,
        /// Trace label for the call
        #[arg(long)]
        label: Option<String>,
    },
    /// List the built-in model chains
    Models,
    /// Encode or import share links
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// Manage saved projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Write a project's files and manifest into a directory
    Export { project_id: String, dir: PathBuf },
    /// Interview, generate a team and save it as a project
    Interview {
        #[arg(long)]
        topic: String,
        /// iskra, plomien, pozar or inferno
        #[arg(long)]
        level: Option<String>,
        /// en or pl
        #[arg(long)]
        lang: Option<String>,
        /// Team size shown to the model, e.g. 3-4
        #[arg(long)]
        agents: Option<String>,
        /// Number of interview questions
        #[arg(long)]
        questions: Option<u32>,
    },
    /// Refine a saved project's team
    Refine {
        project_id: String,
        request: String,
        /// improve, add, remove or connections
        #[arg(long)]
        action: Option<String>,
        /// Apply without asking
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ShareAction {
    /// Print the share fragment (or URL with --base) for a project
    Encode {
        project_id: String,
        #[arg(long)]
        password: Option<String>,
        /// Page URL to prepend to the fragment
        #[arg(long)]
        base: Option<String>,
    },
    /// Import a share link as a new project
    Decode {
        /// Full URL, `#share=...` fragment or the encoded part alone
        link: String,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    List,
    Show { id: String },
    Delete { id: String },
    Fork { id: String },
    /// Make version N (as listed by `show`) the current team
    Restore { id: String, version: usize },
    /// Show agent changes between two versions
    Diff { id: String, from: usize, to: usize },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let overrides = ModelOverrides {
        chain: cli.chain,
        model: cli.model,
    };
    let app = AppBootstrap::init(cli.config_dir.as_deref(), &overrides).await?;

    match cli.command {
        Commands::Call {
            system,
            message,
            label,
        } => commands::call::run(&app, &system, &message, label.as_deref()).await?,
        Commands::Models => commands::models::run(&app).await,
        Commands::Share { action } => match action {
            ShareAction::Encode {
                project_id,
                password,
                base,
            } => {
                commands::share::encode(&app, &project_id, password.as_deref(), base.as_deref())
                    .await?
            }
            ShareAction::Decode { link, password } => {
                commands::share::decode(&app, &link, password.as_deref()).await?
            }
        },
        Commands::Projects { action } => match action {
            ProjectAction::List => commands::projects::list(&app).await?,
            ProjectAction::Show { id } => commands::projects::show(&app, &id).await?,
            ProjectAction::Delete { id } => commands::projects::delete(&app, &id).await?,
            ProjectAction::Fork { id } => commands::projects::fork(&app, &id).await?,
            ProjectAction::Restore { id, version } => {
                commands::projects::restore(&app, &id, version).await?
            }
            ProjectAction::Diff { id, from, to } => {
                commands::projects::diff(&app, &id, from, to).await?
            }
        },
        Commands::Export { project_id, dir } => {
            commands::export::run(&app, &project_id, &dir).await?
        }
        Commands::Interview {
            topic,
            level,
            lang,
            agents,
            questions,
        } => {
            let options = commands::interview::InterviewOptions {
                topic,
                level,
                lang,
                agents,
                questions,
            };
            commands::interview::run(&app, options).await?
        }
        Commands::Refine {
            project_id,
            request,
            action,
            yes,
        } => commands::refine::run(&app, &project_id, &request, action.as_deref(), yes).await?,
    }

    Ok(())
}
