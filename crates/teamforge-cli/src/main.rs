mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    agent::AgentSubcommand, config::ConfigSubcommand, git::GitSubcommand,
    library::LibrarySubcommand, settings::SettingsSubcommand, team::TeamSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "teamforge",
    about = "Assemble AI-assistant teams and deploy them into .claude/",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .teamforge/ or .git/)
    #[arg(long, global = true, env = "TEAMFORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize teamforge in the current project
    Init,

    /// Detect the project's technologies and suggest agents
    Analyze,

    /// Browse and edit a template library
    Library {
        /// agent, skill, hook, mcp or constitution
        kind: String,
        #[command(subcommand)]
        subcommand: LibrarySubcommand,
    },

    /// Manage teams and deploy them
    Team {
        #[command(subcommand)]
        subcommand: TeamSubcommand,
    },

    /// Render agent files and suggestions
    Agent {
        #[command(subcommand)]
        subcommand: AgentSubcommand,
    },

    /// Edit the assistant's settings.json
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },

    /// Inspect and edit .teamforge/settings.json
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Sync template repositories and commit deployed files
    Git {
        #[command(subcommand)]
        subcommand: GitSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Analyze => cmd::analyze::run(&root, cli.json),
        Commands::Library { kind, subcommand } => {
            cmd::library::run(&root, &kind, subcommand, cli.json)
        }
        Commands::Team { subcommand } => cmd::team::run(&root, subcommand, cli.json),
        Commands::Agent { subcommand } => cmd::agent::run(&root, subcommand, cli.json),
        Commands::Settings { subcommand } => cmd::settings::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Git { subcommand } => cmd::git::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
