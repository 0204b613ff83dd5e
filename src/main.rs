#![deny(clippy::mod_module_files)]
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod github;
mod progress;
mod project;
mod token_store;
mod uploader;

use config::UploaderConfig;
use token_store::FileTokenStore;

/// Upload a project directory to a GitHub repository, one commit per file
#[derive(Parser, Debug)]
#[command(name = "ghpush", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a project directory to GitHub, creating the repository if needed
    Upload {
        /// Project directory to upload
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Repository name on GitHub
        #[arg(short, long)]
        repo: String,

        /// Repository owner (defaults to default_owner from the config file)
        #[arg(short, long)]
        owner: Option<String>,

        /// Personal access token (falls back to GITHUB_TOKEN, then the stored token)
        #[arg(long)]
        token: Option<String>,

        /// Description for a newly created repository
        #[arg(short, long)]
        description: Option<String>,

        /// Persist the token used for this run
        #[arg(long)]
        save_token: bool,
    },
    /// Check whether the target repository exists
    Check {
        /// Repository name on GitHub
        #[arg(short, long)]
        repo: String,

        /// Repository owner (defaults to default_owner from the config file)
        #[arg(short, long)]
        owner: Option<String>,

        /// Personal access token (falls back to GITHUB_TOKEN, then the stored token)
        #[arg(long)]
        token: Option<String>,
    },
    /// Manage the stored personal access token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommands {
    /// Store a token for later runs
    Save { token: String },
    /// Show the stored token, masked
    Show,
    /// Remove the stored token
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = UploaderConfig::load()?;
    let store = FileTokenStore::from_env()?;

    match args.command {
        Commands::Upload {
            path,
            repo,
            owner,
            token,
            description,
            save_token,
        } => {
            commands::upload::handle(
                &path,
                owner,
                repo,
                token,
                description,
                save_token,
                &config,
                &store,
            )
            .await
        }
        Commands::Check { repo, owner, token } => {
            commands::check::handle(owner, repo, token, &config, &store).await
        }
        Commands::Token { command } => match command {
            TokenCommands::Save { token } => commands::token::save(&store, &token),
            TokenCommands::Show => commands::token::show(&store),
            TokenCommands::Clear => commands::token::clear(&store),
        },
    }
}
