//! lab CLI
//!
//! Command-line GitLab client. Every command that talks to GitLab first
//! resolves which domain, token and project the current directory maps to.
//!
//! # Usage
//!
//! ```bash
//! # Show the domain, API URL and project for this repository
//! lab target
//!
//! # Target another project on an explicit domain
//! lab target --profile gitlab.example.com --project group/app
//!
//! # Reduce a pasted issue URL to its project path
//! lab project-path https://gitlab.example.com/group/app/issues/5
//!
//! # Show remembered preferences
//! lab config show
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lab_core::{
    FileBackend, PreferenceStore, ResolvedTarget, TargetRequest, parse_project_path,
    resolve_target,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

mod git;
mod prompt;

use git::GitRemoteCatalog;
use prompt::TerminalPrompt;

#[derive(Parser)]
#[command(name = "lab")]
#[command(about = "Command-line client for GitLab repositories")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preferences file (defaults to $LAB_CONFIG or the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the GitLab domain, token and project for this directory
    Target {
        /// Project path to use instead of the remote's (namespace/project)
        #[arg(short, long)]
        project: Option<String>,

        /// Domain to use instead of choosing among remotes
        #[arg(long)]
        profile: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Print the token instead of redacting it
        #[arg(long)]
        show_token: bool,
    },

    /// Print the namespace/project path of a GitLab web URL
    ProjectPath {
        /// Issue, merge request, pipeline or project URL
        url: String,
    },

    /// Inspect stored preferences
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the preferences file location
    Path,

    /// Print preferred domains and the domains with a stored token
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Target { project, profile, format, show_token } => {
            let request = TargetRequest { domain: profile, project };
            target(cli.config, &request, format, show_token)
        }
        Commands::ProjectPath { url } => {
            let path = parse_project_path(&url)?;
            println!("{}", path);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { command: ConfigCommands::Path } => {
            let backend = match cli.config {
                Some(path) => FileBackend::new(path),
                None => FileBackend::default_location()
                    .context("Failed to locate preferences")?,
            };
            println!("{}", backend.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { command: ConfigCommands::Show { format } } => {
            let prefs = load_preferences(cli.config)?;
            show_config(&prefs, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_preferences(path: Option<PathBuf>) -> Result<PreferenceStore> {
    let prefs = match path {
        Some(path) => PreferenceStore::load_from_path(path),
        None => PreferenceStore::load_default(),
    };
    prefs.context("Failed to load preferences")
}

fn target(
    config: Option<PathBuf>,
    request: &TargetRequest,
    format: Format,
    show_token: bool,
) -> Result<ExitCode> {
    let mut prefs = load_preferences(config)?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let catalog = GitRemoteCatalog::new(cwd);
    let mut prompt = TerminalPrompt::new();

    debug!(dir = ?catalog.dir(), "Resolving target");
    let Some(target) = resolve_target(&catalog, &mut prefs, &mut prompt, request)? else {
        eprintln!("Not a GitLab repository: no remote points at a GitLab domain.");
        return Ok(ExitCode::FAILURE);
    };

    print_target(&target, format, show_token)?;
    Ok(ExitCode::SUCCESS)
}

fn print_target(target: &ResolvedTarget, format: Format, show_token: bool) -> Result<()> {
    let token = if show_token {
        target.token.expose().to_string()
    } else {
        target.token.to_string()
    };

    match format {
        Format::Json => {
            let value = json!({
                "domain": target.domain,
                "remote": target.remote.name,
                "protocol": target.remote.protocol,
                "api_url": target.api_url(),
                "web_url": target.web_url(),
                "project": target.project_path(),
                "token": token,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Format::Text => {
            println!("Domain:  {}", target.domain);
            println!("Remote:  {} ({})", target.remote.name, target.remote.protocol);
            println!("API:     {}", target.api_url());
            println!("Web:     {}", target.web_url());
            println!("Project: {}", target.project_path());
            println!("Token:   {}", token);
        }
    }
    Ok(())
}

fn show_config(prefs: &PreferenceStore, format: Format) -> Result<()> {
    let data = prefs.data();
    let with_token: Vec<&str> = data
        .tokens
        .iter()
        .filter(|(_, token)| !token.is_empty())
        .map(|(domain, _)| domain.as_str())
        .collect();

    match format {
        Format::Json => {
            let value = json!({
                "path": prefs.location(),
                "preferred_domains": data.preferred_domains,
                "token_domains": with_token,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Format::Text => {
            println!("Preferences: {}", prefs.location());
            println!("Preferred domains:");
            if data.preferred_domains.is_empty() {
                println!("  (none)");
            }
            for (i, domain) in data.preferred_domains.iter().enumerate() {
                println!("  {}) {}", i + 1, domain);
            }
            println!("Stored tokens:");
            if with_token.is_empty() {
                println!("  (none)");
            }
            for domain in with_token {
                println!("  {}: [REDACTED]", domain);
            }
        }
    }
    Ok(())
}
