//! Action Catalog CLI
//!
//! `load-actions` scans every repository of a GitHub user or organization
//! for `action.yml` / `action.yaml` manifests and emits a JSON catalog.
//!
//! Inputs can be given as flags or through the GitHub Actions `INPUT_*`
//! environment variables. When `GITHUB_OUTPUT` is set the catalog is written
//! as the `actions` step output; otherwise it is printed to stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use action_catalog_core::{
    init_tracing, CatalogBuilder, CatalogError, CatalogOutput, ScanConfig,
};
use action_catalog_github::{GithubClient, GithubConfig, PUBLIC_API_URL};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "load-actions")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Load an overview of all available actions for a GitHub user or organization", long_about = None)]
struct Cli {
    /// Personal access token with read access to the repositories
    #[arg(long, env = "INPUT_PAT", hide_env_values = true)]
    pat: Option<String>,

    /// User account to scan
    #[arg(long, env = "INPUT_USER", default_value = "")]
    user: String,

    /// Organization to scan
    #[arg(long, env = "INPUT_ORGANIZATION", default_value = "")]
    organization: String,

    /// Strip download tokens from manifest URLs
    #[arg(long, env = "INPUT_REMOVETOKEN", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    remove_token: bool,

    /// Attach README download links to each action
    #[arg(long, env = "INPUT_FETCHREADMES", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    fetch_readmes: bool,

    /// GitHub API endpoint; anything but api.github.com is treated as Enterprise Server
    #[arg(long, env = "GITHUB_API_URL", default_value = PUBLIC_API_URL)]
    api_url: String,

    /// Repositories scanned at once (search calls are always serialized)
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Also write the catalog JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// GitHub Actions step output file
    #[arg(long, env = "GITHUB_OUTPUT", hide = true)]
    github_output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    info!("Starting");
    let pat = validate_inputs(
        cli.pat.as_deref().or(std::env::var("PAT").ok().as_deref()),
        &cli.user,
        &cli.organization,
    )?;

    let client = Arc::new(
        GithubClient::new(GithubConfig::new(&cli.api_url).with_token(&pat))
            .context("Failed to create GitHub client")?,
    );
    let config = ScanConfig::new()
        .with_enterprise(client.config().is_enterprise())
        .with_remove_token(cli.remove_token)
        .with_fetch_readmes(cli.fetch_readmes)
        .with_concurrency(cli.concurrency);

    let builder = CatalogBuilder::new(client.clone(), config);
    let report = builder
        .scan_account(client.as_ref(), &cli.user, &cli.organization)
        .await
        .context("Error running action")?;

    for failure in &report.failures {
        warn!(repo = %failure.repo, error = %failure.error, "Repository was not scanned");
    }

    let output = CatalogOutput::new(report.entries, &cli.organization, &cli.user, &Utc::now());
    let json = output.to_json()?;
    emit_output(&json, cli.output.as_deref(), cli.github_output.as_deref())
}

/// Check required inputs and return the token.
fn validate_inputs(
    pat: Option<&str>,
    user: &str,
    organization: &str,
) -> std::result::Result<String, CatalogError> {
    let pat = pat.filter(|p| !p.is_empty()).ok_or_else(|| {
        CatalogError::MissingInput(
            "Parameter 'PAT' is required to load all actions from the organization or user account"
                .to_string(),
        )
    })?;

    if user.is_empty() && organization.is_empty() {
        return Err(CatalogError::MissingInput(
            "Either parameter 'user' or 'organization' is required to load all actions from it. Please provide one of them."
                .to_string(),
        ));
    }

    Ok(pat.to_string())
}

/// Write the catalog to the requested destinations.
fn emit_output(json: &str, output: Option<&Path>, github_output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path))?;
        info!("Wrote catalog to {:?}", path);
    }

    match github_output {
        Some(path) => {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open step output file {:?}", path))?;
            writeln!(file, "actions={}", json)?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
