//! Sentinel ACME - directory bootstrap CLI
//!
//! Resolves an ACME service directory and prints it, optionally saving a
//! snapshot for offline use.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use sentinel_acme::{
    export_directory, registry, AcmeContext, Activation, DirectoryResolver, DirectorySource,
    HttpClient, ResolveRequest,
};
use sentinel_config::{Config, LogFormat};

/// Sentinel ACME - resolve ACME service directories
#[derive(Parser, Debug)]
#[command(name = "sentinel-acme")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", env = "SENTINEL_ACME_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long = "verbose", global = true)]
    verbose: bool,

    /// Log output format (text or json)
    #[arg(long = "log-format", global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a service directory and print it as JSON (default)
    Resolve(ResolveArgs),
    /// List well-known ACME services
    Services,
}

#[derive(Args, Debug, Default)]
struct ResolveArgs {
    /// Well-known service name (see `services`)
    #[arg(short = 's', long = "service")]
    service: Option<String>,

    /// Directory URL, used verbatim
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// Local JSON or MessagePack directory snapshot
    #[arg(short = 'p', long = "path")]
    path: Option<String>,

    /// Publish the directory as ambient state
    #[arg(long = "activate-directory")]
    activate_directory: bool,

    /// Bootstrap an initial nonce from the directory's newNonce endpoint
    #[arg(long = "activate-nonce")]
    activate_nonce: bool,

    /// Save the resolved directory (.json for JSON, anything else for MessagePack)
    #[arg(short = 'o', long = "export")]
    export: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout-secs")]
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => Config::default(),
    };

    init_logging(&config, cli.verbose, cli.log_format.as_deref())?;

    match cli.command {
        Some(Commands::Services) => list_services(),
        Some(Commands::Resolve(args)) => resolve(&config, args),
        None => resolve(&config, ResolveArgs::default()),
    }
}

/// Install the tracing subscriber
fn init_logging(config: &Config, verbose: bool, log_format: Option<&str>) -> Result<()> {
    let log_level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    let format = match log_format {
        Some(s) => LogFormat::from_str_loose(s)
            .ok_or_else(|| anyhow::anyhow!("Invalid log format '{}'. Valid formats: text, json", s))?,
        None => config.logging.format,
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    // Logs go to stderr so stdout carries only the directory document.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}

fn list_services() -> Result<()> {
    for (name, base_url) in registry::entries() {
        let marker = if *name == registry::DEFAULT_SERVICE {
            " (default)"
        } else {
            ""
        };
        println!("{:<24} {}{}", name, registry::directory_url(base_url), marker);
    }
    Ok(())
}

/// Resolve a directory, merging CLI flags over the configuration file
fn resolve(config: &Config, args: ResolveArgs) -> Result<()> {
    let file = &config.directory;

    // A source given on the command line replaces the configured one.
    let cli_source = args.service.is_some() || args.url.is_some() || args.path.is_some();
    let (service, url, path) = if cli_source {
        (args.service, args.url, args.path)
    } else {
        (
            file.service.clone(),
            file.url.clone(),
            file.path.as_ref().map(|p| p.display().to_string()),
        )
    };

    let source = DirectorySource::from_parts(service.as_deref(), url.as_deref(), path.as_deref())?;
    let activation = Activation {
        directory: args.activate_directory || file.activate_directory,
        nonce: args.activate_nonce || file.activate_nonce,
    };

    let client = match args.timeout_secs.or(file.timeout_secs) {
        Some(secs) => HttpClient::with_timeout(Duration::from_secs(secs))?,
        None => HttpClient::new()?,
    };
    let resolver = DirectoryResolver::with_http_client(client);
    let ctx = AcmeContext::global();

    let request = ResolveRequest::new(source).with_activation(activation);
    let directory = resolver
        .resolve(&request, ctx)
        .with_context(|| format!("Failed to resolve ACME directory from {}", request.source))?;

    if let Some(export_path) = args.export.or_else(|| file.export.clone()) {
        export_directory(&directory, &export_path)?;
    }

    if activation.directory {
        info!("ACME directory published as ambient state");
    }
    if let Some(state) = ctx.nonce() {
        info!(nonce_url = %state.nonce_url, "Initial ACME nonce obtained");
    }

    let json = serde_json::to_string_pretty(&directory)?;
    println!("{}", json);

    Ok(())
}
