//! WebDoctor - website tracking and Lighthouse analyzer client
//!
//! A CLI that submits a website to a remote analyzer and renders the
//! returned Lighthouse scores, tracking findings and suggestions. It also
//! browses audit history and Google Tag Manager setups from the audit
//! backend.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Validation, network, or backend error

mod analysis;
mod cli;
mod client;
mod config;
mod contact;
mod error;
mod fixtures;
mod models;
mod report;
mod session;

use analysis::AuditStats;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command, GtmCommand, OutputFormat};
use client::{AnalyzerClient, GtmClient, HistoryClient};
use config::{Config, CONFIG_FILE_NAME};
use error::{ClientError, ErrorContext};
use indicatif::{ProgressBar, ProgressStyle};
use models::{AnalysisDocument, GtmAnalysisRequest, ReportMetadata};
use session::{AnalysisSession, Completion};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("WebDoctor v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Command failed: {:#}", e);
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .webdoctor.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to point at your analyzer and audit backends.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the selected subcommand.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.command.clone() {
        Command::Analyze {
            url,
            format,
            output,
        } => run_analyze(&config, &url, format, output.as_deref(), args.quiet).await,
        Command::History {
            user_id,
            page,
            per_page,
        } => {
            let per_page = per_page.unwrap_or(config.history.per_page);
            run_history(&config, user_id.as_deref(), page, per_page).await
        }
        Command::Stats { user_id } => run_stats(&config, user_id.as_deref()).await,
        Command::Gtm(GtmCommand::Accounts { user_id }) => {
            run_gtm_accounts(&config, &user_id).await
        }
        Command::Gtm(GtmCommand::Analyze {
            user_id,
            account,
            container,
        }) => {
            let request = GtmAnalysisRequest {
                account_id: account,
                container_id: container,
                user_id,
            };
            run_gtm_analyze(&config, &request).await
        }
        Command::Connect => {
            println!("🔗 Connect your Google account:");
            println!("   {}", client::connect_url(&config.endpoints.api_url));
            Ok(())
        }
        Command::Contact {
            name,
            email,
            message,
        } => {
            let form = contact::ContactForm {
                name,
                email,
                message,
            };
            run_contact(&config, &form).await
        }
        Command::InitConfig => handle_init_config(),
    }
}

/// Analyze one website and print or save the report.
async fn run_analyze(
    config: &Config,
    url: &str,
    format: OutputFormat,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let started = Instant::now();
    let client = AnalyzerClient::new(
        config.endpoints.analyzer_url.clone(),
        config.http.timeout(),
        config.demo.mode(),
    )?;
    let demo = client.is_demo(url);

    let spinner = (!quiet).then(|| spinner(format!("Analyzing {}...", url.trim())));

    let mut session = AnalysisSession::new();
    let outcome = session.analyze(&client, url).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if outcome != Completion::Applied {
        let message = session
            .error()
            .unwrap_or("Failed to analyze website. Please try again.");
        return Err(anyhow::anyhow!(message.to_string()));
    }

    let report = session
        .report()
        .cloned()
        .context("Analysis finished without a report")?;
    let metadata = ReportMetadata {
        url: session.analyzed_url().unwrap_or(url).to_string(),
        analysis_date: Utc::now(),
        analyzer: client.base_url().to_string(),
        demo,
        duration_seconds: started.elapsed().as_secs_f64(),
    };
    let document = AnalysisDocument::new(metadata, report);

    let rendered = match format {
        OutputFormat::Json => report::generate_json_report(&document)?,
        OutputFormat::Markdown => report::generate_markdown_report(&document),
    };
    emit(&rendered, output)?;

    eprintln!(
        "\n📊 Overall score: {}/100 {} {}",
        document.scores.overall,
        document.scores.rating.emoji(),
        document.scores.rating
    );
    Ok(())
}

/// Show one page of audit history, clamping past-the-end pages.
async fn run_history(
    config: &Config,
    user_id: Option<&str>,
    page: u32,
    per_page: u32,
) -> Result<()> {
    let client = HistoryClient::new(config.endpoints.api_url.clone(), config.http.timeout())?;

    let (history, pagination) = client
        .list_audits_clamped(user_id, page, per_page)
        .await
        .map_err(|e| user_facing(e, ErrorContext::History))?;

    print!("{}", report::render_history(&history, &pagination));
    Ok(())
}

async fn run_stats(config: &Config, user_id: Option<&str>) -> Result<()> {
    let client = HistoryClient::new(config.endpoints.api_url.clone(), config.http.timeout())?;

    let history = client
        .list_audits(user_id, None, config.history.stats_sample)
        .await
        .map_err(|e| user_facing(e, ErrorContext::History))?;

    let stats = AuditStats::from_records(&history.audits);
    print!("{}", report::render_stats(&stats));
    Ok(())
}

async fn run_gtm_accounts(config: &Config, user_id: &str) -> Result<()> {
    let client = GtmClient::new(config.endpoints.api_url.clone(), config.http.timeout())?;

    match client.accounts(user_id).await {
        Ok(accounts) => {
            print!("{}", report::render_gtm_accounts(&accounts));
            Ok(())
        }
        Err(ClientError::NotConnected) => {
            eprintln!("🔗 Connect with Google: webdoctor connect");
            Err(user_facing(ClientError::NotConnected, ErrorContext::GtmAccounts))
        }
        Err(e) => Err(user_facing(e, ErrorContext::GtmAccounts)),
    }
}

async fn run_gtm_analyze(config: &Config, request: &GtmAnalysisRequest) -> Result<()> {
    let client = GtmClient::new(config.endpoints.api_url.clone(), config.http.timeout())?;

    let report = client
        .analyze(request)
        .await
        .map_err(|e| user_facing(e, ErrorContext::GtmAnalysis))?;

    print!("{}", report::render_gtm_report(&report));
    Ok(())
}

async fn run_contact(config: &Config, form: &contact::ContactForm) -> Result<()> {
    let delay = Duration::from_millis(config.contact.submit_delay_ms);

    match contact::submit(form, delay).await {
        Ok(receipt) => {
            println!(
                "✅ Thanks, {}! We'll reply to {} soon.",
                receipt.name, receipt.email
            );
            Ok(())
        }
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("   {}: {}", field, message);
            }
            Err(anyhow::anyhow!("Contact form is incomplete"))
        }
    }
}

/// Log the underlying failure and keep only the user-facing message.
fn user_facing(err: ClientError, context: ErrorContext) -> anyhow::Error {
    if !err.is_local() {
        warn!("{:?} request failed: {}", context, err);
    }
    anyhow::anyhow!(err.user_message(context))
}

/// Write output to a file, or stdout when no path is given.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("✅ Report saved to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match Config::load_default(&cwd) {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
