//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WebDoctor - website tracking and Lighthouse analyzer
///
/// Submit a website to the analyzer and get its Lighthouse scores, the
/// tracking providers, cookies and scripts it loads, and suggestions.
///
/// Examples:
///   webdoctor analyze https://example.com
///   webdoctor analyze https://shop.example.org --format json --output report.json
///   webdoctor history --user-id 42 --page 2
///   webdoctor gtm accounts --user-id 42
///   webdoctor init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .webdoctor.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the website analyzer
    #[arg(long, value_name = "URL", env = "WEBDOCTOR_ANALYZER_URL", global = true)]
    pub analyzer_url: Option<String>,

    /// Base URL of the audit-history / GTM backend
    #[arg(long, value_name = "URL", env = "WEBDOCTOR_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Always call the analyzer, even for the demo URL
    #[arg(long, global = true)]
    pub no_demo: bool,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze a website
    Analyze {
        /// Website URL, including the scheme (https://...)
        url: String,

        /// Output format (markdown, json)
        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show one page of audit history
    History {
        /// Only show audits for this user
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,

        /// Page to show (1-based)
        #[arg(long, default_value = "1", value_name = "N")]
        page: u32,

        /// Audits per page (default: from config or 10)
        #[arg(long, value_name = "N")]
        per_page: Option<u32>,
    },

    /// Show audit status statistics
    Stats {
        /// Only count audits for this user
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
    },

    /// Google Tag Manager analysis
    #[command(subcommand)]
    Gtm(GtmCommand),

    /// Print the URL for connecting a Google account
    Connect,

    /// Validate and send a contact message
    Contact {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        message: String,
    },

    /// Generate a default .webdoctor.toml configuration file
    InitConfig,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GtmCommand {
    /// List GTM accounts and containers
    Accounts {
        #[arg(long, value_name = "ID")]
        user_id: String,
    },

    /// Analyze a container's tag setup
    Analyze {
        #[arg(long, value_name = "ID")]
        user_id: String,

        /// GTM account ID
        #[arg(long, value_name = "ID")]
        account: String,

        /// GTM container ID
        #[arg(long, value_name = "ID")]
        container: String,
    },
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for (flag, url) in [
            ("--analyzer-url", &self.analyzer_url),
            ("--api-url", &self.api_url),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(format!("{} must start with 'http://' or 'https://'", flag));
                }
            }
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Command::History { page, per_page, .. } = &self.command {
            if *page == 0 {
                return Err("Page must be at least 1".to_string());
            }
            if *per_page == Some(0) {
                return Err("Per-page must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
