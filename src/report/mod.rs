//! Report rendering.
//!
//! Turns analyzer reports, audit history and GTM results into Markdown or
//! JSON documents.

pub mod generator;

pub use generator::{
    generate_json_report, generate_markdown_report, render_gtm_accounts, render_gtm_report,
    render_history, render_stats,
};
