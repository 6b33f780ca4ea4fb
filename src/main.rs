//! Command-line front end for the URL registry.
//!
//! Stands in for the submission form, the redirect page and the statistics
//! dashboard. Every invocation loads the mirrored snapshot, runs one command
//! and exits.
//!
//! # Usage
//!
//! ```bash
//! # Shorten up to five URLs at once
//! url-registry shorten https://example.com https://rust-lang.org --validity 60
//!
//! # Shorten with a custom code
//! url-registry shorten https://example.com --code promo
//!
//! # Follow a short code (records a click)
//! url-registry open promo --user-agent "Mozilla/5.0"
//!
//! # Browse
//! url-registry list
//! url-registry show promo
//! url-registry stats
//!
//! # Delete a record
//! url-registry delete promo
//! ```
//!
//! # Environment Variables
//!
//! See [`url_registry::config`] for the full list.

use url_registry::application::services::{
    BatchEntry, BatchItem, RedirectOutcome, UrlRegistry, follow, shorten_batch,
};
use url_registry::config::{self, Config, StoreBackend};
use url_registry::domain::clock::SystemClock;
use url_registry::domain::entities::UrlRecord;
use url_registry::domain::repositories::MirrorStore;
use url_registry::infrastructure::persistence::{FileStore, MemoryStore, RedisStore};
use url_registry::telemetry::{self, LogBuffer};
use url_registry::utils::short_url::short_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

type Registry = UrlRegistry<Box<dyn MirrorStore>, SystemClock>;

/// Short-code registry with expiry and click analytics.
#[derive(Parser)]
#[command(name = "url-registry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print log entries captured during the command
    #[arg(long, global = true)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten one or more URLs
    Shorten {
        /// URLs to shorten (at most 5)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Validity in minutes for every URL (default from config)
        #[arg(short, long)]
        validity: Option<String>,

        /// Custom short code, matched to URLs by position
        #[arg(short = 'c', long = "code")]
        codes: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow a short code and record a click
    Open {
        code: String,

        /// User agent to record with the click
        #[arg(short, long)]
        user_agent: Option<String>,
    },

    /// List all short URLs, newest first
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one short URL with its click history
    Show { code: String },

    /// Show aggregate statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a short URL
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Failed to load configuration")?;
    let log_buffer = LogBuffer::new(config.log_buffer_capacity);
    telemetry::init_tracing(&config, &log_buffer)?;
    config.print_summary();

    let store = open_store(&config)?;
    let settings = config.registry_settings()?;
    let mut registry: Registry = UrlRegistry::init(store, SystemClock, settings);

    let result = match cli.command {
        Commands::Shorten {
            urls,
            validity,
            codes,
            json,
        } => handle_shorten(&mut registry, &config, urls, validity, codes, json),
        Commands::Open { code, user_agent } => {
            handle_open(&mut registry, &code, user_agent.as_deref())
        }
        Commands::List { json } => handle_list(&mut registry, &config, json),
        Commands::Show { code } => handle_show(&mut registry, &config, &code),
        Commands::Stats { json } => handle_stats(&registry, json),
        Commands::Delete { code, yes } => handle_delete(&mut registry, &code, yes),
    };

    if cli.logs {
        print_logs(&log_buffer);
    }

    result
}

/// Builds the configured mirror backend.
fn open_store(config: &Config) -> Result<Box<dyn MirrorStore>> {
    let store: Box<dyn MirrorStore> = match config.store_backend {
        StoreBackend::File => Box::new(FileStore::new(&config.store_dir)),
        StoreBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis backend")?;
            let store = RedisStore::connect(redis_url, config.redis_key_prefix.clone())
                .context("Failed to connect to Redis")?;
            Box::new(store)
        }
        StoreBackend::Memory => Box::new(MemoryStore::new()),
    };

    Ok(store)
}

/// Shortens every URL as one batch and prints per-entry results.
fn handle_shorten(
    registry: &mut Registry,
    config: &Config,
    urls: Vec<String>,
    validity: Option<String>,
    codes: Vec<String>,
    json: bool,
) -> Result<()> {
    let entries = batch_entries(urls, validity, codes)?;

    let report = shorten_batch(registry, entries, &config.base_url)
        .map_err(|e| anyhow::anyhow!("Failed to shorten URLs: {}", e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "🔗 Shorten URLs".bright_blue().bold());
    println!();

    for item in &report.items {
        match item {
            BatchItem::Success {
                original_url,
                short_url,
                expires_at,
                ..
            } => {
                println!("  {} {}", "✅".green(), original_url.bright_white());
                println!("     Short URL: {}", short_url.bright_yellow().bold());
                println!(
                    "     Expires:   {}",
                    expires_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
                );
            }
            BatchItem::Failure {
                original_url,
                error,
            } => {
                println!("  {} {}", "❌".red(), original_url.bright_white());
                println!("     {}: {}", error.code.red(), error.message);
            }
        }
    }

    println!();
    println!(
        "  Successful: {}  Failed: {}",
        report.summary.successful.to_string().bright_green().bold(),
        report.summary.failed.to_string().red().bold()
    );
    println!();

    Ok(())
}

/// Pairs URLs with custom codes by position.
///
/// # Errors
///
/// Returns an error if more codes than URLs are given.
fn batch_entries(
    urls: Vec<String>,
    validity: Option<String>,
    codes: Vec<String>,
) -> Result<Vec<BatchEntry>> {
    if codes.len() > urls.len() {
        anyhow::bail!(
            "Got {} custom codes for {} URLs; each --code needs a URL",
            codes.len(),
            urls.len()
        );
    }

    let mut codes = codes.into_iter();
    let entries = urls
        .into_iter()
        .map(|url| BatchEntry {
            original_url: url,
            validity_minutes: validity.clone(),
            custom_short_code: codes.next(),
        })
        .collect();

    Ok(entries)
}

/// Follows a short code the way a visitor would.
fn handle_open(registry: &mut Registry, code: &str, user_agent: Option<&str>) -> Result<()> {
    match follow(registry, code, user_agent) {
        RedirectOutcome::Redirect { original_url } => {
            println!("{} {}", "➡️ ".green(), original_url.bright_white().bold());
            Ok(())
        }
        RedirectOutcome::NotFound => anyhow::bail!("Short code '{}' not found", code),
        RedirectOutcome::Expired { expires_at } => anyhow::bail!(
            "Short code '{}' expired at {}",
            code,
            expires_at.format("%Y-%m-%d %H:%M")
        ),
        RedirectOutcome::ClickRejected => {
            anyhow::bail!("Failed to record click for '{}'", code)
        }
    }
}

/// Lists every record with its status.
///
/// # Output Format
///
/// ```text
/// 📋 Short URLs
///
///   Code         Created           Expires           Clicks  Status
///   ──────────────────────────────────────────────────────────────────
///   promo        2024-01-15 10:30  2024-01-15 11:00  3       ACTIVE
/// ```
fn handle_list(registry: &mut Registry, config: &Config, json: bool) -> Result<()> {
    let records = registry.list();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{}", "📋 Short URLs".bright_blue().bold());
    println!();

    if records.is_empty() {
        println!("{}", "  No short URLs found".yellow());
        println!();
        println!("  Create one with: {}", "url-registry shorten <URL>".bright_cyan());
        return Ok(());
    }

    println!(
        "  {:<12} {:<17} {:<17} {:<7} {:<8}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(66).bright_black());

    for record in &records {
        println!(
            "  {:<12} {:<17} {:<17} {:<7} {}",
            record.short_code.cyan(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record
                .expires_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            record.click_count(),
            status(record)
        );
        println!(
            "  {:<12} {} {}",
            "",
            short_url(&config.base_url, &record.short_code).bright_yellow(),
            format!("→ {}", record.original_url).bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Shows one record and its click history.
fn handle_show(registry: &mut Registry, config: &Config, code: &str) -> Result<()> {
    let record = registry
        .resolve(code)
        .with_context(|| format!("Short code '{}' not found", code))?;

    println!("{}", "🔎 Short URL".bright_blue().bold());
    println!();
    println!("  Code:      {}", record.short_code.cyan());
    println!(
        "  Short URL: {}",
        short_url(&config.base_url, &record.short_code).bright_yellow()
    );
    println!("  Target:    {}", record.original_url.bright_white());
    println!(
        "  Created:   {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!(
        "  Expires:   {} ({} min)",
        record.expires_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
        record.validity_minutes
    );
    println!("  Custom:    {}", if record.is_custom { "yes" } else { "no" });
    println!("  Status:    {}", status(&record));
    println!();

    if record.clicks.is_empty() {
        println!("{}", "  No clicks recorded".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<20} {:<10} {:<16} {}",
        "Time".bright_white().bold(),
        "Source".bright_white().bold(),
        "Location".bright_white().bold(),
        "User agent".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for click in &record.clicks {
        println!(
            "  {:<20} {:<10} {:<16} {}",
            click
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            click.source.cyan(),
            click.location,
            click.user_agent.bright_black()
        );
    }

    println!();
    println!(
        "  Clicks: {}",
        record.click_count().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays aggregate statistics.
fn handle_stats(registry: &Registry, json: bool) -> Result<()> {
    let stats = registry.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!(
        "  Total URLs:    {}",
        stats.total.to_string().bright_green().bold()
    );
    println!(
        "  Active:        {}",
        stats.active.to_string().bright_green().bold()
    );
    println!(
        "  Expired:       {}",
        stats.expired.to_string().red().bold()
    );
    println!(
        "  Total clicks:  {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Deletes a record after confirmation.
fn handle_delete(registry: &mut Registry, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short URL".bright_blue().bold());
    println!();

    let record = registry
        .resolve(code)
        .with_context(|| format!("Short code '{}' not found", code))?;

    println!("  Code:   {}", record.short_code.cyan());
    println!("  Target: {}", record.original_url.bright_white());
    println!("  Clicks: {}", record.click_count().to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    if !registry.remove(code) {
        anyhow::bail!("Short code '{}' not found", code);
    }

    println!();
    println!("{}", "✅ Short URL deleted".green().bold());
    println!();

    Ok(())
}

fn status(record: &UrlRecord) -> ColoredString {
    if record.expired {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    }
}

/// Prints captured log entries, oldest first.
fn print_logs(buffer: &LogBuffer) {
    println!("{}", "📜 Logs".bright_blue().bold());
    println!();

    for entry in buffer.entries().iter().rev() {
        let level = match entry.level.as_str() {
            "ERROR" => entry.level.red(),
            "WARN" => entry.level.yellow(),
            "INFO" => entry.level.green(),
            _ => entry.level.bright_black(),
        };

        println!(
            "  {} {:<5} {:<12} {}",
            entry
                .timestamp
                .format("%H:%M:%S%.3f")
                .to_string()
                .bright_black(),
            level,
            entry.source.cyan(),
            entry.message
        );
    }

    println!();
}
