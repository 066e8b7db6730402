//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `sitesentry` library:
//! - Command-line argument parsing
//! - Logger and crypto-provider initialization
//! - JSON output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use sitesentry::config::{Cli, Command, ExportFormat};
use sitesentry::export::{logs_to_csv, logs_to_json};
use sitesentry::initialization::{init_crypto_provider, init_logger_with};
use sitesentry::logs::{LogFilters, LogService};
use sitesentry::models::{MonitorSettings, Site};
use sitesentry::monitor::{HistoryOptions, MonitorService};
use sitesentry::storage::{
    init_db_pool, run_migrations, LogQuery, LogStore, SiteStore, SqliteStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;
    init_crypto_provider();

    if let Err(e) = run(cli).await {
        eprintln!("sitesentry error: {e:#}");
        process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let pool = init_db_pool(&cli.db)
        .await
        .context("Failed to initialize database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    let store = Arc::new(SqliteStore::new(pool));
    let logs = LogService::new(store.clone());
    let monitor = MonitorService::new(store.clone(), logs.clone())
        .context("Failed to initialize monitor")?;

    match cli.command {
        Command::Check {
            url,
            keywords,
            no_ssl,
            no_performance,
            user,
        } => {
            let site = ad_hoc_site(&url, keywords, no_ssl, no_performance, user)?;
            store
                .insert_site(&site)
                .await
                .context("Failed to register site")?;

            let result = monitor.run_full_check(&site.id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::History { site_id, limit } => {
            let options = HistoryOptions {
                limit,
                ..Default::default()
            };
            let history = monitor.get_history(&site_id, &options).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        Command::Overview => {
            let sites = store.list_all().await.context("Failed to list sites")?;
            let overview = monitor.get_admin_overview(&sites).await;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        Command::Logs {
            user,
            page,
            limit,
            entry_type,
            action,
        } => {
            let filters = LogFilters {
                entry_type,
                action,
                page: Some(page),
                limit,
                ..Default::default()
            };
            let page = logs.get_user_logs(&user, &filters).await?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Export {
            user,
            format,
            output,
        } => {
            let query = LogQuery {
                user_id: Some(user),
                ..Default::default()
            };
            let entries = store.query(&query).await.context("Failed to read logs")?;
            let text = match format {
                ExportFormat::Json => logs_to_json(&entries)?,
                ExportFormat::Csv => logs_to_csv(&entries)?,
            };
            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{text}"),
            }
        }
    }

    Ok(())
}

/// Builds a site record for an ad-hoc CLI check, keyed by hostname so
/// repeated checks of the same URL share a history.
fn ad_hoc_site(
    url: &str,
    keywords: Vec<String>,
    no_ssl: bool,
    no_performance: bool,
    user: String,
) -> Result<Site> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
    let host = parsed
        .host_str()
        .with_context(|| format!("URL has no host: {url}"))?;

    let now = Utc::now();
    Ok(Site {
        id: format!("cli-{host}"),
        name: host.to_string(),
        url: url.to_string(),
        owner_user_id: user,
        status: "active".to_string(),
        ssl_check_enabled: !no_ssl,
        keywords,
        monitor_settings: MonitorSettings {
            check_performance: !no_performance,
            ..Default::default()
        },
        created_at: now,
        updated_at: now,
    })
}
