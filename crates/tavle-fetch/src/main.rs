mod jira;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use jira::{FetchConfig, JiraClient};

#[derive(Parser)]
#[command(name = "tavle-fetch")]
#[command(about = "Pull tracker issues into a snapshot JSON for the tavle board", long_about = None)]
#[command(version)]
struct Cli {
    /// Tracker base URL, e.g. https://example.atlassian.net
    #[arg(long, env = "JIRA_BASE_URL")]
    base_url: String,

    /// Account email for basic auth
    #[arg(long, env = "JIRA_EMAIL")]
    email: String,

    /// API token for basic auth
    #[arg(long, env = "JIRA_API_TOKEN")]
    token: String,

    /// Search query selecting the issues to snapshot
    #[arg(long, env = "JIRA_JQL", default_value = "ORDER BY updated DESC")]
    jql: String,

    /// Upper bound on returned issues
    #[arg(long, env = "JIRA_MAX_RESULTS", default_value_t = 50)]
    max_results: usize,

    /// Where to write the snapshot
    #[arg(long, env = "OUTPUT_PATH", default_value = "data/jira.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let config = FetchConfig {
        base_url: cli.base_url,
        email: cli.email,
        token: cli.token,
        jql: cli.jql,
        max_results: cli.max_results,
    };

    let client = JiraClient::new(&config)?;
    let snapshot = client
        .fetch_snapshot(&config.jql, config.max_results)
        .await?;
    tracing::info!(
        "fetched {} issues (total reported: {:?})",
        snapshot.issues.len(),
        snapshot.total
    );

    if let Some(parent) = cli.output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let bytes = serde_json::to_vec_pretty(&snapshot).context("failed to encode snapshot")?;
    tokio::fs::write(&cli.output, bytes)
        .await
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("Wrote {}", cli.output.display());
    Ok(())
}
