mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use server::GithubDispatcher;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "tavle-relay")]
#[command(about = "Forwards tracker webhook events to a repository dispatch trigger", long_about = None)]
#[command(version)]
struct Cli {
    /// Bearer credential for the code-hosting API
    #[arg(long, env = "GITHUB_TOKEN")]
    token: String,

    /// Repository receiving the dispatch, e.g. acme/board
    #[arg(long, env = "GITHUB_REPO")]
    repo: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let dispatcher = Arc::new(GithubDispatcher::new(cli.repo.clone(), cli.token)?);
    let app = server::build_router(dispatcher);

    let listener = TcpListener::bind(("0.0.0.0", cli.port))
        .await
        .with_context(|| format!("failed to bind port {}", cli.port))?;
    tracing::info!(
        "webhook receiver listening on {} for {}",
        listener.local_addr()?,
        cli.repo
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
