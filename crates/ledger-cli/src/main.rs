use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::{Block, Submission};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "CLI client for the proof-of-work ledger node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:8080)
    #[arg(long, global = true, env = "LEDGER_NODE", default_value = "http://127.0.0.1:8080")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the node's current chain
    Chain,
    /// Mine a block carrying the given data
    Submit {
        /// Payload stored in the block
        #[arg(long)]
        data: String,
    },
    /// Offer a competing chain read from a JSON file
    Offer {
        /// Path to a JSON array of blocks
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Serialize)]
struct Payload {
    data: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    match cli.cmd {
        Command::Chain => {
            let blocks: Vec<Block> = client
                .get(format!("{}/", cli.node))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        Command::Submit { data } => {
            let res = client
                .post(format!("{}/", cli.node))
                .json(&Payload { data })
                .send()
                .await?;
            let status = res.status();
            debug!(%status, "submit response");
            let submission: Submission = res.error_for_status()?.json().await?;
            let verdict = if submission.accepted { "accepted" } else { "rejected" };
            println!("status: {status} ({verdict})");
            println!("{}", serde_json::to_string_pretty(&submission.block)?);
        }
        Command::Offer { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let blocks: Vec<Block> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {} as a block list", file.display()))?;
            let res = client
                .post(format!("{}/chain", cli.node))
                .json(&blocks)
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            println!("status: {status}");
            println!("{body}");
        }
    }
    Ok(())
}
