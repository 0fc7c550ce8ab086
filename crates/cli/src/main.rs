//! Paysweep CLI - Command-line interface for the Paysweep daemon
//!
//! Manual trigger surface: run a sweep now, or reconcile a single order.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9643";

#[derive(Parser)]
#[command(name = "paysweep")]
#[command(about = "Paysweep payment reconciliation CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "PAYSWEEP_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation sweep now
    Sweep,

    /// Manually reconcile a single order against the provider
    Reconcile {
        /// Order ID
        order_id: String,

        /// Admin token (required when the daemon is configured with one)
        #[arg(long, env = "PAYSWEEP_ADMIN_TOKEN")]
        token: Option<String>,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct SweepResult {
    checked: u32,
    reconciled: u32,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep => {
            println!("{}", "Running reconciliation sweep...".cyan().bold());
            println!();

            let result = call_rpc(&cli.rpc_url, "sweep.run.v1", json!({})).await?;
            let sweep_result: SweepResult = serde_json::from_value(result)?;

            println!("{}", "✓ Sweep completed".green().bold());
            println!();

            let table = Table::new(vec![sweep_result]).to_string();
            println!("{}", table);
        }

        Commands::Reconcile { order_id, token } => {
            let params = json!({
                "order_id": order_id,
                "admin_token": token,
            });

            match call_rpc(&cli.rpc_url, "order.reconcile.v1", params).await {
                Ok(result) => {
                    println!(
                        "{}",
                        format!("✓ Order {} reconciled", order_id).green().bold()
                    );
                    if let Some(message) = result.get("message").and_then(|v| v.as_str()) {
                        println!("  {}", message);
                    }
                }
                Err(e) => {
                    println!("{}", format!("✗ Order {} not reconciled", order_id).red());
                    println!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
