use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use llm_gateway::cli::{listen_addr, Cli, Commands};
use llm_gateway::connector::api::{bind, serve, Container};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let container = Arc::new(Container::new(cli.container_config()?)?);

    match cli.command {
        Commands::Serve { host, port, public } => {
            info!(
                "Forwarding prompts to {} (default model {})",
                container.backend().endpoint_url(),
                container.backend().default_model()
            );
            let listener = bind(listen_addr(host, port, public)).await?;
            serve(container, listener).await?;
        }

        Commands::Ask { prompt, use_model } => {
            let result = container
                .ask_use_case()
                .ask(&prompt, use_model.as_deref())
                .await?;
            println!("{}", result.text());
        }
    }

    Ok(())
}
