use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use sakina_pipeline::{config, server, PromptSet, ResponsePipeline, RigClient, ServiceConfig};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "sakina-service",
    about = "Safety-gated response pipeline for the Sakina wellbeing companion"
)]
struct Args {
    /// Address to bind the HTTP boundary on.
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = ServiceConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let client = Arc::new(RigClient::from_config(&config)?);

    if !config::check_endpoint(&config.provider.base_url).await {
        warn!(base_url = %config.provider.base_url, "completion endpoint not reachable at startup");
    }

    let pipeline = Arc::new(ResponsePipeline::new(
        client,
        &config,
        PromptSet::default(),
    ));

    info!(
        bind = %args.bind,
        generator = %config.generator.model,
        validator = %config.validator.model,
        "sakina-service starting"
    );

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, server::router(pipeline)).await?;
    Ok(())
}
