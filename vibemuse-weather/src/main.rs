//! Vibemuse Weather Server
//!
//! MCP server for weather lookups using the OpenWeatherMap API.

use anyhow::Result;
use clap::Parser;
use vibemuse_common::tracing::init_tracing;
use vibemuse_common::{Config, McpServerBuilder, TransportArgs};
use vibemuse_weather::WeatherServer;

#[derive(Parser, Debug)]
#[command(name = "vibemuse-weather")]
#[command(about = "MCP server for weather lookups using the OpenWeatherMap API")]
struct Args {
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("vibemuse-weather server starting...");

    let args = Args::parse();
    let config = Config::from_env()?;
    let server = WeatherServer::new(config);
    let transport = args.transport.into_transport();

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    Ok(())
}
