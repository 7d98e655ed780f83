//! Vibemuse Music Server
//!
//! MCP server for music generation using the ElevenLabs Music API.

use anyhow::Result;
use clap::Parser;
use vibemuse_common::tracing::init_tracing;
use vibemuse_common::{Config, McpServerBuilder, TransportArgs};
use vibemuse_music::MusicServer;

#[derive(Parser, Debug)]
#[command(name = "vibemuse-music")]
#[command(about = "MCP server for music generation using the ElevenLabs Music API")]
struct Args {
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("vibemuse-music server starting...");

    let args = Args::parse();
    let config = Config::from_env()?;
    let server = MusicServer::new(config);
    let transport = args.transport.into_transport();

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    Ok(())
}
