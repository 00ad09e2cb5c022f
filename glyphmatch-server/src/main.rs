//! glyphmatch HTTP server binary.

use glyphmatch_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    glyphmatch_server::start_server(config).await?;
    Ok(())
}
