//! `classroll-server`: HTTP server for the class roll registry.
//!
//! ```bash
//! classroll-server --db-path ./classroll.sqlite3 --port 5000
//! CLASSROLL_DB_PATH=:memory: CLASSROLL_LOG_LEVEL=debug classroll-server
//! ```

use anyhow::anyhow;
use clap::Parser;
use classroll_api::{Server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    config
        .init_logging()
        .map_err(|err| anyhow!("logging bootstrap failed: {err}"))?;

    Server::build(&config)?.run().await
}
