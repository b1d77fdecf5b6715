//! Server configuration from command-line flags and environment.

use classroll_core::db::{open_db, open_db_in_memory, DbResult};
use clap::Parser;
use rusqlite::Connection;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Path value that selects an in-memory store.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

/// Runtime settings for `classroll-server`.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "classroll-server", version, about = "Class roll registry HTTP server")]
pub struct ServerConfig {
    /// SQLite database file; `:memory:` keeps everything in memory.
    #[arg(long, env = "CLASSROLL_DB_PATH", default_value = "classroll.sqlite3")]
    pub db_path: String,

    /// Address to bind.
    #[arg(long, env = "CLASSROLL_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(long, env = "CLASSROLL_PORT", default_value_t = 5000)]
    pub port: u16,

    /// trace|debug|info|warn|error; defaults per build mode.
    #[arg(long, env = "CLASSROLL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when absent.
    #[arg(long, env = "CLASSROLL_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| classroll_core::default_log_level())
    }

    /// Starts file or stderr logging according to `log_dir`.
    ///
    /// # Errors
    /// - Returns the logging bootstrap message on an invalid level or directory.
    pub fn init_logging(&self) -> Result<(), String> {
        match self.log_dir.as_deref() {
            Some(dir) => classroll_core::init_logging(self.log_level(), dir),
            None => classroll_core::init_console_logging(self.log_level()),
        }
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        if self.db_path == IN_MEMORY_DB_PATH {
            open_db_in_memory()
        } else {
            open_db(&self.db_path)
        }
    }
}
