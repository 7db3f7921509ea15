use {
    clap::{Parser, ValueEnum},
    std::{net::SocketAddr, time::Duration},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    Postgres,
    Memory,
}

/// REST API over a catalog of pokemon documents.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Document store backend
    #[arg(long, env = "STORAGE", value_enum, default_value_t = StorageKind::Postgres)]
    pub storage: StorageKind,

    #[arg(long, env = "DATABASE_URL", default_value = "postgres://localhost:5432/pokemon")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing the request
    #[arg(long = "acquire-timeout", env = "DATABASE_ACQUIRE_TIMEOUT", default_value_t = 5)]
    pub acquire_timeout_secs: u64,

    /// HTTP worker threads, one per core when unset
    #[arg(long, env = "HTTP_WORKERS")]
    pub workers: Option<usize>,

    /// Log filter directives, e.g. `info,sqlx=warn`
    #[arg(long = "log", env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}
