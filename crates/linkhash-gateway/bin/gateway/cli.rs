use clap::{Parser, ValueEnum};
use linkhash_shortener::DEFAULT_MAX_ATTEMPTS;
use linkhash_storage::postgres::DEFAULT_TABLE_NAME;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const TRANSPORT_ENV: &str = "LINKHASH_TRANSPORT";
pub const LISTEN_ADDR_ENV: &str = "LINKHASH_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "LINKHASH_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "LINKHASH_STORAGE_BACKEND";
pub const POSTGRES_DSN_ENV: &str = "LINKHASH_POSTGRES_DSN";
pub const TABLE_NAME_ENV: &str = "LINKHASH_TABLE_NAME";
pub const MAX_ATTEMPTS_ENV: &str = "LINKHASH_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "LINKHASH_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    #[value(name = "grpc")]
    Grpc,
    #[value(name = "http")]
    Http,
}

impl Display for TransportArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportArg::Grpc => write!(f, "grpc"),
            TransportArg::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "linkhash-gateway")]
pub struct CLI {
    #[arg(
        long,
        env = TRANSPORT_ENV,
        value_enum,
        default_value_t = TransportArg::Grpc
    )]
    pub transport: TransportArg,

    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin used to build short URLs. Defaults to `http://<listen-addr>`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = POSTGRES_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_dsn: Option<String>,

    #[arg(long, env = TABLE_NAME_ENV, default_value = DEFAULT_TABLE_NAME)]
    pub table_name: String,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_attempts: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl CLI {
    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.listen_addr))
    }
}
