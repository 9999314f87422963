use clap::{Parser, Subcommand, ValueEnum};
use shortlink_storage::{PoolSettings, StorageConfig};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENVIRONMENT_ENV: &str = "SHORTLINK_ENV";
pub const STORAGE_BACKEND_ENV: &str = "SHORTLINK_STORAGE_BACKEND";
pub const SQLITE_PATH_ENV: &str = "SHORTLINK_SQLITE_PATH";
pub const POSTGRES_URL_ENV: &str = "SHORTLINK_POSTGRES_URL";
pub const MAX_CONNECTIONS_ENV: &str = "SHORTLINK_MAX_CONNECTIONS";

pub const DEFAULT_SQLITE_PATH: &str = "./storage/shortlink.db";
pub const DEFAULT_MAX_CONNECTIONS: &str = "5";

/// Deployment profile; decides log format and verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shortlink", about = "Manage stored short links")]
pub struct CLI {
    #[arg(
        long = "env",
        env = ENVIRONMENT_ENV,
        value_enum,
        default_value_t = Environment::Local
    )]
    pub environment: Environment,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = SQLITE_PATH_ENV, default_value = DEFAULT_SQLITE_PATH)]
    pub sqlite_path: PathBuf,

    #[arg(long, env = POSTGRES_URL_ENV, required_if_eq("storage", "postgres"))]
    pub postgres_url: Option<String>,

    #[arg(
        long,
        env = MAX_CONNECTIONS_ENV,
        default_value = DEFAULT_MAX_CONNECTIONS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_connections: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Store a new link; fails if the alias is taken.
    Save { target: String, alias: String },
    /// Print the target stored under an alias.
    Get { alias: String },
    /// Point an existing alias at a new target.
    Update { alias: String, target: String },
    /// Remove a link.
    Delete { alias: String },
    /// Print every stored link.
    List {
        #[arg(long)]
        json: bool,
    },
}

impl CLI {
    /// Builds the storage configuration selected by the flags.
    pub fn storage_config(&self) -> anyhow::Result<StorageConfig> {
        let pool = PoolSettings::builder()
            .max_connections(self.max_connections)
            .build();

        match self.storage {
            StorageBackendArg::Sqlite => Ok(StorageConfig::Sqlite {
                path: self.sqlite_path.clone(),
                pool,
            }),
            StorageBackendArg::Postgres => {
                let url = self.postgres_url.clone().ok_or_else(|| {
                    anyhow::anyhow!("postgres url is required when storage backend is postgres")
                })?;
                Ok(StorageConfig::Postgres { url, pool })
            }
        }
    }
}
