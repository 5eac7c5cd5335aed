//! Server configuration: command-line flags, each overridable from the
//! environment.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Development-only admin password; a warning is logged when it is in use.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Which store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// One JSON array in `--data-file`.
    File,
    /// A `products` table in the SQLite database at `--db-path`.
    Sqlite,
}

#[derive(Args, Clone)]
pub struct ServerConfig {
    /// Storage backend.
    #[arg(long, env = "YOSHON_BACKEND", value_enum, default_value_t = Backend::File, global = true)]
    pub backend: Backend,

    /// JSON data file for the file backend.
    #[arg(long, env = "YOSHON_DATA_FILE", default_value = "products.json", global = true)]
    pub data_file: PathBuf,

    /// SQLite database path for the sqlite backend.
    #[arg(long, env = "YOSHON_DB_PATH", default_value = "products.sqlite", global = true)]
    pub db_path: PathBuf,

    /// Listen address.
    #[arg(long, env = "YOSHON_LISTEN", default_value = "0.0.0.0:3000", global = true)]
    pub listen: String,

    /// Shared secret required by write routes.
    #[arg(
        long,
        env = "ADMIN_PASSWORD",
        default_value = DEFAULT_ADMIN_PASSWORD,
        hide_env_values = true,
        global = true
    )]
    pub admin_password: String,
}

impl ServerConfig {
    pub fn uses_default_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}
