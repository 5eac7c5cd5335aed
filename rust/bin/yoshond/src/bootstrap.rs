//! Bootstrap: configuration checks, store opening and the `init` command.
//!
//! When yoshond starts:
//! 1. Refuse an empty admin password; warn about the development default.
//! 2. Open the configured store. A missing data file is fatal.

use std::sync::Arc;

use product::store::ProductStore;
use product::{FileProductStore, SqlProductStore};
use tracing::{info, warn};
use yoshon_sql::{SQLStore, SqliteStore};

use crate::config::{Backend, ServerConfig};

/// Verify server configuration is usable.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.admin_password.is_empty() {
        anyhow::bail!("Admin password is empty; set ADMIN_PASSWORD.");
    }
    if config.uses_default_password() {
        warn!("ADMIN_PASSWORD not set, using the development default; do not deploy this");
    }
    Ok(())
}

/// Open the configured store.
pub fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn ProductStore>> {
    match config.backend {
        Backend::File => {
            info!("Using file store at {}", config.data_file.display());
            let store = FileProductStore::open(&config.data_file)
                .map_err(|e| anyhow::anyhow!("failed to open data file: {}", e))?;
            Ok(Arc::new(store))
        }
        Backend::Sqlite => {
            info!("Using SQLite store at {}", config.db_path.display());
            Ok(Arc::new(open_sql_store(config)?))
        }
    }
}

fn open_sql_store(config: &ServerConfig) -> anyhow::Result<SqlProductStore> {
    let db: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open(&config.db_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    SqlProductStore::new(db).map_err(|e| anyhow::anyhow!("failed to initialise products table: {}", e))
}

/// Prepare storage for first use: an empty data file, or the products table.
/// Existing data is left alone.
pub fn init_storage(config: &ServerConfig) -> anyhow::Result<()> {
    match config.backend {
        Backend::File => {
            let created = FileProductStore::create_empty(&config.data_file)
                .map_err(|e| anyhow::anyhow!("failed to create data file: {}", e))?;
            // Opening validates existing content and assigns missing ids.
            FileProductStore::open(&config.data_file)
                .map_err(|e| anyhow::anyhow!("data file is not usable: {}", e))?;
            if created {
                info!("Created {}", config.data_file.display());
            } else {
                info!("{} already exists", config.data_file.display());
            }
        }
        Backend::Sqlite => {
            open_sql_store(config)?;
            info!("products table ready in {}", config.db_path.display());
        }
    }
    Ok(())
}
