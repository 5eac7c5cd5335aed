use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use tracing::{debug, info, warn};

use yoshon_core::ServiceError;

use crate::model::{Product, ProductFields};
use crate::store::ProductStore;

/// FileProductStore keeps the whole catalog as one JSON array in a file.
///
/// Every write rewrites the file. All operations hold `lock` for their full
/// read-modify-write, so concurrent requests cannot drop each other's updates.
///
/// Identifiers live in the file next to the product fields. Entries written
/// without an `id` are numbered `max(id) + 1` in array order when the store
/// is opened, and the file is rewritten once so those ids persist.
pub struct FileProductStore {
    path: PathBuf,
    lock: Mutex<()>,
}

/// On-disk record. Tolerates files written before ids existed.
#[derive(Deserialize)]
struct StoredProduct {
    #[serde(default)]
    id: Option<i64>,
    #[serde(rename = "Brand", default)]
    brand: String,
    #[serde(rename = "Product Name", default)]
    product_name: String,
    #[serde(rename = "Yoshon", default)]
    yoshon: String,
}

impl FileProductStore {
    /// Open an existing data file. Fails if the file does not exist.
    pub fn open(path: &Path) -> Result<Self, ServiceError> {
        if !path.is_file() {
            return Err(ServiceError::Storage(format!(
                "data file {} does not exist",
                path.display()
            )));
        }

        let store = Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        };

        {
            let _guard = store.guard()?;
            let (products, assigned) = store.load()?;
            if assigned > 0 {
                info!(
                    "assigned ids to {} products in {}",
                    assigned,
                    path.display()
                );
                store.write(&products)?;
            }
            debug!("file store opened with {} products", products.len());
        }

        Ok(store)
    }

    /// Create `path` holding an empty array unless it already exists.
    /// Returns whether a file was created.
    pub fn create_empty(path: &Path) -> Result<bool, ServiceError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_err(path, e))?;
        }
        fs::write(path, b"[]\n").map_err(|e| storage_err(path, e))?;
        Ok(true)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.lock
            .lock()
            .map_err(|e| ServiceError::Internal(format!("file store lock poisoned: {e}")))
    }

    /// Read and parse the file. Returns the products and how many of them
    /// needed a fresh id.
    fn load(&self) -> Result<(Vec<Product>, usize), ServiceError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            warn!("failed to read {}: {}", self.path.display(), e);
            storage_err(&self.path, e)
        })?;

        let stored: Vec<StoredProduct> = serde_json::from_str(&content).map_err(|e| {
            warn!("failed to parse {}: {}", self.path.display(), e);
            storage_err(&self.path, e)
        })?;

        let mut last_id = stored.iter().filter_map(|p| p.id).max().unwrap_or(0);
        let mut assigned = 0;
        let mut products = Vec::with_capacity(stored.len());
        for p in stored {
            let id = match p.id {
                Some(id) => id,
                None => {
                    last_id = last_id.checked_add(1).ok_or_else(ids_exhausted)?;
                    assigned += 1;
                    last_id
                }
            };
            products.push(Product {
                id,
                brand: p.brand,
                product_name: p.product_name,
                yoshon: p.yoshon,
            });
        }

        Ok((products, assigned))
    }

    fn read_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.load().map(|(products, _)| products)
    }

    /// Serialize the full array to a sibling temp file, then rename it over
    /// the data file.
    fn write(&self, products: &[Product]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(products)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        fs::write(&tmp, &data).map_err(|e| {
            warn!("failed to write {}: {}", tmp.display(), e);
            storage_err(&tmp, e)
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            warn!("failed to replace {}: {}", self.path.display(), e);
            storage_err(&self.path, e)
        })?;
        Ok(())
    }
}

fn storage_err(path: &Path, err: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(format!("{}: {}", path.display(), err))
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("product {id} not found"))
}

fn ids_exhausted() -> ServiceError {
    ServiceError::Storage("product id space exhausted".into())
}

fn next_id(products: &[Product]) -> Result<i64, ServiceError> {
    products
        .iter()
        .map(|p| p.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(ids_exhausted)
}

impl ProductStore for FileProductStore {
    fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let _guard = self.guard()?;
        self.read_all()
    }

    fn get(&self, id: i64) -> Result<Product, ServiceError> {
        let _guard = self.guard()?;
        self.read_all()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn create(&self, fields: ProductFields) -> Result<Product, ServiceError> {
        let _guard = self.guard()?;
        let mut products = self.read_all()?;
        let product = fields.into_product(next_id(&products)?);
        products.push(product.clone());
        self.write(&products)?;
        Ok(product)
    }

    fn update(&self, id: i64, fields: ProductFields) -> Result<Product, ServiceError> {
        let _guard = self.guard()?;
        let mut products = self.read_all()?;
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        *slot = fields.into_product(id);
        let updated = slot.clone();
        self.write(&products)?;
        Ok(updated)
    }

    fn delete(&self, id: i64) -> Result<Product, ServiceError> {
        let _guard = self.guard()?;
        let mut products = self.read_all()?;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;
        let removed = products.remove(index);
        self.write(&products)?;
        Ok(removed)
    }

    fn replace_all(&self, entries: Vec<ProductFields>) -> Result<usize, ServiceError> {
        let _guard = self.guard()?;
        // Continue numbering after the discarded collection. If it cannot be
        // read, it is overwritten and numbering restarts at 1.
        let first_id = match self.read_all().and_then(|old| next_id(&old)) {
            Ok(id) => id,
            Err(e) => {
                warn!("replacing {} without prior ids: {}", self.path.display(), e);
                1
            }
        };

        let mut products = Vec::with_capacity(entries.len());
        for (offset, fields) in entries.into_iter().enumerate() {
            let id = i64::try_from(offset)
                .ok()
                .and_then(|o| first_id.checked_add(o))
                .ok_or_else(ids_exhausted)?;
            products.push(fields.into_product(id));
        }
        self.write(&products)?;
        Ok(products.len())
    }

    fn count(&self) -> Result<usize, ServiceError> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.len())
    }
}
