use yoshon_core::ServiceError;

use crate::model::{Product, ProductFields};

/// Product persistence keyed by identifier.
///
/// Implemented by [`crate::file_store::FileProductStore`] and
/// [`crate::sql_store::SqlProductStore`]; the HTTP layer only sees this trait.
pub trait ProductStore: Send + Sync {
    /// All products, in storage order.
    fn list(&self) -> Result<Vec<Product>, ServiceError>;

    /// A single product. `NotFound` if the id is unknown.
    fn get(&self, id: i64) -> Result<Product, ServiceError>;

    /// Insert a product and return it with its assigned id.
    fn create(&self, fields: ProductFields) -> Result<Product, ServiceError>;

    /// Replace all fields of an existing product. `NotFound` if the id is unknown.
    fn update(&self, id: i64, fields: ProductFields) -> Result<Product, ServiceError>;

    /// Remove a product and return it. `NotFound` if the id is unknown.
    fn delete(&self, id: i64) -> Result<Product, ServiceError>;

    /// Discard the whole collection and store `entries` in its place.
    /// Returns the new total.
    fn replace_all(&self, entries: Vec<ProductFields>) -> Result<usize, ServiceError>;

    /// Number of stored products.
    fn count(&self) -> Result<usize, ServiceError>;
}
