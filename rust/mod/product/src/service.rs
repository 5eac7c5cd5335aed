use std::sync::Arc;

use tracing::info;

use yoshon_core::ServiceError;

use crate::model::{Product, ProductInput};
use crate::store::ProductStore;

/// Product operations: input validation and defaulting in front of
/// whichever [`ProductStore`] is configured.
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.store.list()
    }

    pub fn get_product(&self, id: i64) -> Result<Product, ServiceError> {
        self.store.get(id)
    }

    /// Create a product. Returns it together with the new total.
    pub fn create_product(&self, input: ProductInput) -> Result<(Product, usize), ServiceError> {
        let fields = input.validate()?;
        let product = self.store.create(fields)?;
        let total = self.store.count()?;
        info!(
            "created product {} ({} / {})",
            product.id, product.brand, product.product_name
        );
        Ok((product, total))
    }

    /// Replace all fields of product `id`.
    pub fn update_product(&self, id: i64, input: ProductInput) -> Result<Product, ServiceError> {
        let fields = input.validate()?;
        let product = self.store.update(id, fields)?;
        info!("updated product {}", id);
        Ok(product)
    }

    /// Delete product `id`. Returns it together with the remaining total.
    pub fn delete_product(&self, id: i64) -> Result<(Product, usize), ServiceError> {
        let product = self.store.delete(id)?;
        let total = self.store.count()?;
        info!("deleted product {}", id);
        Ok((product, total))
    }

    /// Replace the whole catalog. Entries are not validated; blanks are
    /// filled as described on [`ProductInput::into_fields`].
    pub fn replace_products(&self, entries: Vec<ProductInput>) -> Result<usize, ServiceError> {
        let fields = entries.into_iter().map(ProductInput::into_fields).collect();
        let total = self.store.replace_all(fields)?;
        info!("replaced catalog with {} products", total);
        Ok(total)
    }

    pub fn total(&self) -> Result<usize, ServiceError> {
        self.store.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_YOSHON;
    use crate::sql_store::SqlProductStore;
    use yoshon_sql::{SQLStore, SqliteStore};

    fn test_service() -> ProductService {
        let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        ProductService::new(Arc::new(SqlProductStore::new(db).unwrap()))
    }

    fn input(brand: Option<&str>, name: Option<&str>, yoshon: Option<&str>) -> ProductInput {
        ProductInput {
            brand: brand.map(Into::into),
            product_name: name.map(Into::into),
            yoshon: yoshon.map(Into::into),
        }
    }

    #[test]
    fn create_reports_running_total() {
        let svc = test_service();
        let (first, total) = svc.create_product(input(Some("Acme"), Some("Oats"), None)).unwrap();
        assert_eq!(total, 1);
        assert_eq!(first.yoshon, DEFAULT_YOSHON);

        let (_, total) = svc.create_product(input(Some("Acme"), Some("Flour"), Some("Yoshon"))).unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn invalid_input_leaves_store_untouched() {
        let svc = test_service();
        let err = svc.create_product(input(Some(""), Some("Oats"), None)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.total().unwrap(), 0);

        let (product, _) = svc.create_product(input(Some("Acme"), Some("Oats"), None)).unwrap();
        let err = svc.update_product(product.id, input(Some("Acme"), None, None)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.get_product(product.id).unwrap(), product);
    }

    #[test]
    fn update_validates_before_lookup() {
        let svc = test_service();
        let err = svc.update_product(404, input(None, None, None)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn delete_reports_remaining_total() {
        let svc = test_service();
        let (a, _) = svc.create_product(input(Some("Acme"), Some("Oats"), None)).unwrap();
        svc.create_product(input(Some("Acme"), Some("Flour"), None)).unwrap();

        let (removed, total) = svc.delete_product(a.id).unwrap();
        assert_eq!(removed, a);
        assert_eq!(total, 1);
    }

    #[test]
    fn replace_fills_blanks() {
        let svc = test_service();
        let total = svc
            .replace_products(vec![input(Some("Acme"), None, Some("")), input(None, Some("Oats"), None)])
            .unwrap();
        assert_eq!(total, 2);

        let products = svc.list_products().unwrap();
        assert_eq!(products[0].product_name, "");
        assert_eq!(products[0].yoshon, DEFAULT_YOSHON);
        assert_eq!(products[1].brand, "");
    }
}
