pub mod api;
pub mod file_store;
pub mod model;
pub mod service;
pub mod sql_store;
pub mod store;

use std::sync::Arc;

use axum::Router;
use yoshon_core::{Authenticator, Module};

use api::AppState;
use service::ProductService;
use store::ProductStore;

pub use file_store::FileProductStore;
pub use model::{DEFAULT_YOSHON, Product, ProductFields, ProductInput};
pub use sql_store::SqlProductStore;

/// The product catalog module: CRUD over one [`ProductStore`], with writes
/// gated by an [`Authenticator`].
pub struct ProductModule {
    service: Arc<ProductService>,
    auth: Arc<dyn Authenticator>,
}

impl ProductModule {
    pub fn new(store: Arc<dyn ProductStore>, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            service: Arc::new(ProductService::new(store)),
            auth,
        }
    }

    /// Get a reference to the service for programmatic access.
    pub fn service(&self) -> &Arc<ProductService> {
        &self.service
    }
}

impl Module for ProductModule {
    fn name(&self) -> &str {
        "product"
    }

    fn routes(&self) -> Router {
        api::router(AppState {
            service: Arc::clone(&self.service),
            auth: Arc::clone(&self.auth),
        })
    }
}
