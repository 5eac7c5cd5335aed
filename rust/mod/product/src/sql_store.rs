use std::sync::Arc;

use tracing::debug;

use yoshon_core::{ServiceError, now_rfc3339};
use yoshon_sql::{Row, SQLError, SQLStore, Statement, Value};

use crate::model::{Product, ProductFields};
use crate::store::ProductStore;

/// SQL schema for the products table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    "Brand"        TEXT NOT NULL,
    "Product Name" TEXT NOT NULL,
    "Yoshon"       TEXT NOT NULL DEFAULT 'Status N/A Yet',
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    UNIQUE ("Brand", "Product Name")
)
"#;

const COLUMNS: &str = r#"id, "Brand" AS brand, "Product Name" AS product_name, "Yoshon" AS yoshon"#;

const INSERT: &str = r#"INSERT INTO products ("Brand", "Product Name", "Yoshon", created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?4)"#;

/// Persistent storage for products, backed by SQLStore (SQLite).
pub struct SqlProductStore {
    db: Arc<dyn SQLStore>,
}

impl SqlProductStore {
    /// Create a new SqlProductStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec(SCHEMA, &[])
            .map_err(|e| ServiceError::Storage(format!("product schema init: {e}")))?;
        Ok(Self { db })
    }
}

fn storage(e: SQLError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("product {id} not found"))
}

fn field_params(fields: &ProductFields) -> [Value; 3] {
    [
        Value::Text(fields.brand.clone()),
        Value::Text(fields.product_name.clone()),
        Value::Text(fields.yoshon.clone()),
    ]
}

fn row_to_product(row: &Row) -> Result<Product, ServiceError> {
    let text = |name: &str| {
        row.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Internal(format!("product row missing {name}")))
    };

    Ok(Product {
        id: row
            .get_i64("id")
            .ok_or_else(|| ServiceError::Internal("product row missing id".into()))?,
        brand: text("brand")?,
        product_name: text("product_name")?,
        yoshon: text("yoshon")?,
    })
}

impl ProductStore for SqlProductStore {
    fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let rows = self
            .db
            .query(&format!("SELECT {COLUMNS} FROM products ORDER BY id"), &[])
            .map_err(storage)?;

        rows.iter().map(row_to_product).collect()
    }

    fn get(&self, id: i64) -> Result<Product, ServiceError> {
        let rows = self
            .db
            .query(
                &format!("SELECT {COLUMNS} FROM products WHERE id = ?1"),
                &[Value::Integer(id)],
            )
            .map_err(storage)?;

        rows.first().ok_or_else(|| not_found(id)).and_then(row_to_product)
    }

    fn create(&self, fields: ProductFields) -> Result<Product, ServiceError> {
        let [brand, product_name, yoshon] = field_params(&fields);
        let rows = self
            .db
            .query(
                &format!("{INSERT} RETURNING id"),
                &[brand, product_name, yoshon, Value::Text(now_rfc3339())],
            )
            .map_err(storage)?;

        let id = rows
            .first()
            .and_then(|r| r.get_i64("id"))
            .ok_or_else(|| ServiceError::Internal("insert returned no id".into()))?;

        debug!("inserted product {id}");
        Ok(fields.into_product(id))
    }

    fn update(&self, id: i64, fields: ProductFields) -> Result<Product, ServiceError> {
        let [brand, product_name, yoshon] = field_params(&fields);
        let affected = self
            .db
            .exec(
                r#"UPDATE products SET "Brand" = ?1, "Product Name" = ?2, "Yoshon" = ?3, updated_at = ?4
                   WHERE id = ?5"#,
                &[
                    brand,
                    product_name,
                    yoshon,
                    Value::Text(now_rfc3339()),
                    Value::Integer(id),
                ],
            )
            .map_err(storage)?;

        if affected == 0 {
            return Err(not_found(id));
        }
        Ok(fields.into_product(id))
    }

    fn delete(&self, id: i64) -> Result<Product, ServiceError> {
        // RETURNING yields exactly the affected rows.
        let rows = self
            .db
            .query(
                &format!("DELETE FROM products WHERE id = ?1 RETURNING {COLUMNS}"),
                &[Value::Integer(id)],
            )
            .map_err(storage)?;

        rows.first().ok_or_else(|| not_found(id)).and_then(row_to_product)
    }

    fn replace_all(&self, entries: Vec<ProductFields>) -> Result<usize, ServiceError> {
        let now = now_rfc3339();
        let mut statements = Vec::with_capacity(entries.len() + 1);
        statements.push(Statement::new("DELETE FROM products", vec![]));
        for fields in &entries {
            let [brand, product_name, yoshon] = field_params(fields);
            statements.push(Statement::new(
                INSERT,
                vec![brand, product_name, yoshon, Value::Text(now.clone())],
            ));
        }

        self.db.transaction(&statements).map_err(storage)?;
        self.count()
    }

    fn count(&self) -> Result<usize, ServiceError> {
        let rows = self
            .db
            .query("SELECT COUNT(*) AS cnt FROM products", &[])
            .map_err(storage)?;

        rows.first()
            .and_then(|r| r.get_i64("cnt"))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ServiceError::Internal("count query returned no row".into()))
    }
}
