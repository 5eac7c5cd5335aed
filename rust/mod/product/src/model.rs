use serde::{Deserialize, Serialize};

use yoshon_core::ServiceError;

/// Yoshon status stored when the caller supplies none.
pub const DEFAULT_YOSHON: &str = "Status N/A Yet";

/// A catalog product as stored and served.
///
/// Wire keys are `id`, `Brand`, `Product Name` and `Yoshon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Yoshon")]
    pub yoshon: String,
}

/// The mutable fields of a product, already validated or defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub brand: String,
    pub product_name: String,
    pub yoshon: String,
}

impl ProductFields {
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            brand: self.brand,
            product_name: self.product_name,
            yoshon: self.yoshon,
        }
    }
}

/// Request body for create, update and bulk entries.
///
/// Unknown keys (such as `password` or a client-sent `id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "Brand", default)]
    pub brand: Option<String>,
    #[serde(rename = "Product Name", default)]
    pub product_name: Option<String>,
    #[serde(rename = "Yoshon", default)]
    pub yoshon: Option<String>,
}

impl ProductInput {
    /// Strict form used by create and update: Brand and Product Name must be
    /// present and non-empty.
    pub fn validate(self) -> Result<ProductFields, ServiceError> {
        let brand = self.brand.filter(|s| !s.is_empty());
        let product_name = self.product_name.filter(|s| !s.is_empty());

        match (brand, product_name) {
            (Some(brand), Some(product_name)) => Ok(ProductFields {
                brand,
                product_name,
                yoshon: yoshon_or_default(self.yoshon),
            }),
            _ => Err(ServiceError::Validation(
                "Brand and Product Name are required".into(),
            )),
        }
    }

    /// Lenient form used by bulk replace: missing names become empty strings.
    pub fn into_fields(self) -> ProductFields {
        ProductFields {
            brand: self.brand.unwrap_or_default(),
            product_name: self.product_name.unwrap_or_default(),
            yoshon: yoshon_or_default(self.yoshon),
        }
    }
}

fn yoshon_or_default(yoshon: Option<String>) -> String {
    yoshon
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_YOSHON.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: serde_json::Value) -> ProductInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validate_defaults_yoshon() {
        let fields = input(serde_json::json!({"Brand": "Acme", "Product Name": "Matzo Meal"}))
            .validate()
            .unwrap();
        assert_eq!(fields.yoshon, DEFAULT_YOSHON);

        let fields = input(serde_json::json!({"Brand": "Acme", "Product Name": "Matzo Meal", "Yoshon": ""}))
            .validate()
            .unwrap();
        assert_eq!(fields.yoshon, DEFAULT_YOSHON);
    }

    #[test]
    fn validate_keeps_given_yoshon() {
        let fields = input(serde_json::json!({"Brand": "Acme", "Product Name": "Oats", "Yoshon": "Yoshon"}))
            .validate()
            .unwrap();
        assert_eq!(fields.brand, "Acme");
        assert_eq!(fields.product_name, "Oats");
        assert_eq!(fields.yoshon, "Yoshon");
    }

    #[test]
    fn validate_rejects_missing_or_empty_names() {
        for body in [
            serde_json::json!({"Product Name": "Oats"}),
            serde_json::json!({"Brand": "Acme"}),
            serde_json::json!({"Brand": "", "Product Name": "Oats"}),
            serde_json::json!({"Brand": "Acme", "Product Name": ""}),
            serde_json::json!({}),
        ] {
            let err = input(body).validate().unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
    }

    #[test]
    fn lenient_fields_fill_blanks() {
        let fields = input(serde_json::json!({"Yoshon": "Not Yoshon"})).into_fields();
        assert_eq!(fields.brand, "");
        assert_eq!(fields.product_name, "");
        assert_eq!(fields.yoshon, "Not Yoshon");
    }

    #[test]
    fn product_wire_keys() {
        let product = ProductFields {
            brand: "Acme".into(),
            product_name: "Matzo Meal".into(),
            yoshon: DEFAULT_YOSHON.into(),
        }
        .into_product(3);
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 3,
                "Brand": "Acme",
                "Product Name": "Matzo Meal",
                "Yoshon": "Status N/A Yet",
            })
        );
    }

    #[test]
    fn input_ignores_password_and_id() {
        let fields = input(serde_json::json!({
            "id": 99,
            "password": "secret",
            "Brand": "Acme",
            "Product Name": "Oats",
        }))
        .validate()
        .unwrap();
        assert_eq!(fields.brand, "Acme");
    }
}
