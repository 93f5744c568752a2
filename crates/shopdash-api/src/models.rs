// Wire types for the catalogue API.
//
// Field names follow the API's camelCase JSON. Timestamps are optional
// because older records and some mock servers omit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric product identifier as used in `<products>/<id>` paths.
pub type ProductId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub creation_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// First image URL, used as the list thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Create/update body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: u64,
    pub images: Vec<String>,
}

impl From<&Product> for ProductForm {
    fn from(p: &Product) -> Self {
        Self {
            title: p.title.clone(),
            price: p.price,
            description: p.description.clone(),
            category_id: p.category.id,
            images: p.images.clone(),
        }
    }
}

/// Authenticated user profile from `<auth>/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub creation_at: Option<DateTime<Utc>>,
}

/// Login response from `<auth>/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_parses_api_shape() {
        let raw = json!({
            "id": 42,
            "title": "Classic Tee",
            "price": 25,
            "description": "Soft cotton",
            "images": ["https://img.example/1.png", "https://img.example/2.png"],
            "creationAt": "2024-01-10T12:00:00.000Z",
            "updatedAt": "2024-01-10T12:00:00.000Z",
            "category": { "id": 1, "name": "Clothes", "image": "https://img.example/c.png" }
        });

        let p: Product = serde_json::from_value(raw).unwrap();
        assert_eq!(p.id, 42);
        assert!((p.price - 25.0).abs() < f64::EPSILON);
        assert_eq!(p.category.name, "Clothes");
        assert_eq!(p.thumbnail(), Some("https://img.example/1.png"));
        assert!(p.creation_at.is_some());
    }

    #[test]
    fn form_serializes_category_id_camel_case() {
        let form = ProductForm {
            title: "Mug".into(),
            price: 9.5,
            description: "Ceramic".into(),
            category_id: 3,
            images: vec!["https://img.example/mug.png".into()],
        };
        let v = serde_json::to_value(&form).unwrap();
        assert_eq!(v["categoryId"], 3);
        assert_eq!(v["title"], "Mug");
    }

    #[test]
    fn form_from_product_copies_editable_fields() {
        let p = Product {
            id: 7,
            title: "Lamp".into(),
            price: 40.0,
            description: "Desk lamp".into(),
            category: Category {
                id: 2,
                name: "Electronics".into(),
                image: None,
            },
            images: vec!["a".into()],
            creation_at: None,
            updated_at: None,
        };
        let form = ProductForm::from(&p);
        assert_eq!(form.title, "Lamp");
        assert_eq!(form.category_id, 2);
        assert_eq!(form.images, vec!["a".to_owned()]);
    }
}
