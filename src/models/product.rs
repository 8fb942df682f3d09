//! Product domain models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product (catalog entry)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub retail_price: f64,
    pub wholesale_price: f64,
    pub category: String,
    pub stock: i64,
    pub pic_url: String,
}

/// Create product request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub retail_price: f64,
    #[validate(range(min = 0.0))]
    pub wholesale_price: f64,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock: i64,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub pic_url: String,
}

/// Update product request (all fields optional)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub retail_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub wholesale_price: Option<f64>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i64>,
    #[validate(length(max = 500))]
    pub pic_url: Option<String>,
}

impl UpdateProductRequest {
    /// Apply the present fields onto an existing product
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(retail_price) = self.retail_price {
            product.retail_price = retail_price;
        }
        if let Some(wholesale_price) = self.wholesale_price {
            product.wholesale_price = wholesale_price;
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(pic_url) = &self.pic_url {
            product.pic_url = pic_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: "p1".to_string(),
            name: "WebCam".to_string(),
            description: "webcam".to_string(),
            retail_price: 850.95,
            wholesale_price: 800.0,
            category: "Webcam".to_string(),
            stock: 20,
            pic_url: "EXAMPLEURL.jpg".to_string(),
        }
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut product = sample();
        let update = UpdateProductRequest {
            stock: Some(5),
            retail_price: Some(799.0),
            ..Default::default()
        };

        update.apply(&mut product);
        assert_eq!(product.stock, 5);
        assert_eq!(product.retail_price, 799.0);
        assert_eq!(product.name, "WebCam");
        assert_eq!(product.wholesale_price, 800.0);
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateProductRequest {
            name: "Greenscreen".to_string(),
            description: String::new(),
            retail_price: 4000.0,
            wholesale_price: 3698.99,
            category: "Greenscreen".to_string(),
            stock: 20,
            pic_url: String::new(),
        };
        assert!(valid.validate().is_ok());

        let mut invalid = valid.clone();
        invalid.retail_price = -1.0;
        assert!(invalid.validate().is_err());

        let mut invalid = valid;
        invalid.name = String::new();
        assert!(invalid.validate().is_err());
    }
}
