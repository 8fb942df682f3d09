//! 商品服务

use crate::{error::AppError, models::product::*, repository::product_repo::ProductRepository};
use sqlx::AnyPool;
use validator::Validate;

pub struct ProductService {
    db: AnyPool,
}

impl ProductService {
    pub fn new(db: AnyPool) -> Self {
        Self { db }
    }

    fn repo(&self) -> ProductRepository {
        ProductRepository::new(self.db.clone())
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, AppError> {
        self.repo().list(category).await
    }

    pub async fn get(&self, id: &str) -> Result<Product, AppError> {
        self.repo().find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, req: CreateProductRequest) -> Result<Product, AppError> {
        req.validate()?;

        let product = self.repo().create(&req).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    pub async fn update(&self, id: &str, req: UpdateProductRequest) -> Result<Product, AppError> {
        req.validate()?;

        let repo = self.repo();
        let mut product = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        req.apply(&mut product);

        if !repo.update(&product).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if !self.repo().delete(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
