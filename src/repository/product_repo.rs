//! Product repository (数据库访问层)

use crate::{error::AppError, models::product::*};
use sqlx::AnyPool;

pub struct ProductRepository {
    db: AnyPool,
}

impl ProductRepository {
    pub fn new(db: AnyPool) -> Self {
        Self { db }
    }

    /// 列出商品，可按分类过滤
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, AppError> {
        let products = match category {
            Some(category) => {
                sqlx::query_as::<_, Product>(
                    "SELECT * FROM products WHERE category = $1 ORDER BY name, id",
                )
                .bind(category)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name, id")
                    .fetch_all(&self.db)
                    .await?
            }
        };

        Ok(products)
    }

    /// 根据 ID 查找商品
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(product)
    }

    /// 创建商品
    pub async fn create(&self, req: &CreateProductRequest) -> Result<Product, AppError> {
        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: req.name.clone(),
            description: req.description.clone(),
            retail_price: req.retail_price,
            wholesale_price: req.wholesale_price,
            category: req.category.clone(),
            stock: req.stock,
            pic_url: req.pic_url.clone(),
        };

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, retail_price, wholesale_price, category, stock, pic_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.retail_price)
        .bind(product.wholesale_price)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.pic_url)
        .execute(&self.db)
        .await?;

        Ok(product)
    }

    /// 保存（整行更新）商品
    pub async fn update(&self, product: &Product) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                name = $2,
                description = $3,
                retail_price = $4,
                wholesale_price = $5,
                category = $6,
                stock = $7,
                pic_url = $8
            WHERE id = $1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.retail_price)
        .bind(product.wholesale_price)
        .bind(&product.category)
        .bind(product.stock)
        .bind(&product.pic_url)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 删除商品
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
