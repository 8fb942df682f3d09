//! 商品的 HTTP 处理器

use crate::{error::AppError, middleware::AppState, models::product::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// 列出商品
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = state
        .product_service
        .list(query.category.as_deref())
        .await?;

    Ok(Json(json!({
        "products": products,
        "count": products.len()
    })))
}

/// 获取商品详情
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_service.get(&id).await?;

    Ok(Json(product))
}

/// 创建商品
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_service.create(req).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// 更新商品
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let product = state.product_service.update(&id, req).await?;

    Ok(Json(product))
}

/// 删除商品
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.product_service.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
