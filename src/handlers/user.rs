//! 用户的 HTTP 处理器

use crate::{error::AppError, middleware::AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 获取用户
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.get(&id).await?;

    Ok(Json(user))
}
