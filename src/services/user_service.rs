//! 用户服务

use crate::{error::AppError, models::user::UserResponse, repository::user_repo::UserRepository};
use sqlx::AnyPool;

pub struct UserService {
    db: AnyPool,
}

impl UserService {
    pub fn new(db: AnyPool) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: &str) -> Result<UserResponse, AppError> {
        UserRepository::new(self.db.clone())
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(AppError::NotFound)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<UserResponse, AppError> {
        UserRepository::new(self.db.clone())
            .find_by_username(username)
            .await?
            .map(UserResponse::from)
            .ok_or(AppError::NotFound)
    }
}
