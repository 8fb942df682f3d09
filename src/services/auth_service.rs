//! 认证服务：注册、登录

use crate::{
    auth::{jwt::TokenIssuer, password::PasswordHasher},
    error::AppError,
    models::{auth::*, user::*},
    repository::user_repo::UserRepository,
};
use sqlx::AnyPool;
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    db: AnyPool,
    issuer: Arc<TokenIssuer>,
    hasher: Arc<PasswordHasher>,
    password_min_length: usize,
}

impl AuthService {
    pub fn new(
        db: AnyPool,
        issuer: Arc<TokenIssuer>,
        hasher: Arc<PasswordHasher>,
        password_min_length: usize,
    ) -> Self {
        Self {
            db,
            issuer,
            hasher,
            password_min_length,
        }
    }

    /// 注册新用户并直接签发令牌
    pub async fn register(&self, mut req: RegisterRequest) -> Result<LoginResponse, AppError> {
        // 先去掉首尾空白再校验长度
        req.username = req.username.trim().to_string();
        req.validate()?;

        if req.password.chars().count() < self.password_min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo.create(&req.username, &password_hash).await?;

        tracing::info!(username = %user.username, "User registered");

        self.respond_with_token(user)
    }

    /// 用户登录
    /// 用户不存在和密码错误返回同样的 401
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user: User = match user_repo.find_by_username(req.username.trim()).await? {
            Some(user) => user,
            None => {
                tracing::info!(username = %req.username, "Login failed: unknown user");
                return Err(self.hasher.reject_unknown(&req.password));
            }
        };

        if let Err(e) = self.hasher.verify(&req.password, &user.password_hash) {
            tracing::info!(username = %user.username, "Login failed: bad credentials");
            return Err(e);
        }

        tracing::info!(username = %user.username, "Login succeeded");

        self.respond_with_token(user)
    }

    fn respond_with_token(&self, user: User) -> Result<LoginResponse, AppError> {
        let token = self.issuer.issue(&user.username)?;

        Ok(LoginResponse {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user: UserResponse::from(user),
        })
    }
}
