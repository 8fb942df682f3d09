//! Business logic services layer

pub mod auth_service;
pub mod product_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use product_service::ProductService;
pub use user_service::UserService;
