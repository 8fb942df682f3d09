//! Database repository layer

pub mod product_repo;
pub mod user_repo;

pub use product_repo::*;
pub use user_repo::*;
