//! Authentication module

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod secret;

pub use jwt::{Claims, IssuedToken, TokenIssuer, TokenValidator, ValidationPolicy, CLOCK_SKEW_SECS};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};
pub use password::PasswordHasher;
pub use secret::{SigningKey, SIGNING_KEY_LEN};
