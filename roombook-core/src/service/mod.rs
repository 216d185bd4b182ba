pub mod auth;
pub mod rate_limit;

pub use auth::{Claims, PasswordHasher, TokenValidator};
pub use rate_limit::{RateLimitError, RateLimiter};
