// Service exports
pub mod auth;
pub mod cache;
pub mod notify;
pub mod postgres;

pub use auth::{AuthConfig, AuthUser};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use notify::{Notifier, NotifyError};
pub use postgres::{PostgresClient, PostgresError};
