pub mod cache;
pub mod credentials;
pub mod loader;
pub mod types;

pub use cache::{CacheError, CredentialCache};
pub use credentials::{Credentials, CredentialsPatch, SecureString};
pub use loader::ConfigError;
pub use types::{ApiConfig, Config, StorageConfig, ValidationConfig};
