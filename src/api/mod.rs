//! HTTP access to the blog service.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{describe_status, ApiError};
pub use types::{
    Article, ArticleDraft, ArticlesPage, Author, FieldMessages, LoginRequest, NewUser, User,
    UserUpdate,
};
