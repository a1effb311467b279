//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use kata_blog::app::App;
use kata_blog::config::{Config, Credentials, CredentialCache, SecureString};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

pub const TOKEN: &str = "jwt.token.value";

/// Config pointing at `base_url` with the credential cache inside `dir`.
pub fn test_config(base_url: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.storage.credentials_path = Some(dir.path().join("credentials.json"));
    config
}

/// Anonymous client against `base_url`.
pub fn make_app(base_url: &str) -> (TempDir, App) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let app = App::new(test_config(base_url, &dir)).expect("Failed to build app");
    (dir, app)
}

/// Client whose credential cache already holds a session for `username`.
pub fn make_signed_in_app(base_url: &str, username: &str) -> (TempDir, App) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(base_url, &dir);
    CredentialCache::new(config.credentials_path())
        .save(&credentials(username))
        .expect("Failed to seed credential cache");
    let app = App::new(config).expect("Failed to build app");
    (dir, app)
}

pub fn credentials(username: &str) -> Credentials {
    Credentials {
        username: Some(username.to_string()),
        email: None,
        image: None,
        token: Some(SecureString::new(TOKEN)),
    }
}

pub fn article_value(slug: &str, author: &str, favorited: bool, favorites_count: u32) -> Value {
    json!({
        "slug": slug,
        "title": format!("Title of {}", slug),
        "description": "Short description",
        "body": "Body text",
        "tagList": ["rust", ""],
        "author": { "username": author, "image": null },
        "favorited": favorited,
        "favoritesCount": favorites_count,
        "updatedAt": "2024-03-01T10:00:00.000Z"
    })
}

pub fn article_json(slug: &str, author: &str, favorited: bool, favorites_count: u32) -> String {
    json!({ "article": article_value(slug, author, favorited, favorites_count) }).to_string()
}

/// A list page with `n` articles and the given total count.
pub fn page_json(n: usize, articles_count: u64) -> String {
    let articles: Vec<Value> = (0..n)
        .map(|i| article_value(&format!("post-{}", i), "author", false, 0))
        .collect();
    json!({ "articles": articles, "articlesCount": articles_count }).to_string()
}

pub fn user_json(username: &str, email: &str, image: Option<&str>) -> String {
    json!({
        "user": {
            "username": username,
            "email": email,
            "image": image,
            "token": TOKEN
        }
    })
    .to_string()
}
