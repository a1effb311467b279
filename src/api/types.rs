//! Wire models for the blog REST API.
//!
//! Field names follow the server's camelCase JSON. Request bodies are wrapped
//! in `{"user": ..}` / `{"article": ..}` envelopes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Credentials, CredentialsPatch, SecureString};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
    pub author: Author,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub favorites_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// The value shown while a favorite request is in flight.
    ///
    /// The count grows by the new `favorited` flag taken as 0/1, so
    /// un-favoriting leaves it unchanged until the server answers.
    pub fn with_favorite_toggled(&self) -> Self {
        let favorited = !self.favorited;
        Self {
            favorited,
            favorites_count: self.favorites_count.saturating_add(u32::from(favorited)),
            ..self.clone()
        }
    }

    /// Tags worth rendering; blank entries are skipped.
    pub fn visible_tags(&self) -> impl Iterator<Item = &str> {
        self.tag_list
            .iter()
            .map(String::as_str)
            .filter(|tag| !tag.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesPage {
    pub articles: Vec<Article>,
    pub articles_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub token: SecureString,
}

impl User {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: Some(self.username.clone()),
            email: self.email.clone(),
            image: self.image.clone().filter(|i| !i.is_empty()),
            token: Some(self.token.clone()),
        }
    }

    pub fn credentials_patch(&self) -> CredentialsPatch {
        CredentialsPatch {
            username: Some(self.username.clone()),
            email: self.email.clone(),
            image: Some(self.image.clone().filter(|i| !i.is_empty())),
            token: Some(self.token.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Serialized as `null` to remove the avatar.
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UserEnvelope<T> {
    pub user: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ArticleEnvelope<T> {
    pub article: T,
}

/// Per-field messages from a 422 response, keyed by server field name.
pub type FieldMessages = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorText {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorsEnvelope {
    errors: BTreeMap<String, ErrorText>,
}

impl ErrorsEnvelope {
    pub fn into_messages(self) -> FieldMessages {
        self.errors
            .into_iter()
            .map(|(field, text)| {
                let message = match text {
                    ErrorText::One(message) => message,
                    ErrorText::Many(messages) => messages.join(", "),
                };
                (field, message)
            })
            .collect()
    }
}
