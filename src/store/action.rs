use crate::api::{Article, ArticlesPage};
use crate::config::{Credentials, CredentialsPatch};
use crate::mvi::Action;

#[derive(Debug, Clone)]
pub enum StoreAction {
    /// Replace the article list and total count with a fetched page.
    ListArticles(ArticlesPage),
    /// Replace the entry matching `slug`, or insert `data` at the front.
    ArticleEntryReplace { slug: String, data: Article },
    /// Replace credentials wholesale. Unauthenticated payloads also clear
    /// every cached `favorited` flag.
    CredentialsNew(Credentials),
    /// Shallow-merge the present fields into the current credentials.
    CredentialsUpdate(CredentialsPatch),
}

impl Action for StoreAction {}

impl StoreAction {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListArticles(_) => "LIST_ARTICLES",
            Self::ArticleEntryReplace { .. } => "ARTICLE_ENTRY_REPLACE",
            Self::CredentialsNew(_) => "CREDENTIALS_NEW",
            Self::CredentialsUpdate(_) => "CREDENTIALS_UPDATE",
        }
    }
}
