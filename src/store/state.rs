use crate::api::Article;
use crate::config::Credentials;
use crate::mvi::State;

/// Client-visible server-derived state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    pub credentials: Credentials,
    /// Articles of the last listed page plus individually cached entries.
    pub articles: Vec<Article>,
    /// Total article count reported by the last list request.
    pub articles_count: u64,
}

impl State for StoreState {}

impl StoreState {
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials: credentials.normalized(),
            ..Default::default()
        }
    }

    pub fn article(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.slug == slug)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    /// Whether the signed-in viewer wrote `article`.
    pub fn is_author_of(&self, article: &Article) -> bool {
        self.is_authenticated()
            && self.credentials.username.as_deref() == Some(article.author.username.as_str())
    }
}
