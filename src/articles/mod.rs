//! Article detail, favorite, delete and publish flows.

pub mod editor;
pub mod pagination;

use thiserror::Error;

use crate::api::{ApiError, Article};
use crate::app::App;
use crate::store::StoreAction;

pub use editor::EditorForm;
pub use pagination::{offset_for_page, page_count, Pagination, PAGE_SIZE};

#[derive(Debug, Error)]
pub enum ArticleError {
    /// Terminal; no retry is offered
    #[error("Requested resource not found")]
    NotFound,

    #[error("You are not author of this article so you can't edit it")]
    NotAuthor,

    #[error("Not signed in")]
    NotSignedIn,

    /// Any other failed request, titled by its status class
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl ArticleError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ArticleError::Request { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Response text to show under the message.
    pub fn details(&self) -> Option<&str> {
        match self {
            ArticleError::Request { source, .. } => source.details(),
            _ => None,
        }
    }
}

impl From<ApiError> for ArticleError {
    fn from(source: ApiError) -> Self {
        match source {
            ApiError::NotFound => ArticleError::NotFound,
            source => ArticleError::Request {
                message: source.status_message(),
                source,
            },
        }
    }
}

/// Result of publishing the editor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Invalid,
    Published(Article),
}

impl App {
    /// Article `slug`, from the store when cached, otherwise fetched and cached.
    pub async fn load_article(&self, slug: &str) -> Result<Article, ArticleError> {
        if let Some(article) = self.store().with_state(|s| s.article(slug).cloned()) {
            return Ok(article);
        }

        let token = self.token();
        let article = self.api().get_article(slug, token.as_ref()).await?;
        self.store().dispatch(StoreAction::ArticleEntryReplace {
            slug: slug.to_string(),
            data: article.clone(),
        });
        Ok(article)
    }

    /// Flip the viewer's favorite on `slug`.
    ///
    /// The store shows the new value immediately. The server's article
    /// replaces it on success; on failure the prior entry is restored as it
    /// was.
    pub async fn toggle_favorite(&self, slug: &str) -> Result<Article, ArticleError> {
        let token = self.token().ok_or(ArticleError::NotSignedIn)?;
        let fallback = self.load_article(slug).await?;
        let optimistic = fallback.with_favorite_toggled();

        self.store().dispatch(StoreAction::ArticleEntryReplace {
            slug: slug.to_string(),
            data: optimistic.clone(),
        });

        match self
            .api()
            .set_favorite(slug, optimistic.favorited, &token)
            .await
        {
            Ok(article) => {
                self.store().dispatch(StoreAction::ArticleEntryReplace {
                    slug: slug.to_string(),
                    data: article.clone(),
                });
                Ok(article)
            }
            Err(e) => {
                tracing::warn!(slug, error = %e, "Favorite toggle failed, restoring");
                self.store().dispatch(StoreAction::ArticleEntryReplace {
                    slug: slug.to_string(),
                    data: fallback,
                });
                Err(e.into())
            }
        }
    }

    pub async fn delete_article(&self, slug: &str) -> Result<(), ArticleError> {
        let token = self.token().ok_or(ArticleError::NotSignedIn)?;
        self.api().delete_article(slug, &token).await?;
        tracing::info!(slug, "Article deleted");
        Ok(())
    }

    /// Editor for `slug`, prefilled. Only the author may edit.
    pub async fn open_editor(&self, slug: &str) -> Result<EditorForm, ArticleError> {
        if self.token().is_none() {
            return Err(ArticleError::NotSignedIn);
        }
        let article = self.load_article(slug).await?;
        if !self.store().with_state(|s| s.is_author_of(&article)) {
            return Err(ArticleError::NotAuthor);
        }
        Ok(EditorForm::for_article(&article))
    }

    /// Create or update the article behind `editor`.
    pub async fn publish_article(&self, editor: &mut EditorForm) -> Result<PublishOutcome, ArticleError> {
        let token = self.token().ok_or(ArticleError::NotSignedIn)?;
        let Some(values) = editor.form.submit().await else {
            return Ok(PublishOutcome::Invalid);
        };
        let draft = EditorForm::draft(&values);

        let article = match editor.slug() {
            Some(slug) => self.api().update_article(slug, &draft, &token).await?,
            None => self.api().create_article(&draft, &token).await?,
        };

        let key = editor.slug().unwrap_or(&article.slug).to_string();
        if self.store().with_state(|s| s.article(&key).is_some()) {
            self.store().dispatch(StoreAction::ArticleEntryReplace {
                slug: key,
                data: article.clone(),
            });
        }
        tracing::info!(slug = %article.slug, "Article published");
        Ok(PublishOutcome::Published(article))
    }
}
