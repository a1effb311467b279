//! Asynchronous store actions.

use thiserror::Error;

use crate::api::{ApiClient, ApiError, ArticlesPage};
use crate::articles::pagination::offset_for_page;
use crate::store::action::StoreAction;
use crate::store::handle::Store;

/// A failed fetch, already reduced to the text a view shows.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        self.source.is_retryable()
    }
}

/// Fetch list page `page` (1-based) and store it.
///
/// Sends the viewer's token when signed in so `favorited` is personalised.
/// Failures come back as a [`FetchError`] whose message names the status
/// class; the store is left untouched in that case.
pub async fn receive_articles(
    store: &Store,
    api: &ApiClient,
    page: u32,
) -> Result<ArticlesPage, FetchError> {
    let offset = offset_for_page(page);
    let token = store.with_state(|s| s.credentials.token.clone());

    match api.list_articles(offset, token.as_ref()).await {
        Ok(data) => {
            store.dispatch(StoreAction::ListArticles(data.clone()));
            Ok(data)
        }
        Err(source) => {
            let message = source.status_message();
            tracing::warn!(page, error = %source, "Failed to list articles");
            Err(FetchError { message, source })
        }
    }
}
