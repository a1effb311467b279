use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::api::types::{
    Article, ArticleDraft, ArticleEnvelope, ArticlesPage, ErrorsEnvelope, LoginRequest, NewUser,
    User, UserEnvelope, UserUpdate,
};
use crate::config::{ApiConfig, SecureString};

/// Typed client for the blog REST API.
///
/// Every call is a single request with no retries and no cancellation; a
/// caller that stops waiting simply drops the future.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)));
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(u64::from(config.timeout_seconds)));
        }

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// GET `/articles`, with `?offset=N` only when the offset is non-zero.
    pub async fn list_articles(
        &self,
        offset: u64,
        token: Option<&SecureString>,
    ) -> Result<ArticlesPage, ApiError> {
        let mut url = self.endpoint(&["articles"]);
        if offset > 0 {
            url.query_pairs_mut().append_pair("offset", &offset.to_string());
        }
        self.send(self.request(Method::GET, url, token)).await
    }

    pub async fn get_article(
        &self,
        slug: &str,
        token: Option<&SecureString>,
    ) -> Result<Article, ApiError> {
        let url = self.endpoint(&["articles", slug]);
        let envelope: ArticleEnvelope<Article> =
            self.send(self.request(Method::GET, url, token)).await?;
        Ok(envelope.article)
    }

    pub async fn create_article(
        &self,
        draft: &ArticleDraft,
        token: &SecureString,
    ) -> Result<Article, ApiError> {
        let builder = self
            .request(Method::POST, self.endpoint(&["articles"]), Some(token))
            .json(&ArticleEnvelope { article: draft });
        let envelope: ArticleEnvelope<Article> = self.send(builder).await?;
        Ok(envelope.article)
    }

    pub async fn update_article(
        &self,
        slug: &str,
        draft: &ArticleDraft,
        token: &SecureString,
    ) -> Result<Article, ApiError> {
        let builder = self
            .request(Method::PUT, self.endpoint(&["articles", slug]), Some(token))
            .json(&ArticleEnvelope { article: draft });
        let envelope: ArticleEnvelope<Article> = self.send(builder).await?;
        Ok(envelope.article)
    }

    pub async fn delete_article(&self, slug: &str, token: &SecureString) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, self.endpoint(&["articles", slug]), Some(token))
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from(response).await)
    }

    /// POST (favorite) or DELETE (unfavorite) `/articles/:slug/favorite`.
    pub async fn set_favorite(
        &self,
        slug: &str,
        favorite: bool,
        token: &SecureString,
    ) -> Result<Article, ApiError> {
        let url = self.endpoint(&["articles", slug, "favorite"]);
        let method = if favorite { Method::POST } else { Method::DELETE };
        let envelope: ArticleEnvelope<Article> =
            self.send(self.request(method, url, Some(token))).await?;
        Ok(envelope.article)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let builder = self
            .request(Method::POST, self.endpoint(&["users", "login"]), None)
            .json(&UserEnvelope { user: request });
        let envelope: UserEnvelope<User> = self.send(builder).await?;
        Ok(envelope.user)
    }

    pub async fn register(&self, request: &NewUser) -> Result<User, ApiError> {
        let builder = self
            .request(Method::POST, self.endpoint(&["users"]), None)
            .json(&UserEnvelope { user: request });
        let envelope: UserEnvelope<User> = self.send(builder).await?;
        Ok(envelope.user)
    }

    pub async fn update_user(
        &self,
        update: &UserUpdate,
        token: &SecureString,
    ) -> Result<User, ApiError> {
        let builder = self
            .request(Method::PUT, self.endpoint(&["user"]), Some(token))
            .json(&UserEnvelope { user: update });
        let envelope: UserEnvelope<User> = self.send(builder).await?;
        Ok(envelope.user)
    }

    pub async fn current_user(&self, token: &SecureString) -> Result<User, ApiError> {
        let envelope: UserEnvelope<User> = self
            .send(self.request(Method::GET, self.endpoint(&["user"]), Some(token)))
            .await?;
        Ok(envelope.user)
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, token: Option<&SecureString>) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match token {
            Some(token) if !token.is_empty() => {
                builder.header(AUTHORIZATION, format!("Bearer {}", token.expose()))
            }
            _ => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "API response");

        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn error_from(response: Response) -> ApiError {
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => {
                let details = response.text().await.unwrap_or_default();
                if status == StatusCode::UNPROCESSABLE_ENTITY {
                    if let Ok(envelope) = serde_json::from_str::<ErrorsEnvelope>(&details) {
                        return ApiError::Validation(envelope.into_messages());
                    }
                }
                tracing::warn!(status = status.as_u16(), "API request failed");
                ApiError::status(status.as_u16(), details)
            }
        }
    }
}
