//! Avatar URL check by actually loading the image.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

/// Something that can tell whether a URL serves a loadable image.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    /// Resolves to `false` for network errors, non-2xx responses and bodies
    /// that are not an image. Never errors.
    async fn probe(&self, url: &str) -> bool;
}

/// Enough leading bytes for `image::guess_format` to recognise any format.
const SNIFF_LEN: usize = 64;

/// Fetches the URL and sniffs the start of the body for a known image format.
///
/// Only the first chunks are read; the rest of the body is dropped unread.
#[derive(Debug, Clone, Default)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn probe(&self, url: &str) -> bool {
        let mut response = match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(url, status = response.status().as_u16(), "Image probe rejected");
                return false;
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "Image probe failed");
                return false;
            }
        };

        let mut head = Vec::with_capacity(SNIFF_LEN);
        while head.len() < SNIFF_LEN {
            match response.chunk().await {
                Ok(Some(chunk)) => head.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(url, error = %e, "Image probe body failed");
                    return false;
                }
            }
        }
        image::guess_format(&head).is_ok()
    }
}

/// Memoizes the last probed URL so resubmitting an unchanged avatar skips
/// the load.
#[derive(Clone)]
pub struct ImageCheck {
    probe: Arc<dyn ImageProbe>,
    last: Option<(String, bool)>,
}

impl ImageCheck {
    pub fn new(probe: Arc<dyn ImageProbe>) -> Self {
        Self { probe, last: None }
    }

    /// Result for `url` if it was the last URL checked.
    pub fn cached(&self, url: &str) -> Option<bool> {
        match &self.last {
            Some((checked, ok)) if checked == url => Some(*ok),
            _ => None,
        }
    }

    /// Load `url` unless its result is already known. Empty URLs pass.
    pub async fn check(&mut self, url: &str) -> bool {
        if url.is_empty() {
            return true;
        }
        if let Some(ok) = self.cached(url) {
            return ok;
        }
        let ok = self.probe.probe(url).await;
        self.last = Some((url.to_string(), ok));
        ok
    }
}

impl std::fmt::Debug for ImageCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCheck").field("last", &self.last).finish()
    }
}
