use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use url::Url;

use crate::api::models::{ChatReply, ChatRequest};
use crate::error::TransportError;

/// Remote side of a conversation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        (**self).chat(request).await
    }
}

/// Prefix `https://` when the user left the scheme out.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// `POST /chat` over HTTP with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    http: HttpClient,
    endpoint: Url,
}

impl HttpChatBackend {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, None)
    }

    /// Without a timeout the client's network defaults apply.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: Self::chat_endpoint(base_url)?,
        })
    }

    fn chat_endpoint(base_url: &str) -> Result<Url, url::ParseError> {
        let normalized = normalize_url(base_url);
        let trimmed = normalized.trim_end_matches('/');
        if trimmed.ends_with("/chat") {
            Url::parse(trimmed)
        } else {
            Url::parse(&format!("{}/chat", trimmed))
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        log::debug!("POST {}", self.endpoint);
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(TransportError::Status(resp.status().as_u16()));
        }
        let body = resp.text().await?;
        serde_json::from_str::<ChatReply>(&body).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}
