use super::config::Config;
use super::error::RelayError;
use super::tiktok::Post;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use isahc::config::Configurable;
use isahc::{AsyncBody, AsyncReadResponseExt, Error, HttpClient, Request, Response};
use log::*;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "New TikTok Video";
pub const FOOTER: &str = "TikTok • New Video Upload";
pub const COLOR: u32 = 16711680;
/// Discord answers 400 to embeds with longer titles.
pub const MAX_TITLE_CHARS: usize = 256;

pub struct IsahcClient {
    pub client: HttpClient,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait SendsHttp {
    async fn send(&self, request: Request<Vec<u8>>) -> Result<Response<AsyncBody>, Error>;
}

#[async_trait]
impl SendsHttp for IsahcClient {
    async fn send(&self, request: Request<Vec<u8>>) -> Result<Response<AsyncBody>, Error> {
        self.client.send_async(request).await
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifies {
    async fn notify(&self, post: &Post) -> Result<(), RelayError>;
}

pub struct Webhook {
    http_client: Box<dyn SendsHttp + Send + Sync>,
    url: String,
    username: String,
    profile_url: String,
}

impl Webhook {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        let client = HttpClient::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(Box::new(IsahcClient { client }), config))
    }

    pub(crate) fn with_client(http_client: Box<dyn SendsHttp + Send + Sync>, config: &Config) -> Self {
        Webhook {
            http_client,
            url: config.webhook_url.clone(),
            username: config.username.clone(),
            profile_url: config.profile_url(),
        }
    }
}

#[async_trait]
impl Notifies for Webhook {
    async fn notify(&self, post: &Post) -> Result<(), RelayError> {
        let message = format_message(post, &self.username, &self.profile_url, Utc::now());
        info!("Message to be sent: {:?}", message);
        let req = Request::post(&self.url)
            .header("content-type", "application/json")
            .body(serde_json::to_vec(&message)?)?;
        let mut res = self.http_client.send(req).await?;
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(RelayError::Delivery {
                status: status.as_u16(),
                body,
            });
        }
        info!("Response: status code: {status}. Body: {body}");
        Ok(())
    }
}

/// Builds the Discord embed for a post. `now` is the delivery time, the page
/// state has no usable creation time.
pub fn format_message(post: &Post, username: &str, profile_url: &str, now: DateTime<Utc>) -> WebhookMessage {
    let title = match post.description.as_deref() {
        Some(description) if !description.trim().is_empty() => truncate_title(description),
        _ => DEFAULT_TITLE.to_owned(),
    };
    let author_name = if post.author_name.is_empty() {
        username.to_owned()
    } else {
        post.author_name.clone()
    };
    WebhookMessage {
        username: username.to_owned(),
        embeds: vec![Embed {
            author: EmbedAuthor {
                name: author_name,
                url: profile_url.to_owned(),
                icon_url: non_empty(&post.author_avatar),
            },
            title,
            url: format!("{profile_url}/video/{id}", id = post.id),
            color: COLOR,
            image: non_empty(&post.cover).map(|url| EmbedImage { url }),
            footer: EmbedFooter { text: FOOTER.to_owned() },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }],
    }
}

fn truncate_title(description: &str) -> String {
    if description.chars().count() <= MAX_TITLE_CHARS {
        return description.to_owned();
    }
    let mut title: String = description.chars().take(MAX_TITLE_CHARS - 1).collect();
    title.push('…');
    title
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct WebhookMessage {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Embed {
    pub author: EmbedAuthor,
    pub title: String,
    pub url: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct EmbedFooter {
    pub text: String,
}
