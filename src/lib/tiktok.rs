use super::config::Config;
use super::error::RelayError;
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::*;
#[cfg(test)]
use mockall::automock;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

lazy_static! {
    static ref SIGI_STATE_REGEX: Regex =
        Regex::new(r#"(?s)<script id="SIGI_STATE" type="application/json">(.+?)</script>"#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub description: Option<String>,
    pub author_name: String,
    pub author_avatar: String,
    pub cover: String,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FetchesPosts {
    /// Latest post on the profile, or `None` when the page carries no post data.
    async fn fetch_latest(&self) -> Result<Option<Post>, RelayError>;
}

pub struct ProfileFetcher {
    client: reqwest::Client,
    url: String,
}

impl ProfileFetcher {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}?lang=en", config.profile_url()),
        })
    }
}

#[async_trait]
impl FetchesPosts for ProfileFetcher {
    async fn fetch_latest(&self) -> Result<Option<Post>, RelayError> {
        debug!("Fetching {}", self.url);
        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_latest(&html)
    }
}

// TikTok has shipped both shapes: `author` as an object, or as the bare
// handle with the nickname and avatar next to it on the item.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemAuthor {
    Profile {
        #[serde(default)]
        nickname: Option<String>,
        #[serde(rename = "avatarThumb", default)]
        avatar_thumb: Option<String>,
    },
    Handle(String),
}

#[derive(Debug, Default, Deserialize)]
struct ItemVideo {
    #[serde(default)]
    cover: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Item {
    id: String,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    author: Option<ItemAuthor>,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(rename = "avatarThumb", default)]
    avatar_thumb: Option<String>,
    #[serde(default)]
    video: ItemVideo,
}

impl From<Item> for Post {
    fn from(item: Item) -> Self {
        let (nickname, avatar_thumb, handle) = match item.author {
            Some(ItemAuthor::Profile {
                nickname,
                avatar_thumb,
            }) => (nickname, avatar_thumb, None),
            Some(ItemAuthor::Handle(handle)) => (None, None, Some(handle)),
            None => (None, None, None),
        };
        Post {
            id: item.id,
            description: item.desc,
            author_name: nickname.or(item.nickname).or(handle).unwrap_or_default(),
            author_avatar: avatar_thumb.or(item.avatar_thumb).unwrap_or_default(),
            cover: item.video.cover.unwrap_or_default(),
        }
    }
}

/// Reads the `SIGI_STATE` blob out of a profile page and returns the first
/// `ItemModule` entry, in the order TikTok wrote them.
pub fn extract_latest(html: &str) -> Result<Option<Post>, RelayError> {
    let Some(captures) = SIGI_STATE_REGEX.captures(html) else {
        debug!("No SIGI_STATE script in profile page.");
        return Ok(None);
    };
    let state: Value = serde_json::from_str(&captures[1])?;
    let Some((key, first)) = state
        .get("ItemModule")
        .and_then(Value::as_object)
        .and_then(|items| items.iter().next())
    else {
        debug!("No items in profile page state.");
        return Ok(None);
    };
    let item = Item::deserialize(first).map_err(|source| RelayError::MalformedItem {
        key: key.clone(),
        source,
    })?;
    Ok(Some(item.into()))
}
