use reqwest::Client;
use serde::Serialize;

use crate::{Error, Result, parse::ChannelBanInfo};

pub const USERNAME: &str = "BANチャンネル通知";
pub const DESCRIPTION: &str = "BANされたチャンネルを検出しました。";
const UNKNOWN_TITLE: &str = "(タイトル不明)";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: &'static str,
    pub fields: Vec<Field>,
    pub timestamp: String,
}

impl Embed {
    pub fn for_channel(info: &ChannelBanInfo, timestamp: String) -> Self {
        let fields = [
            info.ban_date.as_ref().map(|date| Field {
                name: "BAN日",
                value: date.clone(),
                inline: true,
            }),
            info.youtube_url.as_ref().map(|yt| Field {
                name: "YouTube",
                value: yt.clone(),
                inline: false,
            }),
            Some(Field {
                name: "情報元",
                value: info.url.clone(),
                inline: false,
            }),
        ];

        Self {
            title: info.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
            url: info.url.clone(),
            description: DESCRIPTION,
            fields: fields.into_iter().flatten().collect(),
            timestamp,
        }
    }
}

#[derive(Serialize)]
struct Payload<'a> {
    username: &'static str,
    embeds: [&'a Embed; 1],
}

/// Posts embeds to a single webhook endpoint.
pub struct Notifier {
    client: Client,
    webhook_url: String,
}

impl Notifier {
    pub const fn new(client: Client, webhook_url: String) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    pub async fn notify(&self, embed: &Embed) -> Result<()> {
        let payload = Payload {
            username: USERNAME,
            embeds: [embed],
        };

        let res = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(Error::Webhook)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Delivery { status, body });
        }

        tracing::info!(target: "notify", "\x1b[36msent\x1b[0m {:?} ({})", embed.title, embed.url);
        Ok(())
    }
}
