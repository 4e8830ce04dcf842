use std::sync::LazyLock;

use compact_str::CompactString;
use hashbrown::HashSet;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::{Error, Result, util::ja_date_to_iso};

pub const SUSPENDED_MARKER: &str = "このチャンネルは現在停止されています";
pub const BAN_NEWS_MARKER: &str = "BANされました";
pub const YOUTUBE_PREFIX: &str = "https://www.youtube.com/";
const TITLE_SEPARATOR: char = '｜';

static REG_CHANNEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/channel/(\d+)/?$").unwrap());

static SEL_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static SEL_H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static SEL_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static SEL_ALL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBanInfo {
    pub title: Option<String>,
    pub channel_id: Option<CompactString>,
    pub url: String,
    pub youtube_url: Option<String>,
    pub suspended: bool,
    pub ban_news_found: bool,
    /// `YYYY-MM-DD`
    pub ban_date: Option<String>,
}

impl ChannelBanInfo {
    #[inline]
    pub const fn is_banned(&self) -> bool {
        self.suspended || self.ban_news_found
    }
}

/// Digits of a `/channel/<digits>/` path, or `None` for anything else.
pub fn channel_id(url: &str) -> Option<CompactString> {
    let path = match Url::parse(url) {
        Ok(u) => u.path().to_owned(),
        Err(_) => url.to_owned(),
    };
    let cap = REG_CHANNEL.captures(&path)?;
    Some(CompactString::new(cap.get(1)?.as_str()))
}

/// All distinct channel detail links on a listing page, resolved against `base_url`,
/// in the order they first appear.
pub fn extract_channel_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(base_url).map_err(|source| Error::Url {
        url: base_url.to_owned(),
        source,
    })?;

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for a in document.select(&SEL_LINK) {
        let Some(href) = a.attr("href") else { continue };
        if !REG_CHANNEL.is_match(href) {
            continue;
        }
        let Ok(absolute) = base.join(href) else {
            tracing::warn!(target: "listing", "cannot resolve {href:?} against {base}");
            continue;
        };
        let absolute = String::from(absolute);
        if seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    Ok(links)
}

fn text_of(element: scraper::ElementRef) -> String {
    element.text().collect()
}

fn page_title(document: &Html) -> Option<String> {
    let heading = document
        .select(&SEL_H1)
        .next()
        .map(|h1| text_of(h1).trim().to_owned())
        .filter(|s| !s.is_empty());
    if heading.is_some() {
        return heading;
    }

    let title = document.select(&SEL_TITLE).next().map(text_of)?;
    let title = title
        .split(TITLE_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();
    (!title.is_empty()).then(|| title.to_owned())
}

/// Reads ban evidence off a channel detail page. Missing markers are not errors.
pub fn parse_ban_info(html: &str, page_url: &str) -> ChannelBanInfo {
    let document = Html::parse_document(html);

    let mut suspended = false;
    let mut ban_news_found = false;
    let mut ban_date = None;
    for element in document.select(&SEL_ALL) {
        let text = text_of(element);
        if text.contains(SUSPENDED_MARKER) {
            suspended = true;
        }
        if text.contains(BAN_NEWS_MARKER) {
            ban_news_found = true;
            if let Some(date) = ja_date_to_iso(&text) {
                ban_date = Some(date);
            }
        }
    }

    let youtube_url = document
        .select(&SEL_LINK)
        .filter_map(|a| a.attr("href"))
        .find(|href| href.starts_with(YOUTUBE_PREFIX))
        .map(ToOwned::to_owned);

    ChannelBanInfo {
        title: page_title(&document),
        channel_id: channel_id(page_url),
        url: page_url.to_owned(),
        youtube_url,
        suspended,
        ban_news_found,
        ban_date,
    }
}
