use hashbrown::HashSet;
use reqwest::Client;
use tokio::time::sleep;

use crate::{
    Error, Result,
    config::Config,
    notify::{Embed, Notifier},
    parse::{ChannelBanInfo, channel_id, extract_channel_links, parse_ban_info},
    scrape::{self, fetch_page},
    state::State,
    util::now_iso,
};

pub struct Context {
    pub client: Client,
    /// `None` in dry-run mode.
    pub notifier: Option<Notifier>,
    pub config: Config,
}

impl Context {
    pub fn new(config: Config) -> Result<Self> {
        let client =
            scrape::basic(&config.user_agent, &config.accept_language).map_err(Error::Client)?;

        let notifier = if config.dry_run {
            None
        } else {
            let webhook_url = config.webhook_url.clone().ok_or(Error::NoWebhook)?;
            Some(Notifier::new(client.clone(), webhook_url))
        };

        Ok(Self {
            client,
            notifier,
            config,
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub listing_pages: usize,
    pub candidates: usize,
    pub notified: usize,
    pub failed: usize,
}

#[derive(Debug)]
enum Outcome {
    Clean,
    Notified(ChannelBanInfo),
    DryRun,
}

/// Page 1 is `base + path`, page `n >= 2` is `base + path + n`.
pub fn listing_urls(base_url: &str, banned_path: &str, pages: u32) -> Vec<String> {
    let root = format!("{}{banned_path}", base_url.trim_end_matches('/'));
    (1..=pages)
        .map(|page| {
            if page == 1 {
                root.clone()
            } else {
                format!("{root}{page}")
            }
        })
        .collect()
}

async fn check(ctx: &Context, url: &str) -> Result<Outcome> {
    let html = fetch_page(&ctx.client, url).await?;
    let info = parse_ban_info(&html, url);
    tracing::debug!(target: "worker", "{url}: {info:?}");

    if !info.is_banned() {
        return Ok(Outcome::Clean);
    }

    let Some(notifier) = &ctx.notifier else {
        tracing::info!(target: "worker", "\x1b[33m[dry-run]\x1b[0m would notify {:?} ({url})", info.title);
        return Ok(Outcome::DryRun);
    };

    notifier.notify(&Embed::for_channel(&info, now_iso())).await?;
    Ok(Outcome::Notified(info))
}

/// One full pass: listing pages, candidate filtering, then each detail page in turn.
///
/// Listing fetch errors and state save errors abort the pass. Anything that goes
/// wrong for a single candidate, including webhook delivery, is logged and the
/// candidate is left for the next pass.
pub async fn run(ctx: &Context, state: &mut State) -> Result<Summary> {
    let cfg = &ctx.config;
    let mut summary = Summary::default();

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for (idx, url) in listing_urls(&cfg.base_url, &cfg.banned_path, cfg.pages)
        .into_iter()
        .enumerate()
    {
        let page = idx + 1;
        tracing::info!(target: "listing", "[Page #{page}] {url}");

        let html = fetch_page(&ctx.client, &url).await?;
        let links = extract_channel_links(&html, &cfg.base_url)?;
        tracing::info!(target: "listing", "[Page #{page}] {} channel links", links.len());
        summary.listing_pages += 1;

        for link in links {
            if seen.insert(link.clone()) {
                candidates.push(link);
            }
        }
        sleep(cfg.listing_delay).await;
    }

    candidates.retain(|url| !channel_id(url).is_some_and(|id| state.contains(&id)));
    summary.candidates = candidates.len();
    tracing::info!(target: "worker", "{} new candidates", candidates.len());

    for url in candidates {
        match check(ctx, &url).await {
            Ok(Outcome::Notified(info)) => {
                summary.notified += 1;
                if let Some(id) = info.channel_id {
                    state.record(&id, now_iso());
                    state.save(&cfg.state_file)?;
                } else {
                    tracing::warn!(target: "worker", "{url} has no channel id, not recorded");
                }
            }
            Ok(Outcome::DryRun | Outcome::Clean) => {}
            Err(e) => {
                summary.failed += 1;
                tracing::error!(target: "worker", "\x1b[31m{url}: {e}\x1b[0m");
                sleep(cfg.error_delay).await;
            }
        }
        sleep(cfg.detail_delay).await;
    }

    Ok(summary)
}
