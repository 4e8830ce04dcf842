use core::time::Duration;
use std::path::PathBuf;

use bcn::{
    config::{
        Config, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_BANNED_PATH, DEFAULT_BASE_URL, DEFAULT_STATE_FILE,
        DEFAULT_USER_AGENT,
    },
    state::State,
    watch::{Context, run},
};

/// Announces newly banned channels to a webhook, once per channel.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    #[arg(long, env = "BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, env = "BANNED_PATH", default_value = DEFAULT_BANNED_PATH)]
    banned_path: String,
    /// Number of listing pages to scan
    #[arg(long, env = "PAGES", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
    #[arg(long, env = "ACCEPT_LANGUAGE", default_value = DEFAULT_ACCEPT_LANGUAGE)]
    accept_language: String,
    #[arg(long, env = "STATE_FILE", value_name = "file", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,
    #[arg(long, env = "LISTING_DELAY_MS", default_value_t = 1000)]
    listing_delay_ms: u64,
    #[arg(long, env = "DETAIL_DELAY_MS", default_value_t = 1500)]
    detail_delay_ms: u64,
    #[arg(long, env = "ERROR_DELAY_MS", default_value_t = 5000)]
    error_delay_ms: u64,
    /// Log banned channels instead of posting them; the state file is left untouched
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,
}

impl Args {
    fn into_config(self) -> Option<Config> {
        let webhook_url = self.webhook_url.filter(|s| !s.trim().is_empty());
        if webhook_url.is_none() && !self.dry_run {
            return None;
        }

        Some(Config {
            base_url: self.base_url,
            banned_path: self.banned_path,
            pages: self.pages,
            webhook_url,
            user_agent: self.user_agent,
            accept_language: self.accept_language,
            state_file: self.state_file,
            listing_delay: Duration::from_millis(self.listing_delay_ms),
            detail_delay: Duration::from_millis(self.detail_delay_ms),
            error_delay: Duration::from_millis(self.error_delay_ms),
            dry_run: self.dry_run,
        })
    }
}

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let Some(config) = args.into_config() else {
        tracing::error!(target: "main", "DISCORD_WEBHOOK_URL is not set");
        std::process::exit(1);
    };

    let ctx = Context::new(config)?;
    let mut state = State::load(&ctx.config.state_file);
    tracing::info!(target: "main", "{} channels already notified", state.len());

    match run(&ctx, &mut state).await {
        Ok(summary) => {
            tracing::info!(
                target: "main",
                "\x1b[36mdone\x1b[0m: {} pages, {} candidates, {} notified, {} failed",
                summary.listing_pages,
                summary.candidates,
                summary.notified,
                summary.failed,
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(target: "main", "\x1b[31mfatal: {e}\x1b[0m");
            std::process::exit(1);
        }
    }
}
