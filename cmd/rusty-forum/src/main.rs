//! # rusty-forum
//!
//! The entry point: loads settings, installs the tracing subscriber, wires
//! the store into the services, runs pending data upgrades and serves the
//! HTTP API.

mod seed;

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{LogSettings, Settings};
use services::{upgrades, ForumOptions, ForumServices};
use storage_adapters::InMemoryForum;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(&settings.log);

    // 1. Store and services
    let store = Arc::new(InMemoryForum::new());
    let forum = ForumServices::new(store.clone(), forum_options(&settings));

    if settings.forum.seed_demo_data {
        seed::demo(&store, &forum).await.context("failed to seed demo data")?;
    }

    // 2. Data upgrades
    let visible_to = upgrades::backfill_visible_to(&*store).await?;
    let anonymous = upgrades::backfill_anonymous(&*store).await?;
    info!(visible_to, anonymous, "data upgrades applied");

    // 3. HTTP
    let app = router(AppState::new(forum));
    let bind = settings.server.bind.as_str();
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("🚀 rusty-forum listening on http://{bind}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn forum_options(settings: &Settings) -> ForumOptions {
    ForumOptions {
        track_ip_per_post: settings.forum.track_ip_per_post,
        categories_per_page: settings.forum.categories_per_page,
        sub_categories_per_page: settings.forum.sub_categories_per_page,
        mask_node_budget: settings.forum.mask_node_budget,
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
