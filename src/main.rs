use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use reel_rows::models::{ItemQuery, SortBy, SortOption, SortOrder, UserId};
use reel_rows::rows::{ChangeTrigger, RowItem};
use reel_rows::{
    Config, DataRefreshService, ItemRow, JellyfinApi, RetrieveFinished, RowContainer, RowList,
    RowSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_rows=debug".into()),
        )
        .init();

    let config = Config::load()?;
    let (server_url, api_key, user_id) = config.jellyfin_credentials()?;
    info!("Loading rows from {}", server_url);

    let api = JellyfinApi::with_timeout(
        server_url,
        api_key,
        UserId::new(user_id),
        Duration::from_secs(config.network.connection_timeout),
    )?;
    let fetcher = Arc::new(api);
    let changes = Arc::new(DataRefreshService::new());
    let screen = Arc::new(RowList::new());

    let latest_movies = ItemRow::builder(
        RowSource::Items(ItemQuery {
            include_item_types: vec!["Movie".to_string()],
            recursive: true,
            ..Default::default()
        }),
        fetcher.clone(),
        changes.clone(),
    )
    .with_header("Movies")
    .with_chunk_size(config.rows.chunk_size)
    .with_parent(&screen)
    .with_re_retrieve_triggers(vec![
        ChangeTrigger::LibraryUpdated,
        ChangeTrigger::MoviePlayback,
    ])
    .with_config(config.rows.clone())
    .build();
    latest_movies
        .set_sort(&SortOption::new(
            "Date added",
            SortBy::DateCreated,
            SortOrder::Descending,
        ))
        .await;

    let premieres = ItemRow::builder(
        RowSource::Premieres(ItemQuery {
            include_item_types: vec!["Episode".to_string()],
            recursive: true,
            sort_by: vec![SortBy::DateCreated],
            sort_order: Some(SortOrder::Descending),
            limit: Some(300),
            ..Default::default()
        }),
        fetcher.clone(),
        changes.clone(),
    )
    .with_header("New Premieres")
    .with_parent(&screen)
    .with_re_retrieve_triggers(vec![ChangeTrigger::TvPlayback])
    .with_config(config.rows.clone())
    .build();

    let rows = [latest_movies, premieres];
    let mut receivers = Vec::new();
    for row in &rows {
        screen.add_row(row.id(), row.header()).await;
        receivers.push(row.subscribe_finished());
        row.retrieve().await;
    }

    let outcomes = join_all(receivers.iter_mut().map(|rx| rx.recv())).await;
    for (row, outcome) in rows.iter().zip(outcomes) {
        match outcome {
            Ok(RetrieveFinished::Loaded) => {
                let items = row.items().await;
                info!(
                    "{}: {} of {} items loaded",
                    row.header(),
                    row.items_loaded().await,
                    row.total_items().await
                );
                for item in items.iter().filter_map(RowItem::base_item).take(10) {
                    info!("  {}", item.name);
                }
            }
            Ok(RetrieveFinished::Failed(err)) => warn!("{} failed: {:#}", row.header(), err),
            Ok(RetrieveFinished::Superseded) => warn!("{} was superseded", row.header()),
            Err(err) => warn!("{} never finished: {}", row.header(), err),
        }
    }

    info!("Screen has {} rows", screen.len().await);
    Ok(())
}
