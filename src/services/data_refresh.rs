use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Kinds of upstream change a row can be told to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCategory {
    LibraryUpdated,
    MoviePlayback,
    TvPlayback,
    FavoriteUpdate,
}

/// Source of "when did this last change" answers for row re-retrieval.
#[async_trait]
pub trait ChangeTracker: Send + Sync + std::fmt::Debug {
    async fn last_change(&self, category: ChangeCategory) -> Option<DateTime<Utc>>;

    /// Whether guide data for the half hour starting at `window_start` still
    /// has to be fetched.
    async fn guide_needs_load(&self, window_start: DateTime<Utc>) -> bool;
}

#[derive(Debug, Default)]
pub struct DataRefreshService {
    last_changes: RwLock<HashMap<ChangeCategory, DateTime<Utc>>>,
    guide_loaded_until: RwLock<Option<DateTime<Utc>>>,
}

impl DataRefreshService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark_changed_at(&self, category: ChangeCategory, at: DateTime<Utc>) {
        debug!("Recording {:?} change at {}", category, at);
        let mut changes = self.last_changes.write().await;
        let entry = changes.entry(category).or_insert(at);
        if *entry < at {
            *entry = at;
        }
    }

    pub async fn mark_library_updated(&self) {
        self.mark_changed_at(ChangeCategory::LibraryUpdated, Utc::now())
            .await;
    }

    pub async fn mark_movie_playback(&self) {
        self.mark_changed_at(ChangeCategory::MoviePlayback, Utc::now())
            .await;
    }

    pub async fn mark_tv_playback(&self) {
        self.mark_changed_at(ChangeCategory::TvPlayback, Utc::now())
            .await;
    }

    pub async fn mark_favorite_update(&self) {
        self.mark_changed_at(ChangeCategory::FavoriteUpdate, Utc::now())
            .await;
    }

    /// Records how far ahead guide data has been loaded.
    pub async fn set_guide_loaded_until(&self, until: Option<DateTime<Utc>>) {
        *self.guide_loaded_until.write().await = until;
    }
}

#[async_trait]
impl ChangeTracker for DataRefreshService {
    async fn last_change(&self, category: ChangeCategory) -> Option<DateTime<Utc>> {
        self.last_changes.read().await.get(&category).copied()
    }

    async fn guide_needs_load(&self, window_start: DateTime<Utc>) -> bool {
        match *self.guide_loaded_until.read().await {
            Some(until) => until < window_start + Duration::minutes(30),
            None => true,
        }
    }
}
