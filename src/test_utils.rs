#![cfg(test)]

use crate::models::{BaseItem, SeriesId};

/// Items named `{prefix}-{n}` for `n` in `0..count`.
pub fn sample_items(prefix: &str, count: usize) -> Vec<BaseItem> {
    (0..count)
        .map(|n| BaseItem::new(format!("{}-{}", prefix, n), format!("{} {}", prefix, n)))
        .collect()
}

/// First episode of `series` in `season`.
pub fn premiere(id: &str, series: &str, season: i32) -> BaseItem {
    let mut item = BaseItem::new(id, format!("{} S{}E1", series, season));
    item.item_type = Some("Episode".to_string());
    item.series_id = Some(SeriesId::new(series));
    item.series_name = Some(series.to_string());
    item.parent_index_number = Some(season);
    item.index_number = Some(1);
    item
}

/// Common test utilities
pub mod common {
    use std::future::Future;
    use std::time::Duration;
    use tokio::sync::broadcast;
    use tokio::time::{sleep, timeout};

    use crate::rows::RetrieveFinished;

    /// Wait for an async condition to become true
    pub async fn wait_for_async<F, Fut>(mut condition: F, max_wait: Duration) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let start = std::time::Instant::now();

        while start.elapsed() < max_wait {
            if condition().await {
                return true;
            }
            sleep(Duration::from_millis(10)).await;
        }

        false
    }

    /// Next completion signal, failing the test if none arrives in time
    pub async fn next_finished(
        rx: &mut broadcast::Receiver<RetrieveFinished>,
    ) -> RetrieveFinished {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for row completion")
            .expect("completion channel closed")
    }
}

/// Mock collaborators for driving rows without a server
pub mod mocks {
    use crate::backends::traits::RowFetcher;
    use crate::models::*;
    use crate::services::{ChangeCategory, ChangeTracker};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Semaphore;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FetchCall {
        pub method: &'static str,
        pub start_index: Option<u32>,
        pub limit: Option<u32>,
    }

    /// In-memory fetcher that pages over a fixed catalogue.
    ///
    /// Every call is recorded before it waits on the optional gate, so a test
    /// can hold a fetch in flight with [`MockFetcher::hold`] and let it go with
    /// [`MockFetcher::release`].
    pub struct MockFetcher {
        pub should_fail: AtomicBool,
        pub catalogue: Mutex<Vec<BaseItem>>,
        pub next_up: Mutex<Vec<BaseItem>>,
        pub single_shot: Mutex<Vec<BaseItem>>,
        pub series_timers: Mutex<Vec<SeriesTimer>>,
        calls: Mutex<Vec<FetchCall>>,
        gate: Mutex<Option<Arc<Semaphore>>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self {
                should_fail: AtomicBool::new(false),
                catalogue: Mutex::new(Vec::new()),
                next_up: Mutex::new(Vec::new()),
                single_shot: Mutex::new(Vec::new()),
                series_timers: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
                gate: Mutex::new(None),
            }
        }

        pub fn with_catalogue(items: Vec<BaseItem>) -> Self {
            let fetcher = Self::new();
            fetcher.set_catalogue(items);
            fetcher
        }

        pub fn set_should_fail(&self, should_fail: bool) {
            self.should_fail.store(should_fail, Ordering::SeqCst);
        }

        pub fn set_catalogue(&self, items: Vec<BaseItem>) {
            *self.catalogue.lock().unwrap() = items;
        }

        pub fn set_next_up(&self, items: Vec<BaseItem>) {
            *self.next_up.lock().unwrap() = items;
        }

        pub fn set_single_shot(&self, items: Vec<BaseItem>) {
            *self.single_shot.lock().unwrap() = items;
        }

        pub fn set_series_timers(&self, timers: Vec<SeriesTimer>) {
            *self.series_timers.lock().unwrap() = timers;
        }

        /// Makes every following fetch wait until released.
        pub fn hold(&self) {
            *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
        }

        /// Lets `count` held fetches through.
        pub fn release(&self, count: usize) {
            if let Some(gate) = self.gate.lock().unwrap().as_ref() {
                gate.add_permits(count);
            }
        }

        pub fn calls(&self) -> Vec<FetchCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        async fn enter(
            &self,
            method: &'static str,
            start_index: Option<u32>,
            limit: Option<u32>,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(FetchCall {
                method,
                start_index,
                limit,
            });

            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.acquire().await?.forget();
            }

            if self.should_fail.load(Ordering::SeqCst) {
                anyhow::bail!("Mock {} failure", method);
            }
            Ok(())
        }

        async fn page(
            &self,
            method: &'static str,
            start_index: u32,
            limit: Option<u32>,
        ) -> Result<ItemsPage> {
            self.enter(method, Some(start_index), limit).await?;

            let catalogue = self.catalogue.lock().unwrap();
            let total = catalogue.len();
            let start = (start_index as usize).min(total);
            let end = limit.map_or(total, |l| (start + l as usize).min(total));
            Ok(ItemsPage::new(
                catalogue[start..end].to_vec(),
                Some(total as u32),
            ))
        }

        async fn single(&self, method: &'static str) -> Result<Vec<BaseItem>> {
            self.enter(method, None, None).await?;
            Ok(self.single_shot.lock().unwrap().clone())
        }
    }

    impl std::fmt::Debug for MockFetcher {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockFetcher").finish()
        }
    }

    #[async_trait]
    impl RowFetcher for MockFetcher {
        async fn get_items(
            &self,
            _query: &ItemQuery,
            start_index: u32,
            limit: Option<u32>,
        ) -> Result<ItemsPage> {
            self.page("get_items", start_index, limit).await
        }

        async fn get_artists(
            &self,
            _query: &ArtistsQuery,
            start_index: u32,
            limit: Option<u32>,
        ) -> Result<ItemsPage> {
            self.page("get_artists", start_index, limit).await
        }

        async fn get_album_artists(
            &self,
            _query: &ArtistsQuery,
            start_index: u32,
            limit: Option<u32>,
        ) -> Result<ItemsPage> {
            self.page("get_album_artists", start_index, limit).await
        }

        async fn get_live_tv_channels(
            &self,
            _query: &LiveTvChannelQuery,
            start_index: u32,
            limit: Option<u32>,
        ) -> Result<ItemsPage> {
            self.page("get_live_tv_channels", start_index, limit).await
        }

        async fn get_resume_items(
            &self,
            _query: &ResumeQuery,
            start_index: u32,
            limit: Option<u32>,
        ) -> Result<ItemsPage> {
            self.page("get_resume_items", start_index, limit).await
        }

        async fn get_next_up(&self, query: &NextUpQuery) -> Result<Vec<BaseItem>> {
            self.enter("get_next_up", None, query.limit).await?;
            Ok(self.next_up.lock().unwrap().clone())
        }

        async fn get_latest(&self, _query: &LatestQuery) -> Result<Vec<BaseItem>> {
            self.single("get_latest").await
        }

        async fn get_upcoming(&self, _query: &UpcomingQuery) -> Result<Vec<BaseItem>> {
            self.single("get_upcoming").await
        }

        async fn get_seasons(&self, _query: &SeasonsQuery) -> Result<Vec<BaseItem>> {
            self.single("get_seasons").await
        }

        async fn get_user_views(&self, _query: &ViewsQuery) -> Result<Vec<BaseItem>> {
            self.single("get_user_views").await
        }

        async fn get_similar(&self, _query: &SimilarQuery) -> Result<Vec<BaseItem>> {
            self.single("get_similar").await
        }

        async fn get_recommended_programs(
            &self,
            _query: &RecommendedProgramsQuery,
        ) -> Result<Vec<BaseItem>> {
            self.single("get_recommended_programs").await
        }

        async fn get_recordings(&self, _query: &RecordingsQuery) -> Result<Vec<BaseItem>> {
            self.single("get_recordings").await
        }

        async fn get_special_features(&self, _query: &SpecialsQuery) -> Result<Vec<BaseItem>> {
            self.single("get_special_features").await
        }

        async fn get_additional_parts(
            &self,
            _query: &AdditionalPartsQuery,
        ) -> Result<Vec<BaseItem>> {
            self.single("get_additional_parts").await
        }

        async fn get_trailers(&self, _query: &TrailersQuery) -> Result<Vec<BaseItem>> {
            self.single("get_trailers").await
        }

        async fn get_series_timers(&self) -> Result<Vec<SeriesTimer>> {
            self.enter("get_series_timers", None, None).await?;
            Ok(self.series_timers.lock().unwrap().clone())
        }
    }

    #[derive(Debug, Default)]
    pub struct MockChangeTracker {
        changes: Mutex<HashMap<ChangeCategory, DateTime<Utc>>>,
        guide_needs_load: AtomicBool,
        guide_queries: Mutex<Vec<DateTime<Utc>>>,
    }

    impl MockChangeTracker {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn set_change(&self, category: ChangeCategory, at: DateTime<Utc>) {
            self.changes.lock().unwrap().insert(category, at);
        }

        pub async fn set_guide_needs_load(&self, needs_load: bool) {
            self.guide_needs_load.store(needs_load, Ordering::SeqCst);
        }

        pub async fn guide_queries(&self) -> Vec<DateTime<Utc>> {
            self.guide_queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChangeTracker for MockChangeTracker {
        async fn last_change(&self, category: ChangeCategory) -> Option<DateTime<Utc>> {
            self.changes.lock().unwrap().get(&category).copied()
        }

        async fn guide_needs_load(&self, window_start: DateTime<Utc>) -> bool {
            self.guide_queries.lock().unwrap().push(window_start);
            self.guide_needs_load.load(Ordering::SeqCst)
        }
    }
}

pub use mocks::{FetchCall, MockChangeTracker, MockFetcher};
