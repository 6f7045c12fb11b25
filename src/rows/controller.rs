use chrono::{DateTime, Utc};
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

use super::container::RowContainer;
use super::guard::{RetrievalGuard, RetrievalTicket};
use super::item::{DisplayHints, RowItem};
use super::source::{FetchMode, RowSource, SourceKind};
use super::triggers::{ChangeTrigger, needs_re_retrieve};
use crate::backends::RowFetcher;
use crate::config::RowsConfig;
use crate::constants::{OTHER_START_LETTER, PAGED_TRIGGER_DIVISOR, UNPAGED_LOOKAHEAD};
use crate::models::{FilterOptions, RowId, SortBy, SortOption, SortOrder};
use crate::services::ChangeTracker;

/// How a retrieval ended, broadcast once per dispatch.
#[derive(Debug, Clone)]
pub enum RetrieveFinished {
    Loaded,
    Failed(Arc<anyhow::Error>),
    /// A newer generation started while this fetch was in flight; its results
    /// were dropped.
    Superseded,
}

impl RetrieveFinished {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RetrieveFinished::Loaded)
    }
}

/// Whether the item at `position` is close enough to the loaded edge to ask
/// for the next page.
pub fn should_load_more(position: usize, items_loaded: usize, chunk_size: u32) -> bool {
    let margin = if chunk_size > 0 {
        (chunk_size as f64 / PAGED_TRIGGER_DIVISOR).floor() as i64
    } else {
        UNPAGED_LOOKAHEAD
    };
    position as i64 >= items_loaded as i64 - margin
}

#[derive(Debug)]
pub(crate) struct RowState {
    pub(crate) source: RowSource,
    pub(crate) items: Vec<RowItem>,
    pub(crate) items_loaded: usize,
    pub(crate) total_items: usize,
    pub(crate) fully_loaded: bool,
    pub(crate) generation: u64,
    pub(crate) last_full_retrieve: Option<DateTime<Utc>>,
    pub(crate) triggers: Vec<ChangeTrigger>,
    pub(crate) sort_by: Option<SortBy>,
    pub(crate) sort_order: Option<SortOrder>,
    pub(crate) filters: Option<FilterOptions>,
}

impl RowState {
    pub(crate) fn set_items_loaded(&mut self, loaded: usize, chunk_size: u32) {
        self.items_loaded = loaded;
        self.fully_loaded = chunk_size == 0 || self.items_loaded >= self.total_items;
    }

    /// Keeps what this generation already loaded and appends `fresh`.
    pub(crate) fn append(&mut self, fresh: Vec<RowItem>, chunk_size: u32) {
        self.items.truncate(self.items_loaded);
        self.items.extend(fresh);
        self.set_items_loaded(self.items.len(), chunk_size);
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }
}

#[derive(Debug)]
pub(crate) struct RowInner {
    pub(crate) id: RowId,
    pub(crate) kind: SourceKind,
    pub(crate) header: String,
    pub(crate) chunk_size: u32,
    pub(crate) hints: DisplayHints,
    pub(crate) config: RowsConfig,
    pub(crate) state: Mutex<RowState>,
    pub(crate) guard: RetrievalGuard,
    pub(crate) fetcher: Arc<dyn RowFetcher>,
    pub(crate) changes: Arc<dyn ChangeTracker>,
    pub(crate) parent: Option<Weak<dyn RowContainer>>,
    pub(crate) finished: broadcast::Sender<RetrieveFinished>,
}

/// One horizontally scrolling row, filled page by page from a [`RowSource`].
///
/// Cloning gives another handle to the same row. Spawned fetches hold a
/// handle until they complete.
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub(crate) inner: Arc<RowInner>,
}

pub struct ItemRowBuilder {
    source: RowSource,
    fetcher: Arc<dyn RowFetcher>,
    changes: Arc<dyn ChangeTracker>,
    id: Option<RowId>,
    header: String,
    chunk_size: u32,
    prefer_parent_thumb: bool,
    static_height: Option<bool>,
    parent: Option<Weak<dyn RowContainer>>,
    triggers: Vec<ChangeTrigger>,
    config: RowsConfig,
}

impl ItemRowBuilder {
    pub fn with_id(mut self, id: RowId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Page size. Zero loads everything in one request.
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_prefer_parent_thumb(mut self, prefer: bool) -> Self {
        self.prefer_parent_thumb = prefer;
        self
    }

    pub fn with_static_height(mut self, static_height: bool) -> Self {
        self.static_height = Some(static_height);
        self
    }

    pub fn with_parent<C: RowContainer + 'static>(mut self, parent: &Arc<C>) -> Self {
        let parent: Arc<dyn RowContainer> = parent.clone();
        self.parent = Some(Arc::downgrade(&parent));
        self
    }

    pub fn with_re_retrieve_triggers(mut self, triggers: Vec<ChangeTrigger>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn with_config(mut self, config: RowsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ItemRow {
        let kind = self.source.kind();
        let (finished, _) = broadcast::channel(16);
        let hints = DisplayHints {
            prefer_parent_thumb: self.prefer_parent_thumb,
            static_height: self
                .static_height
                .unwrap_or_else(|| kind.default_static_height()),
        };

        ItemRow {
            inner: Arc::new(RowInner {
                id: self.id.unwrap_or_else(RowId::generate),
                kind,
                header: self.header,
                chunk_size: self.chunk_size,
                hints,
                config: self.config,
                state: Mutex::new(RowState {
                    source: self.source,
                    items: Vec::new(),
                    items_loaded: 0,
                    total_items: 0,
                    fully_loaded: false,
                    generation: 0,
                    last_full_retrieve: None,
                    triggers: self.triggers,
                    sort_by: None,
                    sort_order: None,
                    filters: None,
                }),
                guard: RetrievalGuard::new(),
                fetcher: self.fetcher,
                changes: self.changes,
                parent: self.parent,
                finished,
            }),
        }
    }
}

impl ItemRow {
    pub fn builder(
        source: RowSource,
        fetcher: Arc<dyn RowFetcher>,
        changes: Arc<dyn ChangeTracker>,
    ) -> ItemRowBuilder {
        ItemRowBuilder {
            source,
            fetcher,
            changes,
            id: None,
            header: String::new(),
            chunk_size: 0,
            prefer_parent_thumb: false,
            static_height: None,
            parent: None,
            triggers: Vec::new(),
            config: RowsConfig::default(),
        }
    }

    pub fn id(&self) -> &RowId {
        &self.inner.id
    }

    pub fn kind(&self) -> SourceKind {
        self.inner.kind
    }

    pub fn header(&self) -> &str {
        &self.inner.header
    }

    pub fn chunk_size(&self) -> u32 {
        self.inner.chunk_size
    }

    pub fn hints(&self) -> DisplayHints {
        self.inner.hints
    }

    pub fn is_retrieving(&self) -> bool {
        self.inner.guard.is_retrieving()
    }

    pub fn subscribe_finished(&self) -> broadcast::Receiver<RetrieveFinished> {
        self.inner.finished.subscribe()
    }

    pub async fn items(&self) -> Vec<RowItem> {
        self.inner.state.lock().await.items.clone()
    }

    pub async fn items_loaded(&self) -> usize {
        self.inner.state.lock().await.items_loaded
    }

    pub async fn total_items(&self) -> usize {
        self.inner.state.lock().await.total_items
    }

    pub async fn fully_loaded(&self) -> bool {
        self.inner.state.lock().await.fully_loaded
    }

    pub async fn last_full_retrieve(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().await.last_full_retrieve
    }

    pub async fn sort_by(&self) -> Option<SortBy> {
        self.inner.state.lock().await.sort_by
    }

    pub async fn sort_order(&self) -> Option<SortOrder> {
        self.inner.state.lock().await.sort_order
    }

    pub async fn filters(&self) -> Option<FilterOptions> {
        self.inner.state.lock().await.filters.clone()
    }

    pub async fn start_letter(&self) -> Option<String> {
        self.inner
            .state
            .lock()
            .await
            .source
            .start_letter()
            .map(str::to_string)
    }

    pub async fn source(&self) -> RowSource {
        self.inner.state.lock().await.source.clone()
    }

    pub async fn set_re_retrieve_triggers(&self, triggers: Vec<ChangeTrigger>) {
        self.inner.state.lock().await.triggers = triggers;
    }

    /// Called as the view shows `position`; fetches the next page when the
    /// position is near the loaded edge.
    pub async fn consider_loading_more(&self, position: usize) {
        let inner = &self.inner;
        let (ticket, source, offset) = {
            let state = inner.state.lock().await;
            if state.fully_loaded {
                return;
            }
            if inner.guard.is_retrieving() {
                debug!("Not loading more for {} row, already retrieving", inner.kind);
                return;
            }
            if !should_load_more(position, state.items_loaded, inner.chunk_size) {
                return;
            }
            if inner.kind.fetch_mode() != FetchMode::Paged {
                debug!("{} row has no further pages", inner.kind);
                return;
            }
            let Some(ticket) = inner.guard.try_enter_retrieving(state.generation) else {
                return;
            };

            info!(
                "Loading more {} items: position {}, loaded {} of {}, chunk {}",
                inner.kind, position, state.items_loaded, state.total_items, inner.chunk_size
            );
            (ticket, state.source.clone(), state.items_loaded)
        };

        let row = self.clone();
        tokio::spawn(async move {
            row.fetch_next_page(ticket, source, offset).await;
        });
    }

    /// Starts a new generation and loads the row from the beginning.
    ///
    /// Static sources complete before this returns; remote sources complete on
    /// a spawned task. Ignored while another retrieval is running; returns
    /// whether a new generation was started.
    pub async fn retrieve(&self) -> bool {
        let (ticket, source) = {
            let mut state = self.inner.state.lock().await;
            let Some(ticket) = self
                .inner
                .guard
                .try_enter_retrieving(state.generation + 1)
            else {
                debug!("{} row already retrieving, ignoring retrieve", self.inner.kind);
                return false;
            };

            state.invalidate();
            state.items_loaded = 0;
            state.fully_loaded = false;
            state.last_full_retrieve = Some(Utc::now());
            (ticket, state.source.clone())
        };

        match source.fetch_mode() {
            FetchMode::Static => self.load_static(ticket, source).await,
            FetchMode::Paged | FetchMode::SingleShot => {
                let row = self.clone();
                tokio::spawn(async move {
                    row.fetch_full(ticket, source).await;
                });
            }
        }
        true
    }

    /// Re-retrieves when any configured trigger reports a change since the
    /// last full retrieval. Returns whether a retrieval was started.
    pub async fn re_retrieve_if_needed(&self) -> bool {
        let (triggers, last_full_retrieve) = {
            let state = self.inner.state.lock().await;
            (state.triggers.clone(), state.last_full_retrieve)
        };
        if triggers.is_empty() {
            return false;
        }

        let needed = needs_re_retrieve(
            &triggers,
            self.inner.changes.as_ref(),
            last_full_retrieve,
            Utc::now(),
        )
        .await;
        if !needed {
            return false;
        }
        info!("Re-retrieving {} row {}", self.inner.kind, self.inner.header);
        self.retrieve().await
    }

    pub async fn set_sort(&self, option: &SortOption) {
        let mut state = self.inner.state.lock().await;
        if state.sort_by == Some(option.value) && state.sort_order == Some(option.order) {
            return;
        }

        state.sort_by = Some(option.value);
        state.sort_order = Some(option.order);
        state.source.apply_sort(option);
        if option.value != SortBy::SortName {
            state.source.set_start_letter(None);
        }
        state.invalidate();
    }

    /// Applies `filters` and detaches the row; the owner retrieves again.
    pub async fn set_filters(&self, filters: Option<FilterOptions>) {
        {
            let mut state = self.inner.state.lock().await;
            state.source.apply_filters(filters.as_ref());
            state.filters = filters;
            state.invalidate();
        }
        self.remove_row().await;
    }

    pub async fn set_start_letter(&self, value: Option<&str>) {
        let letter = value
            .filter(|v| *v != OTHER_START_LETTER)
            .map(str::to_string);

        let mut state = self.inner.state.lock().await;
        state.source.set_start_letter(letter);
        state.invalidate();
    }

    fn parent(&self) -> Option<Arc<dyn RowContainer>> {
        self.inner.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Takes the row off its parent, or empties it when it has none. A parent
    /// never ends up without rows: the last one is swapped for the placeholder.
    pub async fn remove_row(&self) {
        let Some(parent) = self.parent() else {
            self.inner.state.lock().await.items.clear();
            return;
        };

        parent.detach_row(&self.inner.id).await;
    }

    pub async fn add_to_parent_if_results_received(&self) {
        if self.items_loaded().await == 0 {
            return;
        }
        if let Some(parent) = self.parent() {
            parent.add_row(&self.inner.id, &self.inner.header).await;
        }
    }

    /// Applies `apply` if `ticket` still belongs to the current generation.
    pub(crate) async fn commit<R>(
        &self,
        ticket: &RetrievalTicket,
        apply: impl FnOnce(&mut RowState) -> R,
    ) -> Option<R> {
        let mut state = self.inner.state.lock().await;
        if state.generation != ticket.generation() {
            debug!(
                "Dropping stale {} results from generation {}",
                self.inner.kind,
                ticket.generation()
            );
            return None;
        }
        Some(apply(&mut state))
    }

    pub(crate) async fn is_current(&self, ticket: &RetrievalTicket) -> bool {
        self.inner.state.lock().await.generation == ticket.generation()
    }

    pub(crate) fn finish(&self, ticket: RetrievalTicket, outcome: RetrieveFinished) {
        self.inner.guard.exit_retrieving(ticket);
        // No subscribers is fine
        let _ = self.inner.finished.send(outcome);
    }
}
