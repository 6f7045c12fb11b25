//! Per-kind fetch routines. Every routine that receives a ticket hands it
//! back through [`ItemRow::finish`] exactly once.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::controller::{ItemRow, RetrieveFinished};
use super::guard::RetrievalTicket;
use super::item::RowItem;
use super::premieres::{premiere_cutoff, reconcile_premieres};
use super::source::RowSource;
use crate::constants::{
    FAVORITE_SONGS_BUTTON_ID, LIVE_TV_RECORDINGS_BUTTON_ID, LIVE_TV_SCHEDULE_BUTTON_ID,
    LIVE_TV_SERIES_BUTTON_ID, UNSUPPORTED_COLLECTION_TYPES,
};
use crate::models::{BaseItem, ItemQuery, ItemsPage, NextUpQuery, SeriesTimer, SeriesTimersQuery};

/// A mapped response ready to be committed.
pub(crate) struct LoadedPage {
    items: Vec<RowItem>,
    total: usize,
    /// False when the response had nothing of its own, even if synthetic
    /// entries were added.
    has_content: bool,
}

impl LoadedPage {
    fn new(items: Vec<RowItem>, total: usize) -> Self {
        let has_content = !items.is_empty();
        Self {
            items,
            total,
            has_content,
        }
    }
}

fn to_offset(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

impl ItemRow {
    fn page_limit(&self) -> Option<u32> {
        (self.inner.chunk_size > 0).then_some(self.inner.chunk_size)
    }

    fn media(&self, items: Vec<BaseItem>) -> Vec<RowItem> {
        let hints = self.inner.hints;
        items
            .into_iter()
            .map(|item| RowItem::media(item, hints))
            .collect()
    }

    fn single_shot(&self, items: Vec<BaseItem>) -> LoadedPage {
        let total = items.len();
        LoadedPage::new(self.media(items), total)
    }

    /// `counted` says whether the server's total can be trusted as the end of
    /// the set; otherwise the page length is used.
    fn paged(&self, page: ItemsPage, counted: bool) -> LoadedPage {
        let returned = page.items.len();
        let total = match page.total_record_count {
            Some(total) if counted => total as usize,
            _ => returned,
        };
        LoadedPage::new(self.media(page.items), total)
    }

    fn series_timers(&self, query: &SeriesTimersQuery, timers: Vec<SeriesTimer>) -> LoadedPage {
        let mut items = vec![RowItem::button(LIVE_TV_RECORDINGS_BUTTON_ID, "Recorded TV")];
        if query.can_manage_recordings {
            items.push(RowItem::button(LIVE_TV_SCHEDULE_BUTTON_ID, "Schedule"));
            items.push(RowItem::button(LIVE_TV_SERIES_BUTTON_ID, "Series"));
        }

        let total = timers.len();
        let has_content = !timers.is_empty();
        items.extend(timers.into_iter().map(RowItem::SeriesTimer));
        LoadedPage {
            items,
            total,
            has_content,
        }
    }

    async fn fetch_items(&self, query: &ItemQuery, offset: u32) -> Result<LoadedPage> {
        let page = self
            .inner
            .fetcher
            .get_items(query, offset, self.page_limit().or(query.limit))
            .await?;
        Ok(self.paged(page, query.enable_total_record_count))
    }

    /// Dispatches the first fetch of a generation.
    pub(crate) async fn fetch_full(&self, ticket: RetrievalTicket, source: RowSource) {
        let fetcher = self.inner.fetcher.clone();
        let limit = self.page_limit();

        let result = match source {
            RowSource::Items(query) => {
                self.fetch_items(&query, query.start_index.unwrap_or(0))
                    .await
            }
            RowSource::AudioPlaylists(query) => {
                self.seed_favorites(&ticket).await;
                self.fetch_items(&query, query.start_index.unwrap_or(0))
                    .await
            }
            RowSource::Premieres(query) => return self.retrieve_premieres(ticket, query).await,
            RowSource::Artists(query) => fetcher
                .get_artists(&query, 0, limit)
                .await
                .map(|page| self.paged(page, query.enable_total_record_count)),
            RowSource::AlbumArtists(query) => fetcher
                .get_album_artists(&query, 0, limit)
                .await
                .map(|page| self.paged(page, query.enable_total_record_count)),
            RowSource::LiveTvChannel(query) => fetcher
                .get_live_tv_channels(&query, 0, limit)
                .await
                .map(|page| self.paged(page, true)),
            RowSource::Resume(query) => fetcher
                .get_resume_items(&query, 0, limit)
                .await
                .map(|page| self.paged(page, true)),
            RowSource::NextUp(query) => fetcher
                .get_next_up(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::LatestItems(query) => fetcher
                .get_latest(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::Upcoming(query) => fetcher
                .get_upcoming(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::Season(query) => fetcher
                .get_seasons(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::Views(query) => fetcher.get_user_views(&query).await.map(|mut views| {
                views.retain(|view| {
                    !view
                        .collection_type
                        .as_deref()
                        .is_some_and(|t| UNSUPPORTED_COLLECTION_TYPES.contains(&t))
                });
                self.single_shot(views)
            }),
            RowSource::SimilarSeries(query) | RowSource::SimilarMovies(query) => fetcher
                .get_similar(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::LiveTvProgram(query) => fetcher
                .get_recommended_programs(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::LiveTvRecording(query) => fetcher
                .get_recordings(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::Specials(query) => fetcher
                .get_special_features(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::AdditionalParts(query) => fetcher
                .get_additional_parts(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::Trailers(query) => fetcher
                .get_trailers(&query)
                .await
                .map(|items| self.single_shot(items)),
            RowSource::SeriesTimer(query) => fetcher
                .get_series_timers()
                .await
                .map(|timers| self.series_timers(&query, timers)),
            source @ (RowSource::StaticPeople(_)
            | RowSource::StaticChapters(_)
            | RowSource::StaticItems(_)
            | RowSource::StaticAudioQueueItems(_)
            | RowSource::Search(_)) => return self.load_static(ticket, source).await,
        };

        self.complete_page(ticket, result).await;
    }

    /// Fetches the page starting at `offset` within the current generation.
    pub(crate) async fn fetch_next_page(
        &self,
        ticket: RetrievalTicket,
        source: RowSource,
        offset: usize,
    ) {
        let fetcher = self.inner.fetcher.clone();
        let limit = self.page_limit();
        let offset = to_offset(offset);

        let result = match source {
            RowSource::Items(query) | RowSource::AudioPlaylists(query) => {
                self.fetch_items(&query, offset).await
            }
            RowSource::Artists(query) => fetcher
                .get_artists(&query, offset, limit)
                .await
                .map(|page| self.paged(page, query.enable_total_record_count)),
            RowSource::AlbumArtists(query) => fetcher
                .get_album_artists(&query, offset, limit)
                .await
                .map(|page| self.paged(page, query.enable_total_record_count)),
            RowSource::LiveTvChannel(query) => fetcher
                .get_live_tv_channels(&query, offset, limit)
                .await
                .map(|page| self.paged(page, true)),
            RowSource::Resume(query) => fetcher
                .get_resume_items(&query, offset, limit)
                .await
                .map(|page| self.paged(page, true)),
            other => {
                debug!("No next page for {} rows", other.kind());
                self.finish(ticket, RetrieveFinished::Loaded);
                return;
            }
        };

        self.complete_page(ticket, result).await;
    }

    /// Puts the favorites button in front and counts it as loaded.
    async fn seed_favorites(&self, ticket: &RetrievalTicket) {
        let chunk_size = self.inner.chunk_size;
        self.commit(ticket, |state| {
            state.items.clear();
            state
                .items
                .push(RowItem::button(FAVORITE_SONGS_BUTTON_ID, "Favorites"));
            state.set_items_loaded(1, chunk_size);
        })
        .await;
    }

    async fn complete_page(&self, ticket: RetrievalTicket, result: Result<LoadedPage>) {
        let page = match result {
            Ok(page) => page,
            Err(e) => return self.fail(ticket, e).await,
        };

        let chunk_size = self.inner.chunk_size;
        let committed = self
            .commit(&ticket, |state| {
                let nothing_before = state.items_loaded == 0;
                if page.items.is_empty() {
                    if nothing_before {
                        state.items.clear();
                        state.total_items = 0;
                    } else {
                        // The server ran out before its reported total
                        state.total_items = state.items_loaded;
                    }
                    let loaded = state.items_loaded;
                    state.set_items_loaded(loaded, chunk_size);
                } else {
                    state.total_items = page.total;
                    state.append(page.items, chunk_size);
                }
                debug!(
                    "{} row now has {} of {} items",
                    self.inner.kind, state.items_loaded, state.total_items
                );
                nothing_before && !page.has_content
            })
            .await;

        match committed {
            Some(remove) => {
                if remove {
                    self.remove_row().await;
                }
                self.finish(ticket, RetrieveFinished::Loaded);
            }
            None => self.finish(ticket, RetrieveFinished::Superseded),
        }
    }

    async fn fail(&self, ticket: RetrievalTicket, err: anyhow::Error) {
        error!("Error retrieving {} row: {:#}", self.inner.kind, err);
        if self.is_current(&ticket).await {
            self.remove_row().await;
            self.finish(ticket, RetrieveFinished::Failed(Arc::new(err)));
        } else {
            self.finish(ticket, RetrieveFinished::Superseded);
        }
    }

    /// Maps pre-supplied data into the row without touching the network.
    pub(crate) async fn load_static(&self, ticket: RetrievalTicket, source: RowSource) {
        let hints = self.inner.hints;
        let (items, attach): (Vec<RowItem>, bool) = match source {
            RowSource::StaticPeople(people) => {
                (people.into_iter().map(RowItem::Person).collect(), false)
            }
            RowSource::StaticChapters(chapters) => {
                (chapters.into_iter().map(RowItem::Chapter).collect(), false)
            }
            RowSource::StaticItems(items) => (
                items
                    .into_iter()
                    .map(|item| RowItem::media(item, hints))
                    .collect(),
                false,
            ),
            RowSource::StaticAudioQueueItems(items) => {
                (items.into_iter().map(RowItem::AudioQueue).collect(), false)
            }
            RowSource::Search(items) => (
                items
                    .into_iter()
                    .map(|item| RowItem::media(item, hints))
                    .collect(),
                true,
            ),
            other => {
                warn!("{} rows are not loaded statically", other.kind());
                self.finish(ticket, RetrieveFinished::Loaded);
                return;
            }
        };

        let chunk_size = self.inner.chunk_size;
        let committed = self
            .commit(&ticket, |state| {
                let count = items.len();
                state.items = items;
                state.total_items = count;
                state.set_items_loaded(count, chunk_size);
                count
            })
            .await;

        match committed {
            Some(0) => {
                self.remove_row().await;
                self.finish(ticket, RetrieveFinished::Loaded);
            }
            Some(_) => {
                if attach {
                    self.add_to_parent_if_results_received().await;
                }
                self.finish(ticket, RetrieveFinished::Loaded);
            }
            None => self.finish(ticket, RetrieveFinished::Superseded),
        }
    }

    async fn retrieve_premieres(&self, ticket: RetrievalTicket, query: ItemQuery) {
        let fetcher = self.inner.fetcher.clone();
        let next_up_query = NextUpQuery {
            user_id: query.user_id.clone(),
            parent_id: query.parent_id.clone(),
            limit: Some(self.inner.config.next_up_limit),
            fields: query.fields.clone(),
            ..Default::default()
        };

        let next_up = match fetcher.get_next_up(&next_up_query).await {
            Ok(items) => items,
            Err(e) => return self.fail(ticket, e).await,
        };
        let page = match fetcher
            .get_items(&query, query.start_index.unwrap_or(0), query.limit)
            .await
        {
            Ok(page) => page,
            Err(e) => return self.fail(ticket, e).await,
        };

        let cutoff = premiere_cutoff(Utc::now(), self.inner.config.premiere_window_months);
        let kept = reconcile_premieres(&page.items, &next_up, cutoff);
        let scanned = page.items.len();
        let kept = self.media(kept);
        let empty = kept.is_empty();
        debug!(
            "Premieres kept {} of {} scanned items",
            kept.len(),
            scanned
        );

        let chunk_size = self.inner.chunk_size;
        let committed = self
            .commit(&ticket, |state| {
                state.items = kept;
                let loaded = state.items_loaded + scanned;
                state.set_items_loaded(loaded, chunk_size);
            })
            .await;

        match committed {
            Some(()) => {
                if empty {
                    self.remove_row().await;
                }
                self.finish(ticket, RetrieveFinished::Loaded);
            }
            None => self.finish(ticket, RetrieveFinished::Superseded),
        }
    }
}
