use anyhow::Result;
use async_trait::async_trait;

use crate::models::{
    AdditionalPartsQuery, ArtistsQuery, BaseItem, ItemQuery, ItemsPage, LatestQuery,
    LiveTvChannelQuery, NextUpQuery, RecommendedProgramsQuery, RecordingsQuery, ResumeQuery,
    SeasonsQuery, SeriesTimer, SimilarQuery, SpecialsQuery, TrailersQuery, UpcomingQuery,
    ViewsQuery,
};

/// Remote data a row can be filled from.
///
/// Paged calls take the offset and page size separately from the query so
/// the same query value can be reused for every page of a generation. A
/// `limit` of `None` asks for everything from `start_index` on.
#[async_trait]
pub trait RowFetcher: Send + Sync + std::fmt::Debug {
    async fn get_items(
        &self,
        query: &ItemQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage>;

    async fn get_artists(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage>;

    async fn get_album_artists(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage>;

    async fn get_live_tv_channels(
        &self,
        query: &LiveTvChannelQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage>;

    async fn get_resume_items(
        &self,
        query: &ResumeQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage>;

    async fn get_next_up(&self, query: &NextUpQuery) -> Result<Vec<BaseItem>>;

    async fn get_latest(&self, query: &LatestQuery) -> Result<Vec<BaseItem>>;

    async fn get_upcoming(&self, query: &UpcomingQuery) -> Result<Vec<BaseItem>>;

    async fn get_seasons(&self, query: &SeasonsQuery) -> Result<Vec<BaseItem>>;

    async fn get_user_views(&self, query: &ViewsQuery) -> Result<Vec<BaseItem>>;

    async fn get_similar(&self, query: &SimilarQuery) -> Result<Vec<BaseItem>>;

    async fn get_recommended_programs(
        &self,
        query: &RecommendedProgramsQuery,
    ) -> Result<Vec<BaseItem>>;

    async fn get_recordings(&self, query: &RecordingsQuery) -> Result<Vec<BaseItem>>;

    async fn get_special_features(&self, query: &SpecialsQuery) -> Result<Vec<BaseItem>>;

    async fn get_additional_parts(&self, query: &AdditionalPartsQuery) -> Result<Vec<BaseItem>>;

    async fn get_trailers(&self, query: &TrailersQuery) -> Result<Vec<BaseItem>>;

    async fn get_series_timers(&self) -> Result<Vec<SeriesTimer>>;
}
