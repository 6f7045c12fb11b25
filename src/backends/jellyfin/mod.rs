mod api;

pub use api::JellyfinApi;

use anyhow::Result;
use async_trait::async_trait;

use super::traits::RowFetcher;
use crate::models::{
    AdditionalPartsQuery, ArtistsQuery, BaseItem, ItemQuery, ItemsPage, LatestQuery,
    LiveTvChannelQuery, NextUpQuery, RecommendedProgramsQuery, RecordingsQuery, ResumeQuery,
    SeasonsQuery, SeriesTimer, SimilarQuery, SpecialsQuery, TrailersQuery, UpcomingQuery,
    ViewsQuery,
};

#[async_trait]
impl RowFetcher for JellyfinApi {
    async fn get_items(
        &self,
        query: &ItemQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        JellyfinApi::get_items(self, query, start_index, limit).await
    }

    async fn get_artists(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        JellyfinApi::get_artists(self, query, start_index, limit).await
    }

    async fn get_album_artists(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        JellyfinApi::get_album_artists(self, query, start_index, limit).await
    }

    async fn get_live_tv_channels(
        &self,
        query: &LiveTvChannelQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        JellyfinApi::get_live_tv_channels(self, query, start_index, limit).await
    }

    async fn get_resume_items(
        &self,
        query: &ResumeQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        JellyfinApi::get_resume_items(self, query, start_index, limit).await
    }

    async fn get_next_up(&self, query: &NextUpQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_next_up(self, query).await
    }

    async fn get_latest(&self, query: &LatestQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_latest(self, query).await
    }

    async fn get_upcoming(&self, query: &UpcomingQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_upcoming(self, query).await
    }

    async fn get_seasons(&self, query: &SeasonsQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_seasons(self, query).await
    }

    async fn get_user_views(&self, query: &ViewsQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_user_views(self, query).await
    }

    async fn get_similar(&self, query: &SimilarQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_similar(self, query).await
    }

    async fn get_recommended_programs(
        &self,
        query: &RecommendedProgramsQuery,
    ) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_recommended_programs(self, query).await
    }

    async fn get_recordings(&self, query: &RecordingsQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_recordings(self, query).await
    }

    async fn get_special_features(&self, query: &SpecialsQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_special_features(self, query).await
    }

    async fn get_additional_parts(&self, query: &AdditionalPartsQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_additional_parts(self, query).await
    }

    async fn get_trailers(&self, query: &TrailersQuery) -> Result<Vec<BaseItem>> {
        JellyfinApi::get_trailers(self, query).await
    }

    async fn get_series_timers(&self) -> Result<Vec<SeriesTimer>> {
        JellyfinApi::get_series_timers(self).await
    }
}
