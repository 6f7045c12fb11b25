use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::models::{
    AdditionalPartsQuery, ArtistsQuery, BaseItem, ItemFilter, ItemId, ItemQuery, ItemsPage,
    LatestQuery, LiveTvChannelQuery, NextUpQuery, RecommendedProgramsQuery, RecordingsQuery,
    ResumeQuery, SeasonsQuery, SeriesId, SeriesTimer, SimilarQuery, SortBy, SortOrder,
    SpecialsQuery, TrailersQuery, UpcomingQuery, UserData, UserId, ViewsQuery,
};
use crate::utils::RowError;

const JELLYFIN_CLIENT_NAME: &str = "Reel";
const JELLYFIN_VERSION: &str = "0.1.0";
const TICKS_PER_SECOND: u64 = 10_000_000;

#[derive(Clone)]
pub struct JellyfinApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    user_id: UserId,
    device_id: String,
}

impl std::fmt::Debug for JellyfinApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JellyfinApi")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl JellyfinApi {
    pub fn new(base_url: String, api_key: String, user_id: UserId) -> Result<Self> {
        Self::with_timeout(base_url, api_key, user_id, Duration::from_secs(30))
    }

    pub fn with_timeout(
        base_url: String,
        api_key: String,
        user_id: UserId,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RowError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            user_id,
            device_id: Uuid::new_v4().to_string(),
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    fn get_auth_header(&self) -> String {
        format!(
            r#"MediaBrowser Client="{}", Device="Linux", DeviceId="{}", Version="{}", Token="{}""#,
            JELLYFIN_CLIENT_NAME, self.device_id, JELLYFIN_VERSION, self.api_key
        )
    }

    fn user_for<'a>(&'a self, user_id: &'a Option<UserId>) -> &'a UserId {
        user_id.as_ref().unwrap_or(&self.user_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: Params) -> Result<T> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path)).map_err(RowError::from)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.pairs.iter());
        }
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("X-Emby-Authorization", self.get_auth_header())
            .send()
            .await
            .map_err(RowError::Network)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} failed: {}", path, status);
            return Err(RowError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(RowError::Network)?;
        serde_json::from_str(&body)
            .map_err(RowError::from)
            .with_context(|| format!("Failed to parse response from {}", path))
    }

    async fn get_items_response(&self, path: &str, params: Params) -> Result<ItemsPage> {
        let response: ItemsResponse = self.get_json(path, params).await?;
        Ok(ItemsPage::new(
            response.items.into_iter().map(BaseItem::from).collect(),
            response.total_record_count,
        ))
    }

    async fn get_item_array(&self, path: &str, params: Params) -> Result<Vec<BaseItem>> {
        let items: Vec<JellyfinItem> = self.get_json(path, params).await?;
        Ok(items.into_iter().map(BaseItem::from).collect())
    }

    pub async fn get_items(
        &self,
        query: &ItemQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        let mut params = Params::default();
        params.push_opt("ParentId", query.parent_id.as_ref());
        params.push_list("IncludeItemTypes", &query.include_item_types);
        params.push_flag("Recursive", query.recursive);
        params.push_list("Fields", &query.fields);
        params.push_sort(&query.sort_by, query.sort_order);
        params.push_filters(&query.filters);
        params.push_opt(
            "NameStartsWithOrGreater",
            query.name_starts_with_or_greater.as_ref(),
        );
        params.push_page(start_index, limit);
        params.push(
            "EnableTotalRecordCount",
            query.enable_total_record_count.to_string(),
        );

        let user = self.user_for(&query.user_id);
        self.get_items_response(&format!("/Users/{}/Items", user), params)
            .await
    }

    fn artists_params(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Params {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("ParentId", query.parent_id.as_ref());
        params.push_sort(&query.sort_by, query.sort_order);
        params.push_filters(&query.filters);
        params.push_opt(
            "NameStartsWithOrGreater",
            query.name_starts_with_or_greater.as_ref(),
        );
        params.push_list("Fields", &query.fields);
        params.push_page(start_index, limit);
        params.push(
            "EnableTotalRecordCount",
            query.enable_total_record_count.to_string(),
        );
        params
    }

    pub async fn get_artists(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        let params = self.artists_params(query, start_index, limit);
        self.get_items_response("/Artists", params).await
    }

    pub async fn get_album_artists(
        &self,
        query: &ArtistsQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        let params = self.artists_params(query, start_index, limit);
        self.get_items_response("/Artists/AlbumArtists", params)
            .await
    }

    pub async fn get_live_tv_channels(
        &self,
        query: &LiveTvChannelQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("IsFavorite", query.is_favorite.as_ref());
        params.push_flag("EnableFavoriteSorting", query.enable_favorite_sorting);
        params.push_flag("AddCurrentProgram", query.add_current_program);
        params.push_page(start_index, limit);
        self.get_items_response("/LiveTv/Channels", params).await
    }

    pub async fn get_resume_items(
        &self,
        query: &ResumeQuery,
        start_index: u32,
        limit: Option<u32>,
    ) -> Result<ItemsPage> {
        let mut params = Params::default();
        params.push_opt("ParentId", query.parent_id.as_ref());
        params.push_list("IncludeItemTypes", &query.include_item_types);
        params.push_list("MediaTypes", &query.media_types);
        params.push_list("Fields", &query.fields);
        params.push_page(start_index, limit);

        let user = self.user_for(&query.user_id);
        self.get_items_response(&format!("/Users/{}/Items/Resume", user), params)
            .await
    }

    pub async fn get_next_up(&self, query: &NextUpQuery) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("ParentId", query.parent_id.as_ref());
        params.push_opt("SeriesId", query.series_id.as_ref());
        params.push_opt("Limit", query.limit.as_ref());
        params.push_list("Fields", &query.fields);
        Ok(self.get_items_response("/Shows/NextUp", params).await?.items)
    }

    pub async fn get_latest(&self, query: &LatestQuery) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push_opt("ParentId", query.parent_id.as_ref());
        params.push_list("IncludeItemTypes", &query.include_item_types);
        params.push("GroupItems", query.group_items.to_string());
        params.push_opt("Limit", query.limit.as_ref());
        params.push_list("Fields", &query.fields);

        let user = self.user_for(&query.user_id);
        self.get_item_array(&format!("/Users/{}/Items/Latest", user), params)
            .await
    }

    pub async fn get_upcoming(&self, query: &UpcomingQuery) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("ParentId", query.parent_id.as_ref());
        params.push_opt("Limit", query.limit.as_ref());
        params.push_list("Fields", &query.fields);
        Ok(self.get_items_response("/Shows/Upcoming", params).await?.items)
    }

    pub async fn get_seasons(&self, query: &SeasonsQuery) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        let path = format!("/Shows/{}/Seasons", query.series_id);
        Ok(self.get_items_response(&path, params).await?.items)
    }

    pub async fn get_user_views(&self, query: &ViewsQuery) -> Result<Vec<BaseItem>> {
        let user = self.user_for(&query.user_id);
        let path = format!("/Users/{}/Views", user);
        Ok(self
            .get_items_response(&path, Params::default())
            .await?
            .items)
    }

    pub async fn get_similar(&self, query: &SimilarQuery) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("Limit", query.limit.as_ref());
        let path = format!("/Items/{}/Similar", query.item_id);
        Ok(self.get_items_response(&path, params).await?.items)
    }

    pub async fn get_recommended_programs(
        &self,
        query: &RecommendedProgramsQuery,
    ) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("IsAiring", query.is_airing.as_ref());
        params.push_opt("HasAired", query.has_aired.as_ref());
        params.push_opt("IsMovie", query.is_movie.as_ref());
        params.push_opt("IsSeries", query.is_series.as_ref());
        params.push_opt("IsSports", query.is_sports.as_ref());
        params.push_opt("IsKids", query.is_kids.as_ref());
        params.push_opt("IsNews", query.is_news.as_ref());
        params.push_opt("Limit", query.limit.as_ref());
        Ok(self
            .get_items_response("/LiveTv/Programs/Recommended", params)
            .await?
            .items)
    }

    pub async fn get_recordings(&self, query: &RecordingsQuery) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        params.push_opt("SeriesTimerId", query.series_timer_id.as_ref());
        params.push_opt("IsInProgress", query.is_in_progress.as_ref());
        params.push_opt("Limit", query.limit.as_ref());
        Ok(self
            .get_items_response("/LiveTv/Recordings", params)
            .await?
            .items)
    }

    pub async fn get_special_features(&self, query: &SpecialsQuery) -> Result<Vec<BaseItem>> {
        let user = self.user_for(&query.user_id);
        let path = format!("/Users/{}/Items/{}/SpecialFeatures", user, query.item_id);
        self.get_item_array(&path, Params::default()).await
    }

    pub async fn get_additional_parts(
        &self,
        query: &AdditionalPartsQuery,
    ) -> Result<Vec<BaseItem>> {
        let mut params = Params::default();
        params.push("UserId", self.user_for(&query.user_id).to_string());
        let path = format!("/Videos/{}/AdditionalParts", query.item_id);
        Ok(self.get_items_response(&path, params).await?.items)
    }

    pub async fn get_trailers(&self, query: &TrailersQuery) -> Result<Vec<BaseItem>> {
        let user = self.user_for(&query.user_id);
        let path = format!("/Users/{}/Items/{}/LocalTrailers", user, query.item_id);
        self.get_item_array(&path, Params::default()).await
    }

    pub async fn get_series_timers(&self) -> Result<Vec<SeriesTimer>> {
        let response: SeriesTimersResponse = self
            .get_json("/LiveTv/SeriesTimers", Params::default())
            .await?;
        Ok(response.items.into_iter().map(SeriesTimer::from).collect())
    }
}

/// Ordered query-string pairs. Empty lists and absent options are skipped so
/// the server applies its own defaults.
#[derive(Debug, Default)]
struct Params {
    pairs: Vec<(&'static str, String)>,
}

impl Params {
    fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn push(&mut self, key: &'static str, value: String) {
        self.pairs.push((key, value));
    }

    fn push_opt<T: ToString>(&mut self, key: &'static str, value: Option<&T>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    fn push_flag(&mut self, key: &'static str, value: bool) {
        if value {
            self.push(key, "true".to_string());
        }
    }

    fn push_list(&mut self, key: &'static str, values: &[String]) {
        if !values.is_empty() {
            self.push(key, values.join(","));
        }
    }

    fn push_sort(&mut self, sort_by: &[SortBy], sort_order: Option<SortOrder>) {
        if !sort_by.is_empty() {
            let keys: Vec<&str> = sort_by.iter().map(SortBy::as_str).collect();
            self.push("SortBy", keys.join(","));
        }
        if let Some(order) = sort_order {
            self.push("SortOrder", order.as_str().to_string());
        }
    }

    fn push_filters(&mut self, filters: &[ItemFilter]) {
        if !filters.is_empty() {
            let names: Vec<&str> = filters.iter().map(ItemFilter::as_str).collect();
            self.push("Filters", names.join(","));
        }
    }

    fn push_page(&mut self, start_index: u32, limit: Option<u32>) {
        self.push("StartIndex", start_index.to_string());
        self.push_opt("Limit", limit.as_ref());
    }
}

fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<JellyfinItem>,
    total_record_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JellyfinItem {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "Type")]
    item_type: Option<String>,
    collection_type: Option<String>,
    series_id: Option<String>,
    series_name: Option<String>,
    index_number: Option<i32>,
    parent_index_number: Option<i32>,
    date_created: Option<String>,
    run_time_ticks: Option<u64>,
    #[serde(default)]
    image_tags: ImageTags,
    parent_thumb_item_id: Option<String>,
    user_data: Option<JellyfinUserData>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct ImageTags {
    primary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JellyfinUserData {
    #[serde(default)]
    played: bool,
    #[serde(default)]
    is_favorite: bool,
    likes: Option<bool>,
    #[serde(default)]
    play_count: u32,
    playback_position_ticks: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SeriesTimersResponse {
    #[serde(default)]
    items: Vec<SeriesTimerDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SeriesTimerDto {
    id: String,
    #[serde(default)]
    name: String,
    channel_name: Option<String>,
    #[serde(default)]
    record_any_channel: bool,
    #[serde(default)]
    record_new_only: bool,
}

impl From<JellyfinItem> for BaseItem {
    fn from(item: JellyfinItem) -> Self {
        BaseItem {
            id: ItemId::new(item.id),
            name: item.name,
            item_type: item.item_type,
            collection_type: item.collection_type,
            series_id: item.series_id.map(SeriesId::new),
            series_name: item.series_name,
            index_number: item.index_number,
            parent_index_number: item.parent_index_number,
            date_created: parse_date(item.date_created.as_deref()),
            run_time: item
                .run_time_ticks
                .map(|ticks| Duration::from_secs(ticks / TICKS_PER_SECOND)),
            primary_image_tag: item.image_tags.primary,
            parent_thumb_item_id: item.parent_thumb_item_id.map(ItemId::new),
            user_data: item.user_data.map(|ud| UserData {
                played: ud.played,
                is_favorite: ud.is_favorite,
                likes: ud.likes,
                play_count: ud.play_count,
                playback_position: ud
                    .playback_position_ticks
                    .map(|ticks| Duration::from_secs(ticks / TICKS_PER_SECOND)),
            }),
        }
    }
}

impl From<SeriesTimerDto> for SeriesTimer {
    fn from(dto: SeriesTimerDto) -> Self {
        SeriesTimer {
            id: dto.id,
            name: dto.name,
            channel_name: dto.channel_name,
            record_any_channel: dto.record_any_channel,
            record_new_only: dto.record_new_only,
        }
    }
}
