mod identifiers;
pub mod query;

pub use identifiers::{ItemId, RowId, SeriesId, UserId};
pub use query::{
    AdditionalPartsQuery, ArtistsQuery, FilterOptions, ItemFilter, ItemQuery, LatestQuery,
    LiveTvChannelQuery, NextUpQuery, RecommendedProgramsQuery, RecordingsQuery, ResumeQuery,
    SeasonsQuery, SeriesTimersQuery, SimilarQuery, SortBy, SortOption, SortOrder, SpecialsQuery,
    TrailersQuery, UpcomingQuery, ViewsQuery,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub is_administrator: bool,
    pub enable_live_tv_management: bool,
}

impl User {
    pub fn can_manage_recordings(&self) -> bool {
        self.is_administrator || self.enable_live_tv_management
    }
}

/// Anything the server hands back from an items-style endpoint: movies,
/// episodes, series, channels, programs, recordings, artists and views all
/// share this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseItem {
    pub id: ItemId,
    pub name: String,
    pub item_type: Option<String>,
    pub collection_type: Option<String>,
    pub series_id: Option<SeriesId>,
    pub series_name: Option<String>,
    pub index_number: Option<i32>,
    pub parent_index_number: Option<i32>,
    pub date_created: Option<DateTime<Utc>>,
    pub run_time: Option<Duration>,
    pub primary_image_tag: Option<String>,
    pub parent_thumb_item_id: Option<ItemId>,
    pub user_data: Option<UserData>,
}

impl BaseItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type: None,
            collection_type: None,
            series_id: None,
            series_name: None,
            index_number: None,
            parent_index_number: None,
            date_created: None,
            run_time: None,
            primary_image_tag: None,
            parent_thumb_item_id: None,
            user_data: None,
        }
    }

    /// The user explicitly rated this item down. No rating is not a dislike.
    pub fn is_disliked(&self) -> bool {
        self.user_data
            .as_ref()
            .is_some_and(|ud| ud.likes == Some(false))
    }

    pub fn is_first_episode(&self) -> bool {
        self.index_number == Some(1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserData {
    pub played: bool,
    pub is_favorite: bool,
    pub likes: Option<bool>,
    pub play_count: u32,
    pub playback_position: Option<Duration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<ItemId>,
    pub name: String,
    pub role: Option<String>,
    pub person_type: Option<String>,
    pub primary_image_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub item_id: ItemId,
    pub name: Option<String>,
    pub start_position: Duration,
    pub image_tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesTimer {
    pub id: String,
    pub name: String,
    pub channel_name: Option<String>,
    pub record_any_channel: bool,
    pub record_new_only: bool,
}

/// A page from a paged endpoint. `total_record_count` is only meaningful when
/// the request asked the server to count.
#[derive(Debug, Clone, Default)]
pub struct ItemsPage {
    pub items: Vec<BaseItem>,
    pub total_record_count: Option<u32>,
}

impl ItemsPage {
    pub fn new(items: Vec<BaseItem>, total_record_count: Option<u32>) -> Self {
        Self {
            items,
            total_record_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
