//! Request shapes for every kind of row the home and browse screens show.
//!
//! Each struct carries only what its endpoint understands. Sorting, filtering
//! and start-letter mutations live on the two query types that support them
//! ([`ItemQuery`] and [`ArtistsQuery`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ItemId, SeriesId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    SortName,
    DateCreated,
    PremiereDate,
    DatePlayed,
    CommunityRating,
    CriticRating,
    Runtime,
    ProductionYear,
    Random,
}

impl SortBy {
    /// Name the server expects in `SortBy=`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::SortName => "SortName",
            SortBy::DateCreated => "DateCreated",
            SortBy::PremiereDate => "PremiereDate",
            SortBy::DatePlayed => "DatePlayed",
            SortBy::CommunityRating => "CommunityRating",
            SortBy::CriticRating => "CriticRating",
            SortBy::Runtime => "Runtime",
            SortBy::ProductionYear => "ProductionYear",
            SortBy::Random => "Random",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

/// One entry of a sort menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOption {
    pub name: String,
    pub value: SortBy,
    pub order: SortOrder,
}

impl SortOption {
    pub fn new(name: impl Into<String>, value: SortBy, order: SortOrder) -> Self {
        Self {
            name: name.into(),
            value,
            order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemFilter {
    IsFavorite,
    IsUnplayed,
    IsPlayed,
    IsResumable,
    Likes,
    Dislikes,
}

impl ItemFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemFilter::IsFavorite => "IsFavorite",
            ItemFilter::IsUnplayed => "IsUnplayed",
            ItemFilter::IsPlayed => "IsPlayed",
            ItemFilter::IsResumable => "IsResumable",
            ItemFilter::Likes => "Likes",
            ItemFilter::Dislikes => "Dislikes",
        }
    }
}

/// The user-facing filter toggles of a browse grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub favorite_only: bool,
    pub unwatched_only: bool,
}

impl FilterOptions {
    pub fn filters(&self) -> Vec<ItemFilter> {
        let mut filters = Vec::new();
        if self.favorite_only {
            filters.push(ItemFilter::IsFavorite);
        }
        if self.unwatched_only {
            filters.push(ItemFilter::IsUnplayed);
        }
        filters
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub user_id: Option<UserId>,
    pub parent_id: Option<ItemId>,
    pub include_item_types: Vec<String>,
    pub recursive: bool,
    pub fields: Vec<String>,
    pub sort_by: Vec<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub filters: Vec<ItemFilter>,
    pub name_starts_with_or_greater: Option<String>,
    pub start_index: Option<u32>,
    pub limit: Option<u32>,
    pub enable_total_record_count: bool,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            user_id: None,
            parent_id: None,
            include_item_types: Vec::new(),
            recursive: false,
            fields: Vec::new(),
            sort_by: Vec::new(),
            sort_order: None,
            filters: Vec::new(),
            name_starts_with_or_greater: None,
            start_index: None,
            limit: None,
            enable_total_record_count: true,
        }
    }
}

impl ItemQuery {
    /// Primary key first, then `SortName` so equal keys come back in a
    /// stable order between pages.
    pub fn apply_sort(&mut self, option: &SortOption) {
        self.sort_by = vec![option.value, SortBy::SortName];
        self.sort_order = Some(option.order);
    }

    pub fn apply_filters(&mut self, filters: Option<&FilterOptions>) {
        self.filters = filters.map(FilterOptions::filters).unwrap_or_default();
    }
}

/// Shared by the artist and album-artist endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistsQuery {
    pub user_id: Option<UserId>,
    pub parent_id: Option<ItemId>,
    pub sort_by: Vec<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub filters: Vec<ItemFilter>,
    pub name_starts_with_or_greater: Option<String>,
    pub fields: Vec<String>,
    pub enable_total_record_count: bool,
}

impl Default for ArtistsQuery {
    fn default() -> Self {
        Self {
            user_id: None,
            parent_id: None,
            sort_by: Vec::new(),
            sort_order: None,
            filters: Vec::new(),
            name_starts_with_or_greater: None,
            fields: Vec::new(),
            enable_total_record_count: true,
        }
    }
}

impl ArtistsQuery {
    pub fn apply_sort(&mut self, option: &SortOption) {
        self.sort_by = vec![option.value];
        self.sort_order = Some(option.order);
    }

    pub fn apply_filters(&mut self, filters: Option<&FilterOptions>) {
        self.filters = filters.map(FilterOptions::filters).unwrap_or_default();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NextUpQuery {
    pub user_id: Option<UserId>,
    pub parent_id: Option<ItemId>,
    pub series_id: Option<SeriesId>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestQuery {
    pub user_id: Option<UserId>,
    pub parent_id: Option<ItemId>,
    pub include_item_types: Vec<String>,
    pub group_items: bool,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpcomingQuery {
    pub user_id: Option<UserId>,
    pub parent_id: Option<ItemId>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonsQuery {
    pub series_id: SeriesId,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewsQuery {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarQuery {
    pub item_id: ItemId,
    pub user_id: Option<UserId>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialsQuery {
    pub item_id: ItemId,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalPartsQuery {
    pub item_id: ItemId,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailersQuery {
    pub item_id: ItemId,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveTvChannelQuery {
    pub user_id: Option<UserId>,
    pub is_favorite: Option<bool>,
    pub enable_favorite_sorting: bool,
    pub add_current_program: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendedProgramsQuery {
    pub user_id: Option<UserId>,
    pub is_airing: Option<bool>,
    pub has_aired: Option<bool>,
    pub is_movie: Option<bool>,
    pub is_series: Option<bool>,
    pub is_sports: Option<bool>,
    pub is_kids: Option<bool>,
    pub is_news: Option<bool>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingsQuery {
    pub user_id: Option<UserId>,
    pub series_timer_id: Option<String>,
    pub is_in_progress: Option<bool>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeQuery {
    pub user_id: Option<UserId>,
    pub parent_id: Option<ItemId>,
    pub include_item_types: Vec<String>,
    pub media_types: Vec<String>,
    pub fields: Vec<String>,
}

/// Series timers are global to the server; the only input is whether the
/// session may manage recordings, which decides the extra buttons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTimersQuery {
    pub can_manage_recordings: bool,
}
