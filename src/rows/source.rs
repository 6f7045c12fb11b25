//! What a row shows and how it gets it.
//!
//! Each variant carries exactly the parameters its fetch routine needs, so
//! "which query is set" is decided by the type rather than by checking
//! optional fields at runtime.

use std::fmt;

use crate::models::{
    AdditionalPartsQuery, ArtistsQuery, BaseItem, Chapter, FilterOptions, ItemQuery, LatestQuery,
    LiveTvChannelQuery, NextUpQuery, Person, RecommendedProgramsQuery, RecordingsQuery,
    ResumeQuery, SeasonsQuery, SeriesTimersQuery, SimilarQuery, SortOption, SpecialsQuery,
    TrailersQuery, UpcomingQuery, ViewsQuery,
};

#[derive(Debug, Clone)]
pub enum RowSource {
    Items(ItemQuery),
    Artists(ArtistsQuery),
    AlbumArtists(ArtistsQuery),
    NextUp(NextUpQuery),
    LatestItems(LatestQuery),
    Upcoming(UpcomingQuery),
    Season(SeasonsQuery),
    Views(ViewsQuery),
    SimilarSeries(SimilarQuery),
    SimilarMovies(SimilarQuery),
    LiveTvChannel(LiveTvChannelQuery),
    LiveTvProgram(RecommendedProgramsQuery),
    LiveTvRecording(RecordingsQuery),
    StaticPeople(Vec<Person>),
    StaticChapters(Vec<Chapter>),
    StaticItems(Vec<BaseItem>),
    StaticAudioQueueItems(Vec<BaseItem>),
    Specials(SpecialsQuery),
    AdditionalParts(AdditionalPartsQuery),
    Trailers(TrailersQuery),
    /// Search results are handed over already fetched; the row only attaches
    /// itself to the screen when there is something to show.
    Search(Vec<BaseItem>),
    AudioPlaylists(ItemQuery),
    Premieres(ItemQuery),
    SeriesTimer(SeriesTimersQuery),
    Resume(ResumeQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Items,
    Artists,
    AlbumArtists,
    NextUp,
    LatestItems,
    Upcoming,
    Season,
    Views,
    SimilarSeries,
    SimilarMovies,
    LiveTvChannel,
    LiveTvProgram,
    LiveTvRecording,
    StaticPeople,
    StaticChapters,
    StaticItems,
    StaticAudioQueueItems,
    Specials,
    AdditionalParts,
    Trailers,
    Search,
    AudioPlaylists,
    Premieres,
    SeriesTimer,
    Resume,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Pre-supplied data, loaded synchronously.
    Static,
    /// Remote, fetched page by page at increasing offsets.
    Paged,
    /// Remote, fetched in one call per generation.
    SingleShot,
}

impl SourceKind {
    pub fn fetch_mode(&self) -> FetchMode {
        match self {
            SourceKind::StaticPeople
            | SourceKind::StaticChapters
            | SourceKind::StaticItems
            | SourceKind::StaticAudioQueueItems
            | SourceKind::Search => FetchMode::Static,
            SourceKind::Items
            | SourceKind::AudioPlaylists
            | SourceKind::Artists
            | SourceKind::AlbumArtists
            | SourceKind::LiveTvChannel
            | SourceKind::Resume => FetchMode::Paged,
            SourceKind::NextUp
            | SourceKind::LatestItems
            | SourceKind::Upcoming
            | SourceKind::Season
            | SourceKind::Views
            | SourceKind::SimilarSeries
            | SourceKind::SimilarMovies
            | SourceKind::LiveTvProgram
            | SourceKind::LiveTvRecording
            | SourceKind::Specials
            | SourceKind::AdditionalParts
            | SourceKind::Trailers
            | SourceKind::Premieres
            | SourceKind::SeriesTimer => FetchMode::SingleShot,
        }
    }

    /// Card height is fixed for these kinds unless the caller says otherwise.
    pub fn default_static_height(&self) -> bool {
        matches!(
            self,
            SourceKind::Artists
                | SourceKind::AlbumArtists
                | SourceKind::NextUp
                | SourceKind::LatestItems
                | SourceKind::Views
                | SourceKind::StaticPeople
                | SourceKind::StaticChapters
                | SourceKind::LiveTvProgram
                | SourceKind::LiveTvRecording
        )
    }
}

impl RowSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            RowSource::Items(_) => SourceKind::Items,
            RowSource::Artists(_) => SourceKind::Artists,
            RowSource::AlbumArtists(_) => SourceKind::AlbumArtists,
            RowSource::NextUp(_) => SourceKind::NextUp,
            RowSource::LatestItems(_) => SourceKind::LatestItems,
            RowSource::Upcoming(_) => SourceKind::Upcoming,
            RowSource::Season(_) => SourceKind::Season,
            RowSource::Views(_) => SourceKind::Views,
            RowSource::SimilarSeries(_) => SourceKind::SimilarSeries,
            RowSource::SimilarMovies(_) => SourceKind::SimilarMovies,
            RowSource::LiveTvChannel(_) => SourceKind::LiveTvChannel,
            RowSource::LiveTvProgram(_) => SourceKind::LiveTvProgram,
            RowSource::LiveTvRecording(_) => SourceKind::LiveTvRecording,
            RowSource::StaticPeople(_) => SourceKind::StaticPeople,
            RowSource::StaticChapters(_) => SourceKind::StaticChapters,
            RowSource::StaticItems(_) => SourceKind::StaticItems,
            RowSource::StaticAudioQueueItems(_) => SourceKind::StaticAudioQueueItems,
            RowSource::Specials(_) => SourceKind::Specials,
            RowSource::AdditionalParts(_) => SourceKind::AdditionalParts,
            RowSource::Trailers(_) => SourceKind::Trailers,
            RowSource::Search(_) => SourceKind::Search,
            RowSource::AudioPlaylists(_) => SourceKind::AudioPlaylists,
            RowSource::Premieres(_) => SourceKind::Premieres,
            RowSource::SeriesTimer(_) => SourceKind::SeriesTimer,
            RowSource::Resume(_) => SourceKind::Resume,
        }
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.kind().fetch_mode()
    }

    /// Rewrites the sort of the underlying query. Returns false for kinds
    /// whose endpoint has no sort parameters.
    pub(crate) fn apply_sort(&mut self, option: &SortOption) -> bool {
        match self {
            RowSource::Artists(query) | RowSource::AlbumArtists(query) => {
                query.apply_sort(option);
                true
            }
            RowSource::Items(query)
            | RowSource::AudioPlaylists(query)
            | RowSource::Premieres(query) => {
                query.apply_sort(option);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn apply_filters(&mut self, filters: Option<&FilterOptions>) -> bool {
        match self {
            RowSource::Artists(query) | RowSource::AlbumArtists(query) => {
                query.apply_filters(filters);
                true
            }
            RowSource::Items(query)
            | RowSource::AudioPlaylists(query)
            | RowSource::Premieres(query) => {
                query.apply_filters(filters);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_start_letter(&mut self, letter: Option<String>) -> bool {
        match self {
            RowSource::Artists(query) | RowSource::AlbumArtists(query) => {
                query.name_starts_with_or_greater = letter;
                true
            }
            RowSource::Items(query)
            | RowSource::AudioPlaylists(query)
            | RowSource::Premieres(query) => {
                query.name_starts_with_or_greater = letter;
                true
            }
            _ => false,
        }
    }

    pub fn start_letter(&self) -> Option<&str> {
        match self {
            RowSource::Artists(query) | RowSource::AlbumArtists(query) => {
                query.name_starts_with_or_greater.as_deref()
            }
            RowSource::Items(query)
            | RowSource::AudioPlaylists(query)
            | RowSource::Premieres(query) => query.name_starts_with_or_greater.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortBy, SortOrder};

    #[test]
    fn test_fetch_modes() {
        assert_eq!(
            RowSource::Items(ItemQuery::default()).fetch_mode(),
            FetchMode::Paged
        );
        assert_eq!(
            RowSource::Premieres(ItemQuery::default()).fetch_mode(),
            FetchMode::SingleShot
        );
        assert_eq!(RowSource::Search(Vec::new()).fetch_mode(), FetchMode::Static);
        assert_eq!(
            RowSource::NextUp(NextUpQuery::default()).fetch_mode(),
            FetchMode::SingleShot
        );
    }

    #[test]
    fn test_sort_only_rewrites_sortable_queries() {
        let option = SortOption::new("Rating", SortBy::CommunityRating, SortOrder::Descending);

        let mut items = RowSource::Items(ItemQuery::default());
        assert!(items.apply_sort(&option));
        match &items {
            RowSource::Items(query) => {
                assert_eq!(query.sort_by, vec![SortBy::CommunityRating, SortBy::SortName])
            }
            other => panic!("kind changed: {:?}", other.kind()),
        }

        let mut next_up = RowSource::NextUp(NextUpQuery::default());
        assert!(!next_up.apply_sort(&option));
    }

    #[test]
    fn test_start_letter_round_trip() {
        let mut artists = RowSource::AlbumArtists(ArtistsQuery::default());
        assert!(artists.set_start_letter(Some("M".to_string())));
        assert_eq!(artists.start_letter(), Some("M"));

        artists.set_start_letter(None);
        assert_eq!(artists.start_letter(), None);

        let mut views = RowSource::Views(ViewsQuery::default());
        assert!(!views.set_start_letter(Some("M".to_string())));
        assert_eq!(views.start_letter(), None);
    }

    #[test]
    fn test_default_static_height() {
        assert!(SourceKind::NextUp.default_static_height());
        assert!(!SourceKind::Items.default_static_height());
    }
}
