use crate::models::{BaseItem, Chapter, ItemId, Person, SeriesId, SeriesTimer};

/// Presentation flags a row passes down to every media card it builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayHints {
    pub prefer_parent_thumb: bool,
    pub static_height: bool,
}

/// A synthetic entry that opens another screen instead of playing media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridButton {
    pub id: i32,
    pub label: String,
}

impl GridButton {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// One entry of a row, wrapping whatever the row's source produced.
#[derive(Debug, Clone)]
pub enum RowItem {
    Media { item: BaseItem, hints: DisplayHints },
    Person(Person),
    Chapter(Chapter),
    AudioQueue(BaseItem),
    SeriesTimer(SeriesTimer),
    GridButton(GridButton),
}

impl RowItem {
    pub fn media(item: BaseItem, hints: DisplayHints) -> Self {
        RowItem::Media { item, hints }
    }

    pub fn button(id: i32, label: impl Into<String>) -> Self {
        RowItem::GridButton(GridButton::new(id, label))
    }

    pub fn base_item(&self) -> Option<&BaseItem> {
        match self {
            RowItem::Media { item, .. } | RowItem::AudioQueue(item) => Some(item),
            _ => None,
        }
    }

    pub fn series_id(&self) -> Option<&SeriesId> {
        self.base_item().and_then(|item| item.series_id.as_ref())
    }

    pub fn display_name(&self) -> &str {
        match self {
            RowItem::Media { item, .. } | RowItem::AudioQueue(item) => &item.name,
            RowItem::Person(person) => &person.name,
            RowItem::Chapter(chapter) => chapter.name.as_deref().unwrap_or_default(),
            RowItem::SeriesTimer(timer) => &timer.name,
            RowItem::GridButton(button) => &button.label,
        }
    }

    /// Item whose artwork the card should show.
    pub fn image_item_id(&self) -> Option<&ItemId> {
        match self {
            RowItem::Media { item, hints } if hints.prefer_parent_thumb => {
                item.parent_thumb_item_id.as_ref().or(Some(&item.id))
            }
            RowItem::Media { item, .. } | RowItem::AudioQueue(item) => Some(&item.id),
            RowItem::Person(person) => person.id.as_ref(),
            RowItem::Chapter(chapter) => Some(&chapter.item_id),
            RowItem::SeriesTimer(_) | RowItem::GridButton(_) => None,
        }
    }

    pub fn is_grid_button(&self) -> bool {
        matches!(self, RowItem::GridButton(_))
    }
}
