// Loading thresholds for incrementally loaded rows.
// The scroll position is compared against the loaded edge minus a margin.

// Paged rows trigger `chunk_size / PAGED_TRIGGER_DIVISOR` items before the edge
pub const PAGED_TRIGGER_DIVISOR: f64 = 1.7;

// Unpaged rows use a fixed lookahead
pub const UNPAGED_LOOKAHEAD: i64 = 20;

// === Start letter ===
// The "other" bucket of the letter picker; selecting it removes the constraint
pub const OTHER_START_LETTER: &str = "#";

// === Premieres ===
pub const DEFAULT_NEXT_UP_LIMIT: u32 = 50;
pub const DEFAULT_PREMIERE_WINDOW_MONTHS: u32 = 2;

// === Synthetic grid buttons ===
pub const FAVORITE_SONGS_BUTTON_ID: i32 = 10;
pub const LIVE_TV_RECORDINGS_BUTTON_ID: i32 = 2000;
pub const LIVE_TV_SCHEDULE_BUTTON_ID: i32 = 2001;
pub const LIVE_TV_SERIES_BUTTON_ID: i32 = 2002;

// Collection types the browse screens cannot open
pub const UNSUPPORTED_COLLECTION_TYPES: &[&str] = &["books", "folders"];
