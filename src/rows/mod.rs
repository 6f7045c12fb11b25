mod container;
mod controller;
mod dispatch;
mod guard;
mod item;
pub mod premieres;
mod source;
pub mod triggers;

pub use container::{RowContainer, RowEntry, RowList};
pub use controller::{ItemRow, ItemRowBuilder, RetrieveFinished, should_load_more};
pub use guard::{RetrievalGuard, RetrievalTicket};
pub use item::{DisplayHints, GridButton, RowItem};
pub use premieres::reconcile_premieres;
pub use source::{FetchMode, RowSource, SourceKind};
pub use triggers::{ChangeTrigger, guide_window_start};
