pub mod data_refresh;

pub use data_refresh::{ChangeCategory, ChangeTracker, DataRefreshService};
