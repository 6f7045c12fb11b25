// Incrementally loaded media rows for Jellyfin browse screens

#![allow(clippy::result_large_err)]

pub mod backends;
pub mod config;
pub mod constants;
pub mod models;
pub mod rows;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use backends::{JellyfinApi, RowFetcher};
pub use config::Config;
pub use rows::{ItemRow, RetrieveFinished, RowContainer, RowList, RowSource};
pub use services::{ChangeTracker, DataRefreshService};
