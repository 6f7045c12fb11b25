use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::RowId;

/// The screen-level list of rows a row attaches itself to.
///
/// Rows only hold a weak reference to their container, so a screen can be
/// torn down while fetches are still in flight.
#[async_trait]
pub trait RowContainer: Send + Sync + std::fmt::Debug {
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn contains(&self, row: &RowId) -> bool;

    async fn add_row(&self, row: &RowId, header: &str);

    /// Adds the "no items" stand-in shown when the last real row goes away.
    async fn add_placeholder(&self);

    async fn remove_row(&self, row: &RowId);

    /// Removes `row` without ever leaving the container empty: when it is the
    /// only entry the placeholder takes its place in the same step.
    async fn detach_row(&self, row: &RowId);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEntry {
    Row { id: RowId, header: String },
    Placeholder,
}

#[derive(Debug, Default)]
pub struct RowList {
    entries: RwLock<Vec<RowEntry>>,
}

impl RowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<RowEntry> {
        self.entries.read().await.clone()
    }

    pub async fn has_placeholder(&self) -> bool {
        self.entries
            .read()
            .await
            .iter()
            .any(|entry| matches!(entry, RowEntry::Placeholder))
    }
}

#[async_trait]
impl RowContainer for RowList {
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn contains(&self, row: &RowId) -> bool {
        self.entries
            .read()
            .await
            .iter()
            .any(|entry| matches!(entry, RowEntry::Row { id, .. } if id == row))
    }

    async fn add_row(&self, row: &RowId, header: &str) {
        let mut entries = self.entries.write().await;
        if entries
            .iter()
            .any(|entry| matches!(entry, RowEntry::Row { id, .. } if id == row))
        {
            return;
        }

        entries.retain(|entry| !matches!(entry, RowEntry::Placeholder));
        debug!("Adding row {} ({})", header, row);
        entries.push(RowEntry::Row {
            id: row.clone(),
            header: header.to_string(),
        });
    }

    async fn add_placeholder(&self) {
        let mut entries = self.entries.write().await;
        if !entries.contains(&RowEntry::Placeholder) {
            entries.push(RowEntry::Placeholder);
        }
    }

    async fn remove_row(&self, row: &RowId) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !matches!(entry, RowEntry::Row { id, .. } if id == row));
        if entries.len() != before {
            debug!("Removed row {}", row);
        }
    }

    async fn detach_row(&self, row: &RowId) {
        let mut entries = self.entries.write().await;
        let Some(index) = entries
            .iter()
            .position(|entry| matches!(entry, RowEntry::Row { id, .. } if id == row))
        else {
            return;
        };

        if entries.len() == 1 {
            entries[index] = RowEntry::Placeholder;
            debug!("Replaced last row {} with placeholder", row);
        } else {
            entries.remove(index);
            debug!("Removed row {}", row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_remove_rows() {
        let list = RowList::new();
        let first = RowId::new("first");
        let second = RowId::new("second");

        list.add_row(&first, "First").await;
        list.add_row(&second, "Second").await;
        list.add_row(&first, "First").await;
        assert_eq!(list.len().await, 2);
        assert!(list.contains(&second).await);

        list.remove_row(&second).await;
        assert!(!list.contains(&second).await);
        assert_eq!(list.len().await, 1);
    }

    #[tokio::test]
    async fn test_real_row_replaces_placeholder() {
        let list = RowList::new();
        list.add_placeholder().await;
        list.add_placeholder().await;
        assert_eq!(list.entries().await, vec![RowEntry::Placeholder]);

        list.add_row(&RowId::new("row"), "Row").await;
        assert!(!list.has_placeholder().await);
        assert_eq!(list.len().await, 1);
    }

    #[tokio::test]
    async fn test_detach_row_keeps_list_populated() {
        let list = RowList::new();
        let first = RowId::new("first");
        let second = RowId::new("second");
        list.add_row(&first, "First").await;
        list.add_row(&second, "Second").await;

        list.detach_row(&first).await;
        assert_eq!(list.len().await, 1);
        assert!(!list.has_placeholder().await);

        list.detach_row(&second).await;
        assert_eq!(list.entries().await, vec![RowEntry::Placeholder]);

        // Unknown rows leave the list alone
        list.detach_row(&first).await;
        assert_eq!(list.entries().await, vec![RowEntry::Placeholder]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_detach_never_empties_list() {
        for _ in 0..200 {
            let list = std::sync::Arc::new(RowList::new());
            let first = RowId::new("first");
            let second = RowId::new("second");
            list.add_row(&first, "First").await;
            list.add_row(&second, "Second").await;

            let a = tokio::spawn({
                let list = list.clone();
                async move { list.detach_row(&first).await }
            });
            let b = tokio::spawn({
                let list = list.clone();
                async move { list.detach_row(&second).await }
            });
            a.await.unwrap();
            b.await.unwrap();

            assert_eq!(list.entries().await, vec![RowEntry::Placeholder]);
        }
    }
}
