//! List view state
//!
//! Holds the records behind one matrix page. Loads are ticketed: only the
//! most recently issued ticket may replace the list, so a slow response
//! can never overwrite a newer one.

use crate::error::ApiResult;
use crate::logic::matrix::{group_by_category, CategoryMatrix, Categorized, MatrixFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    /// User-facing message of the last failure
    Failed(String),
}

/// Identifies one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct ListView<T> {
    records: Vec<T>,
    state: LoadState,
    latest: u64,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            state: LoadState::Idle,
            latest: 0,
        }
    }
}

impl<T: Categorized + Clone> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start a load; any earlier ticket becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.latest)
    }

    /// Apply a load result. Returns false when the ticket is stale and the
    /// result was dropped.
    pub fn finish(&mut self, ticket: LoadTicket, result: ApiResult<Vec<T>>) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(
                "Discarding stale load result (ticket {}, latest {})",
                ticket.0,
                self.latest
            );
            return false;
        }

        match result {
            Ok(records) => {
                tracing::debug!("Loaded {} record(s)", records.len());
                self.records = records;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!("Load failed: {}", e);
                self.state = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    /// Insert or replace by id; merging the same record twice is a no-op
    pub fn merge(&mut self, record: T) {
        match self.records.iter().position(|r| r.id() == record.id()) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    /// Drop a deleted record; returns whether it was present
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn matrix(&self, categories: &[&str], filter: &MatrixFilter) -> CategoryMatrix<'_, T> {
        group_by_category(&self.records, categories, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        category: String,
        name: String,
    }

    impl Categorized for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn category(&self) -> &str {
            &self.category
        }

        fn search_fields(&self) -> [&str; 2] {
            [&self.name, ""]
        }
    }

    fn item(id: &str, category: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_load_lifecycle() {
        let mut view: ListView<Item> = ListView::new();
        assert_eq!(view.state(), &LoadState::Idle);

        let ticket = view.begin_load();
        assert!(view.is_loading());
        assert!(view.finish(ticket, Ok(vec![item("1", "A", "uno")])));
        assert_eq!(view.state(), &LoadState::Loaded);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut view: ListView<Item> = ListView::new();
        let first = view.begin_load();
        let second = view.begin_load();

        assert!(view.finish(second, Ok(vec![item("2", "A", "nuevo")])));
        assert!(!view.finish(first, Ok(vec![item("1", "A", "viejo")])));

        assert_eq!(view.records()[0].id, "2");
        assert_eq!(view.state(), &LoadState::Loaded);
    }

    #[test]
    fn test_failure_keeps_previous_records() {
        let mut view: ListView<Item> = ListView::new();
        let ticket = view.begin_load();
        view.finish(ticket, Ok(vec![item("1", "A", "uno")]));

        let ticket = view.begin_load();
        view.finish(ticket, Err(ApiError::Network("refused".to_string())));

        assert_eq!(view.len(), 1);
        assert_eq!(
            view.state(),
            &LoadState::Failed(crate::constants::MSG_NETWORK.to_string())
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut view: ListView<Item> = ListView::new();
        view.merge(item("1", "A", "uno"));
        view.merge(item("1", "A", "uno"));
        assert_eq!(view.len(), 1);

        view.merge(item("1", "B", "uno editado"));
        assert_eq!(view.len(), 1);
        assert_eq!(view.find("1").unwrap().category, "B");

        view.merge(item("2", "A", "dos"));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut view: ListView<Item> = ListView::new();
        view.merge(item("1", "A", "uno"));
        assert!(view.remove("1"));
        assert!(!view.remove("1"));
        assert!(view.is_empty());
    }

    #[test]
    fn test_matrix_over_loaded_records() {
        let mut view: ListView<Item> = ListView::new();
        let ticket = view.begin_load();
        view.finish(
            ticket,
            Ok(vec![item("1", "A", "uno"), item("2", "B", "dos"), item("3", "Z", "tres")]),
        );

        let matrix = view.matrix(&["A", "B"], &MatrixFilter::new());
        assert_eq!(matrix.grouped_total(), 2);
        assert_eq!(matrix.uncategorized.len(), 1);
    }
}
