//! Category Aggregator
//!
//! Groups a flat record list into one group per fixed category, in the
//! enumeration order, after applying the search and category filters.
//! Records whose category is not in the enumeration never enter a group;
//! they are handed back separately in `uncategorized`.

/// A record that can be placed in the category matrix
pub trait Categorized {
    fn id(&self) -> &str;

    /// Raw category label as stored by the backend
    fn category(&self) -> &str;

    /// Text matched by the search box (name/title, description)
    fn search_fields(&self) -> [&str; 2];
}

/// Search box + category selector state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl MatrixFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Lower-cased search term; blank means "no search"
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_lowercase())
    }

    fn selected_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.search_term().is_some() || self.selected_category().is_some()
    }

    /// Whether the group for `category` is the one the user picked
    /// (every group is selected when no category is picked)
    pub fn selects(&self, category: &str) -> bool {
        self.selected_category().map_or(true, |c| c == category)
    }
}

/// One column of the matrix
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a, T> {
    pub category: String,
    pub records: Vec<&'a T>,
    pub count: usize,
    /// False when a different category is picked in the selector
    pub selected: bool,
}

impl<'a, T> CategoryGroup<'a, T> {
    /// Empty column that should render its "no records" fallback
    pub fn shows_empty_state(&self) -> bool {
        self.count == 0 && self.selected
    }

    pub fn is_visible(&self) -> bool {
        self.count > 0 || self.selected
    }
}

#[derive(Debug, Clone)]
pub struct CategoryMatrix<'a, T> {
    pub groups: Vec<CategoryGroup<'a, T>>,
    /// Filter-matching records whose category is outside the enumeration
    pub uncategorized: Vec<&'a T>,
}

impl<'a, T> CategoryMatrix<'a, T> {
    /// Records placed in groups; uncategorized ones are not counted
    pub fn grouped_total(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grouped_total() == 0
    }

    pub fn group(&self, category: &str) -> Option<&CategoryGroup<'a, T>> {
        self.groups.iter().find(|g| g.category == category)
    }

    pub fn visible_groups(&self) -> impl Iterator<Item = &CategoryGroup<'a, T>> {
        self.groups.iter().filter(|g| g.is_visible())
    }
}

/// Build the matrix. Deterministic; source order is kept inside each group.
pub fn group_by_category<'a, T: Categorized>(
    records: &'a [T],
    categories: &[&str],
    filter: &MatrixFilter,
) -> CategoryMatrix<'a, T> {
    let search = filter.search_term();
    let selected = filter.selected_category();

    let mut groups: Vec<CategoryGroup<'a, T>> = categories
        .iter()
        .map(|category| CategoryGroup {
            category: category.to_string(),
            records: Vec::new(),
            count: 0,
            selected: filter.selects(category),
        })
        .collect();
    let mut uncategorized = Vec::new();

    for record in records {
        if let Some(term) = &search {
            if !matches_search(record, term) {
                continue;
            }
        }
        if let Some(selected) = selected {
            if record.category() != selected {
                continue;
            }
        }

        match categories.iter().position(|c| *c == record.category()) {
            Some(index) => groups[index].records.push(record),
            None => uncategorized.push(record),
        }
    }

    for group in &mut groups {
        group.count = group.records.len();
    }

    if !uncategorized.is_empty() {
        tracing::debug!(
            "{} record(s) outside the category enumeration left out of the matrix",
            uncategorized.len()
        );
    }

    CategoryMatrix { groups, uncategorized }
}

fn matches_search<T: Categorized>(record: &T, term: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}
