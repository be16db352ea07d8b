//! Text filtering and pagination over catalog records
//!
//! Both operations are pure: they never mutate their input and always
//! return a fresh sequence in the input's relative order.

use crate::catalog::{Episode, Show};

/// Records that can be matched by the free-text search.
pub trait Searchable {
    /// The text fields a search term is matched against
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Show {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.summary.as_deref());
        fields.extend(self.genres.iter().map(String::as_str));
        fields
    }
}

impl Searchable for Episode {
    fn search_fields(&self) -> Vec<&str> {
        self.name
            .as_deref()
            .into_iter()
            .chain(self.summary.as_deref())
            .collect()
    }
}

/// Checks whether a single record matches a search term
///
/// Matching is a case-insensitive substring test on the term as typed,
/// surrounding whitespace included. A blank term matches every record.
pub fn matches_text<T: Searchable>(item: &T, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let needle = term.to_lowercase();

    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Filters records by a free-text search term
///
/// # Examples
///
/// ```ignore
/// let daleks = filter_by_text(&episodes, "DALEK");
/// ```
pub fn filter_by_text<T: Searchable + Clone>(items: &[T], term: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches_text(*item, term))
        .cloned()
        .collect()
}

/// Number of pages needed to show `len` items, `page_size` at a time
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Returns the 1-indexed page of `items`
///
/// The slice is clipped to the list bounds. Page 0, a zero page size, or a
/// page past the last one yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page > page_count(items.len(), page_size) {
        return &[];
    }

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    &items[start..end]
}
