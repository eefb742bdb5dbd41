//! Free-text search.

use crate::models::Book;

/// Returns the books matching `query`, in their original order.
///
/// Matching is a case-insensitive substring search over the title, authors,
/// series name and tags; a book matches when any one of them contains the
/// query exactly, surrounding whitespace included. A blank query matches
/// everything.
pub fn filter<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    if query.trim().is_empty() {
        return books.iter().collect();
    }
    let needle = query.to_lowercase();
    books.iter().filter(|book| matches(book, &needle)).collect()
}

/// `needle` must already be lower-cased.
fn matches(book: &Book, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(&book.title)
        || book.authors.iter().any(|a| contains(a))
        || book.series.as_ref().is_some_and(|s| contains(&s.name))
        || book.tags.iter().any(|t| contains(t))
}
