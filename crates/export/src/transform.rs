//! Turning library records into the catalog's core and extended halves.

use crate::path;
use shelf_calibre::Record;
use shelf_catalog::Snapshot;
use shelf_catalog::models::{Book, Extended, SeriesPosition};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Calibre's default position for a book in a series.
const DEFAULT_SERIES_INDEX: f64 = 1.0;

/// Makes every record's identifier unique within the export and safe to use
/// as a file name. Records must already be in export order: the first record
/// keeps a contested identifier and later ones fall back to `book-<id>`.
pub(crate) fn assign_identifiers(records: &mut [Record]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(records.len());
    for record in records.iter_mut() {
        let uuid = record.uuid.trim();
        if path::is_file_name(uuid) && !taken.contains(uuid) {
            record.uuid = uuid.to_string();
        } else {
            let fallback = Record::fallback_uuid(record.id);
            let mut candidate = fallback.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{fallback}-{suffix}");
                suffix += 1;
            }
            tracing::warn!(
                book = record.id,
                uuid = %record.uuid,
                replacement = %candidate,
                "Book identifier is unusable or already taken"
            );
            record.uuid = candidate;
        }
        taken.insert(record.uuid.clone());
    }
}

/// The core half of a record. `cover` is the already-exported cover
/// reference, if any.
pub(crate) fn book(record: &Record, cover: Option<String>) -> Book {
    Book {
        id: record.id,
        uuid: record.uuid.clone(),
        title: record.title.clone(),
        authors: record.authors.clone(),
        author_sort: record.author_sort.clone(),
        series: record
            .series
            .as_ref()
            .map(|name| SeriesPosition::new(name, record.series_index.unwrap_or(DEFAULT_SERIES_INDEX))),
        tags: record.tags.clone(),
        pubdate: record.pubdate_string(),
        formats: record.format_names(),
        cover,
    }
}

/// The extended half of a record.
pub(crate) fn extended(record: &Record) -> Extended {
    Extended {
        description: record.comments.clone(),
        publisher: record.publisher.clone(),
        languages: record.languages.clone(),
        rating: record.rating,
        size: record.size,
        isbn: record.isbn.clone(),
        identifiers: record.identifiers.clone(),
        extra: record.extra.clone(),
    }
}

/// Builds the snapshot. `covers` maps book identifiers to exported cover
/// references; books missing from it get no cover. Books without any
/// extended fields get no extended entry.
pub(crate) fn snapshot(records: &[Record], covers: &HashMap<String, String>) -> Snapshot {
    let books = records.iter().map(|r| book(r, covers.get(&r.uuid).cloned())).collect();
    let metadata: BTreeMap<String, Extended> = records
        .iter()
        .map(|r| (r.uuid.clone(), extended(r)))
        .filter(|(_, e)| !e.is_empty())
        .collect();
    Snapshot::new(books, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(id: u64, uuid: &str) -> Record {
        Record { uuid: uuid.to_string(), ..Record::new(id, format!("Book {id}")) }
    }

    fn uuids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.uuid.as_str()).collect()
    }

    #[test]
    fn test_identifiers_are_kept_when_usable() {
        let mut records = vec![record(1, " aaa "), record(2, "bbb")];
        assign_identifiers(&mut records);
        assert_eq!(uuids(&records), vec!["aaa", "bbb"]);
    }

    #[test]
    fn test_duplicate_identifier_falls_back() {
        let mut records = vec![record(1, "same"), record(2, "same"), record(3, "../evil")];
        assign_identifiers(&mut records);
        assert_eq!(uuids(&records), vec!["same", "book-2", "book-3"]);
    }

    #[test]
    fn test_fallback_collision_gets_suffix() {
        let mut records = vec![record(1, "book-2"), record(2, ""), record(3, "book-2")];
        assign_identifiers(&mut records);
        assert_eq!(uuids(&records), vec!["book-2", "book-2-2", "book-3"]);
    }

    #[test]
    fn test_book_fields() {
        let mut r = record(7, "u7");
        r.authors = vec!["Ann Leckie".into()];
        r.series = Some("Imperial Radch".into());
        r.formats = vec![PathBuf::from("/lib/a.epub"), PathBuf::from("/lib/a.azw3"), PathBuf::from("/lib/b.EPUB")];
        let book = book(&r, Some("covers/u7.jpg".into()));
        assert_eq!(book.series, Some(SeriesPosition::new("Imperial Radch", 1.0)));
        assert_eq!(book.formats, vec!["EPUB", "AZW3"]);
        assert_eq!(book.cover.as_deref(), Some("covers/u7.jpg"));
        assert_eq!(book.pubdate, None);
    }

    #[test]
    fn test_snapshot_skips_empty_extended() {
        let mut with = record(1, "a");
        with.publisher = Some("Orbit".into());
        let without = record(2, "b");
        let covers = HashMap::from([("b".to_string(), "covers/b.png".to_string())]);
        let snapshot = snapshot(&[with, without], &covers);
        assert_eq!(snapshot.books.len(), 2);
        assert_eq!(snapshot.books[0].cover, None);
        assert_eq!(snapshot.books[1].cover.as_deref(), Some("covers/b.png"));
        assert_eq!(snapshot.metadata.keys().collect::<Vec<_>>(), vec!["a"]);
    }
}
