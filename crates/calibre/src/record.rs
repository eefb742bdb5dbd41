//! Normalizing raw calibredb output into [`Record`]s.
//!
//! calibredb's machine output is loosely typed: depending on the Calibre
//! version and the field, a value may be a list or a delimited string, a
//! number or a numeric string, or missing entirely. Each field is read on a
//! best-effort basis. A field that cannot be interpreted is logged and left
//! empty; it never rejects the whole record.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Fields requested from `calibredb list`, all of which [`Record::from_raw`]
/// knows how to interpret.
pub const DEFAULT_FIELDS: [&str; 18] = [
    "id",
    "title",
    "authors",
    "author_sort",
    "tags",
    "series",
    "series_index",
    "publisher",
    "pubdate",
    "rating",
    "comments",
    "isbn",
    "languages",
    "formats",
    "cover",
    "uuid",
    "size",
    "identifiers",
];

/// Calibre stores "no date" as midnight on 0101-01-01.
const UNDEFINED_YEAR: i32 = 101;
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
/// Cover file name Calibre uses inside each book directory.
const COVER_FILE: &str = "cover.jpg";

/// One book as reported by the library.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Calibre's numeric book ID
    pub id: u64,
    /// Calibre's UUID for the book, or `book-{id}` when it has none
    pub uuid: String,
    pub title: String,
    /// Authors in display order
    pub authors: Vec<String>,
    pub author_sort: Option<String>,
    /// Tags, de-duplicated, in library order
    pub tags: Vec<String>,
    pub series: Option<String>,
    pub series_index: Option<f64>,
    pub publisher: Option<String>,
    pub pubdate: Option<Date>,
    /// 0 to 10, two points per star
    pub rating: Option<u8>,
    pub comments: Option<String>,
    pub isbn: Option<String>,
    pub languages: Vec<String>,
    /// Absolute paths of the book's format files
    pub formats: Vec<PathBuf>,
    /// Where the cover image should be, if the book has one. Not checked for
    /// existence beyond resolving relative paths.
    pub cover: Option<PathBuf>,
    pub size: Option<u64>,
    pub identifiers: BTreeMap<String, String>,
    /// Everything else calibredb returned, untouched
    pub extra: BTreeMap<String, Value>,
}
impl Record {
    /// A record with only an ID and title set.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            uuid: Self::fallback_uuid(id),
            title: title.into(),
            authors: vec![],
            author_sort: None,
            tags: vec![],
            series: None,
            series_index: None,
            publisher: None,
            pubdate: None,
            rating: None,
            comments: None,
            isbn: None,
            languages: vec![],
            formats: vec![],
            cover: None,
            size: None,
            identifiers: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Interprets one object from `calibredb list --for-machine`.
    ///
    /// Returns `None` only when the object has no usable numeric `id`, since
    /// nothing else can stand in for it.
    pub fn from_raw(mut raw: Map<String, Value>) -> Option<Self> {
        let Some(id) = raw.remove("id").as_ref().and_then(as_u64) else {
            tracing::warn!(title = ?raw.get("title"), "Skipping calibredb record without a numeric id");
            return None;
        };
        let mut field = |name: &'static str| Field { id, name, value: raw.remove(name) };

        let title = field("title").string().unwrap_or_else(|| "Unknown".to_string());
        let authors = field("authors").list('&');
        let author_sort = field("author_sort").string();
        let tags = dedup(field("tags").list(','));
        let series = field("series").string();
        let series_index = field("series_index").float();
        let publisher = field("publisher").string();
        let pubdate = field("pubdate").date();
        let rating = field("rating").rating();
        let comments = field("comments").string();
        let isbn = field("isbn").string();
        let languages = field("languages").list(',');
        let formats: Vec<PathBuf> = field("formats").list(',').into_iter().map(PathBuf::from).collect();
        let cover = field("cover").string().and_then(|c| resolve_cover(&c, &formats));
        let size = field("size").unsigned();
        let identifiers = field("identifiers").map();
        let uuid = field("uuid")
            .string()
            .or_else(|| identifiers.get("uuid").cloned())
            .unwrap_or_else(|| Self::fallback_uuid(id));
        // Whatever is left was not asked for by name; pass it through.
        let extra = raw.into_iter().filter(|(_, v)| !v.is_null()).collect();

        Some(Self {
            id,
            uuid,
            title,
            authors,
            author_sort,
            tags,
            series,
            series_index,
            publisher,
            pubdate,
            rating,
            comments,
            isbn,
            languages,
            formats,
            cover,
            size,
            identifiers,
            extra,
        })
    }

    /// The identifier used for a book that has no UUID of its own.
    pub fn fallback_uuid(id: u64) -> String {
        format!("book-{id}")
    }

    /// Upper-case format names derived from the format file extensions.
    pub fn format_names(&self) -> Vec<String> {
        dedup(
            self.formats
                .iter()
                .filter_map(|p| p.extension())
                .map(|e| e.to_string_lossy().to_uppercase())
                .collect(),
        )
    }

    /// Publication date as `YYYY-MM-DD`.
    pub fn pubdate_string(&self) -> Option<String> {
        self.pubdate.and_then(|d| d.format(DATE_FORMAT).ok())
    }
}

/// A named value taken out of a raw record, for lenient conversion.
struct Field {
    id: u64,
    name: &'static str,
    value: Option<Value>,
}
impl Field {
    fn malformed(&self) {
        tracing::warn!(book = self.id, field = self.name, value = ?self.value, "Ignoring malformed field");
    }

    /// Present and not `null`, `""` or `[]`.
    fn present(&self) -> Option<&Value> {
        self.value.as_ref().filter(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        })
    }

    fn string(self) -> Option<String> {
        match self.present()? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => {
                self.malformed();
                None
            },
        }
    }

    /// A list given either as an array of strings or as a `separator`-delimited string.
    fn list(self, separator: char) -> Vec<String> {
        let items: Vec<String> = match self.present() {
            None => return vec![],
            Some(Value::String(s)) => s.split(separator).map(str::to_string).collect(),
            Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str()).map(str::to_string).collect(),
            Some(_) => {
                self.malformed();
                return vec![];
            },
        };
        items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }

    fn float(self) -> Option<f64> {
        let value = self.present()?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.filter(|f: &f64| f.is_finite()).or_else(|| {
            self.malformed();
            None
        })
    }

    fn unsigned(self) -> Option<u64> {
        let parsed = as_u64(self.present()?);
        parsed.or_else(|| {
            self.malformed();
            None
        })
    }

    fn rating(self) -> Option<u8> {
        // Clamped rather than rejected: some plugins write ratings above 10.
        self.float().map(|r| r.round().clamp(0.0, 10.0) as u8)
    }

    fn date(self) -> Option<Date> {
        let Some(Value::String(s)) = self.present() else {
            if self.present().is_some() {
                self.malformed();
            }
            return None;
        };
        match parse_date(s) {
            Some(date) if date.year() <= UNDEFINED_YEAR => None,
            Some(date) => Some(date),
            None => {
                self.malformed();
                None
            },
        }
    }

    fn map(self) -> BTreeMap<String, String> {
        match self.present() {
            None => BTreeMap::new(),
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k.clone(), s.clone())),
                    Value::Number(n) => Some((k.clone(), n.to_string())),
                    _ => None,
                })
                .collect(),
            Some(_) => {
                self.malformed();
                BTreeMap::new()
            },
        }
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts full RFC 3339 timestamps as well as anything starting with a plain
/// `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    match OffsetDateTime::parse(s, &Rfc3339) {
        Ok(dt) => Some(dt.date()),
        Err(_) => s.get(..10).and_then(|d| Date::parse(d, DATE_FORMAT).ok()),
    }
}

/// calibredb normally reports an absolute cover path. A relative one is
/// looked up next to the book's first format file: `cover.jpg` first, then the
/// name as given.
fn resolve_cover(cover: &str, formats: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(cover);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    let dir = formats.first()?.parent()?;
    [dir.join(COVER_FILE), dir.join(path)].into_iter().find(|candidate| candidate.is_file())
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use time::Month;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_full_record() {
        let record = Record::from_raw(raw(json!({
            "id": 42,
            "uuid": "6f1c3a0e-0000-4000-8000-000000000042",
            "title": "Small Gods",
            "authors": "Terry Pratchett",
            "author_sort": "Pratchett, Terry",
            "tags": ["Fantasy", "Satire", "Fantasy"],
            "series": "Discworld",
            "series_index": 13.0,
            "publisher": "Gollancz",
            "pubdate": "1992-05-01T00:00:00+00:00",
            "rating": 8,
            "comments": "<p>Religion.</p>",
            "isbn": "9780575052536",
            "languages": ["eng"],
            "formats": ["/lib/Terry Pratchett/Small Gods (42)/Small Gods - Terry Pratchett.epub"],
            "cover": "/lib/Terry Pratchett/Small Gods (42)/cover.jpg",
            "size": 312345,
            "identifiers": {"isbn": "9780575052536", "goodreads": 34484},
            "*shelf": "Favourites",
        })))
        .unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.uuid, "6f1c3a0e-0000-4000-8000-000000000042");
        assert_eq!(record.authors, vec!["Terry Pratchett"]);
        assert_eq!(record.tags, vec!["Fantasy", "Satire"]);
        assert_eq!(record.series_index, Some(13.0));
        assert_eq!(record.pubdate, Some(Date::from_calendar_date(1992, Month::May, 1).unwrap()));
        assert_eq!(record.pubdate_string().as_deref(), Some("1992-05-01"));
        assert_eq!(record.rating, Some(8));
        assert_eq!(record.format_names(), vec!["EPUB"]);
        assert_eq!(record.cover, Some(PathBuf::from("/lib/Terry Pratchett/Small Gods (42)/cover.jpg")));
        assert_eq!(record.identifiers.get("goodreads").map(String::as_str), Some("34484"));
        assert_eq!(record.extra.get("*shelf"), Some(&json!("Favourites")));
        assert!(!record.extra.contains_key("title"));
    }

    #[rstest]
    #[case(json!("Neil Gaiman & Terry Pratchett"), vec!["Neil Gaiman", "Terry Pratchett"])]
    #[case(json!(["Neil Gaiman", "Terry Pratchett"]), vec!["Neil Gaiman", "Terry Pratchett"])]
    #[case(json!(""), vec![])]
    #[case(json!(null), vec![])]
    #[case(json!({"not": "a list"}), vec![])]
    fn test_authors(#[case] authors: Value, #[case] expected: Vec<&str>) {
        let record = Record::from_raw(raw(json!({"id": 1, "authors": authors}))).unwrap();
        assert_eq!(record.authors, expected);
    }

    #[rstest]
    #[case(json!("Fantasy, Humour,, "), vec!["Fantasy", "Humour"])]
    #[case(json!(["Fantasy", " Humour "]), vec!["Fantasy", "Humour"])]
    fn test_tags(#[case] tags: Value, #[case] expected: Vec<&str>) {
        let record = Record::from_raw(raw(json!({"id": 1, "tags": tags}))).unwrap();
        assert_eq!(record.tags, expected);
    }

    #[rstest]
    #[case(json!("2010-03-04T00:00:00+00:00"), Some("2010-03-04"))]
    #[case(json!("2010-03-04T23:30:00.123456-05:00"), Some("2010-03-04"))]
    #[case(json!("2010-03-04"), Some("2010-03-04"))]
    #[case(json!("0101-01-01T00:00:00+00:00"), None)]
    #[case(json!("yesterday"), None)]
    #[case(json!(20100304), None)]
    fn test_pubdate(#[case] pubdate: Value, #[case] expected: Option<&str>) {
        let record = Record::from_raw(raw(json!({"id": 1, "pubdate": pubdate}))).unwrap();
        assert_eq!(record.pubdate_string().as_deref(), expected);
    }

    #[rstest]
    #[case(json!({"id": 5, "uuid": "abc"}), "abc")]
    #[case(json!({"id": 5, "identifiers": {"uuid": "from-identifiers"}}), "from-identifiers")]
    #[case(json!({"id": 5, "uuid": ""}), "book-5")]
    #[case(json!({"id": 5}), "book-5")]
    fn test_uuid(#[case] input: Value, #[case] expected: &str) {
        assert_eq!(Record::from_raw(raw(input)).unwrap().uuid, expected);
    }

    #[rstest]
    #[case(json!({"title": "No id"}))]
    #[case(json!({"id": "seven"}))]
    #[case(json!({"id": -1}))]
    fn test_missing_id(#[case] input: Value) {
        assert!(Record::from_raw(raw(input)).is_none());
    }

    #[test]
    fn test_malformed_optional_fields_are_dropped() {
        let record = Record::from_raw(raw(json!({
            "id": "7",
            "title": "Still Here",
            "series_index": "not a number",
            "rating": [1, 2],
            "size": "huge",
            "identifiers": "isbn:123",
        })))
        .unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.title, "Still Here");
        assert_eq!(record.series_index, None);
        assert_eq!(record.rating, None);
        assert_eq!(record.size, None);
        assert!(record.identifiers.is_empty());
    }

    #[test]
    fn test_missing_title() {
        let record = Record::from_raw(raw(json!({"id": 1}))).unwrap();
        assert_eq!(record.title, "Unknown");
    }

    #[test]
    fn test_relative_cover_resolves_next_to_format() {
        let dir = tempfile::tempdir().unwrap();
        let book_dir = dir.path().join("Author/Title (1)");
        std::fs::create_dir_all(&book_dir).unwrap();
        std::fs::write(book_dir.join("cover.jpg"), b"jpeg").unwrap();
        let format = book_dir.join("Title - Author.epub");
        let record = Record::from_raw(raw(json!({
            "id": 1,
            "formats": [format.to_str().unwrap()],
            "cover": "cover.jpg",
        })))
        .unwrap();
        assert_eq!(record.cover, Some(book_dir.join("cover.jpg")));
    }

    #[test]
    fn test_relative_cover_without_formats_is_dropped() {
        let record = Record::from_raw(raw(json!({"id": 1, "cover": "cover.jpg"}))).unwrap();
        assert_eq!(record.cover, None);
    }

    #[test]
    fn test_format_names() {
        let mut record = Record::new(1, "t");
        record.formats = vec!["/a/b.epub".into(), "/a/b.PDF".into(), "/a/c.epub".into(), "/a/noext".into()];
        assert_eq!(record.format_names(), vec!["EPUB", "PDF"]);
    }
}
