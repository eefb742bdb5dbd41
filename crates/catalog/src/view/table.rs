//! Rendering the view into rows and cells.

use super::{Catalog, Column, ViewState, visible};
use crate::Snapshot;
use crate::models::Book;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Cells wider than this are cut short in the text rendering.
const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cover {
    /// Path of the image relative to the export directory.
    Image(String),
    /// The book has no exported cover.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Cover(Cover),
    Text(String),
}
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Cover(Cover::Image(_)) => write!(f, "[x]"),
            Self::Cover(Cover::Placeholder) => write!(f, "[ ]"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Identifier of the book this row shows
    pub uuid: String,
    /// One cell per visible column, in column order
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Shown instead of rows when there is nothing to list.
    pub notice: Option<String>,
}

/// Derives the table for a catalog under the given view state.
pub fn render(catalog: &Catalog, state: &ViewState) -> Table {
    let columns: Vec<Column> = state.columns.iter().collect();
    let snapshot = match catalog {
        Catalog::Ready(snapshot) => snapshot,
        Catalog::Failed(reason) => {
            return Table { columns, rows: vec![], notice: Some(format!("Unable to load library: {reason}")) };
        },
    };
    let rows: Vec<Row> = visible(&snapshot.books, state)
        .into_iter()
        .map(|book| Row {
            uuid: book.uuid.clone(),
            cells: columns.iter().map(|c| cell(snapshot, book, *c)).collect(),
        })
        .collect();
    let notice = match (snapshot.books.is_empty(), rows.is_empty()) {
        (true, _) => Some("No books in this library".to_string()),
        (false, true) => Some(format!("No books match \"{}\"", state.query.trim())),
        (false, false) => None,
    };
    Table { columns, rows, notice }
}

fn cell(snapshot: &Snapshot, book: &Book, column: Column) -> Cell {
    let extended = snapshot.extended(book);
    let text = match column {
        Column::Cover => {
            return Cell::Cover(match &book.cover {
                Some(path) => Cover::Image(path.clone()),
                None => Cover::Placeholder,
            });
        },
        Column::Title => book.title.clone(),
        Column::Authors => book.author_line(),
        Column::Series => book.series.as_ref().map(ToString::to_string).unwrap_or_default(),
        Column::Tags => book.tags.join(", "),
        Column::Date => book.pubdate.clone().unwrap_or_default(),
        Column::Formats => book.formats.join(", "),
        Column::Publisher => extended.and_then(|e| e.publisher.clone()).unwrap_or_default(),
        Column::Languages => extended.map(|e| e.languages.join(", ")).unwrap_or_default(),
        Column::Rating => extended.and_then(|e| e.stars()).unwrap_or_default(),
    };
    Cell::Text(text)
}

fn clip(text: &str) -> String {
    match text.char_indices().nth(MAX_CELL_WIDTH) {
        Some(_) => {
            let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
            clipped.push('…');
            clipped
        },
        None => text.to_string(),
    }
}

fn write_line(f: &mut Formatter<'_>, widths: &[usize], cells: &[&str]) -> FmtResult {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c}{}", " ".repeat(w.saturating_sub(c.chars().count()))))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

/// Plain-text rendering with padded columns, used by the terminal listing.
impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let rows: Vec<Vec<String>> =
            self.rows.iter().map(|r| r.cells.iter().map(|c| clip(&c.to_string())).collect()).collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| rows.iter().map(|r| r[i].chars().count()).fold(c.label().chars().count(), usize::max))
            .collect();
        let labels: Vec<&str> = self.columns.iter().map(Column::label).collect();
        write_line(f, &widths, &labels)?;
        let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &widths, &rules.iter().map(String::as_str).collect::<Vec<_>>())?;
        for row in &rows {
            write_line(f, &widths, &row.iter().map(String::as_str).collect::<Vec<_>>())?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f, "{notice}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Extended;
    use crate::view::{Columns, Sort, SortField};
    use std::collections::BTreeMap;

    fn snapshot() -> Snapshot {
        let book = |id: u64, title: &str, tag: &str, cover: bool| Book {
            id,
            uuid: format!("uuid-{id}"),
            title: title.into(),
            authors: vec!["Author".into()],
            author_sort: None,
            series: None,
            tags: vec!["Shared".into(), tag.into()],
            pubdate: None,
            formats: vec!["EPUB".into()],
            cover: cover.then(|| format!("covers/uuid-{id}.jpg")),
        };
        let metadata = BTreeMap::from([(
            "uuid-1".to_string(),
            Extended { publisher: Some("Tor".into()), rating: Some(8), ..Default::default() },
        )]);
        Snapshot::new(
            vec![book(1, "Bravo", "one", true), book(2, "Alpha", "two", true), book(3, "Charlie", "unique", false)],
            metadata,
        )
    }

    #[test]
    fn test_placeholder_for_missing_cover() {
        let table = render(&snapshot().into(), &ViewState::default());
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].cells[0], Cell::Cover(Cover::Image("covers/uuid-1.jpg".into())));
        assert_eq!(table.rows[2].cells[0], Cell::Cover(Cover::Placeholder));
        assert!(table.notice.is_none());
    }

    #[test]
    fn test_unique_tag_filters_to_one_row() {
        let table = render(&snapshot().into(), &ViewState::default().with_query("UNIQUE"));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].uuid, "uuid-3");
    }

    #[test]
    fn test_hidden_columns_produce_no_cells() {
        let columns: Columns = "title,publisher,rating".parse().unwrap();
        let state = ViewState::default().with_columns(columns).with_sort(Sort::ascending(SortField::Title));
        let table = render(&snapshot().into(), &state);
        assert_eq!(table.columns, vec![Column::Title, Column::Publisher, Column::Rating]);
        assert_eq!(
            table.rows[0].cells,
            vec![Cell::Text("Alpha".into()), Cell::Text(String::new()), Cell::Text(String::new())]
        );
        assert_eq!(
            table.rows[1].cells,
            vec![Cell::Text("Bravo".into()), Cell::Text("Tor".into()), Cell::Text("4".into())]
        );
    }

    #[test]
    fn test_no_matches_notice() {
        let table = render(&snapshot().into(), &ViewState::default().with_query("zzz"));
        assert!(table.rows.is_empty());
        assert_eq!(table.notice.as_deref(), Some("No books match \"zzz\""));
    }

    #[test]
    fn test_failed_catalog_renders_empty_with_notice() {
        let table = render(&Catalog::Failed("data file not found: books.js".into()), &ViewState::default());
        assert!(table.rows.is_empty());
        assert!(table.notice.unwrap().contains("books.js"));
    }

    #[test]
    fn test_text_rendering() {
        let columns: Columns = "cover,title".parse().unwrap();
        let table = render(&snapshot().into(), &ViewState::default().with_columns(columns));
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Cover  Title");
        assert_eq!(lines[1], "-----  -------");
        assert_eq!(lines[2], "[x]    Bravo");
        assert_eq!(lines[4], "[ ]    Charlie");
    }

    #[test]
    fn test_clip_long_text() {
        let long = "x".repeat(60);
        let clipped = clip(&long);
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
        assert_eq!(clip("short"), "short");
    }
}
