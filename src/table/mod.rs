// src/table/mod.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("regex should parse"));

/// A `<table>` lifted out of an HTML document.
///
/// `columns` holds the header names where the table declared them with
/// `<th>` cells; tables without a `<th>` row come out with empty `columns`
/// and every `<tr>` as a data row, to be fixed up with [`Frame::promote_header`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Extract every `<table>` in `html`, in document order.
pub fn extract_all(html: &str) -> Vec<Frame> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("selector should parse");
    doc.select(&table_sel).map(frame_from_table).collect()
}

/// Extract the single table whose `class` attribute equals `class_signature`.
pub fn extract_by_class(html: &str, class_signature: &str) -> Result<Frame, ScrapeError> {
    let doc = Html::parse_document(html);
    let table_sel = Selector::parse("table").expect("selector should parse");
    doc.select(&table_sel)
        .find(|t| t.value().attr("class") == Some(class_signature))
        .map(frame_from_table)
        .ok_or_else(|| {
            ScrapeError::Parse(format!("no table with class \"{}\"", class_signature))
        })
}

fn frame_from_table(table: ElementRef) -> Frame {
    let row_sel = Selector::parse("tr").expect("selector should parse");
    let cell_sel = Selector::parse("th, td").expect("selector should parse");
    let th_sel = Selector::parse("th").expect("selector should parse");

    let mut columns = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for tr in table.select(&row_sel) {
        let cells: Vec<String> = tr.select(&cell_sel).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        // A leading all-<th> row is the table's own header.
        if columns.is_empty() && rows.is_empty() && tr.select(&th_sel).next().is_some() {
            columns = cells;
        } else {
            rows.push(cells);
        }
    }
    Frame { columns, rows }
}

fn cell_text(cell: ElementRef) -> String {
    let raw: String = cell.text().collect();
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

impl Frame {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Promote the first data row to be the column header, dropping it from
    /// the data. Replaces any existing header.
    pub fn promote_header(&mut self) -> Result<(), ScrapeError> {
        if self.rows.is_empty() {
            return Err(ScrapeError::Parse(
                "cannot promote header of a table with no rows".to_string(),
            ));
        }
        self.columns = self.rows.remove(0);
        Ok(())
    }

    /// Index of the named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Replace every cell in `column` that equals `from` with `to`.
    pub fn replace_in_column(
        &mut self,
        column: &str,
        from: &str,
        to: &str,
    ) -> Result<(), ScrapeError> {
        let idx = self.column_index(column).ok_or_else(|| {
            ScrapeError::Parse(format!("missing \"{}\" column", column))
        })?;
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                if cell == from {
                    *cell = to.to_string();
                }
            }
        }
        Ok(())
    }

    /// Drop the trailing data row, if any.
    pub fn drop_last_row(&mut self) {
        self.rows.pop();
    }
}
