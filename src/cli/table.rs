//! Table Model Module
//!
//! Row data, per-row inclusion flags, column widths and the decision
//! cursor for an interactive review. The model never touches the
//! terminal; it only measures and renders lines for the session.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::terminal::Style;
use super::utils::{digit_count, pad_right, text_width};

/// Column holding the stable row identifier
pub const ID_COLUMN: usize = 0;
/// Column holding the original value
pub const FROM_COLUMN: usize = 1;
/// Column holding the proposed value, editable during review
pub const VALUE_COLUMN: usize = 2;

/// Errors raised while building a table from raw input
#[derive(Debug)]
pub enum TableError {
    MissingHeader,
    Malformed(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MissingHeader => write!(f, "table has no header row"),
            TableError::Malformed(msg) => write!(f, "malformed table: {}", msg),
        }
    }
}

impl std::error::Error for TableError {}

/// A header plus fixed-arity data rows of text cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table whose first row is the header
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let header = rows.remove(0);
        Ok(Self { header, rows })
    }

    /// Parse a JSON array of arrays, coercing every cell to text
    pub fn from_json(text: &str) -> Result<Self, TableError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TableError::Malformed(e.to_string()))?;

        let Value::Array(raw_rows) = value else {
            return Err(TableError::Malformed("expected an array of rows".to_string()));
        };

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (i, raw_row) in raw_rows.into_iter().enumerate() {
            let Value::Array(cells) = raw_row else {
                return Err(TableError::Malformed(format!("row {} is not an array", i)));
            };
            rows.push(cells.into_iter().map(cell_text).collect());
        }

        Self::from_rows(rows)
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One rendered output line and the style it should be drawn with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

/// Original and final value of a kept row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from: String,
    pub to: String,
}

/// Kept rows keyed by identifier, in table row order
///
/// Serializes as a JSON object whose keys follow row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    changes: Vec<(String, Change)>,
}

impl EditResult {
    /// Record a change; a repeated identifier replaces the earlier entry in place
    pub fn insert(&mut self, id: String, change: Change) {
        match self.changes.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = change,
            None => self.changes.push((id, change)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Change> {
        self.changes.iter().find(|(k, _)| k == id).map(|(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.changes.iter().map(|(id, change)| (id.as_str(), change))
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Human readable listing, one `id : from => to` line per change
    pub fn summary_lines(&self) -> Vec<String> {
        let id_width = self.iter().map(|(id, _)| text_width(id)).max().unwrap_or(0);
        let from_width = self.iter().map(|(_, c)| text_width(&c.from)).max().unwrap_or(0);

        self.iter()
            .map(|(id, change)| {
                format!(
                    "  {} : {} => {}",
                    pad_right(id, id_width),
                    pad_right(&change.from, from_width),
                    change.to
                )
            })
            .collect()
    }
}

impl Serialize for EditResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.changes.len()))?;
        for (id, change) in &self.changes {
            map.serialize_entry(id, change)?;
        }
        map.end()
    }
}

/// Row data and review state for one editing session
#[derive(Debug, Clone)]
pub struct TableModel {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    kept: Vec<bool>,
    widths: Vec<usize>,
    cursor: usize,
    index_width: usize,
    prefix: String,
}

impl TableModel {
    /// Create a model with every row kept and the cursor on the first row
    pub fn new(table: Table, prefix: &str) -> Self {
        let Table { header, rows } = table;

        let mut widths = vec![0; header.len()];
        for row in std::iter::once(&header).chain(rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                if i >= widths.len() {
                    widths.push(0);
                }
                widths[i] = widths[i].max(text_width(cell));
            }
        }
        for width in &mut widths {
            *width += 1;
        }

        Self {
            index_width: digit_count(rows.len()) + 1,
            kept: vec![true; rows.len()],
            header,
            rows,
            widths,
            cursor: 0,
            prefix: prefix.to_string(),
        }
    }

    /// Render one row as a prefix, an index field and the padded cells
    pub fn render(&self, row: &[String], label: Option<usize>, style: Style) -> Line {
        let mut text = self.prefix.clone();

        let label = label.map(|l| l.to_string()).unwrap_or_default();
        text.push_str(&pad_right(&label, self.index_width));

        for (i, cell) in row.iter().enumerate() {
            let width = self.widths.get(i).copied().unwrap_or(0);
            text.push_str(&pad_right(cell, width));
        }

        Line { text, style }
    }

    /// Render the row awaiting a decision, without an index label
    pub fn render_current(&self, style: Style) -> Line {
        self.render(&self.rows[self.cursor], None, style)
    }

    pub fn header_line(&self) -> Line {
        self.render(&self.header, None, Style::Plain)
    }

    /// Render a data row labelled with its 1-based position
    pub fn row_line(&self, index: usize) -> Line {
        self.render(&self.rows[index], Some(index + 1), Style::Plain)
    }

    /// Overwrite the current row's value; an empty value leaves everything untouched
    pub fn set_value(&mut self, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };

        let row = &mut self.rows[self.cursor];
        if row.len() <= VALUE_COLUMN {
            row.resize(VALUE_COLUMN + 1, String::new());
        }
        row[VALUE_COLUMN] = value.to_string();

        if self.widths.len() <= VALUE_COLUMN {
            self.widths.resize(VALUE_COLUMN + 1, 0);
        }
        self.widths[VALUE_COLUMN] = self.widths[VALUE_COLUMN].max(text_width(value));
    }

    pub fn mark_removed(&mut self) {
        self.kept[self.cursor] = false;
    }

    pub fn advance(&mut self) {
        if !self.at_end() {
            self.cursor += 1;
        }
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.rows.len()
    }

    /// Kept rows as `id -> {from, to}`; removed rows are omitted
    pub fn collect(&self) -> EditResult {
        let mut result = EditResult::default();
        for (row, _) in self.rows.iter().zip(&self.kept).filter(|(_, kept)| **kept) {
            let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
            result.insert(
                cell(ID_COLUMN),
                Change {
                    from: cell(FROM_COLUMN),
                    to: cell(VALUE_COLUMN),
                },
            );
        }
        result
    }

    /// Full width of a rendered row, where the input prompt sits
    pub fn line_length(&self) -> usize {
        text_width(&self.prefix) + self.index_width + self.widths.iter().sum::<usize>() + 1
    }

    pub fn remaining_rows(&self) -> usize {
        self.rows.len() - self.cursor
    }

    pub fn prefix_width(&self) -> usize {
        text_width(&self.prefix)
    }

    pub fn index_width(&self) -> usize {
        self.index_width
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_kept(&self, index: usize) -> bool {
        self.kept[index]
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.rows[index].get(VALUE_COLUMN).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(vec![
            vec!["pkg".into(), "from".into(), "to".into()],
            vec!["lodash".into(), "4.0.0".into(), "4.1.0".into()],
            vec!["left-pad".into(), "1.0.0".into(), "1.3.0".into()],
        ])
        .unwrap()
    }

    #[test]
    fn test_initial_widths_include_padding() {
        let model = TableModel::new(sample(), "   ");
        assert_eq!(model.widths(), &[9, 6, 6]);
        assert_eq!(model.index_width(), 2);
        assert_eq!(model.line_length(), 3 + 2 + 21 + 1);
        assert_eq!(model.remaining_rows(), 2);
    }

    #[test]
    fn test_render_with_and_without_label() {
        let model = TableModel::new(sample(), "   ");
        assert_eq!(model.row_line(0).text, "   1 lodash   4.0.0 4.1.0 ");
        assert_eq!(model.header_line().text, "     pkg      from  to    ");

        let line = model.render_current(Style::Dim);
        assert_eq!(line.text, "     lodash   4.0.0 4.1.0 ");
        assert_eq!(line.style, Style::Dim);
    }

    #[test]
    fn test_set_value_none_is_noop() {
        let mut model = TableModel::new(sample(), "   ");
        let widths = model.widths().to_vec();

        model.set_value(None);
        model.set_value(Some(""));

        assert_eq!(model.value(0), Some("4.1.0"));
        assert_eq!(model.widths(), widths.as_slice());
    }

    #[test]
    fn test_set_value_grows_width() {
        let mut model = TableModel::new(sample(), "   ");
        model.set_value(Some("10.20.30-rc.1"));

        assert_eq!(model.value(0), Some("10.20.30-rc.1"));
        assert_eq!(model.widths()[VALUE_COLUMN], 13);

        // shorter values never shrink the column
        model.advance();
        model.set_value(Some("2.0.0"));
        assert_eq!(model.widths()[VALUE_COLUMN], 13);
    }

    #[test]
    fn test_collect_omits_removed_rows() {
        let mut model = TableModel::new(sample(), "   ");
        model.advance();
        model.mark_removed();
        model.advance();
        assert!(model.at_end());

        let result = model.collect();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get("lodash"),
            Some(&Change {
                from: "4.0.0".into(),
                to: "4.1.0".into()
            })
        );
        assert!(result.get("left-pad").is_none());
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut model = TableModel::new(sample(), "   ");
        for _ in 0..5 {
            model.advance();
        }
        assert_eq!(model.cursor(), model.row_count());
        assert_eq!(model.remaining_rows(), 0);
    }

    #[test]
    fn test_from_json_coerces_cells() {
        let table = Table::from_json(r#"[["id","n","ok"],["a",1,true],["b",null,"x"]]"#).unwrap();
        assert_eq!(table.header, vec!["id", "n", "ok"]);
        assert_eq!(table.rows[0], vec!["a", "1", "true"]);
        assert_eq!(table.rows[1], vec!["b", "", "x"]);
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(Table::from_json("[]"), Err(TableError::MissingHeader)));
        assert!(matches!(Table::from_json("{}"), Err(TableError::Malformed(_))));
        assert!(matches!(Table::from_json("[1]"), Err(TableError::Malformed(_))));
        assert!(matches!(Table::from_json("nope"), Err(TableError::Malformed(_))));
    }

    #[test]
    fn test_summary_lines_are_aligned() {
        let mut model = TableModel::new(sample(), "   ");
        model.advance();
        model.advance();
        let lines = model.collect().summary_lines();
        assert_eq!(
            lines,
            vec![
                "  lodash   : 4.0.0 => 4.1.0".to_string(),
                "  left-pad : 1.0.0 => 1.3.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_result_follows_row_order() {
        let table = Table::from_rows(vec![
            vec!["id".into(), "from".into(), "to".into()],
            vec!["zeta".into(), "1.0.0".into(), "1.1.0".into()],
            vec!["alpha".into(), "2.0.0".into(), "2.1.0".into()],
            vec!["mid".into(), "3.0.0".into(), "3.1.0".into()],
        ])
        .unwrap();
        let result = TableModel::new(table, "   ").collect();

        let ids: Vec<&str> = result.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"zeta":{"from":"1.0.0","to":"1.1.0"},"alpha":{"from":"2.0.0","to":"2.1.0"},"mid":{"from":"3.0.0","to":"3.1.0"}}"#
        );
    }

    #[test]
    fn test_duplicate_identifier_keeps_later_row_in_first_position() {
        let table = Table::from_rows(vec![
            vec!["id".into(), "from".into(), "to".into()],
            vec!["dup".into(), "1.0.0".into(), "1.1.0".into()],
            vec!["other".into(), "2.0.0".into(), "2.1.0".into()],
            vec!["dup".into(), "1.0.0".into(), "1.9.0".into()],
        ])
        .unwrap();
        let result = TableModel::new(table, "   ").collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("dup").map(|c| c.to.as_str()), Some("1.9.0"));
        let ids: Vec<&str> = result.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["dup", "other"]);
    }
}
