// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared table renderer for list views.
//!
//! Column widths are computed from the data; cells longer than a column's
//! max are truncated with an ellipsis.

/// A column definition in a [`Table`].
pub struct Column {
    pub name: &'static str,
    /// Maximum width (`None` = unlimited)
    pub max_width: Option<usize>,
}

impl Column {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            max_width: None,
        }
    }

    pub fn with_max(name: &'static str, max: usize) -> Self {
        Self {
            name,
            max_width: Some(max),
        }
    }
}

/// Column separator: double space.
const SEP: &str = "  ";

/// A tabular renderer that auto-computes column widths from data.
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let data = self
                    .rows
                    .iter()
                    .map(|r| r.get(i).map(|c| c.chars().count()).unwrap_or(0))
                    .max()
                    .unwrap_or(0);
                let wanted = data.max(col.name.chars().count());
                col.max_width.map_or(wanted, |m| wanted.min(m))
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| pad(col.name, *w))
            .collect();
        out.push_str(header.join(SEP).trim_end());
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    pad(&truncate(cell, *w), *w)
                })
                .collect();
            out.push_str(cells.join(SEP).trim_end());
            out.push('\n');
        }
        out
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}
