//! # Tabular display for log rows
//!
//! Borrowing display adaptor that prints a slice of [`LogRow`] as a table, the way the
//! rows would look once written to the log.
//!
//! ## Columns
//!
//! - **Default**: every column of [`LogColumn::ALL`] that at least one row fills, so a
//!   session without gain metadata prints no empty `Gain` column.
//! - **Sheet** ([`LogRowsDisplay::sheet_layout`]): the fixed [`LogColumn::SHEET`] layout of
//!   a log sheet, empty cells included.
//!
//! ## Quick examples
//!
//! ```rust,ignore
//! use autolog::display::LogRowsDisplayExt;
//!
//! println!("{}", rows.show());
//! println!("{}", rows.show().sheet_layout());
//! let s = rows.show_string();
//! ```
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::log_row::{LogColumn, LogRow};

/// Display adaptor to render a slice of [`LogRow`] as a table.
pub struct LogRowsDisplay<'a> {
    rows: &'a [LogRow],
    columns: Option<&'a [LogColumn]>,
}

impl<'a> LogRowsDisplay<'a> {
    pub fn new(rows: &'a [LogRow]) -> Self {
        LogRowsDisplay {
            rows,
            columns: None,
        }
    }

    /// Print exactly `columns`, in that order.
    pub fn with_columns(mut self, columns: &'a [LogColumn]) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Print the columns of a log sheet.
    pub fn sheet_layout(self) -> Self {
        self.with_columns(&LogColumn::SHEET)
    }

    /// Columns printed, in order.
    ///
    /// Return
    /// ----------
    /// * The explicit column list if one was set, otherwise the columns of
    ///   [`LogColumn::ALL`] filled by at least one row.
    pub fn columns(&self) -> Vec<LogColumn> {
        match self.columns {
            Some(columns) => columns.to_vec(),
            None => LogColumn::ALL
                .into_iter()
                .filter(|c| self.rows.iter().any(|r| r.contains(*c)))
                .collect(),
        }
    }

    fn alignment(column: LogColumn) -> CellAlignment {
        match column {
            LogColumn::Binning
            | LogColumn::Gain
            | LogColumn::ExposureTime
            | LogColumn::ExposureCount
            | LogColumn::CameraTemp => CellAlignment::Right,
            _ => CellAlignment::Left,
        }
    }

    fn render(&self) -> String {
        let columns = self.columns();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(columns.iter().map(|c| Cell::new(c.label())));

        for row in self.rows {
            table.add_row(Row::from(columns.iter().map(|c| {
                Cell::new(row.get(*c).unwrap_or_default()).set_alignment(Self::alignment(*c))
            })));
        }
        table.to_string()
    }
}

/// Ergonomic builders for [`LogRowsDisplay`].
pub trait LogRowsDisplayExt {
    fn show(&self) -> LogRowsDisplay<'_>;

    /// Convenience: the default table as an owned `String`.
    fn show_string(&self) -> String {
        self.show().to_string()
    }
}

impl LogRowsDisplayExt for [LogRow] {
    fn show(&self) -> LogRowsDisplay<'_> {
        LogRowsDisplay::new(self)
    }
}

impl fmt::Display for LogRowsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log entries (n={})", self.rows.len())?;
        writeln!(f, "-------------------")?;
        f.write_str(&self.render())
    }
}
