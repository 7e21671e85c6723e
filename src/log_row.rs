//! # Log rows
//!
//! A [`LogRow`] is the final, display-ready form of one observation-log line: a mapping
//! from [`LogColumn`] to cell text. Cells are already comma-joined and quote-marked, so a
//! writer only has to lay them out in column order.
//!
//! Columns that have no value for a row are absent from the mapping rather than empty.
use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;

use crate::{
    autolog_errors::AutologError,
    constants::ROW_DATE_FORMAT,
    log_sink::DateHeader,
};

/// Columns of the observation log, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogColumn {
    Date,
    Observer,
    StartingTime,
    Target,
    Filter,
    Binning,
    Gain,
    ExposureTime,
    ExposureCount,
    CameraTemp,
    CaptureSoftware,
    Note,
}

impl LogColumn {
    pub const ALL: [LogColumn; 12] = [
        LogColumn::Date,
        LogColumn::Observer,
        LogColumn::StartingTime,
        LogColumn::Target,
        LogColumn::Filter,
        LogColumn::Binning,
        LogColumn::Gain,
        LogColumn::ExposureTime,
        LogColumn::ExposureCount,
        LogColumn::CameraTemp,
        LogColumn::CaptureSoftware,
        LogColumn::Note,
    ];

    /// Columns written on a sheet line. Date and observer live in the date header row
    /// above the block instead.
    pub const SHEET: [LogColumn; 10] = [
        LogColumn::StartingTime,
        LogColumn::Target,
        LogColumn::Filter,
        LogColumn::Binning,
        LogColumn::Gain,
        LogColumn::ExposureTime,
        LogColumn::ExposureCount,
        LogColumn::CameraTemp,
        LogColumn::CaptureSoftware,
        LogColumn::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LogColumn::Date => "Date",
            LogColumn::Observer => "Observer",
            LogColumn::StartingTime => "Starting Time",
            LogColumn::Target => "Target",
            LogColumn::Filter => "Filter",
            LogColumn::Binning => "Binning",
            LogColumn::Gain => "Gain",
            LogColumn::ExposureTime => "Exp. Time (s)",
            LogColumn::ExposureCount => "# of Exp.",
            LogColumn::CameraTemp => "Camera Temp.",
            LogColumn::CaptureSoftware => "Capture Software",
            LogColumn::Note => "Note",
        }
    }
}

impl fmt::Display for LogColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One observation-log line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogRow {
    cells: BTreeMap<LogColumn, String>,
}

impl LogRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: LogColumn, value: impl Into<String>) {
        self.cells.insert(column, value.into());
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, column: LogColumn, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: LogColumn) -> Option<&str> {
        self.cells.get(&column).map(String::as_str)
    }

    pub fn contains(&self, column: LogColumn) -> bool {
        self.cells.contains_key(&column)
    }

    /// Present columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = LogColumn> + '_ {
        self.cells.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogColumn, &str)> + '_ {
        self.cells.iter().map(|(c, v)| (*c, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells laid out along `columns`; absent columns become empty cells.
    pub fn to_record(&self, columns: &[LogColumn]) -> Vec<String> {
        columns
            .iter()
            .map(|c| self.get(*c).unwrap_or_default().to_string())
            .collect()
    }

    /// Date and observer of the session the row belongs to.
    ///
    /// Fails with [`AutologError::InvalidDateHeader`] if the `Date` cell is missing or is
    /// not a `YYYY-MM-DD` date.
    pub fn date_header(&self) -> Result<DateHeader, AutologError> {
        let cell = self.get(LogColumn::Date).unwrap_or_default();
        let date = NaiveDate::parse_from_str(cell, ROW_DATE_FORMAT)
            .map_err(|_| AutologError::InvalidDateHeader(cell.to_string()))?;
        Ok(DateHeader::new(
            date,
            self.get(LogColumn::Observer).unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod log_row_test {
    use super::*;

    #[test]
    fn test_record_layout() {
        let row = LogRow::new()
            .with(LogColumn::Target, "M42")
            .with(LogColumn::StartingTime, "21:30:05")
            .with(LogColumn::Binning, "2");

        assert_eq!(
            row.columns().collect::<Vec<_>>(),
            vec![LogColumn::StartingTime, LogColumn::Target, LogColumn::Binning]
        );
        assert_eq!(
            row.to_record(&LogColumn::SHEET[..4]),
            vec!["21:30:05", "M42", "", "2"]
        );
        assert_eq!(LogColumn::ExposureCount.to_string(), "# of Exp.");
    }

    #[test]
    fn test_cells_in_column_order() {
        let empty = LogRow::new();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let mut row = LogRow::new().with(LogColumn::Gain, "100");
        row.insert(LogColumn::Target, "M42");
        row.insert(LogColumn::Gain, "120");
        assert!(!row.is_empty());
        assert_eq!(row.len(), 2);
        assert_eq!(
            row.iter().collect::<Vec<_>>(),
            vec![(LogColumn::Target, "M42"), (LogColumn::Gain, "120")]
        );
    }

    #[test]
    fn test_date_header() {
        let row = LogRow::new()
            .with(LogColumn::Date, "2024-01-15")
            .with(LogColumn::Observer, "Alice");
        let header = row.date_header().unwrap();
        assert_eq!(header.to_string(), "20240115, Observer: Alice");

        let row = LogRow::new().with(LogColumn::Date, "15/01/2024");
        assert_eq!(
            row.date_header(),
            Err(AutologError::InvalidDateHeader("15/01/2024".into()))
        );
    }
}
