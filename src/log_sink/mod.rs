//! # Log sinks: where finished rows go
//!
//! The observation log is split into three sheets per year, one per third of the year
//! ([`Sheet`]). Inside a sheet, the rows of a session sit below a *date header row*
//! holding the date and the observer ([`DateHeader`]):
//!
//! ```text
//! 20240115, Observer: Alice
//! 21:30:05, M42, "R, G, B", 2, 100, "60, 60, 60", "5 each", -10, sftN
//! 23:02:11, DARK, , 1, 100, 300, 20, -10, sftN
//! ```
//!
//! A [`LogSink`] stores rows; [`publish`] routes each row to its sheet and makes sure
//! the right header sits above it. Rows are written as-is: they are already in display
//! form.
pub mod csv_sink;

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::info;

use crate::{autolog_errors::AutologError, constants::HEADER_ROW_DATE_FORMAT, log_row::LogRow};

static DATE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{8}), Observer: (.*)$").expect("date header regex is valid")
});

/// One of the three sheets of a yearly log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sheet {
    JanuaryApril,
    MayAugust,
    SeptemberDecember,
}

impl Sheet {
    /// Sheet holding the sessions of `date`'s month.
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            1..=4 => Sheet::JanuaryApril,
            5..=8 => Sheet::MayAugust,
            _ => Sheet::SeptemberDecember,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Sheet::JanuaryApril => "January~April",
            Sheet::MayAugust => "May~August",
            Sheet::SeptemberDecember => "September~December",
        }
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Date and observer of a session, as written in a date header row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateHeader {
    pub date: NaiveDate,
    pub observer: String,
}

impl DateHeader {
    pub fn new(date: NaiveDate, observer: impl Into<String>) -> Self {
        DateHeader {
            date,
            observer: observer.into(),
        }
    }

    pub fn sheet(&self) -> Sheet {
        Sheet::for_date(self.date)
    }
}

impl fmt::Display for DateHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Observer: {}",
            self.date.format(HEADER_ROW_DATE_FORMAT),
            self.observer
        )
    }
}

impl FromStr for DateHeader {
    type Err = AutologError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AutologError::InvalidDateHeader(s.to_string());
        let caps = DATE_HEADER_RE.captures(s).ok_or_else(invalid)?;
        let date = NaiveDate::parse_from_str(&caps[1], HEADER_ROW_DATE_FORMAT)
            .map_err(|_| invalid())?;
        Ok(DateHeader::new(date, &caps[2]))
    }
}

/// Storage for finished log rows.
pub trait LogSink {
    /// Append one row at the end of `sheet`.
    fn append_row(&mut self, row: &LogRow, sheet: Sheet) -> Result<(), AutologError>;

    /// Make sure the last date header of `sheet` is `(date, observer)`, writing a new
    /// header row if it is not.
    ///
    /// Return
    /// ----------
    /// * `true` if a header row was written, `false` if the current one already matched.
    fn ensure_date_header_row(
        &mut self,
        date: NaiveDate,
        observer: &str,
        sheet: Sheet,
    ) -> Result<bool, AutologError>;
}

/// Write `rows` to `sink`, each below the date header of its session.
///
/// Arguments
/// -----------------
/// * `rows`: Display-ready rows carrying `Date` and `Observer` cells.
/// * `sink`: Destination.
///
/// Return
/// ----------
/// * The number of rows written, or the first error met. Rows before the failing one
///   stay written; the failing row is never partially written.
pub fn publish<S>(rows: &[LogRow], sink: &mut S) -> Result<usize, AutologError>
where
    S: LogSink + ?Sized,
{
    for row in rows {
        let header = row.date_header()?;
        let sheet = header.sheet();
        if sink.ensure_date_header_row(header.date, &header.observer, sheet)? {
            info!(%sheet, %header, "date header row added");
        }
        sink.append_row(row, sheet)?;
    }
    Ok(rows.len())
}
