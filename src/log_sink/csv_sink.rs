//! CSV-backed [`LogSink`]: one file per sheet inside a log directory.
//!
//! * `January~April.csv`, `May~August.csv`, `September~December.csv`.
//! * Date header rows are single-field records (`20240115, Observer: Alice`).
//! * Data rows follow [`LogColumn::SHEET`] order.
//!
//! Records have different lengths, so the files are read and written in *flexible* mode
//! without a header line.
use std::{collections::HashMap, fs::OpenOptions};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::debug;

use crate::{
    autolog_errors::AutologError,
    constants::ROW_DATE_FORMAT,
    log_row::{LogColumn, LogRow},
    log_sink::{DateHeader, LogSink, Sheet},
};

/// One record of a sheet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRecord {
    Header(DateHeader),
    Row(LogRow),
}

#[derive(Debug)]
pub struct CsvLogSink {
    dir: Utf8PathBuf,
    /// Last date header of each sheet already inspected; `None` for a sheet with no header yet.
    last_headers: HashMap<Sheet, Option<DateHeader>>,
}

fn decode_record(record: &StringRecord) -> Result<SheetRecord, AutologError> {
    if record.len() == 1 {
        return Ok(SheetRecord::Header(record[0].parse()?));
    }

    let mut row = LogRow::new();
    for (column, value) in LogColumn::SHEET.iter().zip(record.iter()) {
        if !value.is_empty() {
            row.insert(*column, value);
        }
    }
    Ok(SheetRecord::Row(row))
}

impl CsvLogSink {
    /// Open (and create if needed) the log directory.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Result<Self, AutologError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(CsvLogSink {
            dir,
            last_headers: HashMap::new(),
        })
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn sheet_path(&self, sheet: Sheet) -> Utf8PathBuf {
        self.dir.join(format!("{}.csv", sheet.title()))
    }

    /// Every record of `sheet`, in file order. A sheet never written to is empty.
    pub fn read_sheet(&self, sheet: Sheet) -> Result<Vec<SheetRecord>, AutologError> {
        let path = self.sheet_path(sheet);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        reader
            .records()
            .map(|record| decode_record(&record?))
            .collect()
    }

    /// Rows of `sheet` with the `Date` and `Observer` cells of the header above them.
    ///
    /// Arguments
    /// -----------------
    /// * `sheet`: Sheet to read.
    /// * `date`: If given, keep only the rows of sessions on that date.
    pub fn read_log(
        &self,
        sheet: Sheet,
        date: Option<NaiveDate>,
    ) -> Result<Vec<LogRow>, AutologError> {
        let mut current: Option<DateHeader> = None;
        let mut rows = Vec::new();

        for record in self.read_sheet(sheet)? {
            match record {
                SheetRecord::Header(header) => current = Some(header),
                SheetRecord::Row(mut row) => {
                    if let Some(header) = &current {
                        if date.is_some_and(|d| d != header.date) {
                            continue;
                        }
                        row.insert(LogColumn::Date, header.date.format(ROW_DATE_FORMAT).to_string());
                        row.insert(LogColumn::Observer, header.observer.as_str());
                    } else if date.is_some() {
                        continue;
                    }
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }

    fn last_header(&mut self, sheet: Sheet) -> Result<Option<DateHeader>, AutologError> {
        if let Some(cached) = self.last_headers.get(&sheet) {
            return Ok(cached.clone());
        }
        let last = self
            .read_sheet(sheet)?
            .into_iter()
            .filter_map(|record| match record {
                SheetRecord::Header(header) => Some(header),
                SheetRecord::Row(_) => None,
            })
            .last();
        self.last_headers.insert(sheet, last.clone());
        Ok(last)
    }

    fn append_record(&self, sheet: Sheet, record: &[String]) -> Result<(), AutologError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.sheet_path(sheet))?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        writer.write_record(record)?;
        writer.flush()?;
        Ok(())
    }
}

impl LogSink for CsvLogSink {
    fn append_row(&mut self, row: &LogRow, sheet: Sheet) -> Result<(), AutologError> {
        self.append_record(sheet, &row.to_record(&LogColumn::SHEET))?;
        debug!(%sheet, "row appended");
        Ok(())
    }

    fn ensure_date_header_row(
        &mut self,
        date: NaiveDate,
        observer: &str,
        sheet: Sheet,
    ) -> Result<bool, AutologError> {
        let header = DateHeader::new(date, observer);
        if self.last_header(sheet)?.as_ref() == Some(&header) {
            return Ok(false);
        }

        self.append_record(sheet, &[header.to_string()])?;
        self.last_headers.insert(sheet, Some(header));
        Ok(true)
    }
}
