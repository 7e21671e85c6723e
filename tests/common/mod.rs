#![allow(dead_code)]

use autolog::{
    exposures::{Exposure, ExposureMetadata},
    log_row::{LogColumn, LogRow},
    log_sink::{DateHeader, LogSink, Sheet},
    AutologError,
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{NaiveDate, NaiveDateTime};

pub const BLOCK_LEN: usize = 2880;

/// One synthetic frame, written as a FITS file named after the capture pattern.
#[derive(Debug, Clone)]
pub struct Frame {
    pub time: NaiveDateTime,
    pub image_type: &'static str,
    pub target: &'static str,
    pub filter: &'static str,
    pub binning: u32,
    pub exposure: f64,
    pub gain: i64,
    pub temp: f64,
    pub software: &'static str,
    pub seq: u32,
    /// Write `DATE-LOC` in the header; without it the filename is the only source.
    pub with_date: bool,
}

impl Frame {
    pub fn light(time: NaiveDateTime, target: &'static str, filter: &'static str) -> Self {
        Frame {
            time,
            image_type: "LIGHT",
            target,
            filter,
            binning: 1,
            exposure: 60.0,
            gain: 100,
            temp: -10.0,
            software: "N.I.N.A. 3.0.0.9001",
            seq: 1,
            with_date: true,
        }
    }

    pub fn binning(mut self, binning: u32) -> Self {
        self.binning = binning;
        self
    }

    pub fn exposure(mut self, seconds: f64) -> Self {
        self.exposure = seconds;
        self
    }

    pub fn seq(mut self, seq: u32) -> Self {
        self.seq = seq;
        self
    }

    pub fn without_date(mut self) -> Self {
        self.with_date = false;
        self
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{:.2}s_{:.2}C_{b}x{b}_{:04}.fits",
            self.time.format("%Y-%m-%d"),
            self.time.format("%H-%M-%S"),
            self.image_type,
            self.target,
            self.filter,
            self.exposure,
            self.temp,
            self.seq,
            b = self.binning,
        )
    }

    pub fn header_bytes(&self) -> Vec<u8> {
        let mut cards = vec![
            logical_card("SIMPLE", true),
            number_card("BITPIX", "16"),
            number_card("NAXIS", "0"),
        ];
        if self.with_date {
            cards.push(string_card(
                "DATE-LOC",
                &self.time.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            ));
        }
        cards.extend([
            string_card("IMAGETYP", self.image_type),
            string_card("OBJECT", self.target),
            string_card("FILTER", self.filter),
            number_card("XBINNING", &self.binning.to_string()),
            number_card("YBINNING", &self.binning.to_string()),
            number_card("EXPOSURE", &format!("{:.1}", self.exposure)),
            number_card("GAIN", &self.gain.to_string()),
            number_card("CCD-TEMP", &format!("{:.1}", self.temp)),
            string_card("SWCREATE", self.software),
            "END".to_string(),
        ]);

        let mut bytes: Vec<u8> = cards
            .iter()
            .flat_map(|c| format!("{c:<80}").into_bytes())
            .collect();
        bytes.resize(bytes.len().div_ceil(BLOCK_LEN) * BLOCK_LEN, b' ');
        bytes
    }

    /// Write the frame into `dir` and return its path.
    pub fn write_to(&self, dir: &Utf8Path) -> Utf8PathBuf {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.header_bytes()).unwrap();
        path
    }
}

fn string_card(key: &str, value: &str) -> String {
    format!("{key:<8}= '{:<8}'", value.replace('\'', "''"))
}

fn number_card(key: &str, value: &str) -> String {
    format!("{key:<8}= {value:>20}")
}

fn logical_card(key: &str, value: bool) -> String {
    format!("{key:<8}= {:>20}", if value { "T" } else { "F" })
}

/// UTF-8 temporary directory; keep the guard alive for the duration of the test.
pub fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

pub fn at(date: (i32, u32, u32), hms: (u32, u32, u32)) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .unwrap()
        .and_hms_opt(hms.0, hms.1, hms.2)
        .unwrap()
}

/// In-memory exposure with light-frame defaults.
pub fn exposure(
    target: &str,
    filter: &str,
    binning: &str,
    exposure_seconds: &str,
    time: NaiveDateTime,
) -> Exposure {
    Exposure::new(ExposureMetadata {
        source: Utf8PathBuf::from(format!(
            "{}_{target}_{filter}.fits",
            time.format("%Y%m%d%H%M%S")
        )),
        capture_time: time,
        image_type: "LIGHT".into(),
        target: target.into(),
        filter: filter.into(),
        binning: binning.into(),
        exposure_seconds: exposure_seconds.into(),
        gain: "100".into(),
        sensor_temp: "-10".into(),
        capture_software: "sftN".into(),
        sequence_number: String::new(),
    })
}

/// Records a sink received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Written {
    Header(Sheet, DateHeader),
    Row(Sheet, LogRow),
}

/// [`LogSink`] keeping everything in memory.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    pub written: Vec<Written>,
    /// Fail on the n-th `append_row` call (0-based).
    pub fail_on_row: Option<usize>,
    rows_seen: usize,
}

impl MemoryLogSink {
    pub fn failing_on_row(index: usize) -> Self {
        MemoryLogSink {
            fail_on_row: Some(index),
            ..MemoryLogSink::default()
        }
    }

    pub fn rows(&self) -> Vec<&LogRow> {
        self.written
            .iter()
            .filter_map(|w| match w {
                Written::Row(_, row) => Some(row),
                Written::Header(..) => None,
            })
            .collect()
    }

    pub fn headers(&self) -> Vec<&DateHeader> {
        self.written
            .iter()
            .filter_map(|w| match w {
                Written::Header(_, header) => Some(header),
                Written::Row(..) => None,
            })
            .collect()
    }
}

impl LogSink for MemoryLogSink {
    fn append_row(&mut self, row: &LogRow, sheet: Sheet) -> Result<(), AutologError> {
        let index = self.rows_seen;
        self.rows_seen += 1;
        if self.fail_on_row == Some(index) {
            return Err(AutologError::IoError(std::io::Error::other("sheet unavailable")));
        }
        self.written.push(Written::Row(sheet, row.clone()));
        Ok(())
    }

    fn ensure_date_header_row(
        &mut self,
        date: NaiveDate,
        observer: &str,
        sheet: Sheet,
    ) -> Result<bool, AutologError> {
        let header = DateHeader::new(date, observer);
        let last = self.written.iter().rev().find_map(|w| match w {
            Written::Header(s, h) if *s == sheet => Some(h),
            _ => None,
        });
        if last == Some(&header) {
            return Ok(false);
        }
        self.written.push(Written::Header(sheet, header));
        Ok(true)
    }
}

pub fn cell<'a>(row: &'a LogRow, column: LogColumn) -> &'a str {
    row.get(column).unwrap_or_default()
}
