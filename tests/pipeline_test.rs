mod common;

use autolog::{
    config::AutologConfig,
    exposures::{
        discovery::collect_sources,
        extractor::{extract_all, FitsExtractor},
    },
    log_row::LogColumn,
    log_rows,
    log_sink::{csv_sink::CsvLogSink, publish, Sheet},
    AutologError, SessionGrouper,
};
use common::{at, cell, exposure, utf8_tempdir, Frame, MemoryLogSink, Written};

#[test]
fn test_night_to_csv_log() {
    let (_guard, dir) = utf8_tempdir();
    let night = dir.join("night");
    std::fs::create_dir(&night).unwrap();

    // L at bin 1, then R/G/B at bin 2, then a second target.
    let mut seq = 0;
    let mut write = |frame: Frame| {
        seq += 1;
        frame.seq(seq).write_to(&night);
    };
    for m in 0..4 {
        write(Frame::light(at((2024, 3, 2), (21, m, 0)), "M81", "Luminance"));
    }
    for (i, filter) in ["Red", "Green", "Blue"].iter().enumerate() {
        for m in 0..3 {
            let minute = 10 + 5 * i as u32 + m;
            write(Frame::light(at((2024, 3, 2), (21, minute, 0)), "M81", filter).binning(2));
        }
    }
    for m in 0..2 {
        write(Frame::light(at((2024, 3, 2), (23, m, 0)), "M97", "Ha").exposure(300.0));
    }

    let config = AutologConfig {
        observer: "Alice".into(),
        log_dir: dir.join("log"),
        ..AutologConfig::default()
    };

    let sources = collect_sources(&[night.clone()], &config.extensions).unwrap();
    let report = extract_all(&FitsExtractor::new(config.software_aliases()), &sources);
    assert!(report.is_clean());

    let entries = SessionGrouper::new(config.filter_table())
        .group(report.exposures, &config.observer)
        .unwrap();
    let rows = log_rows(&entries).unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(cell(&rows[0], LogColumn::Filter), "L");
    assert_eq!(cell(&rows[0], LogColumn::ExposureCount), "4");
    assert_eq!(cell(&rows[0], LogColumn::Binning), "1");

    assert_eq!(cell(&rows[1], LogColumn::StartingTime), "21:10:00");
    assert_eq!(cell(&rows[1], LogColumn::Filter), "\"R, G, B\"");
    assert_eq!(cell(&rows[1], LogColumn::ExposureTime), "\"60.0, 60.0, 60.0\"");
    assert_eq!(cell(&rows[1], LogColumn::ExposureCount), "\"3 each\"");
    assert_eq!(cell(&rows[1], LogColumn::Binning), "2");
    assert_eq!(cell(&rows[1], LogColumn::Gain), "100");
    assert_eq!(cell(&rows[1], LogColumn::CameraTemp), "-10.0");
    assert_eq!(cell(&rows[1], LogColumn::CaptureSoftware), "sftN");

    assert_eq!(cell(&rows[2], LogColumn::Target), "M97");
    assert_eq!(cell(&rows[2], LogColumn::ExposureTime), "300.0");

    let mut sink = CsvLogSink::new(config.log_dir.clone()).unwrap();
    assert_eq!(publish(&rows, &mut sink), Ok(3));

    let text = std::fs::read_to_string(sink.sheet_path(Sheet::JanuaryApril)).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "\"20240302, Observer: Alice\"");
    assert!(lines[2].starts_with("21:10:00,M81,\"\"\"R, G, B\"\"\",2,100,"));

    let logged = sink.read_log(Sheet::JanuaryApril, None).unwrap();
    assert_eq!(logged, rows);
}

#[test]
fn test_sessions_share_header_until_observer_changes() {
    let day = (2024, 7, 20);
    let grouper = SessionGrouper::default();
    let mut sink = MemoryLogSink::default();

    for (observer, target, hour) in [("Bob", "M8", 22), ("Bob", "M20", 23), ("Carol", "M17", 23)] {
        let entries = grouper
            .group(
                vec![exposure(target, "Ha", "1x1", "180", at(day, (hour, 30, 0)))],
                observer,
            )
            .unwrap();
        publish(&log_rows(&entries).unwrap(), &mut sink).unwrap();
    }

    let observers: Vec<_> = sink.headers().into_iter().map(|h| h.observer.as_str()).collect();
    assert_eq!(observers, vec!["Bob", "Carol"]);
    assert_eq!(sink.rows().len(), 3);
    assert!(sink.written.iter().all(|w| matches!(
        w,
        Written::Header(Sheet::MayAugust, _) | Written::Row(Sheet::MayAugust, _)
    )));
}

#[test]
fn test_publish_stops_at_failing_row() {
    let entries = SessionGrouper::default()
        .group(
            vec![
                exposure("M31", "Red", "1x1", "60", at((2024, 10, 1), (20, 0, 0))),
                exposure("M33", "Red", "1x1", "60", at((2024, 10, 1), (21, 0, 0))),
                exposure("M45", "Red", "1x1", "60", at((2024, 10, 1), (22, 0, 0))),
            ],
            "Dana",
        )
        .unwrap();
    let rows = log_rows(&entries).unwrap();

    let mut sink = MemoryLogSink::failing_on_row(1);
    assert!(matches!(publish(&rows, &mut sink), Err(AutologError::IoError(_))));

    let written: Vec<_> = sink.rows().into_iter().map(|r| cell(r, LogColumn::Target)).collect();
    assert_eq!(written, vec!["M31"]);
}

#[test]
fn test_malformed_binning_produces_no_rows() {
    let entries = SessionGrouper::default()
        .group(
            vec![
                exposure("M1", "Red", "2x2", "60", at((2024, 1, 1), (20, 0, 0))),
                exposure("M2", "Red", "binned", "60", at((2024, 1, 1), (21, 0, 0))),
            ],
            "",
        )
        .unwrap();

    assert_eq!(
        log_rows(&entries),
        Err(AutologError::MalformedBinning("binned".into()))
    );
}
