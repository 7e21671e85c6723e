use camino::Utf8PathBuf;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use autolog::{
    exposures::{Exposure, ExposureMetadata},
    log_rows, SessionGrouper,
};

const FILTERS: [&str; 4] = ["Luminance", "Red", "Green", "Blue"];

/// A long night: `targets` targets, each shot as L at bin 1 then R, G, B at bin 2,
/// `per_filter` frames per filter, one frame a minute.
fn synthetic_night(targets: usize, per_filter: usize) -> Vec<Exposure> {
    let start = NaiveDate::from_ymd_opt(2024, 12, 21)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();

    let mut exposures = Vec::with_capacity(targets * FILTERS.len() * per_filter);
    for t in 0..targets {
        for (f, filter) in FILTERS.iter().enumerate() {
            for i in 0..per_filter {
                let minute = ((t * FILTERS.len() + f) * per_filter + i) as i64;
                let time = start + Duration::minutes(minute);
                exposures.push(Exposure::new(ExposureMetadata {
                    source: Utf8PathBuf::from(format!("night/NGC{t}_{filter}_{i:04}.fits")),
                    capture_time: time,
                    image_type: "LIGHT".into(),
                    target: format!("NGC {t}"),
                    filter: filter.to_string(),
                    binning: if f == 0 { "1x1" } else { "2x2" }.into(),
                    exposure_seconds: "60".into(),
                    gain: "100".into(),
                    sensor_temp: "-10".into(),
                    capture_software: "sftN".into(),
                    sequence_number: format!("{i:04}"),
                }));
            }
        }
    }
    // Discovery order is path order, not time order.
    exposures.sort_by(|a, b| a.source().cmp(b.source()));
    exposures
}

fn bench_group_session(c: &mut Criterion) {
    let grouper = SessionGrouper::default();

    for (targets, per_filter) in [(4, 30), (20, 60)] {
        let night = synthetic_night(targets, per_filter);
        let name = format!("group_session/{}_exposures", night.len());

        c.bench_function(&name, |b| {
            b.iter_batched(
                || night.clone(),
                |exposures| {
                    let entries = grouper.group(exposures, "bench").unwrap();
                    black_box(log_rows(&entries).unwrap())
                },
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, bench_group_session);
criterion_main!(benches);
