#![allow(clippy::unwrap_used)]
//! Benchmarks for hex / HSL conversion and live hue editing

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use smartcube::color::{apply_hue, hex_to_hsl, hsl_to_hex};
use std::hint::black_box;

const SAMPLE_COLORS: [&str; 6] = ["#00eaff", "#ff4d00", "#d900ff", "#00ff00", "#111111", "#0ef"];

fn bench_hex_to_hsl(c: &mut Criterion) {
    c.bench_function("hex_to_hsl", |b| {
        b.iter(|| {
            for hex in SAMPLE_COLORS {
                black_box(hex_to_hsl(black_box(hex)).unwrap());
            }
        });
    });
}

fn bench_hsl_to_hex(c: &mut Criterion) {
    c.bench_function("hsl_to_hex", |b| {
        b.iter(|| {
            for hue in (0..360).step_by(15) {
                black_box(hsl_to_hex(black_box(f64::from(hue)), 100.0, 50.0));
            }
        });
    });
}

// One slider drag: every degree of the hue wheel
fn bench_hue_drag(c: &mut Criterion) {
    c.bench_function("apply_hue_sweep", |b| {
        b.iter(|| {
            let mut color = "#00eaff".to_string();
            for hue in 0..360 {
                color = apply_hue(Some(&color), f64::from(hue)).unwrap();
            }
            black_box(color);
        });
    });
}

criterion_group!(benches, bench_hex_to_hsl, bench_hsl_to_hex, bench_hue_drag);
criterion_main!(benches);
