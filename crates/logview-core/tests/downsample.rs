// File: crates/logview-core/tests/downsample.rs
// Purpose: LTTB properties on segments and series: length, endpoints, order, idempotence.

mod common;

use logview_core::{downsample_segment, downsample_series, lttb, Segment};

fn wave(n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..n).map(|i| 1000.0 + i as f64 * 0.5).collect();
    let ys: Vec<f64> = (0..n).map(|i| (i as f64 * 0.01).sin() * 10.0 + (i as f64 * 0.0001)).collect();
    (xs, ys)
}

#[test]
fn length_endpoints_and_order() {
    for &(n, target) in &[(10usize, 3usize), (1_000, 100), (5_000, 2_000), (77, 77), (50, 200)] {
        let (xs, ys) = wave(n);
        let out = lttb(&xs, &ys, target);
        assert_eq!(out.len(), n.min(target), "n={n} target={target}");
        assert_eq!(out[0], (xs[0], ys[0]));
        assert_eq!(*out.last().unwrap(), (xs[n - 1], ys[n - 1]));
        assert!(out.windows(2).all(|w| w[0].0 < w[1].0), "order broken for n={n}");
    }
}

#[test]
fn small_input_returned_unchanged() {
    let (xs, ys) = wave(40);
    let out = lttb(&xs, &ys, 40);
    let expected: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    assert_eq!(out, expected);
}

#[test]
fn downsampling_is_idempotent_once_within_target() {
    let (xs, ys) = wave(10_000);
    let once = lttb(&xs, &ys, 500);
    let (x1, y1): (Vec<f64>, Vec<f64>) = once.iter().copied().unzip();
    let twice = lttb(&x1, &y1, 500);
    assert_eq!(once, twice);
}

#[test]
fn keeps_isolated_spike() {
    let n = 10_000;
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let mut ys = vec![1.0; n];
    ys[4_321] = 500.0;
    let out = lttb(&xs, &ys, 100);
    assert!(out.iter().any(|&(x, y)| x == 4_321.0 && y == 500.0), "spike lost");
}

#[test]
fn short_segments_pass_through() {
    let single = Segment::try_new(vec![10.0], vec![3.0]).unwrap();
    assert_eq!(downsample_segment(&single, 2), vec![(10.0, 3.0)]);
    let pair = Segment::try_new(vec![10.0, 11.0], vec![3.0, 4.0]).unwrap();
    assert_eq!(downsample_segment(&pair, 2), vec![(10.0, 3.0), (11.0, 4.0)]);
}

#[test]
fn series_is_sampled_per_segment() {
    let series = common::gapped_gr("gr");
    assert_eq!(series.segment_lengths(), vec![5_000, 800, 5_000]);

    let runs = downsample_series(&series, 2_000);
    assert_eq!(runs.len(), 3);
    for (run, seg) in runs.iter().zip(series.segments()) {
        assert_eq!(run.first().unwrap().0, seg.depth_start());
        assert_eq!(run.last().unwrap().0, seg.depth_end());
        assert!(run.iter().all(|&(d, _)| d >= seg.depth_start() && d <= seg.depth_end()));
    }
    let total: usize = runs.iter().map(Vec::len).sum();
    assert!(total <= 2_000 + runs.len(), "total {total} exceeds budget");
}
