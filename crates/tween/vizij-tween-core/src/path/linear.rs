//! Piecewise-linear decoding.

use super::Path;
use crate::math::{add3, clamp_length3, distance3, sub3};

pub(super) fn build_tables(path: &mut Path) {
    let lengths: Vec<f32> = path
        .points
        .windows(2)
        .map(|w| distance3(w[0], w[1]))
        .collect();
    let total: f32 = lengths.iter().sum();

    let mut times = Vec::with_capacity(path.points.len());
    times.push(0.0);
    let mut acc = 0.0;
    for len in &lengths {
        acc += len;
        times.push(if total > 0.0 { acc / total } else { 1.0 });
    }
    if let Some(last) = times.last_mut() {
        *last = 1.0;
    }

    path.length = total;
    path.segment_lengths = lengths;
    path.time_table = times;
    path.length_table.clear();
}

pub(super) fn point(path: &Path, percent: f32) -> ([f32; 3], usize) {
    let last = path.points.len() - 1;
    if percent <= 0.0 {
        return (path.points[0], 0);
    }
    if percent >= 1.0 {
        return (path.points[last], last);
    }
    // First waypoint whose arrival time is at or past `percent`.
    let end = path
        .time_table
        .iter()
        .skip(1)
        .position(|t| *t >= percent)
        .map_or(last, |i| i + 1);
    let start = end - 1;
    let partial_len = path.length * (percent - path.time_table[start]);
    let wp0 = path.points[start];
    let wp1 = path.points[end];
    (add3(wp0, clamp_length3(sub3(wp1, wp0), partial_len)), start)
}
