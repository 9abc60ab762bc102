//! Catmull-Rom decoding with synthesized ghost points at both ends.

use super::{sample_length_tables, Path};
use crate::math::{add3, sub3};

/// Ghost points for the first and last segment. Open paths mirror the
/// neighbouring waypoint; closed paths wrap around.
pub(super) fn control_points(points: &[[f32; 3]], closed: bool) -> [[f32; 3]; 2] {
    let n = points.len();
    if closed && n > 2 {
        [points[n - 2], points[1]]
    } else {
        let first = points[0];
        let last = points[n - 1];
        [
            add3(first, sub3(first, points[1])),
            add3(last, sub3(last, points[n - 2])),
        ]
    }
}

pub(super) fn build_tables(path: &mut Path, subdivisions_per_segment: usize) {
    let steps = path.points.len() * subdivisions_per_segment;
    let decoded: &Path = path;
    let (times, lengths) = sample_length_tables(steps, |t| point(decoded, t).0);

    let sections = decoded.points.len() - 1;
    let segment_lengths = (0..sections)
        .map(|s| {
            let from = s as f32 / sections as f32;
            let to = (s + 1) as f32 / sections as f32;
            let (_, seg) = sample_length_tables(subdivisions_per_segment, |u| {
                point(decoded, from + (to - from) * u).0
            });
            seg.last().copied().unwrap_or(0.0)
        })
        .collect();

    path.length = lengths.last().copied().unwrap_or(0.0);
    path.segment_lengths = segment_lengths;
    path.time_table = times;
    path.length_table = lengths;
}

pub(super) fn point(path: &Path, percent: f32) -> ([f32; 3], usize) {
    let points = &path.points;
    let last = points.len() - 1;
    let sections = last;
    let scaled = percent * sections as f32;
    let section = (scaled.floor().max(0.0) as usize).min(sections - 1);
    let u = scaled - section as f32;

    let a = if section == 0 {
        path.control_points[0]
    } else {
        points[section - 1]
    };
    let b = points[section];
    let c = points[section + 1];
    let d = if section + 2 > last {
        path.control_points[1]
    } else {
        points[section + 2]
    };

    let waypoint = if percent >= 1.0 { last } else { section };
    (catmull_rom_spline(a, b, c, d, u), waypoint)
}

/// Uniform Catmull-Rom between `p1` and `p2` at `u` in [0, 1].
///
/// P(u) = 0.5 * (2P1 + (-P0 + P2)u + (2P0 - 5P1 + 4P2 - P3)u^2 + (-P0 + 3P1 - 3P2 + P3)u^3)
#[inline]
fn catmull_rom_spline(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3], p3: [f32; 3], u: f32) -> [f32; 3] {
    let u2 = u * u;
    let u3 = u2 * u;
    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = 0.5
            * ((-p0[i] + 3.0 * p1[i] - 3.0 * p2[i] + p3[i]) * u3
                + (2.0 * p0[i] - 5.0 * p1[i] + 4.0 * p2[i] - p3[i]) * u2
                + (-p0[i] + p2[i]) * u
                + 2.0 * p1[i]);
    }
    out
}
