//! Waypoint paths: piecewise-linear or Catmull-Rom decoding plus arc-length
//! tables for constant-speed traversal.

mod catmull_rom;
mod linear;

use serde::{Deserialize, Serialize};

use crate::error::TweenError;
use crate::math::{add3, distance3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathType {
    #[default]
    Linear,
    CatmullRom,
}

/// A decoded path. Built once; tables are derived from the waypoints in
/// [`Path::new`] and the waypoints are never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    path_type: PathType,
    closed: bool,
    /// Waypoints traversed by the decoder. A closed path repeats the first
    /// waypoint at the end.
    points: Vec<[f32; 3]>,
    /// Ghost points before the first and after the last waypoint.
    control_points: [[f32; 3]; 2],
    length: f32,
    /// Length of each segment `points[i] -> points[i + 1]`.
    segment_lengths: Vec<f32>,
    /// Linear: normalized arrival time at each waypoint. Catmull-Rom: the
    /// uniformly sampled parameter values.
    time_table: Vec<f32>,
    /// Catmull-Rom only: cumulative length at each `time_table` entry.
    length_table: Vec<f32>,
}

impl Path {
    /// Decode `waypoints`. `subdivisions_per_segment` controls the density of
    /// the Catmull-Rom arc-length tables.
    pub fn new(
        path_type: PathType,
        waypoints: &[[f32; 3]],
        closed: bool,
        subdivisions_per_segment: usize,
    ) -> Result<Self, TweenError> {
        if waypoints.len() < 2 {
            return Err(TweenError::InvalidPath {
                reason: format!("needs at least 2 waypoints, got {}", waypoints.len()),
            });
        }
        if waypoints.iter().flatten().any(|c| !c.is_finite()) {
            return Err(TweenError::InvalidPath {
                reason: "waypoints must be finite".into(),
            });
        }

        let mut points = waypoints.to_vec();
        if closed && points.first() != points.last() {
            points.push(points[0]);
        }

        let control_points = match path_type {
            PathType::Linear => [points[0], points[points.len() - 1]],
            PathType::CatmullRom => catmull_rom::control_points(&points, closed),
        };

        let mut path = Self {
            path_type,
            closed,
            points,
            control_points,
            length: 0.0,
            segment_lengths: Vec::new(),
            time_table: Vec::new(),
            length_table: Vec::new(),
        };
        match path_type {
            PathType::Linear => linear::build_tables(&mut path),
            PathType::CatmullRom => {
                catmull_rom::build_tables(&mut path, subdivisions_per_segment.max(1))
            }
        }

        if path.length <= 0.0 || !path.length.is_finite() {
            return Err(TweenError::InvalidPath {
                reason: "path has zero length".into(),
            });
        }
        Ok(path)
    }

    #[inline]
    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    #[inline]
    pub fn segment_lengths(&self) -> &[f32] {
        &self.segment_lengths
    }

    /// Point at `percent` of the path, plus the index of the last waypoint
    /// passed. With `constant_speed` the percentage is first remapped so
    /// equal steps cover equal arc length.
    pub fn point_at(&self, percent: f32, constant_speed: bool) -> ([f32; 3], usize) {
        let percent = percent.clamp(0.0, 1.0);
        let percent = if constant_speed {
            self.constant_speed_percent(percent)
        } else {
            percent
        };
        match self.path_type {
            PathType::Linear => linear::point(self, percent),
            PathType::CatmullRom => catmull_rom::point(self, percent),
        }
    }

    #[inline]
    pub fn get_point(&self, percent: f32, constant_speed: bool) -> [f32; 3] {
        self.point_at(percent, constant_speed).0
    }

    /// Remap a raw percentage through the arc-length table. The endpoints
    /// map to themselves without a lookup.
    pub fn constant_speed_percent(&self, percent: f32) -> f32 {
        if percent <= 0.0 || percent >= 1.0 || self.length_table.is_empty() {
            // Linear paths are already parameterized by arc length.
            return percent;
        }
        let target = self.length * percent;
        let upper = self
            .length_table
            .partition_point(|len| *len <= target)
            .min(self.length_table.len() - 1);
        let (t0, l0) = if upper == 0 {
            (0.0, 0.0)
        } else {
            (self.time_table[upper - 1], self.length_table[upper - 1])
        };
        let (t1, l1) = (self.time_table[upper], self.length_table[upper]);
        let span = l1 - l0;
        let t = if span > 0.0 {
            t0 + (target - l0) / span * (t1 - t0)
        } else {
            t1
        };
        t.clamp(0.0, 1.0)
    }

    /// Copy of this path moved by `offset`. Translation leaves every table
    /// unchanged.
    pub fn translated(&self, offset: [f32; 3]) -> Self {
        let mut moved = self.clone();
        for p in moved.points.iter_mut() {
            *p = add3(*p, offset);
        }
        for p in moved.control_points.iter_mut() {
            *p = add3(*p, offset);
        }
        moved
    }
}

/// Accumulated chord length of `point_fn` sampled at `steps` uniform steps,
/// returned as parallel `(times, lengths)` tables.
fn sample_length_tables(
    steps: usize,
    mut point_fn: impl FnMut(f32) -> [f32; 3],
) -> (Vec<f32>, Vec<f32>) {
    let mut times = Vec::with_capacity(steps);
    let mut lengths = Vec::with_capacity(steps);
    let increment = 1.0 / steps as f32;
    let mut prev = point_fn(0.0);
    let mut total = 0.0;
    for i in 1..=steps {
        let t = if i == steps { 1.0 } else { increment * i as f32 };
        let p = point_fn(t);
        total += distance3(p, prev);
        times.push(t);
        lengths.push(total);
        prev = p;
    }
    (times, lengths)
}
