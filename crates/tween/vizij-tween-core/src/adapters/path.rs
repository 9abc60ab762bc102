use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{live_components, Axis, EndValue, EvalContext, Evaluation, Operand};
use crate::error::TweenError;
use crate::math::{add3, scale3, sub3};
use crate::path::{Path, PathType};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    pub path_type: PathType,
    /// Return to the first waypoint at the end.
    pub closed: bool,
    /// Remap progress through the arc-length table.
    pub constant_speed: bool,
    /// Keep this axis at its live value.
    pub lock_axis: Option<Axis>,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            path_type: PathType::Linear,
            closed: false,
            constant_speed: true,
            lock_axis: None,
        }
    }
}

impl PathOptions {
    pub fn new(path_type: PathType) -> Self {
        Self {
            path_type,
            ..Self::default()
        }
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn with_constant_speed(mut self, constant_speed: bool) -> Self {
        self.constant_speed = constant_speed;
        self
    }

    pub fn with_lock_axis(mut self, axis: Axis) -> Self {
        self.lock_axis = Some(axis);
        self
    }
}

/// Decode the waypoints into a path starting at the bind-time position.
pub(super) fn resolve_end(
    options: &PathOptions,
    start: &Operand,
    end: &EndValue,
    relative: bool,
    subdivisions_per_segment: usize,
) -> Result<Operand, TweenError> {
    let EndValue::Points(waypoints) = end else {
        return Err(TweenError::InvalidPath {
            reason: "path adapter needs a list of waypoints".into(),
        });
    };
    if waypoints.is_empty() {
        return Err(TweenError::InvalidPath {
            reason: "path adapter needs at least one waypoint".into(),
        });
    }
    let origin = start.as_vec3().unwrap_or([0.0; 3]);
    let mut points = Vec::with_capacity(waypoints.len() + 1);
    let first = if relative {
        add3(waypoints[0], origin)
    } else {
        waypoints[0]
    };
    if first != origin {
        points.push(origin);
    }
    points.extend(
        waypoints
            .iter()
            .map(|wp| if relative { add3(*wp, origin) } else { *wp }),
    );
    let path = Path::new(
        options.path_type,
        &points,
        options.closed,
        subdivisions_per_segment,
    )?;
    Ok(Operand::Path(Arc::new(path)))
}

pub(super) fn evaluate(
    ctx: &EvalContext<'_>,
    options: &PathOptions,
    start: &Operand,
    change: &Operand,
) -> Evaluation {
    let Operand::Path(path) = change else {
        return Value::Vec3(start.as_vec3().unwrap_or([0.0; 3])).into();
    };
    let (mut point, waypoint) = path.point_at(ctx.percent(), options.constant_speed);

    if ctx.iterations != 0.0 && !path.is_closed() {
        let points = path.points();
        let span = sub3(points[points.len() - 1], points[0]);
        point = add3(point, scale3(span, ctx.iterations));
    }
    if let (Some(axis), Some(live)) = (options.lock_axis, live_components(ctx.live)) {
        let i = axis.index().min(2);
        point[i] = live[i];
    }
    if ctx.snapping {
        point = point.map(f32::round);
    }
    Evaluation {
        value: Value::Vec3(point),
        waypoint: Some(waypoint),
    }
}
