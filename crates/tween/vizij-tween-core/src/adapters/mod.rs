//! Value adapters: per-type strategies that turn eased progress into values.
//!
//! Every adapter works in a *change space* ([`Operand`]) that may differ
//! from the value it writes. Rotations interpolate euler angles but can
//! write quaternions, paths interpolate a percentage along a decoded
//! [`Path`], strings use the literal target as their change.

mod path;
mod rotation;
mod scalar;
mod spiral;
mod text;
mod vector;
mod waypoints;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use path::PathOptions;
pub use rotation::{shortest_angle_delta, RotateMode};
pub use spiral::{SpiralMode, SpiralOptions};

use crate::ease::EaseSpec;
use crate::error::TweenError;
use crate::path::Path;
use crate::value::{Rect, Value, ValueKind};

/// Component selector for axis-constrained tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    W,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }
}

/// Change-space representation shared by all adapters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    /// Also carries colors, rects and quaternions.
    Vec4([f32; 4]),
    Text(String),
    Points(Vec<[f32; 3]>),
    Path(Arc<Path>),
}

impl Operand {
    /// Numeric components padded to four, plus the live component count.
    pub fn numeric(&self) -> Option<([f32; 4], usize)> {
        match self {
            Operand::Float(v) => Some(([*v, 0.0, 0.0, 0.0], 1)),
            Operand::Vec2(v) => Some(([v[0], v[1], 0.0, 0.0], 2)),
            Operand::Vec3(v) => Some(([v[0], v[1], v[2], 0.0], 3)),
            Operand::Vec4(v) => Some((*v, 4)),
            _ => None,
        }
    }

    pub fn from_numeric(components: [f32; 4], dims: usize) -> Self {
        let c = components;
        match dims {
            1 => Operand::Float(c[0]),
            2 => Operand::Vec2([c[0], c[1]]),
            3 => Operand::Vec3([c[0], c[1], c[2]]),
            _ => Operand::Vec4(c),
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            Operand::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Operand::Float(_) => "float",
            Operand::Vec2(_) => "vec2",
            Operand::Vec3(_) => "vec3",
            Operand::Vec4(_) => "vec4",
            Operand::Text(_) => "text",
            Operand::Points(_) => "points",
            Operand::Path(_) => "path",
        }
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        match value {
            Value::Float(v) => Operand::Float(*v),
            Value::Int(v) => Operand::Float(*v as f32),
            Value::Vec2(v) => Operand::Vec2(*v),
            Value::Vec3(v) => Operand::Vec3(*v),
            Value::Vec4(v) | Value::Quat(v) | Value::Color(v) => Operand::Vec4(*v),
            Value::Rect(r) => Operand::Vec4(r.to_array()),
            Value::Text(s) => Operand::Text(s.clone()),
        }
    }
}

/// Target handed to a tween factory: a single value, or a waypoint list for
/// the path and waypoint adapters.
#[derive(Debug, Clone, PartialEq)]
pub enum EndValue {
    Value(Value),
    Points(Vec<[f32; 3]>),
}

macro_rules! end_value_from {
    ($($t:ty),*) => {
        $(impl From<$t> for EndValue {
            fn from(value: $t) -> Self {
                EndValue::Value(value.into())
            }
        })*
    };
}

end_value_from!(Value, f32, i32, [f32; 2], [f32; 3], Rect, &str, String);

impl From<Vec<[f32; 3]>> for EndValue {
    fn from(points: Vec<[f32; 3]>) -> Self {
        EndValue::Points(points)
    }
}

/// Per-tick inputs to [`Adapter::evaluate`].
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub elapsed: f32,
    pub duration: f32,
    pub ease: &'a EaseSpec,
    /// Completed incremental iterations, already multiplied through any
    /// enclosing sequences.
    pub iterations: f32,
    pub snapping: bool,
    pub relative: bool,
    /// Kind the setter expects.
    pub kind: ValueKind,
    /// Live value re-read through the getter for masked writes.
    pub live: Option<&'a Value>,
}

impl EvalContext<'_> {
    /// Ease one component, offset by the incremental iterations.
    #[inline]
    pub(crate) fn ease(&self, start: f32, change: f32) -> f32 {
        let v = self
            .ease
            .evaluate(self.elapsed, start + change * self.iterations, change, self.duration);
        if self.snapping {
            v.round()
        } else {
            v
        }
    }

    /// Eased percentage along the whole tween.
    #[inline]
    pub(crate) fn percent(&self) -> f32 {
        self.ease.percent(self.elapsed, self.duration)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Value,
    /// Path adapters report the last waypoint passed.
    pub waypoint: Option<usize>,
}

impl From<Value> for Evaluation {
    fn from(value: Value) -> Self {
        Self {
            value,
            waypoint: None,
        }
    }
}

/// The closed set of value adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Adapter {
    Float,
    /// Interpolates in float space and rounds on write.
    Int,
    /// 2-4 component vectors. With `axis` set only that component is
    /// written; the others are re-read from the getter every tick.
    Vector { axis: Option<Axis> },
    Color { alpha_only: bool },
    Rect,
    Rotation { mode: RotateMode },
    Text,
    /// Multi-stop motion through an array of points.
    Waypoints,
    Path(PathOptions),
    Spiral(SpiralOptions),
}

impl Adapter {
    pub fn name(&self) -> &'static str {
        match self {
            Adapter::Float => "float",
            Adapter::Int => "int",
            Adapter::Vector { .. } => "vector",
            Adapter::Color { .. } => "color",
            Adapter::Rect => "rect",
            Adapter::Rotation { .. } => "rotation",
            Adapter::Text => "text",
            Adapter::Waypoints => "waypoints",
            Adapter::Path(_) => "path",
            Adapter::Spiral(_) => "spiral",
        }
    }

    /// Value kinds this adapter can read and write.
    pub fn supports(&self, kind: ValueKind) -> bool {
        use ValueKind as K;
        match self {
            Adapter::Float => kind == K::Float,
            Adapter::Int => kind == K::Int,
            Adapter::Vector { axis } => {
                let dims = match kind {
                    K::Vec2 => 2,
                    K::Vec3 => 3,
                    K::Vec4 => 4,
                    _ => return false,
                };
                axis.map_or(true, |a| a.index() < dims)
            }
            Adapter::Color { .. } => matches!(kind, K::Color | K::Vec4),
            Adapter::Rect => kind == K::Rect,
            Adapter::Rotation { .. } => matches!(kind, K::Quat | K::Vec3),
            Adapter::Text => kind == K::Text,
            Adapter::Waypoints | Adapter::Path(_) | Adapter::Spiral(_) => kind == K::Vec3,
        }
    }

    /// Whether evaluation needs the live value re-read every tick.
    pub fn needs_live_value(&self) -> bool {
        match self {
            Adapter::Vector { axis } => axis.is_some(),
            Adapter::Color { alpha_only } => *alpha_only,
            Adapter::Path(options) => options.lock_axis.is_some(),
            _ => false,
        }
    }

    /// Whether `from` tweens make sense for this adapter.
    pub fn supports_from(&self) -> bool {
        !matches!(self, Adapter::Waypoints | Adapter::Path(_) | Adapter::Spiral(_))
    }

    pub(crate) fn unsupported(&self, kind: ValueKind) -> TweenError {
        TweenError::UnsupportedTarget {
            adapter: self.name().to_string(),
            value: kind,
        }
    }

    /// Project an absolute value into change space.
    pub fn to_change_space(&self, value: &Value) -> Result<Operand, TweenError> {
        if !self.supports(value.kind()) {
            return Err(self.unsupported(value.kind()));
        }
        match self {
            Adapter::Rotation { .. } => Ok(rotation::to_change_space(value)),
            _ => Ok(Operand::from(value)),
        }
    }

    /// Resolve a user end value against the bind-time start. Relative mode
    /// is applied here, so the returned operand is always absolute.
    pub fn resolve_end(
        &self,
        start: &Operand,
        end: &EndValue,
        relative: bool,
        subdivisions_per_segment: usize,
    ) -> Result<Operand, TweenError> {
        match self {
            Adapter::Waypoints => waypoints::resolve_end(start, end, relative),
            Adapter::Path(options) => {
                path::resolve_end(options, start, end, relative, subdivisions_per_segment)
            }
            Adapter::Spiral(_) => spiral::resolve_end(end),
            _ => {
                let value = match end {
                    EndValue::Value(v) => v,
                    EndValue::Points(_) => {
                        return Err(TweenError::InvalidSettings {
                            reason: format!("{} adapter takes a single end value", self.name()),
                        })
                    }
                };
                let end = match self {
                    // Rotation ends may be given as quaternions or eulers
                    // regardless of the bound kind.
                    Adapter::Rotation { .. } => match value {
                        Value::Quat(_) | Value::Vec3(_) => rotation::to_change_space(value),
                        other => return Err(self.unsupported(other.kind())),
                    },
                    Adapter::Color { .. } => match value {
                        Value::Color(c) | Value::Vec4(c) => Operand::Vec4(*c),
                        other => return Err(self.unsupported(other.kind())),
                    },
                    _ => {
                        let operand = Operand::from(value);
                        if std::mem::discriminant(&operand) != std::mem::discriminant(start) {
                            return Err(TweenError::InvalidSettings {
                                reason: format!(
                                    "end value {} does not match start {}",
                                    operand.kind_name(),
                                    start.kind_name()
                                ),
                            });
                        }
                        operand
                    }
                };
                Ok(if relative {
                    self.compute_relative_end(start, &end)
                } else {
                    end
                })
            }
        }
    }

    /// End value for relative mode: `start + change`.
    pub fn compute_relative_end(&self, start: &Operand, change: &Operand) -> Operand {
        match self {
            Adapter::Text => text::compute_relative_end(change),
            Adapter::Rotation { mode } => rotation::compute_relative_end(*mode, start, change),
            _ => add_numeric(start, change),
        }
    }

    /// Change between two change-space operands. `relative` marks an end
    /// built as `start + amount`, whose amount is kept as given.
    pub fn compute_change(&self, start: &Operand, end: &Operand, relative: bool) -> Operand {
        match self {
            Adapter::Rotation { mode } => rotation::compute_change(*mode, start, end, relative),
            Adapter::Text => text::compute_change(end),
            Adapter::Waypoints => waypoints::compute_change(start, end),
            Adapter::Path(_) | Adapter::Spiral(_) => end.clone(),
            _ => sub_numeric(end, start),
        }
    }

    /// Duration needed to cover `change` at `speed` units per second.
    pub fn speed_to_duration(&self, speed: f32, change: &Operand) -> f32 {
        let distance = match (self, change) {
            (Adapter::Text, Operand::Text(s)) => s.chars().count() as f32,
            (Adapter::Waypoints, Operand::Points(points)) => {
                points.iter().map(|p| crate::math::length3(*p)).sum()
            }
            (Adapter::Path(_), Operand::Path(path)) => path.length(),
            // Spirals interpret the speed value as the duration itself.
            (Adapter::Spiral(_), _) => return speed,
            (_, operand) => operand
                .numeric()
                .map_or(0.0, |(c, dims)| crate::math::magnitude(&c[..dims])),
        };
        distance / speed
    }

    /// Apply eased progress and rebuild a concrete value.
    pub fn evaluate(&self, ctx: &EvalContext<'_>, start: &Operand, change: &Operand) -> Evaluation {
        match self {
            Adapter::Float => scalar::evaluate_float(ctx, start, change).into(),
            Adapter::Int => scalar::evaluate_int(ctx, start, change).into(),
            Adapter::Vector { axis } => vector::evaluate_vector(ctx, *axis, start, change).into(),
            Adapter::Color { alpha_only } => {
                vector::evaluate_color(ctx, *alpha_only, start, change).into()
            }
            Adapter::Rect => vector::evaluate_rect(ctx, start, change).into(),
            Adapter::Rotation { mode } => rotation::evaluate(ctx, *mode, start, change).into(),
            Adapter::Text => text::evaluate(ctx, start, change).into(),
            Adapter::Waypoints => waypoints::evaluate(ctx, start, change).into(),
            Adapter::Path(options) => path::evaluate(ctx, options, start, change),
            Adapter::Spiral(options) => spiral::evaluate(ctx, options, start, change).into(),
        }
    }
}

fn zip_numeric(a: &Operand, b: &Operand, f: impl Fn(f32, f32) -> f32) -> Operand {
    match (a.numeric(), b.numeric()) {
        (Some((x, dims)), Some((y, _))) => {
            let mut out = [0.0; 4];
            for i in 0..4 {
                out[i] = f(x[i], y[i]);
            }
            Operand::from_numeric(out, dims)
        }
        _ => a.clone(),
    }
}

#[inline]
pub(crate) fn add_numeric(a: &Operand, b: &Operand) -> Operand {
    zip_numeric(a, b, |x, y| x + y)
}

#[inline]
pub(crate) fn sub_numeric(a: &Operand, b: &Operand) -> Operand {
    zip_numeric(a, b, |x, y| x - y)
}

/// Rebuild a value of `kind` from numeric components.
pub(crate) fn value_from_components(kind: ValueKind, c: [f32; 4]) -> Value {
    match kind {
        ValueKind::Float => Value::Float(c[0]),
        ValueKind::Int => Value::Int(c[0].round() as i32),
        ValueKind::Vec2 => Value::Vec2([c[0], c[1]]),
        ValueKind::Vec3 => Value::Vec3([c[0], c[1], c[2]]),
        ValueKind::Vec4 => Value::Vec4(c),
        ValueKind::Quat => Value::Quat(c),
        ValueKind::Color => Value::Color(c),
        ValueKind::Rect => Value::Rect(Rect::from_array(c)),
        ValueKind::Text => Value::Text(String::new()),
    }
}

/// Numeric components of a live value, if it has any.
pub(crate) fn live_components(live: Option<&Value>) -> Option<[f32; 4]> {
    live.map(Operand::from)
        .and_then(|o| o.numeric())
        .map(|(c, _)| c)
}
