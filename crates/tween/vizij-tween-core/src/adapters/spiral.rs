//! Procedural spiral around an axis through the start position.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{EndValue, EvalContext, Operand};
use crate::error::TweenError;
use crate::math::{add3, cross3, length3, normalize3, scale3};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpiralMode {
    /// Radius grows for the whole tween.
    #[default]
    Expand,
    /// Radius peaks halfway and returns to zero.
    ExpandThenShrink,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralOptions {
    pub mode: SpiralMode,
    /// Full turns over the tween.
    pub frequency: f32,
    /// Radius growth in units per second.
    pub speed: f32,
    /// Distance travelled along the axis.
    pub depth: f32,
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            mode: SpiralMode::Expand,
            frequency: 10.0,
            speed: 1.0,
            depth: 0.0,
        }
    }
}

/// The end value of a spiral is its axis.
pub(super) fn resolve_end(end: &EndValue) -> Result<Operand, TweenError> {
    match end {
        EndValue::Value(Value::Vec3(axis)) if length3(*axis) > 0.0 => {
            Ok(Operand::Vec3(normalize3(*axis)))
        }
        _ => Err(TweenError::InvalidSettings {
            reason: "spiral adapter needs a non-zero vec3 axis".into(),
        }),
    }
}

/// Orthonormal pair spanning the plane perpendicular to `axis`.
fn plane_basis(axis: [f32; 3]) -> ([f32; 3], [f32; 3]) {
    let helper = if axis[1].abs() < 0.99 {
        [0.0, 1.0, 0.0]
    } else {
        [1.0, 0.0, 0.0]
    };
    let u = normalize3(cross3(helper, axis));
    let v = cross3(axis, u);
    (u, v)
}

pub(super) fn evaluate(
    ctx: &EvalContext<'_>,
    options: &SpiralOptions,
    start: &Operand,
    change: &Operand,
) -> Value {
    let origin = start.as_vec3().unwrap_or([0.0; 3]);
    let axis = change.as_vec3().unwrap_or([0.0, 0.0, 1.0]);
    let p = ctx.percent();
    let unit = match options.mode {
        SpiralMode::Expand => p,
        SpiralMode::ExpandThenShrink if p < 0.5 => p * 2.0,
        SpiralMode::ExpandThenShrink => (1.0 - p) * 2.0,
    };
    let radius = options.speed * ctx.duration * unit;
    let (sin, cos) = (TAU * options.frequency * p).sin_cos();
    let (u, v) = plane_basis(axis);

    let offset = add3(
        add3(scale3(u, radius * cos), scale3(v, radius * sin)),
        scale3(axis, options.depth * p),
    );
    let mut out = add3(origin, offset);
    if ctx.snapping {
        out = out.map(f32::round);
    }
    Value::Vec3(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::ctx;
    use crate::ease::{Ease, EaseSpec};
    use crate::math::distance3;
    use crate::value::ValueKind;
    use approx::assert_relative_eq;

    fn at(options: &SpiralOptions, elapsed: f32) -> [f32; 3] {
        let ease = EaseSpec::new(Ease::Linear);
        let change = resolve_end(&EndValue::from([0.0f32, 0.0, 2.0])).unwrap();
        evaluate(
            &ctx(&ease, elapsed, 2.0, ValueKind::Vec3),
            options,
            &Operand::Vec3([1.0, 1.0, 1.0]),
            &change,
        )
        .as_vec3()
        .unwrap()
    }

    #[test]
    fn expand_grows_radius_in_plane() {
        let options = SpiralOptions {
            frequency: 1.0,
            depth: 4.0,
            ..SpiralOptions::default()
        };
        assert_eq!(at(&options, 0.0), [1.0, 1.0, 1.0]);
        let end = at(&options, 2.0);
        // One full turn: back on the u axis at radius speed * duration.
        assert_relative_eq!(end[0], 3.0, epsilon = 1e-4);
        assert_relative_eq!(end[1], 1.0, epsilon = 1e-4);
        assert_relative_eq!(end[2], 5.0, epsilon = 1e-4);
    }

    #[test]
    fn expand_then_shrink_returns_to_axis() {
        let options = SpiralOptions {
            mode: SpiralMode::ExpandThenShrink,
            frequency: 3.0,
            ..SpiralOptions::default()
        };
        let mid = at(&options, 1.0);
        assert_relative_eq!(distance3(mid, [1.0, 1.0, 1.0]), 2.0, epsilon = 1e-4);
        let end = at(&options, 2.0);
        assert!(distance3(end, [1.0, 1.0, 1.0]) < 1e-4);
        assert!(resolve_end(&EndValue::from([0.0f32, 0.0, 0.0])).is_err());
    }
}
