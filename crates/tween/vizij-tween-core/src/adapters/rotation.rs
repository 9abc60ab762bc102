use serde::{Deserialize, Serialize};

use super::{add_numeric, sub_numeric, EvalContext, Operand};
use crate::math::{quat_from_euler_deg, quat_mul, quat_to_euler_deg, wrap_degrees};
use crate::value::{Value, ValueKind};

/// How euler targets are turned into a rotation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotateMode {
    /// Shortest path per axis; never turns more than 180 degrees.
    #[default]
    Fast,
    /// Raw `end - start` deltas, allowing multi-revolution spins.
    FastBeyond360,
    /// End value is an euler amount added in world space.
    WorldAxisAdd,
    /// End value is an euler amount added in local space.
    LocalAxisAdd,
}

/// Signed delta from `from` to `to` with the smallest magnitude, both
/// angles in degrees.
#[inline]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    let delta = wrap_degrees(to) - wrap_degrees(from);
    if delta.abs() > 180.0 {
        -delta.signum() * (360.0 - delta.abs())
    } else {
        delta
    }
}

fn euler(operand: &Operand) -> [f32; 3] {
    operand.as_vec3().unwrap_or([0.0; 3])
}

pub(super) fn to_change_space(value: &Value) -> Operand {
    match value {
        Value::Quat(q) => Operand::Vec3(quat_to_euler_deg(*q)),
        Value::Vec3(e) => Operand::Vec3(*e),
        other => Operand::from(other),
    }
}

pub(super) fn compute_relative_end(mode: RotateMode, start: &Operand, change: &Operand) -> Operand {
    match mode {
        RotateMode::Fast | RotateMode::FastBeyond360 => add_numeric(start, change),
        RotateMode::WorldAxisAdd | RotateMode::LocalAxisAdd => change.clone(),
    }
}

/// Relative Fast rotations keep the requested amount, so +270 is not folded
/// into -90.
pub(super) fn compute_change(
    mode: RotateMode,
    start: &Operand,
    end: &Operand,
    relative: bool,
) -> Operand {
    match mode {
        RotateMode::Fast if !relative => {
            let (s, e) = (euler(start), euler(end));
            Operand::Vec3([
                shortest_angle_delta(s[0], e[0]),
                shortest_angle_delta(s[1], e[1]),
                shortest_angle_delta(s[2], e[2]),
            ])
        }
        RotateMode::Fast | RotateMode::FastBeyond360 => sub_numeric(end, start),
        RotateMode::WorldAxisAdd | RotateMode::LocalAxisAdd => end.clone(),
    }
}

pub(super) fn evaluate(
    ctx: &EvalContext<'_>,
    mode: RotateMode,
    start: &Operand,
    change: &Operand,
) -> Value {
    let s = euler(start);
    let c = euler(change);
    match mode {
        RotateMode::Fast | RotateMode::FastBeyond360 => {
            let now = [ctx.ease(s[0], c[0]), ctx.ease(s[1], c[1]), ctx.ease(s[2], c[2])];
            match ctx.kind {
                ValueKind::Quat => Value::Quat(quat_from_euler_deg(now)),
                _ => Value::Vec3(now),
            }
        }
        RotateMode::WorldAxisAdd | RotateMode::LocalAxisAdd => {
            let amount = [ctx.ease(0.0, c[0]), ctx.ease(0.0, c[1]), ctx.ease(0.0, c[2])];
            let base = quat_from_euler_deg(s);
            let added = quat_from_euler_deg(amount);
            let q = if mode == RotateMode::WorldAxisAdd {
                quat_mul(added, base)
            } else {
                quat_mul(base, added)
            };
            match ctx.kind {
                ValueKind::Quat => Value::Quat(q),
                _ => Value::Vec3(quat_to_euler_deg(q)),
            }
        }
    }
}
