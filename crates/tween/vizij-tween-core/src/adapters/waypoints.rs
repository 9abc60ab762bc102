//! Multi-stop motion: one eased timeline split evenly across N segments.

use super::{EndValue, EvalContext, Operand};
use crate::error::TweenError;
use crate::math::{add3, scale3, sub3};
use crate::value::Value;

fn points(operand: &Operand) -> &[[f32; 3]] {
    match operand {
        Operand::Points(p) => p,
        _ => &[],
    }
}

/// Relative points are offsets from the previous stop.
pub(super) fn resolve_end(
    start: &Operand,
    end: &EndValue,
    relative: bool,
) -> Result<Operand, TweenError> {
    let EndValue::Points(stops) = end else {
        return Err(TweenError::InvalidSettings {
            reason: "waypoints adapter needs a list of points".into(),
        });
    };
    if stops.is_empty() {
        return Err(TweenError::InvalidSettings {
            reason: "waypoints adapter needs at least one point".into(),
        });
    }
    if !relative {
        return Ok(Operand::Points(stops.clone()));
    }
    let mut prev = start.as_vec3().unwrap_or([0.0; 3]);
    Ok(Operand::Points(
        stops
            .iter()
            .map(|offset| {
                prev = add3(prev, *offset);
                prev
            })
            .collect(),
    ))
}

/// Per-segment deltas; each segment starts where the previous one ended.
pub(super) fn compute_change(start: &Operand, end: &Operand) -> Operand {
    let mut from = start.as_vec3().unwrap_or([0.0; 3]);
    Operand::Points(
        points(end)
            .iter()
            .map(|to| {
                let delta = sub3(*to, from);
                from = *to;
                delta
            })
            .collect(),
    )
}

pub(super) fn evaluate(ctx: &EvalContext<'_>, start: &Operand, change: &Operand) -> Value {
    let start = start.as_vec3().unwrap_or([0.0; 3]);
    let deltas = points(change);
    if deltas.is_empty() {
        return Value::Vec3(start);
    }
    let segments = deltas.len();
    let total = deltas.iter().fold([0.0; 3], |acc, d| add3(acc, *d));

    let position = ctx.percent() * segments as f32;
    let segment = (position.floor().max(0.0) as usize).min(segments - 1);
    let local = position - segment as f32;

    let base = deltas[..segment]
        .iter()
        .fold(add3(start, scale3(total, ctx.iterations)), |acc, d| add3(acc, *d));
    let mut out = add3(base, scale3(deltas[segment], local));
    if ctx.snapping {
        out = out.map(f32::round);
    }
    Value::Vec3(out)
}
