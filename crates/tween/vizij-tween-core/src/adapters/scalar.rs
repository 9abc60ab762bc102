use super::{EvalContext, Operand};
use crate::value::Value;

fn scalar(operand: &Operand) -> f32 {
    match operand {
        Operand::Float(v) => *v,
        other => other.numeric().map_or(0.0, |(c, _)| c[0]),
    }
}

pub(super) fn evaluate_float(ctx: &EvalContext<'_>, start: &Operand, change: &Operand) -> Value {
    Value::Float(ctx.ease(scalar(start), scalar(change)))
}

/// Integers interpolate in float space; the written value is rounded.
pub(super) fn evaluate_int(ctx: &EvalContext<'_>, start: &Operand, change: &Operand) -> Value {
    Value::Int(ctx.ease(scalar(start), scalar(change)).round() as i32)
}
