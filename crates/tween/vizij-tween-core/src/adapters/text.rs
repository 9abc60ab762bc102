//! Text crossfade: the target string grows over the original one.

use super::{EvalContext, Operand};
use crate::value::Value;

fn text(operand: &Operand) -> &str {
    match operand {
        Operand::Text(s) => s,
        _ => "",
    }
}

/// The change of a text tween is the literal target.
pub(super) fn compute_change(end: &Operand) -> Operand {
    end.clone()
}

/// Relative text tweens keep the target as change and append at evaluate time.
pub(super) fn compute_relative_end(change: &Operand) -> Operand {
    change.clone()
}

pub(super) fn evaluate(ctx: &EvalContext<'_>, start: &Operand, change: &Operand) -> Value {
    let start: Vec<char> = text(start).chars().collect();
    let target: Vec<char> = text(change).chars().collect();
    let (start_len, change_len) = (start.len(), target.len());

    if change_len == 0 {
        // Erase the original string progressively.
        if ctx.relative {
            return Value::Text(start.iter().collect());
        }
        let removed = ctx
            .ease
            .evaluate(ctx.elapsed, 0.0, start_len as f32, ctx.duration)
            .round()
            .clamp(0.0, start_len as f32) as usize;
        return Value::Text(start[..start_len - removed].iter().collect());
    }

    let len = ctx
        .ease
        .evaluate(ctx.elapsed, 0.0, change_len as f32, ctx.duration)
        .round()
        .clamp(0.0, change_len as f32) as usize;

    let mut out = String::with_capacity(start_len.max(change_len) + change_len);
    if ctx.relative {
        out.extend(start.iter());
        out.extend(target[..len].iter());
        return Value::Text(out);
    }

    out.extend(target[..len].iter());
    if len < change_len && len < start_len {
        let tail = if start_len > change_len {
            start_len - (start_len as f32 * len as f32 / change_len as f32) as usize
        } else {
            start_len - len
        };
        out.extend(start[len..len + tail].iter());
    }
    Value::Text(out)
}
