use super::{live_components, value_from_components, Axis, EvalContext, Operand};
use crate::value::Value;

fn components(operand: &Operand) -> ([f32; 4], usize) {
    operand.numeric().unwrap_or(([0.0; 4], 0))
}

/// Ease the components selected by `keep`, taking the rest from the live
/// value (or the start when nothing live was read).
fn ease_masked(
    ctx: &EvalContext<'_>,
    start: &Operand,
    change: &Operand,
    keep: impl Fn(usize) -> bool,
) -> [f32; 4] {
    let (s, dims) = components(start);
    let (c, _) = components(change);
    let live = live_components(ctx.live);
    let mut out = [0.0; 4];
    for i in 0..dims {
        out[i] = if keep(i) {
            ctx.ease(s[i], c[i])
        } else {
            live.map_or(s[i], |l| l[i])
        };
    }
    out
}

pub(super) fn evaluate_vector(
    ctx: &EvalContext<'_>,
    axis: Option<Axis>,
    start: &Operand,
    change: &Operand,
) -> Value {
    let out = ease_masked(ctx, start, change, |i| axis.map_or(true, |a| a.index() == i));
    value_from_components(ctx.kind, out)
}

pub(super) fn evaluate_color(
    ctx: &EvalContext<'_>,
    alpha_only: bool,
    start: &Operand,
    change: &Operand,
) -> Value {
    let out = ease_masked(ctx, start, change, |i| !alpha_only || i == 3);
    value_from_components(ctx.kind, out)
}

pub(super) fn evaluate_rect(ctx: &EvalContext<'_>, start: &Operand, change: &Operand) -> Value {
    value_from_components(ctx.kind, ease_masked(ctx, start, change, |_| true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::ctx;
    use crate::ease::{Ease, EaseSpec};
    use crate::value::{Rect, ValueKind};

    #[test]
    fn axis_constraint_keeps_live_components() {
        let ease = EaseSpec::new(Ease::Linear);
        let live = Value::Vec3([7.0, 8.0, 9.0]);
        let mut c = ctx(&ease, 0.5, 1.0, ValueKind::Vec3);
        c.live = Some(&live);
        let out = evaluate_vector(
            &c,
            Some(Axis::Y),
            &Operand::Vec3([0.0, 0.0, 0.0]),
            &Operand::Vec3([10.0, 10.0, 10.0]),
        );
        assert_eq!(out, Value::Vec3([7.0, 5.0, 9.0]));
    }

    #[test]
    fn alpha_only_fades_alpha() {
        let ease = EaseSpec::new(Ease::Linear);
        let live = Value::Color([0.2, 0.3, 0.4, 1.0]);
        let mut c = ctx(&ease, 0.25, 1.0, ValueKind::Color);
        c.live = Some(&live);
        let out = evaluate_color(
            &c,
            true,
            &Operand::Vec4([1.0, 1.0, 1.0, 1.0]),
            &Operand::Vec4([-1.0, -1.0, -1.0, -1.0]),
        );
        assert_eq!(out, Value::Color([0.2, 0.3, 0.4, 0.75]));
    }

    #[test]
    fn rect_eases_every_field() {
        let ease = EaseSpec::new(Ease::Linear);
        let mut c = ctx(&ease, 0.5, 2.0, ValueKind::Rect);
        c.snapping = true;
        let out = evaluate_rect(
            &c,
            &Operand::Vec4([0.0, 0.0, 10.0, 10.0]),
            &Operand::Vec4([4.0, 2.0, 10.0, 7.0]),
        );
        assert_eq!(out, Value::Rect(Rect::new(1.0, 1.0, 13.0, 12.0)));
    }
}
