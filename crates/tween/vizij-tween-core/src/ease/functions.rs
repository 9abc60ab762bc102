//! Closed-form easing equations.
//!
//! Every function takes `(t, b, c, d)`: elapsed time, start value, change and
//! duration. Callers guarantee `0 <= t <= d` and `d > 0`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::Ease;

pub const DEFAULT_OVERSHOOT: f32 = 1.70158;
const IN_OUT_OVERSHOOT_SCALE: f32 = 1.525;

#[inline]
pub fn linear(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c * t / d + b
}

// Sine

#[inline]
pub fn in_sine(t: f32, b: f32, c: f32, d: f32) -> f32 {
    -c * (t / d * FRAC_PI_2).cos() + c + b
}

#[inline]
pub fn out_sine(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c * (t / d * FRAC_PI_2).sin() + b
}

#[inline]
pub fn in_out_sine(t: f32, b: f32, c: f32, d: f32) -> f32 {
    -c * 0.5 * ((PI * t / d).cos() - 1.0) + b
}

// Power curves

#[inline]
pub fn in_quad(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t + b
}

#[inline]
pub fn out_quad(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

#[inline]
pub fn in_out_quad(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d * 0.5);
    if t < 1.0 {
        return c * 0.5 * t * t + b;
    }
    let t = t - 1.0;
    -c * 0.5 * (t * (t - 2.0) - 1.0) + b
}

#[inline]
pub fn in_cubic(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t * t + b
}

#[inline]
pub fn out_cubic(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    c * (t * t * t + 1.0) + b
}

#[inline]
pub fn in_out_cubic(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d * 0.5);
    if t < 1.0 {
        return c * 0.5 * t * t * t + b;
    }
    let t = t - 2.0;
    c * 0.5 * (t * t * t + 2.0) + b
}

#[inline]
pub fn in_quart(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t * t * t + b
}

#[inline]
pub fn out_quart(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    -c * (t * t * t * t - 1.0) + b
}

#[inline]
pub fn in_out_quart(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d * 0.5);
    if t < 1.0 {
        return c * 0.5 * t * t * t * t + b;
    }
    let t = t - 2.0;
    -c * 0.5 * (t * t * t * t - 2.0) + b
}

#[inline]
pub fn in_quint(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    c * t * t * t * t * t + b
}

#[inline]
pub fn out_quint(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    c * (t * t * t * t * t + 1.0) + b
}

#[inline]
pub fn in_out_quint(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d * 0.5);
    if t < 1.0 {
        return c * 0.5 * t * t * t * t * t + b;
    }
    let t = t - 2.0;
    c * 0.5 * (t * t * t * t * t + 2.0) + b
}

// Exponential: pinned at both ends so 2^-10 never leaks into the result.

#[inline]
pub fn in_expo(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    c * 2f32.powf(10.0 * (t / d - 1.0)) + b
}

#[inline]
pub fn out_expo(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    c * (1.0 - 2f32.powf(-10.0 * t / d)) + b
}

#[inline]
pub fn in_out_expo(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    if t == d {
        return b + c;
    }
    let t = t / (d * 0.5);
    if t < 1.0 {
        return c * 0.5 * 2f32.powf(10.0 * (t - 1.0)) + b;
    }
    c * 0.5 * (2.0 - 2f32.powf(-10.0 * (t - 1.0))) + b
}

// Circular

#[inline]
pub fn in_circ(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d;
    -c * ((1.0 - t * t).max(0.0).sqrt() - 1.0) + b
}

#[inline]
pub fn out_circ(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / d - 1.0;
    c * (1.0 - t * t).max(0.0).sqrt() + b
}

#[inline]
pub fn in_out_circ(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let t = t / (d * 0.5);
    if t < 1.0 {
        return -c * 0.5 * ((1.0 - t * t).max(0.0).sqrt() - 1.0) + b;
    }
    let t = t - 2.0;
    c * 0.5 * ((1.0 - t * t).max(0.0).sqrt() + 1.0) + b
}

// Elastic

/// Resolve `(amplitude, phase)` for an elastic curve. An amplitude of zero or
/// one weaker than the change falls back to the (signed) change itself.
#[inline]
fn elastic_shape(c: f32, amplitude: f32, period: f32) -> (f32, f32) {
    if amplitude == 0.0 || amplitude < c.abs() {
        (c, period / 4.0)
    } else {
        (amplitude, period / TAU * (c / amplitude).asin())
    }
}

pub fn in_elastic(t: f32, b: f32, c: f32, d: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = if period == 0.0 { d * 0.3 } else { period };
    let (a, s) = elastic_shape(c, amplitude, p);
    let t = t - 1.0;
    -(a * 2f32.powf(10.0 * t) * ((t * d - s) * TAU / p).sin()) + b
}

pub fn out_elastic(t: f32, b: f32, c: f32, d: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    let t = t / d;
    if t == 1.0 {
        return b + c;
    }
    let p = if period == 0.0 { d * 0.3 } else { period };
    let (a, s) = elastic_shape(c, amplitude, p);
    a * 2f32.powf(-10.0 * t) * ((t * d - s) * TAU / p).sin() + c + b
}

pub fn in_out_elastic(t: f32, b: f32, c: f32, d: f32, amplitude: f32, period: f32) -> f32 {
    if t == 0.0 {
        return b;
    }
    let t = t / (d * 0.5);
    if t == 2.0 {
        return b + c;
    }
    let p = if period == 0.0 { d * (0.3 * 1.5) } else { period };
    let (a, s) = elastic_shape(c, amplitude, p);
    let t = t - 1.0;
    let wave = ((t * d - s) * TAU / p).sin();
    if t < 0.0 {
        return -0.5 * (a * 2f32.powf(10.0 * t) * wave) + b;
    }
    a * 2f32.powf(-10.0 * t) * wave * 0.5 + c + b
}

// Back

#[inline]
fn overshoot_or_default(overshoot: f32) -> f32 {
    if overshoot == 0.0 {
        DEFAULT_OVERSHOOT
    } else {
        overshoot
    }
}

#[inline]
pub fn in_back(t: f32, b: f32, c: f32, d: f32, overshoot: f32) -> f32 {
    let s = overshoot_or_default(overshoot);
    let t = t / d;
    c * t * t * ((s + 1.0) * t - s) + b
}

#[inline]
pub fn out_back(t: f32, b: f32, c: f32, d: f32, overshoot: f32) -> f32 {
    let s = overshoot_or_default(overshoot);
    let t = t / d - 1.0;
    c * (t * t * ((s + 1.0) * t + s) + 1.0) + b
}

#[inline]
pub fn in_out_back(t: f32, b: f32, c: f32, d: f32, overshoot: f32) -> f32 {
    let s = overshoot_or_default(overshoot) * IN_OUT_OVERSHOOT_SCALE;
    let t = t / (d * 0.5);
    if t < 1.0 {
        return c * 0.5 * (t * t * ((s + 1.0) * t - s)) + b;
    }
    let t = t - 2.0;
    c * 0.5 * (t * t * ((s + 1.0) * t + s) + 2.0) + b
}

// Bounce

pub fn out_bounce(t: f32, b: f32, c: f32, d: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    let t = t / d;
    if t < 1.0 / D {
        c * (N * t * t) + b
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        c * (N * t * t + 0.75) + b
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        c * (N * t * t + 0.9375) + b
    } else {
        let t = t - 2.625 / D;
        c * (N * t * t + 0.984375) + b
    }
}

#[inline]
pub fn in_bounce(t: f32, b: f32, c: f32, d: f32) -> f32 {
    c - out_bounce(d - t, 0.0, c, d) + b
}

#[inline]
pub fn in_out_bounce(t: f32, b: f32, c: f32, d: f32) -> f32 {
    if t < d * 0.5 {
        in_bounce(t * 2.0, 0.0, c, d) * 0.5 + b
    } else {
        out_bounce(t * 2.0 - d, 0.0, c, d) * 0.5 + c * 0.5 + b
    }
}

/// Evaluate a builtin curve. Custom kinds are resolved by the dispatcher and
/// land here only as a fallback, which is `OutQuad`.
pub fn evaluate(ease: Ease, t: f32, b: f32, c: f32, d: f32, overshoot: f32, period: f32) -> f32 {
    match ease {
        Ease::Linear => linear(t, b, c, d),
        Ease::InSine => in_sine(t, b, c, d),
        Ease::OutSine => out_sine(t, b, c, d),
        Ease::InOutSine => in_out_sine(t, b, c, d),
        Ease::InQuad => in_quad(t, b, c, d),
        Ease::OutQuad => out_quad(t, b, c, d),
        Ease::InOutQuad => in_out_quad(t, b, c, d),
        Ease::InCubic => in_cubic(t, b, c, d),
        Ease::OutCubic => out_cubic(t, b, c, d),
        Ease::InOutCubic => in_out_cubic(t, b, c, d),
        Ease::InQuart => in_quart(t, b, c, d),
        Ease::OutQuart => out_quart(t, b, c, d),
        Ease::InOutQuart => in_out_quart(t, b, c, d),
        Ease::InQuint => in_quint(t, b, c, d),
        Ease::OutQuint => out_quint(t, b, c, d),
        Ease::InOutQuint => in_out_quint(t, b, c, d),
        Ease::InExpo => in_expo(t, b, c, d),
        Ease::OutExpo => out_expo(t, b, c, d),
        Ease::InOutExpo => in_out_expo(t, b, c, d),
        Ease::InCirc => in_circ(t, b, c, d),
        Ease::OutCirc => out_circ(t, b, c, d),
        Ease::InOutCirc => in_out_circ(t, b, c, d),
        Ease::InElastic => in_elastic(t, b, c, d, overshoot, period),
        Ease::OutElastic => out_elastic(t, b, c, d, overshoot, period),
        Ease::InOutElastic => in_out_elastic(t, b, c, d, overshoot, period),
        Ease::InBack => in_back(t, b, c, d, overshoot),
        Ease::OutBack => out_back(t, b, c, d, overshoot),
        Ease::InOutBack => in_out_back(t, b, c, d, overshoot),
        Ease::InBounce => in_bounce(t, b, c, d),
        Ease::OutBounce => out_bounce(t, b, c, d),
        Ease::InOutBounce => in_out_bounce(t, b, c, d),
        Ease::CustomCurve | Ease::CustomFunction => out_quad(t, b, c, d),
    }
}
