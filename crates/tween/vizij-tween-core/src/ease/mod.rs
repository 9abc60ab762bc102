//! Easing curves and the dispatcher that routes an [`EaseSpec`] to them.

pub mod functions;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

/// Builtin curve families plus the two user-supplied kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    #[default]
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
    /// Sampled [`EaseCurve`] attached to the spec.
    CustomCurve,
    /// Caller-supplied [`EaseFn`] attached to the spec.
    CustomFunction,
}

impl Ease {
    pub const BUILTINS: [Ease; 31] = [
        Ease::Linear,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InQuart,
        Ease::OutQuart,
        Ease::InOutQuart,
        Ease::InQuint,
        Ease::OutQuint,
        Ease::InOutQuint,
        Ease::InExpo,
        Ease::OutExpo,
        Ease::InOutExpo,
        Ease::InCirc,
        Ease::OutCirc,
        Ease::InOutCirc,
        Ease::InElastic,
        Ease::OutElastic,
        Ease::InOutElastic,
        Ease::InBack,
        Ease::OutBack,
        Ease::InOutBack,
        Ease::InBounce,
        Ease::OutBounce,
        Ease::InOutBounce,
    ];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InSine => "inSine",
            Self::OutSine => "outSine",
            Self::InOutSine => "inOutSine",
            Self::InQuad => "inQuad",
            Self::OutQuad => "outQuad",
            Self::InOutQuad => "inOutQuad",
            Self::InCubic => "inCubic",
            Self::OutCubic => "outCubic",
            Self::InOutCubic => "inOutCubic",
            Self::InQuart => "inQuart",
            Self::OutQuart => "outQuart",
            Self::InOutQuart => "inOutQuart",
            Self::InQuint => "inQuint",
            Self::OutQuint => "outQuint",
            Self::InOutQuint => "inOutQuint",
            Self::InExpo => "inExpo",
            Self::OutExpo => "outExpo",
            Self::InOutExpo => "inOutExpo",
            Self::InCirc => "inCirc",
            Self::OutCirc => "outCirc",
            Self::InOutCirc => "inOutCirc",
            Self::InElastic => "inElastic",
            Self::OutElastic => "outElastic",
            Self::InOutElastic => "inOutElastic",
            Self::InBack => "inBack",
            Self::OutBack => "outBack",
            Self::InOutBack => "inOutBack",
            Self::InBounce => "inBounce",
            Self::OutBounce => "outBounce",
            Self::InOutBounce => "inOutBounce",
            Self::CustomCurve => "customCurve",
            Self::CustomFunction => "customFunction",
        }
    }

    /// Look a builtin up by name. Matching ignores case and an optional
    /// `ease` prefix, so `"easeInOutQuad"`, `"InOutQuad"` and `"inoutquad"`
    /// are all accepted.
    pub fn from_name(name: &str) -> Option<Ease> {
        let lowered = name.trim().to_ascii_lowercase();
        let key = lowered.strip_prefix("ease").unwrap_or(lowered.as_str());
        Self::BUILTINS
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(key))
    }
}

impl From<&str> for Ease {
    fn from(s: &str) -> Self {
        Ease::from_name(s).unwrap_or_else(|| {
            log::debug!("unknown ease '{s}', falling back to outQuad");
            Ease::OutQuad
        })
    }
}

/// User easing function: `(elapsed, start, change, duration, overshoot, period)`.
pub type EaseFn = Arc<dyn Fn(f32, f32, f32, f32, f32, f32) -> f32 + Send + Sync>;

/// Sampled easing curve, linearly interpolated between keys.
///
/// Keys are `(time, value)` pairs sorted by time. Evaluation rescales the
/// tween's `elapsed / duration` into the key time domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EaseCurve {
    keys: Vec<[f32; 2]>,
}

impl EaseCurve {
    pub fn new(mut keys: Vec<[f32; 2]>) -> Result<Self, TweenError> {
        if keys.is_empty() {
            return Err(TweenError::InvalidSettings {
                reason: "ease curve needs at least one key".into(),
            });
        }
        if keys.iter().any(|k| !k[0].is_finite() || !k[1].is_finite()) {
            return Err(TweenError::InvalidSettings {
                reason: "ease curve keys must be finite".into(),
            });
        }
        keys.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Ok(Self { keys })
    }

    /// Curve from values spaced uniformly over [0, 1].
    pub fn from_samples(samples: &[f32]) -> Result<Self, TweenError> {
        let last = samples.len().saturating_sub(1).max(1) as f32;
        Self::new(
            samples
                .iter()
                .enumerate()
                .map(|(i, v)| [i as f32 / last, *v])
                .collect(),
        )
    }

    pub fn keys(&self) -> &[[f32; 2]] {
        &self.keys
    }

    /// Sample at an absolute curve time, clamping outside the key range.
    pub fn sample(&self, time: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if time <= first[0] {
            return first[1];
        }
        if time >= last[0] {
            return last[1];
        }
        let upper = self.keys.partition_point(|k| k[0] <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b[0] - a[0];
        if span <= 0.0 {
            return b[1];
        }
        a[1] + (b[1] - a[1]) * ((time - a[0]) / span)
    }

    /// Sample at a normalized percentage of the key domain.
    #[inline]
    pub fn sample_normalized(&self, percent: f32) -> f32 {
        let t0 = self.keys[0][0];
        let t1 = self.keys[self.keys.len() - 1][0];
        self.sample(t0 + (t1 - t0) * percent)
    }
}

/// Immutable easing description attached to a tween or sequence.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EaseSpec {
    pub kind: Ease,
    /// Back overshoot or elastic amplitude; 0 means auto.
    pub overshoot_or_amplitude: f32,
    /// Elastic period; 0 means auto.
    pub period: f32,
    #[serde(skip)]
    pub curve: Option<Arc<EaseCurve>>,
    #[serde(skip)]
    pub function: Option<EaseFn>,
}

impl fmt::Debug for EaseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EaseSpec")
            .field("kind", &self.kind)
            .field("overshoot_or_amplitude", &self.overshoot_or_amplitude)
            .field("period", &self.period)
            .field("curve", &self.curve)
            .field("function", &self.function.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl From<Ease> for EaseSpec {
    fn from(kind: Ease) -> Self {
        Self::new(kind)
    }
}

impl EaseSpec {
    pub fn new(kind: Ease) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_overshoot(mut self, overshoot_or_amplitude: f32) -> Self {
        self.overshoot_or_amplitude = overshoot_or_amplitude;
        self
    }

    pub fn with_period(mut self, period: f32) -> Self {
        self.period = period;
        self
    }

    pub fn curve(curve: EaseCurve) -> Self {
        Self::shared_curve(Arc::new(curve))
    }

    pub fn shared_curve(curve: Arc<EaseCurve>) -> Self {
        Self {
            kind: Ease::CustomCurve,
            curve: Some(curve),
            ..Self::default()
        }
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(f32, f32, f32, f32, f32, f32) -> f32 + Send + Sync + 'static,
    {
        Self::shared_function(Arc::new(f))
    }

    pub fn shared_function(f: EaseFn) -> Self {
        Self {
            kind: Ease::CustomFunction,
            function: Some(f),
            ..Self::default()
        }
    }

    #[inline]
    pub fn evaluate(&self, elapsed: f32, start: f32, change: f32, duration: f32) -> f32 {
        evaluate(self, elapsed, start, change, duration)
    }

    /// Eased percentage (start 0, change 1).
    #[inline]
    pub fn percent(&self, elapsed: f32, duration: f32) -> f32 {
        evaluate(self, elapsed, 0.0, 1.0, duration)
    }
}

/// Route a spec to its curve. A custom kind without its curve or function
/// attached uses the `OutQuad` fallback.
pub fn evaluate(spec: &EaseSpec, elapsed: f32, start: f32, change: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return start + change;
    }
    match spec.kind {
        Ease::CustomFunction => match &spec.function {
            Some(f) => f(
                elapsed,
                start,
                change,
                duration,
                spec.overshoot_or_amplitude,
                spec.period,
            ),
            None => {
                log::debug!("custom ease function missing, falling back to outQuad");
                functions::out_quad(elapsed, start, change, duration)
            }
        },
        Ease::CustomCurve => match &spec.curve {
            Some(curve) => change * curve.sample_normalized(elapsed / duration) + start,
            None => {
                log::debug!("custom ease curve missing, falling back to outQuad");
                functions::out_quad(elapsed, start, change, duration)
            }
        },
        kind => functions::evaluate(
            kind,
            elapsed,
            start,
            change,
            duration,
            spec.overshoot_or_amplitude,
            spec.period,
        ),
    }
}
