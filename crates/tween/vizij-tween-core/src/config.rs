//! Engine configuration and per-playable settings.

use serde::{Deserialize, Serialize};

use crate::ease::{Ease, EaseSpec};
use crate::error::TweenError;
use crate::registry::AdapterRegistry;
use crate::timeline::{validate_loops, LoopType};

/// Engine-wide defaults and limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hint for the playable arena.
    pub capacity: usize,
    /// Ease used by tweens that do not set one.
    pub default_ease: EaseSpec,
    pub default_loop_type: LoopType,
    /// Kill playables as soon as they complete.
    pub default_auto_kill: bool,
    /// Start playing on creation.
    pub default_autoplay: bool,
    /// Global multiplier on every frame delta.
    pub time_scale: f32,
    /// Run hooks and bindings under `catch_unwind`.
    pub safe_mode: bool,
    /// Arc-length table density for spline paths.
    pub path_subdivisions_per_segment: usize,
    /// Maximum events to retain per tick; extra events are counted and dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 200,
            default_ease: EaseSpec::new(Ease::OutQuad),
            default_loop_type: LoopType::Restart,
            default_auto_kill: true,
            default_autoplay: true,
            time_scale: 1.0,
            safe_mode: true,
            path_subdivisions_per_segment: 10,
            max_events_per_tick: 1024,
        }
    }
}

/// Options for one tween. `None` fields fall back to the engine [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenSettings {
    pub ease: Option<EaseSpec>,
    pub delay: f32,
    /// -1 for infinite.
    pub loops: i32,
    pub loop_type: Option<LoopType>,
    /// End value is an offset from the start value.
    pub relative: bool,
    /// Swap start and end: animate from the given value to the current one.
    pub from: bool,
    /// Round every written component.
    pub snapping: bool,
    pub auto_kill: Option<bool>,
    pub autoplay: Option<bool>,
    pub time_scale: f32,
    /// The duration argument is a speed in units per second.
    pub speed_based: bool,
    /// Host label, usable with [`crate::Engine::find_by_tag`].
    pub tag: Option<String>,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            ease: None,
            delay: 0.0,
            loops: 1,
            loop_type: None,
            relative: false,
            from: false,
            snapping: false,
            auto_kill: None,
            autoplay: None,
            time_scale: 1.0,
            speed_based: false,
            tag: None,
        }
    }
}

impl TweenSettings {
    pub fn with_ease(mut self, ease: impl Into<EaseSpec>) -> Self {
        self.ease = Some(ease.into());
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_loops(mut self, loops: i32, loop_type: LoopType) -> Self {
        self.loops = loops;
        self.loop_type = Some(loop_type);
        self
    }

    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }

    pub fn from(mut self) -> Self {
        self.from = true;
        self
    }

    pub fn snapping(mut self) -> Self {
        self.snapping = true;
        self
    }

    pub fn with_auto_kill(mut self, auto_kill: bool) -> Self {
        self.auto_kill = Some(auto_kill);
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn speed_based(mut self) -> Self {
        self.speed_based = true;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Checks that do not depend on the bound value.
    pub fn validate(&self) -> Result<(), TweenError> {
        validate_loops(self.loops)?;
        validate_common(self.delay, self.time_scale)
    }
}

/// Options for a sequence. Sequences ease linearly unless told otherwise.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceSettings {
    pub ease: EaseSpec,
    pub delay: f32,
    pub loops: i32,
    pub loop_type: Option<LoopType>,
    pub auto_kill: Option<bool>,
    pub autoplay: Option<bool>,
    pub time_scale: f32,
    pub tag: Option<String>,
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            ease: EaseSpec::new(Ease::Linear),
            delay: 0.0,
            loops: 1,
            loop_type: None,
            auto_kill: None,
            autoplay: None,
            time_scale: 1.0,
            tag: None,
        }
    }
}

impl SequenceSettings {
    pub fn with_ease(mut self, ease: impl Into<EaseSpec>) -> Self {
        self.ease = ease.into();
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_loops(mut self, loops: i32, loop_type: LoopType) -> Self {
        self.loops = loops;
        self.loop_type = Some(loop_type);
        self
    }

    pub fn with_auto_kill(mut self, auto_kill: bool) -> Self {
        self.auto_kill = Some(auto_kill);
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn validate(&self) -> Result<(), TweenError> {
        validate_loops(self.loops)?;
        validate_common(self.delay, self.time_scale)
    }
}

fn validate_common(delay: f32, time_scale: f32) -> Result<(), TweenError> {
    if !delay.is_finite() || delay < 0.0 {
        return Err(TweenError::InvalidSettings {
            reason: format!("delay must be finite and >= 0, got {delay}"),
        });
    }
    if !time_scale.is_finite() || time_scale < 0.0 {
        return Err(TweenError::InvalidSettings {
            reason: format!("time scale must be finite and >= 0, got {time_scale}"),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StoredTweenSettings {
    ease: Option<String>,
    overshoot: Option<f32>,
    period: Option<f32>,
    delay: Option<f32>,
    loops: Option<i32>,
    loop_type: Option<String>,
    relative: Option<bool>,
    from: Option<bool>,
    snapping: Option<bool>,
    auto_kill: Option<bool>,
    autoplay: Option<bool>,
    speed_based: Option<bool>,
    time_scale: Option<f32>,
    tag: Option<String>,
}

fn parse_loop_type(name: &str) -> Result<LoopType, TweenError> {
    match name.to_ascii_lowercase().as_str() {
        "restart" => Ok(LoopType::Restart),
        "yoyo" => Ok(LoopType::Yoyo),
        "incremental" => Ok(LoopType::Incremental),
        other => Err(TweenError::InvalidSettings {
            reason: format!("unknown loop type '{other}'"),
        }),
    }
}

/// Parse tween settings from a JSON document such as
/// `{"ease": "inOutSine", "loops": 2, "loopType": "yoyo", "delay": 0.5}`.
///
/// Every field is optional. Unknown ease names fall back to `outQuad`;
/// unknown fields and loop types are errors. Only builtin ease names are
/// known here; use [`parse_tween_settings_json_with`] to reach eases
/// registered in an [`AdapterRegistry`].
pub fn parse_tween_settings_json(s: &str) -> Result<TweenSettings, TweenError> {
    parse_settings(s, |name| EaseSpec::new(Ease::from(name)))
}

/// Like [`parse_tween_settings_json`], resolving the ease name through
/// `registry` so custom functions and curves can be named.
pub fn parse_tween_settings_json_with(
    s: &str,
    registry: &AdapterRegistry,
) -> Result<TweenSettings, TweenError> {
    parse_settings(s, |name| registry.resolve_ease(name))
}

fn parse_settings(
    s: &str,
    resolve_ease: impl Fn(&str) -> EaseSpec,
) -> Result<TweenSettings, TweenError> {
    let stored: StoredTweenSettings = serde_json::from_str(s)?;
    let defaults = TweenSettings::default();

    let ease = if stored.ease.is_some() || stored.overshoot.is_some() || stored.period.is_some() {
        let mut spec = stored
            .ease
            .as_deref()
            .map_or_else(|| EaseSpec::new(Ease::OutQuad), |name| resolve_ease(name));
        if let Some(overshoot) = stored.overshoot {
            spec = spec.with_overshoot(overshoot);
        }
        if let Some(period) = stored.period {
            spec = spec.with_period(period);
        }
        Some(spec)
    } else {
        None
    };

    let settings = TweenSettings {
        ease,
        delay: stored.delay.unwrap_or(defaults.delay),
        loops: stored.loops.unwrap_or(defaults.loops),
        loop_type: stored.loop_type.as_deref().map(parse_loop_type).transpose()?,
        relative: stored.relative.unwrap_or(false),
        from: stored.from.unwrap_or(false),
        snapping: stored.snapping.unwrap_or(false),
        auto_kill: stored.auto_kill,
        autoplay: stored.autoplay,
        time_scale: stored.time_scale.unwrap_or(defaults.time_scale),
        speed_based: stored.speed_based.unwrap_or(false),
        tag: stored.tag,
    };
    settings.validate()?;
    Ok(settings)
}
