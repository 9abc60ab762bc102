//! A single bound tween: start/end/change values, an adapter and a timeline.

use std::panic::{self, AssertUnwindSafe};

use crate::adapters::{Adapter, EndValue, EvalContext, Operand};
use crate::binding::Binding;
use crate::config::{Config, TweenSettings};
use crate::ease::EaseSpec;
use crate::error::TweenError;
use crate::hooks::{HookContext, HookKind, Hooks, Sink};
use crate::outputs::TweenEvent;
use crate::playable::announce;
use crate::timeline::{PlayState, Timeline, Transition};
use crate::value::{Value, ValueKind};

pub struct Tween {
    binding: Box<dyn Binding>,
    adapter: Adapter,
    kind: ValueKind,
    ease: EaseSpec,
    start: Operand,
    end: Operand,
    change: Operand,
    relative: bool,
    snapping: bool,
    timeline: Timeline,
    hooks: Hooks,
    last_waypoint: Option<usize>,
    subdivisions: usize,
    auto_kill: bool,
    autoplay: bool,
    tag: Option<String>,
}

impl std::fmt::Debug for Tween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("adapter", &self.adapter)
            .field("kind", &self.kind)
            .field("ease", &self.ease)
            .field("start", &self.start)
            .field("change", &self.change)
            .field("timeline", &self.timeline)
            .field("hooks", &self.hooks)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl Tween {
    /// Bind a tween to a host value. The getter is read once here to capture
    /// the start value.
    ///
    /// `duration_or_speed` is a duration in seconds, or a speed in units per
    /// second when `settings.speed_based` is set.
    pub fn bind(
        binding: impl Binding + 'static,
        adapter: Adapter,
        end: impl Into<EndValue>,
        duration_or_speed: f32,
        settings: TweenSettings,
        config: &Config,
    ) -> Result<Self, TweenError> {
        let mut binding: Box<dyn Binding> = Box::new(binding);
        let current = binding.get()?;
        Self::bind_with(binding, current, adapter, end.into(), duration_or_speed, settings, config)
    }

    /// Bind with a start value already read from `binding`.
    pub(crate) fn bind_with(
        binding: Box<dyn Binding>,
        current: Value,
        adapter: Adapter,
        end: EndValue,
        duration_or_speed: f32,
        settings: TweenSettings,
        config: &Config,
    ) -> Result<Self, TweenError> {
        settings.validate()?;
        if settings.speed_based {
            if !duration_or_speed.is_finite() || duration_or_speed <= 0.0 {
                return Err(TweenError::InvalidSpeed {
                    speed: duration_or_speed,
                });
            }
        } else if !duration_or_speed.is_finite() || duration_or_speed < 0.0 {
            return Err(TweenError::InvalidDuration {
                duration: duration_or_speed,
            });
        }

        let kind = current.kind();
        let subdivisions = config.path_subdivisions_per_segment.max(1);
        let mut start = adapter.to_change_space(&current)?;
        let mut end = adapter.resolve_end(&start, &end, settings.relative, subdivisions)?;
        if settings.from {
            if !adapter.supports_from() {
                return Err(TweenError::InvalidSettings {
                    reason: format!("{} tweens cannot run in from mode", adapter.name()),
                });
            }
            std::mem::swap(&mut start, &mut end);
        }
        let change = adapter.compute_change(&start, &end, settings.relative);

        let duration = if settings.speed_based {
            adapter.speed_to_duration(duration_or_speed, &change)
        } else {
            duration_or_speed
        };
        let mut timeline = Timeline::new(
            duration,
            settings.loops,
            settings.loop_type.unwrap_or(config.default_loop_type),
            settings.delay,
        )?;
        timeline.set_time_scale(settings.time_scale);

        let mut tween = Self {
            binding,
            adapter,
            kind,
            ease: settings
                .ease
                .unwrap_or_else(|| config.default_ease.clone()),
            start,
            end,
            change,
            relative: settings.relative,
            snapping: settings.snapping,
            timeline,
            hooks: Hooks::default(),
            last_waypoint: None,
            subdivisions,
            auto_kill: settings.auto_kill.unwrap_or(config.default_auto_kill),
            autoplay: settings.autoplay.unwrap_or(config.default_autoplay),
            tag: settings.tag,
        };
        if settings.from {
            tween.render(0.0, 1.0, 0.0)?;
        }
        Ok(tween)
    }

    #[inline]
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Kind of the bound host value.
    #[inline]
    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    pub fn ease(&self) -> &EaseSpec {
        &self.ease
    }

    #[inline]
    pub fn start_value(&self) -> &Operand {
        &self.start
    }

    #[inline]
    pub fn end_value(&self) -> &Operand {
        &self.end
    }

    #[inline]
    pub fn change_value(&self) -> &Operand {
        &self.change
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    pub(crate) fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    #[inline]
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    #[inline]
    pub fn auto_kill(&self) -> bool {
        self.auto_kill
    }

    #[inline]
    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn on_start(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_start = Some(Box::new(hook));
        self
    }

    pub fn on_update(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_update = Some(Box::new(hook));
        self
    }

    pub fn on_step_complete(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_step_complete = Some(Box::new(hook));
        self
    }

    pub fn on_complete(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_complete = Some(Box::new(hook));
        self
    }

    pub fn on_rewind(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_rewind = Some(Box::new(hook));
        self
    }

    pub fn on_kill(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_kill = Some(Box::new(hook));
        self
    }

    pub fn on_waypoint_change(
        mut self,
        hook: impl FnMut(&mut HookContext<'_>) + 'static,
    ) -> Self {
        self.hooks.on_waypoint_change = Some(Box::new(hook));
        self
    }

    /// Replace the end value and recompute the change. With `snap_start`
    /// the start value is re-read from the getter first. The tween goes back
    /// to its first loop and keeps its play state.
    pub fn change_end_value(
        &mut self,
        end: impl Into<EndValue>,
        snap_start: bool,
    ) -> Result<(), TweenError> {
        if snap_start {
            let current = self.binding.get()?;
            self.start = self.to_change_space(&current)?;
        }
        self.end = self
            .adapter
            .resolve_end(&self.start, &end.into(), self.relative, self.subdivisions)?;
        self.refresh_change();
        Ok(())
    }

    pub fn change_start_value(&mut self, start: impl Into<Value>) -> Result<(), TweenError> {
        self.start = self.to_change_space(&start.into())?;
        self.refresh_change();
        Ok(())
    }

    pub fn change_values(
        &mut self,
        start: impl Into<Value>,
        end: impl Into<EndValue>,
    ) -> Result<(), TweenError> {
        let start = self.to_change_space(&start.into())?;
        let end = self
            .adapter
            .resolve_end(&start, &end.into(), self.relative, self.subdivisions)?;
        self.start = start;
        self.end = end;
        self.refresh_change();
        Ok(())
    }

    fn to_change_space(&self, value: &Value) -> Result<Operand, TweenError> {
        if value.kind() != self.kind {
            return Err(self.adapter.unsupported(value.kind()));
        }
        self.adapter.to_change_space(value)
    }

    fn refresh_change(&mut self) {
        self.change = self.adapter.compute_change(&self.start, &self.end, self.relative);
        self.last_waypoint = None;
        self.timeline.set_full(0.0);
        if self.timeline.state() == PlayState::Completed {
            self.timeline.set_state(PlayState::Paused);
        }
    }

    /// Evaluate at `elapsed` and write through the setter. Returns the path
    /// waypoint, if the adapter reports one.
    fn render(
        &mut self,
        elapsed: f32,
        duration: f32,
        iterations: f32,
    ) -> Result<Option<usize>, TweenError> {
        let live = if self.adapter.needs_live_value() {
            Some(self.binding.get()?)
        } else {
            None
        };
        let ctx = EvalContext {
            elapsed,
            duration,
            ease: &self.ease,
            iterations,
            snapping: self.snapping,
            relative: self.relative,
            kind: self.kind,
            live: live.as_ref(),
        };
        let evaluation = self.adapter.evaluate(&ctx, &self.start, &self.change);
        self.binding.set(evaluation.value)?;
        Ok(evaluation.waypoint)
    }

    /// Move to `target` on the unrolled timeline and write the value.
    /// `inherited` carries incremental iterations from enclosing sequences.
    pub(crate) fn goto(&mut self, target: f64, inherited: f32, sink: &mut Sink<'_>) -> Transition {
        if !sink.silent && self.timeline.mark_started() {
            sink.fire(&mut self.hooks, HookKind::Start, None);
            sink.event(TweenEvent::Started { id: sink.root });
        }

        let transition = self.timeline.set_full(target);
        let iterations = self.timeline.iterations(transition.to)
            + self.timeline.iteration_factor() * inherited;
        let (elapsed, duration) = self.timeline.eval_time();
        let rendered = if sink.safe_mode {
            panic::catch_unwind(AssertUnwindSafe(|| {
                self.render(elapsed, duration, iterations)
            }))
            .unwrap_or_else(|_| Err(TweenError::binding("getter or setter panicked")))
        } else {
            self.render(elapsed, duration, iterations)
        };
        let waypoint = match rendered {
            Ok(waypoint) => waypoint,
            Err(err) => {
                sink.fail(err);
                return transition;
            }
        };

        sink.fire(&mut self.hooks, HookKind::Update, None);
        if waypoint.is_some() && waypoint != self.last_waypoint {
            self.last_waypoint = waypoint;
            if let Some(index) = waypoint {
                sink.fire(&mut self.hooks, HookKind::WaypointChange, Some(index));
                sink.event(TweenEvent::WaypointChanged {
                    id: sink.root,
                    index,
                });
            }
        }
        announce(&self.timeline, &mut self.hooks, &transition, sink);
        transition
    }
}
