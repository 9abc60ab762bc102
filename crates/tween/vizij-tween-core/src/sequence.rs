//! Sequences: tweens, nested sequences and callbacks laid out on one
//! timeline.
//!
//! A sequence owns its children. Child delays are folded into their insert
//! offsets, and the children are driven purely by seeking, so a sequence can
//! be scrubbed in either direction. The sequence's own ease remaps its
//! timeline before the children see it.

use crate::config::{Config, SequenceSettings};
use crate::ease::EaseSpec;
use crate::error::TweenError;
use crate::hooks::{Hook, HookContext, HookKind, Hooks, Sink};
use crate::outputs::TweenEvent;
use crate::playable::{announce, Playable};
use crate::timeline::{Cursor, LoopType, Timeline, Transition};

enum Item {
    Child { offset: f32, playable: Playable },
    Callback { at: f32, hook: Hook },
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Item::Child { offset, playable } => f
                .debug_struct("Child")
                .field("offset", offset)
                .field("playable", playable)
                .finish(),
            Item::Callback { at, .. } => f.debug_struct("Callback").field("at", at).finish(),
        }
    }
}

impl Item {
    fn shift(&mut self, by: f32) {
        match self {
            Item::Child { offset, .. } => *offset += by,
            Item::Callback { at, .. } => *at += by,
        }
    }
}

#[derive(Debug)]
pub struct Sequence {
    items: Vec<Item>,
    timeline: Timeline,
    ease: EaseSpec,
    hooks: Hooks,
    /// Loop count requested at construction; applied once the sequence has
    /// a non-zero duration.
    loops: i32,
    /// Insert position of the last appended or inserted item, for `join`.
    last_offset: f32,
    /// Set once the start has been rendered; the first render includes
    /// items sitting exactly at the start.
    entered: bool,
    auto_kill: bool,
    autoplay: bool,
    tag: Option<String>,
}

fn validate_offset(at: f32) -> Result<(), TweenError> {
    if !at.is_finite() || at < 0.0 {
        return Err(TweenError::InvalidSettings {
            reason: format!("sequence position must be finite and >= 0, got {at}"),
        });
    }
    Ok(())
}

/// Unrolled position that puts a child at its end. Zero-length children
/// complete on any positive position.
#[inline]
fn end_target(timeline: &Timeline) -> f32 {
    let total = timeline.total();
    if total > 0.0 {
        total
    } else {
        1.0
    }
}

impl Sequence {
    pub fn new(settings: SequenceSettings, config: &Config) -> Result<Self, TweenError> {
        settings.validate()?;
        let mut timeline = Timeline::new(
            0.0,
            settings.loops,
            settings.loop_type.unwrap_or(config.default_loop_type),
            settings.delay,
        )?;
        timeline.set_time_scale(settings.time_scale);
        Ok(Self {
            items: Vec::new(),
            timeline,
            ease: settings.ease,
            hooks: Hooks::default(),
            loops: settings.loops,
            last_offset: 0.0,
            entered: false,
            auto_kill: settings.auto_kill.unwrap_or(config.default_auto_kill),
            autoplay: settings.autoplay.unwrap_or(config.default_autoplay),
            tag: settings.tag,
        })
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[inline]
    pub(crate) fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Length of one loop.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.timeline.duration()
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

    /// Number of children and callbacks.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn on_start(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_start = Some(Box::new(hook));
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

    pub fn on_update(mut self, hook: impl FnMut(&mut HookContext<'_>) + 'static) -> Self {
        self.hooks.on_update = Some(Box::new(hook));
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

    pub(crate) fn for_each_child(&mut self, mut f: impl FnMut(&mut Playable)) {
        for item in &mut self.items {
            if let Item::Child { playable, .. } = item {
                f(playable);
            }
        }
    }

    fn prepare(child: impl Into<Playable>) -> Result<(Playable, f32), TweenError> {
        let mut playable = child.into();
        let timeline = playable.timeline();
        if timeline.is_infinite() {
            return Err(TweenError::InfiniteLoopInSequence);
        }
        let delay = timeline.delay();
        playable.timeline_mut().skip_delay();
        Ok((playable, delay))
    }

    fn grow(&mut self, end: f32) {
        if end > self.timeline.duration() {
            self.set_duration(end);
        }
    }

    fn set_duration(&mut self, duration: f32) {
        self.timeline.set_duration(duration);
        self.timeline.set_loops(self.loops);
    }

    fn push_child(&mut self, at: f32, delay: f32, playable: Playable) {
        let offset = at + delay;
        let end = offset + playable.timeline().total();
        self.items.push(Item::Child { offset, playable });
        self.last_offset = at;
        self.grow(end);
    }

    /// Add a child at the current end of the sequence.
    pub fn append(&mut self, child: impl Into<Playable>) -> Result<&mut Self, TweenError> {
        let (playable, delay) = Self::prepare(child)?;
        self.push_child(self.duration(), delay, playable);
        Ok(self)
    }

    /// Add a child at the position of the last appended or inserted item.
    pub fn join(&mut self, child: impl Into<Playable>) -> Result<&mut Self, TweenError> {
        let (playable, delay) = Self::prepare(child)?;
        self.push_child(self.last_offset, delay, playable);
        Ok(self)
    }

    pub fn insert(&mut self, at: f32, child: impl Into<Playable>) -> Result<&mut Self, TweenError> {
        validate_offset(at)?;
        let (playable, delay) = Self::prepare(child)?;
        self.push_child(at, delay, playable);
        Ok(self)
    }

    /// Add a child at the start, pushing everything else later.
    pub fn prepend(&mut self, child: impl Into<Playable>) -> Result<&mut Self, TweenError> {
        let (playable, delay) = Self::prepare(child)?;
        let shift = delay + playable.timeline().total();
        for item in &mut self.items {
            item.shift(shift);
        }
        let duration = self.duration() + shift;
        self.items.insert(
            0,
            Item::Child {
                offset: delay,
                playable,
            },
        );
        self.last_offset = 0.0;
        self.set_duration(duration);
        Ok(self)
    }

    pub fn append_interval(&mut self, interval: f32) -> Result<&mut Self, TweenError> {
        validate_offset(interval)?;
        let duration = self.duration() + interval;
        self.set_duration(duration);
        Ok(self)
    }

    pub fn prepend_interval(&mut self, interval: f32) -> Result<&mut Self, TweenError> {
        validate_offset(interval)?;
        for item in &mut self.items {
            item.shift(interval);
        }
        let duration = self.duration() + interval;
        self.set_duration(duration);
        Ok(self)
    }

    pub fn append_callback(
        &mut self,
        callback: impl FnMut(&mut HookContext<'_>) + 'static,
    ) -> &mut Self {
        let at = self.duration();
        self.items.push(Item::Callback {
            at,
            hook: Box::new(callback),
        });
        self.last_offset = at;
        self
    }

    pub fn insert_callback(
        &mut self,
        at: f32,
        callback: impl FnMut(&mut HookContext<'_>) + 'static,
    ) -> Result<&mut Self, TweenError> {
        validate_offset(at)?;
        self.items.push(Item::Callback {
            at,
            hook: Box::new(callback),
        });
        self.last_offset = at;
        self.grow(at);
        Ok(self)
    }

    /// Sequence time after the loop mirror and the sequence ease.
    fn inner_time(&self, cycle: i32, position: f32) -> f32 {
        let duration = self.timeline.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        let local = self.timeline.local_time(Cursor { cycle, position });
        self.ease.evaluate(local, 0.0, duration, duration)
    }

    fn iterations_for(&self, cycle: i32, inherited: f32) -> f32 {
        self.timeline.iterations(Cursor {
            cycle,
            position: 0.0,
        }) + self.timeline.iteration_factor() * inherited
    }

    pub(crate) fn goto(&mut self, target: f64, inherited: f32, sink: &mut Sink<'_>) -> Transition {
        if !sink.silent && self.timeline.mark_started() {
            sink.fire(&mut self.hooks, HookKind::Start, None);
            sink.event(TweenEvent::Started { id: sink.root });
        }
        let inclusive = !self.entered;
        let transition = self.timeline.set_full(target);
        self.render(transition.from, transition.to, inclusive, inherited, sink);
        self.entered = !(sink.silent && self.timeline.full() <= 0.0);

        sink.fire(&mut self.hooks, HookKind::Update, None);
        announce(&self.timeline, &mut self.hooks, &transition, sink);
        transition
    }

    /// Drive the children from one cursor to another, cycle by cycle.
    /// Restart and incremental loops snap the children back at every loop
    /// boundary; yoyo loops run straight back through them.
    fn render(
        &mut self,
        from: Cursor,
        to: Cursor,
        inclusive: bool,
        inherited: f32,
        sink: &mut Sink<'_>,
    ) {
        let duration = self.timeline.duration();
        let resets = self.timeline.loop_type() != LoopType::Yoyo;
        if to.cycle == from.cycle {
            self.render_cycle(from.cycle, from.position, to.position, inclusive, inherited, sink);
        } else if to.cycle > from.cycle {
            self.render_cycle(from.cycle, from.position, duration, inclusive, inherited, sink);
            for cycle in from.cycle + 1..=to.cycle {
                let end = if cycle == to.cycle { to.position } else { duration };
                if resets {
                    self.reset_children(cycle, true, inherited, sink);
                }
                self.render_cycle(cycle, 0.0, end, resets, inherited, sink);
            }
        } else {
            self.render_cycle(from.cycle, from.position, 0.0, false, inherited, sink);
            for cycle in (to.cycle..from.cycle).rev() {
                let end = if cycle == to.cycle { to.position } else { 0.0 };
                if resets {
                    self.reset_children(cycle, false, inherited, sink);
                }
                self.render_cycle(cycle, duration, end, resets, inherited, sink);
            }
        }
    }

    fn render_cycle(
        &mut self,
        cycle: i32,
        from: f32,
        to: f32,
        inclusive: bool,
        inherited: f32,
        sink: &mut Sink<'_>,
    ) {
        let from = self.inner_time(cycle, from);
        let to = self.inner_time(cycle, to);
        let iterations = self.iterations_for(cycle, inherited);
        self.render_span(from, to, inclusive, iterations, sink);
    }

    /// Seek every item touched by `[from, to]` in sequence time. Forward
    /// spans visit items in insertion order, backward spans in reverse.
    fn render_span(
        &mut self,
        from: f32,
        to: f32,
        inclusive: bool,
        iterations: f32,
        sink: &mut Sink<'_>,
    ) {
        let forward = to >= from;
        let (lo, hi) = if forward { (from, to) } else { (to, from) };
        let count = self.items.len();
        for step in 0..count {
            let index = if forward { step } else { count - 1 - step };
            match &mut self.items[index] {
                Item::Callback { at, hook } => {
                    let at = *at;
                    let crossed = if forward {
                        (at > from || (inclusive && at >= from)) && at <= to
                    } else {
                        (at < from || (inclusive && at <= from)) && at >= to
                    };
                    if crossed {
                        sink.call(hook, "callback", None);
                    }
                }
                Item::Child { offset, playable } => {
                    let offset = *offset;
                    let timeline = playable.timeline();
                    let total = timeline.total();
                    if lo > offset + total || hi < offset {
                        continue;
                    }
                    let (target, unchanged) = if total <= 0.0 {
                        let reached = to >= offset;
                        (
                            if reached { 1.0 } else { 0.0 },
                            timeline.is_complete() == reached,
                        )
                    } else {
                        let target = (to - offset).clamp(0.0, total);
                        (target, timeline.full() == target)
                    };
                    if unchanged && !inclusive {
                        continue;
                    }
                    let mut child_sink = sink.child(false);
                    playable.goto(f64::from(target), iterations, &mut child_sink);
                }
            }
        }
    }

    /// Silently put every child at the start (reverse order) or the end
    /// (insertion order) of a loop.
    fn reset_children(&mut self, cycle: i32, to_start: bool, inherited: f32, sink: &mut Sink<'_>) {
        let iterations = self.iterations_for(cycle, inherited);
        let mut child_sink = sink.child(true);
        let count = self.items.len();
        for step in 0..count {
            let index = if to_start { count - 1 - step } else { step };
            if let Item::Child { playable, .. } = &mut self.items[index] {
                let target = if to_start {
                    0.0
                } else {
                    end_target(playable.timeline())
                };
                playable.goto(f64::from(target), iterations, &mut child_sink);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Adapter;
    use crate::binding::{shared, SharedValue};
    use crate::config::TweenSettings;
    use crate::ease::Ease;
    use crate::ids::TweenId;
    use crate::outputs::TickReport;
    use crate::tween::Tween;
    use crate::value::Value;

    fn float_tween(cell: &SharedValue, end: f32, duration: f32) -> Tween {
        Tween::bind(
            cell.clone(),
            Adapter::Float,
            end,
            duration,
            TweenSettings::default().with_ease(Ease::Linear),
            &Config::default(),
        )
        .unwrap()
    }

    fn seek(seq: &mut Sequence, target: f32) -> TickReport {
        let mut commands = Vec::new();
        let mut report = TickReport::default();
        let mut sink = Sink {
            root: TweenId::new(0, 0),
            commands: &mut commands,
            report: &mut report,
            safe_mode: true,
            max_events: 64,
            depth: 0,
            silent: false,
        };
        seq.goto(f64::from(target), 0.0, &mut sink);
        report
    }

    fn value(cell: &SharedValue) -> f32 {
        cell.borrow().as_float().unwrap()
    }

    #[test]
    fn layout_operations() {
        let cell = shared(0.0f32);
        let mut seq = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        seq.append(float_tween(&cell, 1.0, 1.0)).unwrap();
        seq.append(float_tween(&cell, 1.0, 2.0)).unwrap();
        assert_eq!(seq.duration(), 3.0);
        seq.join(float_tween(&cell, 1.0, 0.5)).unwrap();
        assert_eq!(seq.duration(), 3.0);
        seq.append_interval(1.0).unwrap();
        assert_eq!(seq.duration(), 4.0);
        seq.prepend(float_tween(&cell, 1.0, 1.0)).unwrap();
        assert_eq!(seq.duration(), 5.0);
        seq.prepend_interval(0.5).unwrap();
        assert_eq!(seq.duration(), 5.5);
        seq.insert_callback(7.0, |_| {}).unwrap();
        assert_eq!(seq.duration(), 7.0);
        assert_eq!(seq.len(), 5);
        assert!(seq.insert(-1.0, float_tween(&cell, 1.0, 1.0)).is_err());
    }

    #[test]
    fn child_delay_becomes_offset() {
        let cell = shared(0.0f32);
        let delayed = Tween::bind(
            cell.clone(),
            Adapter::Float,
            10.0f32,
            1.0,
            TweenSettings::default()
                .with_ease(Ease::Linear)
                .with_delay(0.5),
            &Config::default(),
        )
        .unwrap();
        let mut seq = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        seq.append(delayed).unwrap();
        assert_eq!(seq.duration(), 1.5);
        seek(&mut seq, 1.0);
        assert_eq!(value(&cell), 5.0);
    }

    #[test]
    fn infinite_children_are_rejected() {
        let cell = shared(0.0f32);
        let looping = Tween::bind(
            cell,
            Adapter::Float,
            1.0f32,
            1.0,
            TweenSettings::default().with_loops(-1, LoopType::Restart),
            &Config::default(),
        )
        .unwrap();
        let mut seq = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        assert_eq!(
            seq.append(looping).unwrap_err(),
            TweenError::InfiniteLoopInSequence
        );
    }

    #[test]
    fn seeking_drives_children_both_ways() {
        let a = shared(0.0f32);
        let b = shared(0.0f32);
        let mut seq = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        seq.append(float_tween(&a, 10.0, 1.0)).unwrap();
        seq.append(float_tween(&b, 10.0, 1.0)).unwrap();

        seek(&mut seq, 0.5);
        assert_eq!((value(&a), value(&b)), (5.0, 0.0));
        // A large jump still finishes the first child.
        seek(&mut seq, 1.5);
        assert_eq!((value(&a), value(&b)), (10.0, 5.0));
        seek(&mut seq, 0.25);
        assert_eq!((value(&a), value(&b)), (2.5, 0.0));
    }

    #[test]
    fn callbacks_fire_when_crossed() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut seq = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        let cell = shared(0.0f32);
        seq.append(float_tween(&cell, 1.0, 1.0)).unwrap();
        for (at, name) in [(0.0, "zero"), (0.5, "half"), (1.0, "end")] {
            let log = log.clone();
            seq.insert_callback(at, move |_| log.borrow_mut().push(name))
                .unwrap();
        }
        seek(&mut seq, 0.0);
        assert_eq!(*log.borrow(), vec!["zero"]);
        seek(&mut seq, 1.0);
        assert_eq!(*log.borrow(), vec!["zero", "half", "end"]);
        seek(&mut seq, 0.25);
        assert_eq!(*log.borrow(), vec!["zero", "half", "end", "half"]);
    }

    #[test]
    fn restart_loops_reset_children() {
        let cell = shared(0.0f32);
        let mut seq = Sequence::new(
            SequenceSettings::default().with_loops(2, LoopType::Restart),
            &Config::default(),
        )
        .unwrap();
        seq.append(float_tween(&cell, 10.0, 1.0)).unwrap();
        seek(&mut seq, 1.25);
        assert_eq!(value(&cell), 2.5);
    }

    #[test]
    fn yoyo_loops_play_children_backwards() {
        let cell = shared(0.0f32);
        let mut seq = Sequence::new(
            SequenceSettings::default().with_loops(2, LoopType::Yoyo),
            &Config::default(),
        )
        .unwrap();
        seq.append(float_tween(&cell, 10.0, 1.0)).unwrap();
        seek(&mut seq, 1.25);
        assert_eq!(value(&cell), 7.5);
        let report = seek(&mut seq, 2.0);
        assert_eq!(value(&cell), 0.0);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, TweenEvent::Completed { .. })));
    }

    #[test]
    fn incremental_sequences_accumulate_into_children() {
        let cell = shared(0.0f32);
        let mut seq = Sequence::new(
            SequenceSettings::default().with_loops(3, LoopType::Incremental),
            &Config::default(),
        )
        .unwrap();
        seq.append(float_tween(&cell, 10.0, 1.0)).unwrap();
        seek(&mut seq, 1.5);
        assert_eq!(value(&cell), 15.0);
        seek(&mut seq, 3.0);
        assert_eq!(value(&cell), 30.0);
    }

    #[test]
    fn nested_sequences() {
        let cell = shared(0.0f32);
        let mut inner = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        inner.append(float_tween(&cell, 4.0, 1.0)).unwrap();
        let mut outer = Sequence::new(SequenceSettings::default(), &Config::default()).unwrap();
        outer.append_interval(1.0).unwrap();
        outer.append(inner).unwrap();
        assert_eq!(outer.duration(), 2.0);
        seek(&mut outer, 1.5);
        assert_eq!(value(&cell), 2.0);
        assert_eq!(*cell.borrow(), Value::Float(2.0));
    }

    #[test]
    fn sequence_ease_remaps_children() {
        let cell = shared(0.0f32);
        let mut seq = Sequence::new(
            SequenceSettings::default().with_ease(Ease::InQuad),
            &Config::default(),
        )
        .unwrap();
        seq.append(float_tween(&cell, 10.0, 2.0)).unwrap();
        seek(&mut seq, 1.0);
        // Half way through an InQuad sequence is a quarter of its time.
        assert!((value(&cell) - 2.5).abs() < 1e-5);
    }
}
