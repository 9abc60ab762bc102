//! The playable contract shared by tweens and sequences.

use crate::hooks::{HookKind, Hooks, Sink};
use crate::outputs::TweenEvent;
use crate::sequence::Sequence;
use crate::timeline::{Direction, PlayState, Timeline, Transition};
use crate::tween::Tween;

/// A top-level or nested unit of animation.
#[derive(Debug)]
pub enum Playable {
    Tween(Tween),
    Sequence(Sequence),
}

impl From<Tween> for Playable {
    fn from(tween: Tween) -> Self {
        Playable::Tween(tween)
    }
}

impl From<Sequence> for Playable {
    fn from(sequence: Sequence) -> Self {
        Playable::Sequence(sequence)
    }
}

impl Playable {
    #[inline]
    pub fn timeline(&self) -> &Timeline {
        match self {
            Playable::Tween(t) => t.timeline(),
            Playable::Sequence(s) => s.timeline(),
        }
    }

    #[inline]
    pub(crate) fn timeline_mut(&mut self) -> &mut Timeline {
        match self {
            Playable::Tween(t) => t.timeline_mut(),
            Playable::Sequence(s) => s.timeline_mut(),
        }
    }

    #[inline]
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        match self {
            Playable::Tween(t) => t.hooks_mut(),
            Playable::Sequence(s) => s.hooks_mut(),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Playable::Tween(t) => t.tag(),
            Playable::Sequence(s) => s.tag(),
        }
    }

    pub fn auto_kill(&self) -> bool {
        match self {
            Playable::Tween(t) => t.auto_kill(),
            Playable::Sequence(s) => s.auto_kill(),
        }
    }

    pub fn autoplay(&self) -> bool {
        match self {
            Playable::Tween(t) => t.autoplay(),
            Playable::Sequence(s) => s.autoplay(),
        }
    }

    pub fn as_tween_mut(&mut self) -> Option<&mut Tween> {
        match self {
            Playable::Tween(t) => Some(t),
            Playable::Sequence(_) => None,
        }
    }

    /// Seek to `target` on the unrolled timeline, firing hooks for
    /// everything crossed.
    pub(crate) fn goto(&mut self, target: f64, inherited: f32, sink: &mut Sink<'_>) -> Transition {
        match self {
            Playable::Tween(t) => t.goto(target, inherited, sink),
            Playable::Sequence(s) => s.goto(target, inherited, sink),
        }
    }

    /// One frame of playback. Backward playback that reaches the start
    /// pauses and reports a rewind.
    pub(crate) fn advance(&mut self, dt: f32, sink: &mut Sink<'_>) {
        let Some(target) = self.timeline_mut().consume(dt) else {
            return;
        };
        let before = self.timeline().full();
        self.goto(target, 0.0, sink);
        let timeline = self.timeline();
        if timeline.direction() == Direction::Backward && before > 0.0 && timeline.full() <= 0.0 {
            self.timeline_mut().set_state(PlayState::Paused);
            self.rewound(sink);
        }
    }

    /// Silently return to the start, writing start values, and re-arm the
    /// delay.
    pub(crate) fn reset(&mut self, sink: &mut Sink<'_>) {
        let silent = std::mem::replace(&mut sink.silent, true);
        self.goto(0.0, 0.0, sink);
        sink.silent = silent;
        self.timeline_mut().reset_delay();
    }

    pub(crate) fn rewound(&mut self, sink: &mut Sink<'_>) {
        sink.fire(self.hooks_mut(), HookKind::Rewind, None);
        sink.event(TweenEvent::Rewound { id: sink.root });
    }

    /// Fire kill hooks, children first.
    pub(crate) fn killed(&mut self, sink: &mut Sink<'_>) {
        if let Playable::Sequence(s) = self {
            let mut child_sink = sink.child(false);
            s.for_each_child(|child| child.killed(&mut child_sink));
        }
        sink.fire(self.hooks_mut(), HookKind::Kill, None);
        sink.event(TweenEvent::Killed { id: sink.root });
    }
}

/// Loop and completion hooks for a finished move.
pub(crate) fn announce(
    timeline: &Timeline,
    hooks: &mut Hooks,
    transition: &Transition,
    sink: &mut Sink<'_>,
) {
    let crossed = transition.loops_crossed as i32;
    let now = timeline.completed_loops();
    for i in 0..crossed {
        let completed_loops = if transition.is_forward() {
            now - crossed + 1 + i
        } else {
            now + crossed - 1 - i
        };
        sink.fire(hooks, HookKind::StepComplete, None);
        sink.event(TweenEvent::StepCompleted {
            id: sink.root,
            completed_loops,
        });
    }
    if transition.completed {
        sink.fire(hooks, HookKind::Complete, None);
        sink.event(TweenEvent::Completed { id: sink.root });
    }
}
