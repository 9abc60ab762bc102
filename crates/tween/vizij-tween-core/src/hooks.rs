//! Lifecycle hooks and the deferred commands they may issue.
//!
//! Hooks run synchronously inside a tick. They cannot touch the engine
//! directly; instead they queue [`Command`]s on the [`HookContext`], which
//! the engine applies once the current playable has finished updating.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::error::TweenError;
use crate::ids::TweenId;
use crate::outputs::{TickReport, TweenEvent};

/// Engine control requests queued from hooks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Play { id: TweenId },
    Pause { id: TweenId },
    TogglePause { id: TweenId },
    PlayForward { id: TweenId },
    PlayBackwards { id: TweenId },
    Flip { id: TweenId },
    Restart { id: TweenId },
    Rewind { id: TweenId },
    Complete { id: TweenId },
    Goto { id: TweenId, to: f32, and_play: bool },
    Kill { id: TweenId, complete: bool },
    SetTimeScale { id: TweenId, time_scale: f32 },
    PlayAll,
    PauseAll,
    KillAll,
}

/// What a hook sees: the top-level playable it belongs to and a command
/// queue.
pub struct HookContext<'a> {
    id: TweenId,
    waypoint: Option<usize>,
    commands: &'a mut Vec<Command>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(id: TweenId, waypoint: Option<usize>, commands: &'a mut Vec<Command>) -> Self {
        Self {
            id,
            waypoint,
            commands,
        }
    }

    /// Handle of the top-level tween or sequence being updated.
    #[inline]
    pub fn id(&self) -> TweenId {
        self.id
    }

    /// Waypoint index, set for `on_waypoint_change`.
    #[inline]
    pub fn waypoint(&self) -> Option<usize> {
        self.waypoint
    }

    #[inline]
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn kill(&mut self, id: TweenId) {
        self.push(Command::Kill {
            id,
            complete: false,
        });
    }

    pub fn kill_self(&mut self) {
        self.kill(self.id);
    }

    pub fn pause(&mut self, id: TweenId) {
        self.push(Command::Pause { id });
    }

    pub fn play(&mut self, id: TweenId) {
        self.push(Command::Play { id });
    }

    pub fn complete(&mut self, id: TweenId) {
        self.push(Command::Complete { id });
    }

    pub fn restart(&mut self, id: TweenId) {
        self.push(Command::Restart { id });
    }
}

pub type Hook = Box<dyn FnMut(&mut HookContext<'_>)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum HookKind {
    Start,
    Update,
    StepComplete,
    Complete,
    Rewind,
    Kill,
    WaypointChange,
}

impl HookKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            HookKind::Start => "on_start",
            HookKind::Update => "on_update",
            HookKind::StepComplete => "on_step_complete",
            HookKind::Complete => "on_complete",
            HookKind::Rewind => "on_rewind",
            HookKind::Kill => "on_kill",
            HookKind::WaypointChange => "on_waypoint_change",
        }
    }
}

/// Optional callbacks attached to a tween or sequence.
#[derive(Default)]
pub struct Hooks {
    pub on_start: Option<Hook>,
    pub on_update: Option<Hook>,
    pub on_step_complete: Option<Hook>,
    pub on_complete: Option<Hook>,
    pub on_rewind: Option<Hook>,
    pub on_kill: Option<Hook>,
    pub on_waypoint_change: Option<Hook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_step_complete", &self.on_step_complete.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_rewind", &self.on_rewind.is_some())
            .field("on_kill", &self.on_kill.is_some())
            .field("on_waypoint_change", &self.on_waypoint_change.is_some())
            .finish()
    }
}

impl Hooks {
    fn slot(&mut self, kind: HookKind) -> &mut Option<Hook> {
        match kind {
            HookKind::Start => &mut self.on_start,
            HookKind::Update => &mut self.on_update,
            HookKind::StepComplete => &mut self.on_step_complete,
            HookKind::Complete => &mut self.on_complete,
            HookKind::Rewind => &mut self.on_rewind,
            HookKind::Kill => &mut self.on_kill,
            HookKind::WaypointChange => &mut self.on_waypoint_change,
        }
    }
}

/// Routing for everything a playable emits during an update: hook calls,
/// queued commands and report events.
pub(crate) struct Sink<'a> {
    pub root: TweenId,
    pub commands: &'a mut Vec<Command>,
    pub report: &'a mut TickReport,
    pub safe_mode: bool,
    pub max_events: usize,
    /// Nesting depth below the top-level playable.
    pub depth: usize,
    /// Silent moves update values without firing hooks or events.
    pub silent: bool,
}

impl Sink<'_> {
    #[inline]
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Report an event for the top-level playable.
    pub fn event(&mut self, event: TweenEvent) {
        if self.is_root() && !self.silent {
            self.report.push_event(event, self.max_events);
        }
    }

    /// Sink for a nested child. Silence is inherited.
    pub fn child(&mut self, silent: bool) -> Sink<'_> {
        Sink {
            root: self.root,
            commands: &mut *self.commands,
            report: &mut *self.report,
            safe_mode: self.safe_mode,
            max_events: self.max_events,
            depth: self.depth + 1,
            silent: self.silent || silent,
        }
    }

    /// Invoke one of a playable's hooks.
    pub fn fire(&mut self, hooks: &mut Hooks, kind: HookKind, waypoint: Option<usize>) {
        if let Some(hook) = hooks.slot(kind).as_mut() {
            self.call(hook, kind.name(), waypoint);
        }
    }

    /// Invoke a hook. In safe mode a panic is caught and reported instead of
    /// unwinding through the tick.
    pub fn call(&mut self, hook: &mut Hook, name: &str, waypoint: Option<usize>) {
        if self.silent {
            return;
        }
        let mut ctx = HookContext::new(self.root, waypoint, self.commands);
        if !self.safe_mode {
            hook(&mut ctx);
            return;
        }
        if panic::catch_unwind(AssertUnwindSafe(|| hook(&mut ctx))).is_err() {
            self.report_panic(name);
        }
    }

    pub fn report_panic(&mut self, name: &str) {
        let err = TweenError::HookPanicked {
            hook: name.to_string(),
        };
        log::error!("tween {}: {err}", self.root);
        self.report.push_event(
            TweenEvent::Error {
                id: self.root,
                message: err.to_string(),
            },
            self.max_events,
        );
    }

    /// A getter or setter failed: report and force-kill the top-level
    /// playable once its update finishes.
    pub fn fail(&mut self, err: TweenError) {
        log::warn!("tween {} force-killed: {err}", self.root);
        self.report.push_event(
            TweenEvent::Error {
                id: self.root,
                message: err.to_string(),
            },
            self.max_events,
        );
        self.commands.push(Command::Kill {
            id: self.root,
            complete: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink<'a>(commands: &'a mut Vec<Command>, report: &'a mut TickReport) -> Sink<'a> {
        Sink {
            root: TweenId::new(0, 0),
            commands,
            report,
            safe_mode: true,
            max_events: 8,
            depth: 0,
            silent: false,
        }
    }

    #[test]
    fn hooks_queue_commands() {
        let mut hooks = Hooks {
            on_complete: Some(Box::new(|ctx: &mut HookContext<'_>| ctx.kill_self())),
            ..Hooks::default()
        };
        let (mut commands, mut report) = (Vec::new(), TickReport::default());
        sink(&mut commands, &mut report).fire(&mut hooks, HookKind::Complete, None);
        assert_eq!(
            commands,
            vec![Command::Kill {
                id: TweenId::new(0, 0),
                complete: false
            }]
        );
    }

    #[test]
    fn panics_are_isolated_in_safe_mode() {
        let mut hooks = Hooks {
            on_update: Some(Box::new(|_: &mut HookContext<'_>| panic!("boom"))),
            ..Hooks::default()
        };
        let (mut commands, mut report) = (Vec::new(), TickReport::default());
        sink(&mut commands, &mut report).fire(&mut hooks, HookKind::Update, None);
        assert!(matches!(report.events[0], TweenEvent::Error { .. }));
        assert!(commands.is_empty());
    }

    #[test]
    fn silent_sink_skips_hooks() {
        let mut hooks = Hooks {
            on_start: Some(Box::new(|ctx: &mut HookContext<'_>| ctx.kill_self())),
            ..Hooks::default()
        };
        let (mut commands, mut report) = (Vec::new(), TickReport::default());
        let mut s = sink(&mut commands, &mut report);
        s.silent = true;
        s.fire(&mut hooks, HookKind::Start, None);
        assert!(commands.is_empty());
    }
}
