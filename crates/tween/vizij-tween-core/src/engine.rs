//! Engine: owns every top-level playable and drives them once per tick.
//!
//! Methods:
//! - creation: create_tween, to, add, add_tween, add_sequence, sequence
//! - stepping: update, tick
//! - control: play/pause/flip/restart/rewind/complete/goto/kill and the
//!   `*_all` variants; every control call on a dead handle is a no-op
//! - values: change_end_value, change_start_value, change_values
//! - checkpoints: snapshot, restore

use crate::adapters::{Adapter, EndValue};
use crate::binding::Binding;
use crate::config::{Config, SequenceSettings, TweenSettings};
use crate::error::TweenError;
use crate::hooks::{Command, Hooks, Sink};
use crate::ids::{SlotArena, TweenId};
use crate::outputs::TickReport;
use crate::playable::Playable;
use crate::registry::AdapterRegistry;
use crate::sequence::Sequence;
use crate::time::TimeSource;
use crate::timeline::{Direction, PlayState, TweenSnapshot};
use crate::tween::Tween;
use crate::value::Value;

/// Rounds of hook-issued commands applied per flush before the rest are
/// dropped.
const MAX_COMMAND_ROUNDS: usize = 64;

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    registry: AdapterRegistry,
    playables: SlotArena<Playable>,
    time_scale: f32,

    // Deferred work
    commands: Vec<Command>,
    killed: Vec<TweenId>,
    /// Inside `update` or a command flush: kills are compacted later.
    busy: bool,

    // Per-tick outputs
    report: TickReport,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            registry: AdapterRegistry::new(),
            playables: SlotArena::with_capacity(cfg.capacity),
            time_scale: cfg.time_scale,
            commands: Vec::new(),
            killed: Vec::new(),
            busy: false,
            report: TickReport::default(),
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.registry
    }

    /// Events from the last update, plus any from control calls made since.
    #[inline]
    pub fn report(&self) -> &TickReport {
        &self.report
    }

    // ----- creation -----

    /// Bind a tween with an explicit adapter without scheduling it, for
    /// sequences or for configuring hooks before [`Engine::add_tween`].
    pub fn create_tween(
        &self,
        binding: impl Binding + 'static,
        adapter: Adapter,
        end: impl Into<EndValue>,
        duration: f32,
        settings: TweenSettings,
    ) -> Result<Tween, TweenError> {
        Tween::bind(binding, adapter, end, duration, settings, &self.cfg)
    }

    /// Bind a tween using the registry's default adapter for the bound
    /// value kind.
    pub fn create_default_tween(
        &self,
        binding: impl Binding + 'static,
        end: impl Into<EndValue>,
        duration: f32,
        settings: TweenSettings,
    ) -> Result<Tween, TweenError> {
        let mut binding: Box<dyn Binding> = Box::new(binding);
        let current = binding.get()?;
        let adapter = self
            .registry
            .default_adapter(current.kind())
            .cloned()
            .ok_or_else(|| TweenError::UnsupportedTarget {
                adapter: "default".to_string(),
                value: current.kind(),
            })?;
        Tween::bind_with(
            binding,
            current,
            adapter,
            end.into(),
            duration,
            settings,
            &self.cfg,
        )
    }

    /// Bind and schedule a tween with the default adapter.
    pub fn to(
        &mut self,
        binding: impl Binding + 'static,
        end: impl Into<EndValue>,
        duration: f32,
        settings: TweenSettings,
    ) -> Result<TweenId, TweenError> {
        let tween = self.create_default_tween(binding, end, duration, settings)?;
        Ok(self.add_tween(tween))
    }

    /// Bind and schedule a tween with an explicit adapter.
    pub fn tween(
        &mut self,
        binding: impl Binding + 'static,
        adapter: Adapter,
        end: impl Into<EndValue>,
        duration: f32,
        settings: TweenSettings,
    ) -> Result<TweenId, TweenError> {
        let tween = self.create_tween(binding, adapter, end, duration, settings)?;
        Ok(self.add_tween(tween))
    }

    /// Empty sequence using the engine defaults.
    pub fn sequence(&self, settings: SequenceSettings) -> Result<Sequence, TweenError> {
        Sequence::new(settings, &self.cfg)
    }

    pub fn add_tween(&mut self, tween: Tween) -> TweenId {
        self.add(tween)
    }

    pub fn add_sequence(&mut self, sequence: Sequence) -> TweenId {
        self.add(sequence)
    }

    /// Schedule a playable. Autoplaying playables start on the next tick.
    pub fn add(&mut self, playable: impl Into<Playable>) -> TweenId {
        let mut playable = playable.into();
        if playable.autoplay() {
            playable.timeline_mut().play();
        }
        self.playables.insert(playable)
    }

    pub fn hooks_mut(&mut self, id: TweenId) -> Option<&mut Hooks> {
        self.live_mut(id).map(Playable::hooks_mut)
    }

    // ----- stepping -----

    /// Advance every playable by `dt` seconds, scaled by the global and
    /// per-playable time scales. Playables update in slot order.
    pub fn update(&mut self, dt: f32) -> &TickReport {
        self.report.clear();
        if !dt.is_finite() || dt < 0.0 {
            log::debug!("update ignored: invalid delta {dt}");
            return &self.report;
        }
        let dt = dt * self.time_scale;
        self.busy = true;
        for id in self.playables.ids() {
            if let Some((playable, mut sink)) = self.parts(id) {
                playable.advance(dt, &mut sink);
            }
            self.settle(id);
            self.apply_commands();
        }
        self.busy = false;
        self.compact();
        &self.report
    }

    /// Advance by the next delta of a time source.
    pub fn tick(&mut self, source: &mut dyn TimeSource) -> &TickReport {
        let dt = source.delta_time();
        self.update(dt)
    }

    // ----- control -----

    pub fn play(&mut self, id: TweenId) -> bool {
        self.control(id, "play", |p, _| p.timeline_mut().play())
    }

    pub fn pause(&mut self, id: TweenId) -> bool {
        self.control(id, "pause", |p, _| p.timeline_mut().pause())
    }

    pub fn toggle_pause(&mut self, id: TweenId) -> bool {
        self.control(id, "toggle_pause", |p, _| {
            let timeline = p.timeline_mut();
            if timeline.is_playing() {
                timeline.pause()
            } else {
                timeline.play()
            }
        })
    }

    pub fn play_forward(&mut self, id: TweenId) -> bool {
        self.control(id, "play_forward", |p, _| {
            let timeline = p.timeline_mut();
            timeline.set_direction(Direction::Forward);
            timeline.play() || timeline.is_playing()
        })
    }

    /// Play towards the start. A playable already at its start does nothing.
    pub fn play_backwards(&mut self, id: TweenId) -> bool {
        self.control(id, "play_backwards", |p, _| {
            let timeline = p.timeline_mut();
            if timeline.full() <= 0.0 {
                return false;
            }
            timeline.set_direction(Direction::Backward);
            timeline.play() || timeline.is_playing()
        })
    }

    /// Reverse the play direction without changing the play state.
    pub fn flip(&mut self, id: TweenId) -> bool {
        self.control(id, "flip", |p, _| {
            let timeline = p.timeline_mut();
            let direction = timeline.direction().flipped();
            timeline.set_direction(direction);
            true
        })
    }

    /// Silently return to the start and play forward, re-arming the delay.
    pub fn restart(&mut self, id: TweenId) -> bool {
        self.control(id, "restart", |p, sink| {
            p.reset(sink);
            let timeline = p.timeline_mut();
            timeline.set_direction(Direction::Forward);
            timeline.set_state(PlayState::Paused);
            timeline.play()
        })
    }

    /// Silently return to the start and pause.
    pub fn rewind(&mut self, id: TweenId) -> bool {
        self.control(id, "rewind", |p, sink| {
            p.reset(sink);
            p.timeline_mut().set_state(PlayState::Paused);
            p.rewound(sink);
            true
        })
    }

    /// Jump to the end, firing completion hooks. Infinite loops cannot
    /// complete.
    pub fn complete(&mut self, id: TweenId) -> bool {
        self.control(id, "complete", |p, sink| {
            let timeline = p.timeline();
            if timeline.is_infinite() || timeline.is_complete() {
                return false;
            }
            let end = f64::from(timeline.total());
            p.timeline_mut().skip_delay();
            p.goto(end, 0.0, sink);
            true
        })
    }

    /// Seek to `to` seconds on the unrolled timeline (all loops), skipping
    /// any remaining delay. The playable then plays or pauses per
    /// `and_play` unless it landed on its end.
    pub fn goto(&mut self, id: TweenId, to: f32, and_play: bool) -> bool {
        if !to.is_finite() {
            log::debug!("goto ignored: invalid position {to}");
            return false;
        }
        self.control(id, "goto", |p, sink| {
            let target = f64::from(to.clamp(0.0, p.timeline().total()));
            p.timeline_mut().skip_delay();
            p.goto(target, 0.0, sink);
            let timeline = p.timeline_mut();
            if !timeline.is_complete() {
                timeline.set_state(if and_play {
                    PlayState::Running
                } else {
                    PlayState::Paused
                });
            }
            true
        })
    }

    /// Kill a playable, optionally completing it first. Safe to call from
    /// hooks through [`crate::HookContext::kill`]; removal happens after
    /// the current tick.
    pub fn kill(&mut self, id: TweenId, complete: bool) -> bool {
        if self.live(id).is_none() {
            log::debug!("kill ignored: {}", TweenError::StaleHandle { id });
            return false;
        }
        if complete {
            // Completing may already auto-kill.
            self.complete(id);
        }
        self.mark_killed(id);
        self.flush();
        true
    }

    pub fn kill_all(&mut self) -> usize {
        let count = self
            .playables
            .ids()
            .into_iter()
            .filter(|id| self.mark_killed(*id))
            .count();
        self.flush();
        count
    }

    pub fn pause_all(&mut self) -> usize {
        self.playables
            .iter_mut()
            .map(|(_, p)| p.timeline_mut().pause())
            .filter(|changed| *changed)
            .count()
    }

    pub fn play_all(&mut self) -> usize {
        self.playables
            .iter_mut()
            .map(|(_, p)| p.timeline_mut().play())
            .filter(|changed| *changed)
            .count()
    }

    pub fn set_time_scale(&mut self, id: TweenId, time_scale: f32) -> bool {
        if !time_scale.is_finite() || time_scale < 0.0 {
            log::debug!("set_time_scale ignored: invalid scale {time_scale}");
            return false;
        }
        self.control(id, "set_time_scale", |p, _| {
            p.timeline_mut().set_time_scale(time_scale);
            true
        })
    }

    pub fn set_global_time_scale(&mut self, time_scale: f32) -> bool {
        if !time_scale.is_finite() || time_scale < 0.0 {
            log::debug!("set_global_time_scale ignored: invalid scale {time_scale}");
            return false;
        }
        self.time_scale = time_scale;
        true
    }

    #[inline]
    pub fn global_time_scale(&self) -> f32 {
        self.time_scale
    }

    // ----- values -----

    pub fn change_end_value(
        &mut self,
        id: TweenId,
        end: impl Into<EndValue>,
        snap_start: bool,
    ) -> Result<(), TweenError> {
        self.tween_mut(id)?.change_end_value(end, snap_start)
    }

    pub fn change_start_value(
        &mut self,
        id: TweenId,
        start: impl Into<Value>,
    ) -> Result<(), TweenError> {
        self.tween_mut(id)?.change_start_value(start)
    }

    pub fn change_values(
        &mut self,
        id: TweenId,
        start: impl Into<Value>,
        end: impl Into<EndValue>,
    ) -> Result<(), TweenError> {
        self.tween_mut(id)?.change_values(start, end)
    }

    // ----- checkpoints -----

    pub fn snapshot(&self, id: TweenId) -> Option<TweenSnapshot> {
        self.live(id).map(|p| p.timeline().snapshot())
    }

    /// Restore a checkpoint taken from a playable built with the same
    /// parameters, and silently write the values at that position.
    pub fn restore(&mut self, id: TweenId, snapshot: &TweenSnapshot) -> bool {
        if snapshot.state == PlayState::Killed {
            log::debug!("restore ignored: snapshot of a killed playable");
            return false;
        }
        self.control(id, "restore", |p, sink| {
            p.timeline_mut().restore(snapshot);
            let full = p.timeline().unrolled();
            let silent = std::mem::replace(&mut sink.silent, true);
            p.goto(0.0, 0.0, sink);
            p.goto(full, 0.0, sink);
            sink.silent = silent;
            // Seeking moved the state; put the checkpoint back exactly.
            p.timeline_mut().restore(snapshot);
            true
        })
    }

    // ----- queries -----

    /// Alive and not killed.
    pub fn is_alive(&self, id: TweenId) -> bool {
        self.live(id).is_some()
    }

    pub fn is_playing(&self, id: TweenId) -> bool {
        self.live(id).is_some_and(|p| p.timeline().is_playing())
    }

    pub fn is_complete(&self, id: TweenId) -> bool {
        self.live(id).is_some_and(|p| p.timeline().is_complete())
    }

    pub fn state(&self, id: TweenId) -> Option<PlayState> {
        self.live(id).map(|p| p.timeline().state())
    }

    /// Elapsed time in the current loop, or across all loops.
    pub fn elapsed(&self, id: TweenId, include_loops: bool) -> Option<f32> {
        self.live(id).map(|p| {
            let timeline = p.timeline();
            if include_loops {
                timeline.full()
            } else {
                timeline.loop_position()
            }
        })
    }

    /// Elapsed fraction of the current loop, or of all loops for finite
    /// playables.
    pub fn elapsed_percentage(&self, id: TweenId, include_loops: bool) -> Option<f32> {
        self.live(id).map(|p| {
            let timeline = p.timeline();
            if include_loops && !timeline.is_infinite() {
                let total = timeline.total();
                if total > 0.0 {
                    timeline.full() / total
                } else if timeline.is_complete() {
                    1.0
                } else {
                    0.0
                }
            } else if timeline.duration() > 0.0 {
                timeline.loop_position() / timeline.duration()
            } else if timeline.is_complete() {
                1.0
            } else {
                0.0
            }
        })
    }

    pub fn completed_loops(&self, id: TweenId) -> Option<i32> {
        self.live(id).map(|p| p.timeline().completed_loops())
    }

    /// Duration of one loop, or of all loops (infinite for endless ones).
    pub fn duration(&self, id: TweenId, include_loops: bool) -> Option<f32> {
        self.live(id).map(|p| {
            let timeline = p.timeline();
            if include_loops {
                timeline.total()
            } else {
                timeline.duration()
            }
        })
    }

    /// Live playables.
    pub fn active_count(&self) -> usize {
        self.playables
            .iter()
            .filter(|(_, p)| !p.timeline().is_killed())
            .count()
    }

    pub fn playing_count(&self) -> usize {
        self.playables
            .iter()
            .filter(|(_, p)| p.timeline().is_playing())
            .count()
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<TweenId> {
        self.playables
            .iter()
            .filter(|(_, p)| !p.timeline().is_killed() && p.tag() == Some(tag))
            .map(|(id, _)| id)
            .collect()
    }

    // ----- internals -----

    fn live(&self, id: TweenId) -> Option<&Playable> {
        self.playables
            .get(id)
            .filter(|p| !p.timeline().is_killed())
    }

    fn live_mut(&mut self, id: TweenId) -> Option<&mut Playable> {
        self.playables
            .get_mut(id)
            .filter(|p| !p.timeline().is_killed())
    }

    fn tween_mut(&mut self, id: TweenId) -> Result<&mut Tween, TweenError> {
        let playable = self.live_mut(id).ok_or(TweenError::StaleHandle { id })?;
        playable
            .as_tween_mut()
            .ok_or_else(|| TweenError::InvalidSettings {
                reason: format!("{id} is a sequence and has no values to change"),
            })
    }

    /// A live playable plus a sink routing its hooks and events.
    fn parts(&mut self, id: TweenId) -> Option<(&mut Playable, Sink<'_>)> {
        let playable = self
            .playables
            .get_mut(id)
            .filter(|p| !p.timeline().is_killed())?;
        let sink = Sink {
            root: id,
            commands: &mut self.commands,
            report: &mut self.report,
            safe_mode: self.cfg.safe_mode,
            max_events: self.cfg.max_events_per_tick,
            depth: 0,
            silent: false,
        };
        Some((playable, sink))
    }

    /// Run a control operation on a live playable, then apply auto-kill and
    /// any commands its hooks queued.
    fn control(
        &mut self,
        id: TweenId,
        op: &str,
        f: impl FnOnce(&mut Playable, &mut Sink<'_>) -> bool,
    ) -> bool {
        let done = match self.parts(id) {
            Some((playable, mut sink)) => f(playable, &mut sink),
            None => {
                log::debug!("{op} ignored: {}", TweenError::StaleHandle { id });
                return false;
            }
        };
        self.settle(id);
        self.flush();
        done
    }

    /// Auto-kill a playable that has just completed.
    fn settle(&mut self, id: TweenId) {
        let finished = self.live(id).is_some_and(|p| {
            p.auto_kill() && p.timeline().state() == PlayState::Completed
        });
        if finished {
            self.mark_killed(id);
        }
    }

    /// Flag a playable as killed and fire its kill hooks. The slot is freed
    /// by the next compaction.
    fn mark_killed(&mut self, id: TweenId) -> bool {
        let Some((playable, mut sink)) = self.parts(id) else {
            return false;
        };
        playable.timeline_mut().kill();
        playable.killed(&mut sink);
        self.killed.push(id);
        true
    }

    fn compact(&mut self) {
        for id in self.killed.drain(..) {
            self.playables.remove(id);
        }
    }

    /// Apply queued commands and compact, unless a tick is already doing so.
    fn flush(&mut self) {
        if self.busy {
            return;
        }
        self.busy = true;
        self.apply_commands();
        self.busy = false;
        self.compact();
    }

    fn apply_commands(&mut self) {
        let mut rounds = 0;
        while !self.commands.is_empty() {
            if rounds == MAX_COMMAND_ROUNDS {
                log::warn!(
                    "dropping {} hook commands after {MAX_COMMAND_ROUNDS} rounds",
                    self.commands.len()
                );
                self.commands.clear();
                break;
            }
            rounds += 1;
            for command in std::mem::take(&mut self.commands) {
                self.apply(command);
            }
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Play { id } => {
                self.play(id);
            }
            Command::Pause { id } => {
                self.pause(id);
            }
            Command::TogglePause { id } => {
                self.toggle_pause(id);
            }
            Command::PlayForward { id } => {
                self.play_forward(id);
            }
            Command::PlayBackwards { id } => {
                self.play_backwards(id);
            }
            Command::Flip { id } => {
                self.flip(id);
            }
            Command::Restart { id } => {
                self.restart(id);
            }
            Command::Rewind { id } => {
                self.rewind(id);
            }
            Command::Complete { id } => {
                self.complete(id);
            }
            Command::Goto { id, to, and_play } => {
                self.goto(id, to, and_play);
            }
            Command::Kill { id, complete } => {
                self.kill(id, complete);
            }
            Command::SetTimeScale { id, time_scale } => {
                self.set_time_scale(id, time_scale);
            }
            Command::PlayAll => {
                self.play_all();
            }
            Command::PauseAll => {
                self.pause_all();
            }
            Command::KillAll => {
                self.kill_all();
            }
        }
    }
}
