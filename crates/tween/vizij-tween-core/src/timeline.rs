//! Per-playable time, loop and direction state.
//!
//! The canonical state is `(completed_loops, position)`. Every transition goes
//! through [`Timeline::set_full`], which maps a position on the unrolled
//! timeline (all loops laid end to end) back to that pair, so seeking to a
//! time is exactly equivalent to advancing to it.

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LoopType {
    /// Every loop runs start -> end.
    #[default]
    Restart,
    /// Odd loops run end -> start.
    Yoyo,
    /// Every loop continues from where the previous one ended.
    Incremental,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// Created but never played.
    #[default]
    Idle,
    /// Playing, still consuming the start delay.
    Delayed,
    Running,
    Paused,
    Completed,
    Killed,
}

/// Loop index plus the position inside that loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cursor {
    pub cycle: i32,
    pub position: f32,
}

/// Result of moving a timeline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    pub from: Cursor,
    pub to: Cursor,
    /// Loop boundaries crossed, in either direction.
    pub loops_crossed: u32,
    /// The timeline reached its end during this move.
    pub completed: bool,
}

impl Transition {
    /// Whether the move went towards the end of the timeline.
    #[inline]
    pub fn is_forward(&self) -> bool {
        self.to.cycle > self.from.cycle
            || (self.to.cycle == self.from.cycle && self.to.position >= self.from.position)
    }
}

/// Checkpoint of a playable's timeline; construction parameters are not
/// included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TweenSnapshot {
    pub completed_loops: i32,
    pub position: f32,
    pub direction: Direction,
    pub state: PlayState,
    pub delay_elapsed: f32,
    pub started: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    duration: f32,
    loops: i32,
    loop_type: LoopType,
    delay: f32,
    delay_elapsed: f32,
    time_scale: f32,
    direction: Direction,
    state: PlayState,
    completed_loops: i32,
    position: f32,
    started: bool,
}

pub(crate) fn validate_loops(loops: i32) -> Result<(), TweenError> {
    if loops == 0 || loops < -1 {
        return Err(TweenError::InvalidLoops { loops });
    }
    Ok(())
}

impl Timeline {
    /// Zero-duration timelines always run a single loop.
    pub fn new(
        duration: f32,
        loops: i32,
        loop_type: LoopType,
        delay: f32,
    ) -> Result<Self, TweenError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(TweenError::InvalidDuration { duration });
        }
        validate_loops(loops)?;
        if !delay.is_finite() || delay < 0.0 {
            return Err(TweenError::InvalidSettings {
                reason: format!("delay must be finite and >= 0, got {delay}"),
            });
        }
        Ok(Self {
            duration,
            loops: if duration == 0.0 { 1 } else { loops },
            loop_type,
            delay,
            delay_elapsed: 0.0,
            time_scale: 1.0,
            direction: Direction::Forward,
            state: PlayState::Idle,
            completed_loops: 0,
            position: 0.0,
            started: false,
        })
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn loops(&self) -> i32 {
        self.loops
    }

    #[inline]
    pub fn loop_type(&self) -> LoopType {
        self.loop_type
    }

    #[inline]
    pub fn delay(&self) -> f32 {
        self.delay
    }

    #[inline]
    pub fn state(&self) -> PlayState {
        self.state
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn completed_loops(&self) -> i32 {
        self.completed_loops
    }

    /// Position inside the current loop.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.loops < 0
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.is_infinite() && self.completed_loops >= self.loops
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlayState::Running | PlayState::Delayed)
    }

    #[inline]
    pub fn is_killed(&self) -> bool {
        self.state == PlayState::Killed
    }

    /// Length of the unrolled timeline; infinite for infinite loops.
    #[inline]
    pub fn total(&self) -> f32 {
        if self.is_infinite() {
            f32::INFINITY
        } else {
            self.duration * self.loops as f32
        }
    }

    /// Current position on the unrolled timeline. Kept in `f64` so long
    /// infinite loops still advance by whole frame deltas.
    pub fn unrolled(&self) -> f64 {
        if self.is_complete() {
            f64::from(self.total())
        } else {
            f64::from(self.completed_loops) * f64::from(self.duration) + f64::from(self.position)
        }
    }

    /// [`Timeline::unrolled`] narrowed for queries.
    #[inline]
    pub fn full(&self) -> f32 {
        self.unrolled() as f32
    }

    /// Position inside the loop counted by [`Timeline::completed_loops`];
    /// the full duration once complete.
    #[inline]
    pub fn loop_position(&self) -> f32 {
        if self.is_complete() {
            self.duration
        } else {
            self.position
        }
    }

    /// Cursor to evaluate. A timeline sitting exactly on a loop boundary
    /// shows the end of the loop it just finished.
    pub fn cursor(&self) -> Cursor {
        if self.is_complete() {
            Cursor {
                cycle: self.loops - 1,
                position: self.duration,
            }
        } else if self.position <= 0.0 && self.completed_loops > 0 {
            Cursor {
                cycle: self.completed_loops - 1,
                position: self.duration,
            }
        } else {
            Cursor {
                cycle: self.completed_loops,
                position: self.position,
            }
        }
    }

    /// Time fed to the ease for a cursor: odd yoyo loops are mirrored.
    #[inline]
    pub fn local_time(&self, cursor: Cursor) -> f32 {
        if self.loop_type == LoopType::Yoyo && cursor.cycle % 2 == 1 {
            self.duration - cursor.position
        } else {
            cursor.position
        }
    }

    /// `(elapsed, duration)` to evaluate at the current cursor. Zero-duration
    /// timelines evaluate over a unit span so nothing divides by zero.
    pub fn eval_time(&self) -> (f32, f32) {
        if self.duration <= 0.0 {
            return (if self.is_complete() { 1.0 } else { 0.0 }, 1.0);
        }
        (self.local_time(self.cursor()), self.duration)
    }

    /// Incremental iterations contributed by this timeline at `cursor`.
    #[inline]
    pub fn iterations(&self, cursor: Cursor) -> f32 {
        if self.loop_type == LoopType::Incremental {
            cursor.cycle as f32
        } else {
            0.0
        }
    }

    /// Multiplier applied to iterations inherited from an enclosing sequence.
    #[inline]
    pub fn iteration_factor(&self) -> f32 {
        if self.loop_type == LoopType::Incremental {
            self.loops.max(1) as f32
        } else {
            1.0
        }
    }

    fn split(&self, full: f64) -> (i32, f32) {
        let full = full.max(0.0);
        if self.duration <= 0.0 {
            return if full > 0.0 { (self.loops, 0.0) } else { (0, 0.0) };
        }
        if !self.is_infinite() && full >= f64::from(self.total()) {
            return (self.loops, self.duration);
        }
        let duration = f64::from(self.duration);
        let cycle = (full / duration).floor().min(f64::from(i32::MAX - 1));
        if !self.is_infinite() && cycle >= f64::from(self.loops) {
            return (self.loops, self.duration);
        }
        let position = (full - cycle * duration).clamp(0.0, duration);
        (cycle as i32, position as f32)
    }

    /// Move to `full` on the unrolled timeline. Reaching the end sets the
    /// state to [`PlayState::Completed`].
    pub fn set_full(&mut self, full: f64) -> Transition {
        let from = self.cursor();
        let was_complete = self.is_complete();
        let old_loops = self.completed_loops;
        let (completed_loops, position) = self.split(full);
        self.completed_loops = completed_loops;
        self.position = position;
        let completed = self.is_complete() && !was_complete;
        if self.is_complete() && self.state != PlayState::Killed {
            self.state = PlayState::Completed;
        }
        Transition {
            from,
            to: self.cursor(),
            loops_crossed: (completed_loops - old_loops).unsigned_abs(),
            completed,
        }
    }

    /// Consume a frame delta. Returns the unrolled target position when the
    /// timeline should be evaluated this tick; `None` while idle, paused,
    /// finished or still inside the start delay.
    pub fn consume(&mut self, dt: f32) -> Option<f64> {
        let mut dt = dt * self.time_scale;
        match self.state {
            PlayState::Delayed => {
                self.delay_elapsed += dt;
                if self.delay_elapsed < self.delay {
                    return None;
                }
                dt = self.delay_elapsed - self.delay;
                self.delay_elapsed = self.delay;
                self.state = PlayState::Running;
            }
            PlayState::Running => {}
            _ => return None,
        }
        let (full, dt) = (self.unrolled(), f64::from(dt));
        Some(match self.direction {
            Direction::Forward => full + dt,
            Direction::Backward => (full - dt).max(0.0),
        })
    }

    /// Mark the first evaluated tick. Returns true exactly once.
    pub(crate) fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    /// Start or resume. Completed timelines only resume backwards.
    pub fn play(&mut self) -> bool {
        match self.state {
            PlayState::Idle | PlayState::Paused => {
                self.state = if self.delay_elapsed < self.delay {
                    PlayState::Delayed
                } else {
                    PlayState::Running
                };
                true
            }
            PlayState::Completed if self.direction == Direction::Backward => {
                self.state = PlayState::Running;
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        match self.state {
            PlayState::Idle | PlayState::Delayed | PlayState::Running => {
                self.state = PlayState::Paused;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    #[inline]
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    /// Leave the terminal state after a seek back into the timeline.
    pub(crate) fn set_state(&mut self, state: PlayState) {
        if self.state != PlayState::Killed {
            self.state = state;
        }
    }

    pub(crate) fn kill(&mut self) {
        self.state = PlayState::Killed;
    }

    /// Re-arm the start delay (used by restart).
    pub(crate) fn reset_delay(&mut self) {
        self.delay_elapsed = 0.0;
    }

    /// Skip whatever is left of the start delay.
    pub(crate) fn skip_delay(&mut self) {
        self.delay_elapsed = self.delay;
    }

    /// Sequences grow while children are added.
    pub(crate) fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
        if duration <= 0.0 {
            self.loops = 1;
        }
    }

    /// Restore the loop count requested at construction once a sequence
    /// gains a non-zero duration.
    pub(crate) fn set_loops(&mut self, loops: i32) {
        self.loops = if self.duration <= 0.0 { 1 } else { loops };
    }

    pub fn snapshot(&self) -> TweenSnapshot {
        TweenSnapshot {
            completed_loops: self.completed_loops,
            position: self.position,
            direction: self.direction,
            state: self.state,
            delay_elapsed: self.delay_elapsed,
            started: self.started,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: &TweenSnapshot) {
        let max_loops = if self.is_infinite() { i32::MAX } else { self.loops };
        self.completed_loops = snapshot.completed_loops.clamp(0, max_loops);
        self.position = snapshot.position.clamp(0.0, self.duration);
        self.direction = snapshot.direction;
        self.state = snapshot.state;
        self.delay_elapsed = snapshot.delay_elapsed.clamp(0.0, self.delay);
        self.started = snapshot.started;
    }
}
