//! Per-tick report returned by [`crate::Engine::update`].
//!
//! Events are reported for top-level playables only; tweens nested in a
//! sequence surface through their hooks.

use serde::{Deserialize, Serialize};

use crate::ids::TweenId;

/// Discrete lifecycle signals emitted while stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenEvent {
    Started { id: TweenId },
    StepCompleted { id: TweenId, completed_loops: i32 },
    Completed { id: TweenId },
    Rewound { id: TweenId },
    Killed { id: TweenId },
    WaypointChanged { id: TweenId, index: usize },
    /// A binding or hook failed; the playable was isolated.
    Error { id: TweenId, message: String },
}

impl TweenEvent {
    pub fn id(&self) -> TweenId {
        match self {
            TweenEvent::Started { id }
            | TweenEvent::StepCompleted { id, .. }
            | TweenEvent::Completed { id }
            | TweenEvent::Rewound { id }
            | TweenEvent::Killed { id }
            | TweenEvent::WaypointChanged { id, .. }
            | TweenEvent::Error { id, .. } => *id,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TickReport {
    #[serde(default)]
    pub events: Vec<TweenEvent>,
    /// Events dropped because the per-tick cap was reached.
    #[serde(default)]
    pub dropped_events: usize,
}

impl TickReport {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped_events = 0;
    }

    #[inline]
    pub fn push_event(&mut self, event: TweenEvent, cap: usize) {
        if self.events.len() < cap {
            self.events.push(event);
        } else {
            if self.dropped_events == 0 {
                log::debug!("event cap of {cap} reached, dropping further events this tick");
            }
            self.dropped_events += 1;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events concerning one playable.
    pub fn events_for(&self, id: TweenId) -> impl Iterator<Item = &TweenEvent> {
        self.events.iter().filter(move |e| e.id() == id)
    }
}
