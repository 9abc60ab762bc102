//! Error types for the tween core.

use serde::{Deserialize, Serialize};

use crate::ids::TweenId;
use crate::value::ValueKind;

/// Errors surfaced by tween construction, binding and control.
///
/// Configuration and adapter errors are returned eagerly at creation time.
/// State errors (stale handles) are reported but the public control API
/// degrades them to no-ops.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenError {
    /// Duration is negative or not finite.
    #[error("Invalid duration: {duration}")]
    InvalidDuration { duration: f32 },

    /// Loop count of zero or below -1.
    #[error("Invalid loop count: {loops} (use -1 for infinite or a positive count)")]
    InvalidLoops { loops: i32 },

    /// Speed-based tweens need a strictly positive speed.
    #[error("Invalid speed: {speed}")]
    InvalidSpeed { speed: f32 },

    /// Sequences cannot own infinitely looping children.
    #[error("Infinitely looping playables cannot be nested inside a sequence")]
    InfiniteLoopInSequence,

    /// Path construction failed (too few waypoints, non-finite coordinates).
    #[error("Invalid path: {reason}")]
    InvalidPath { reason: String },

    /// Settings document could not be parsed or validated.
    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    /// The requested adapter cannot drive the bound value kind.
    #[error("No adapter '{adapter}' for value kind {value:?}")]
    UnsupportedTarget { adapter: String, value: ValueKind },

    /// The handle refers to a killed or recycled playable.
    #[error("Stale tween handle: {id}")]
    StaleHandle { id: TweenId },

    /// Getter or setter reported a failure.
    #[error("Binding error: {reason}")]
    Binding { reason: String },

    /// A lifecycle hook panicked and was isolated.
    #[error("Hook '{hook}' panicked")]
    HookPanicked { hook: String },
}

impl TweenError {
    /// Create a binding error from any displayable reason.
    pub fn binding(reason: impl Into<String>) -> Self {
        Self::Binding {
            reason: reason.into(),
        }
    }

    /// Errors a host can keep running after (the engine already isolated them).
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StaleHandle { .. } | Self::Binding { .. } | Self::HookPanicked { .. }
        )
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. }
            | Self::InvalidLoops { .. }
            | Self::InvalidSpeed { .. }
            | Self::InfiniteLoopInSequence
            | Self::InvalidPath { .. }
            | Self::InvalidSettings { .. } => "config",
            Self::UnsupportedTarget { .. } => "adapter",
            Self::StaleHandle { .. } => "state",
            Self::Binding { .. } => "binding",
            Self::HookPanicked { .. } => "hook",
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidSettings {
            reason: err.to_string(),
        }
    }
}
