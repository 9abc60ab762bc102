//! Vizij Tween Core (engine-agnostic)
//!
//! Tweening engine: easing curves, spline paths, typed value adapters, a
//! per-playable time/loop state machine, sequences, and an [`Engine`] that
//! advances everything once per host frame through getter/setter bindings.

pub mod adapters;
pub mod binding;
pub mod config;
pub mod ease;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod ids;
pub mod math;
pub mod outputs;
pub mod path;
pub mod playable;
pub mod registry;
pub mod sequence;
pub mod time;
pub mod timeline;
pub mod tween;
pub mod value;

// Re-exports for hosts
pub use adapters::{
    Adapter, Axis, EndValue, Operand, PathOptions, RotateMode, SpiralMode, SpiralOptions,
};
pub use binding::{from_fns, shared, Binding, FnBinding, SharedValue};
pub use config::{
    parse_tween_settings_json, parse_tween_settings_json_with, Config, SequenceSettings,
    TweenSettings,
};
pub use ease::{Ease, EaseCurve, EaseFn, EaseSpec};
pub use engine::Engine;
pub use error::TweenError;
pub use hooks::{Command, Hook, HookContext, Hooks};
pub use ids::TweenId;
pub use outputs::{TickReport, TweenEvent};
pub use path::{Path, PathType};
pub use playable::Playable;
pub use registry::AdapterRegistry;
pub use sequence::Sequence;
pub use time::{FixedTimeSource, TimeSource};
pub use timeline::{Direction, LoopType, PlayState, Timeline, TweenSnapshot};
pub use tween::Tween;
pub use value::{Rect, Value, ValueKind};

pub type Result<T> = core::result::Result<T, TweenError>;
