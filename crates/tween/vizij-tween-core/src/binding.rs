//! Getter/setter bindings to host-owned values.
//!
//! The engine never owns the bound value. A binding is read once at creation
//! to capture the start value (and again every tick for masked writes), then
//! written once per evaluated tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::TweenError;
use crate::value::Value;

pub trait Binding {
    fn get(&mut self) -> Result<Value, TweenError>;
    fn set(&mut self, value: Value) -> Result<(), TweenError>;
}

/// Binding over a pair of fallible closures.
pub struct FnBinding<G, S> {
    getter: G,
    setter: S,
}

impl<G, S> FnBinding<G, S>
where
    G: FnMut() -> Result<Value, TweenError>,
    S: FnMut(Value) -> Result<(), TweenError>,
{
    pub fn new(getter: G, setter: S) -> Self {
        Self { getter, setter }
    }
}

impl<G, S> Binding for FnBinding<G, S>
where
    G: FnMut() -> Result<Value, TweenError>,
    S: FnMut(Value) -> Result<(), TweenError>,
{
    #[inline]
    fn get(&mut self) -> Result<Value, TweenError> {
        (self.getter)()
    }

    #[inline]
    fn set(&mut self, value: Value) -> Result<(), TweenError> {
        (self.setter)(value)
    }
}

/// Binding over infallible closures.
pub fn from_fns<G, S>(mut getter: G, mut setter: S) -> impl Binding
where
    G: FnMut() -> Value,
    S: FnMut(Value),
{
    FnBinding::new(
        move || Ok(getter()),
        move |value| {
            setter(value);
            Ok(())
        },
    )
}

/// A host cell shared with the engine, handy for tests and simple hosts.
/// Writes must keep the value kind that was bound.
pub type SharedValue = Rc<RefCell<Value>>;

pub fn shared(value: impl Into<Value>) -> SharedValue {
    Rc::new(RefCell::new(value.into()))
}

impl Binding for SharedValue {
    fn get(&mut self) -> Result<Value, TweenError> {
        self.try_borrow()
            .map(|v| v.clone())
            .map_err(|e| TweenError::binding(e.to_string()))
    }

    fn set(&mut self, value: Value) -> Result<(), TweenError> {
        let mut cell = self
            .try_borrow_mut()
            .map_err(|e| TweenError::binding(e.to_string()))?;
        if cell.kind() != value.kind() {
            return Err(TweenError::binding(format!(
                "cannot write {:?} into a {:?} cell",
                value.kind(),
                cell.kind()
            )));
        }
        *cell = value;
        Ok(())
    }
}
