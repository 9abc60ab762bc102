//! Identifiers and the generational slot arena for top-level playables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a top-level tween or sequence owned by the engine.
///
/// A handle is a slot index plus the generation the slot had when the
/// playable was inserted. Recycling a slot bumps its generation, so stale
/// handles are detected instead of silently addressing a new playable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TweenId {
    index: u32,
    generation: u32,
}

impl TweenId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Dense arena with a free list. Dense indices improve cache locality;
/// handles are opaque externally.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> SlotArena<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Store a value, reusing the most recently freed slot first.
    pub fn insert(&mut self, value: T) -> TweenId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return TweenId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        TweenId::new(index, 0)
    }

    /// Take the value out and retire the handle.
    pub fn remove(&mut self, id: TweenId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation || slot.value.is_none() {
            return None;
        }
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        value
    }

    #[inline]
    pub fn get(&self, id: TweenId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_mut())
    }

    #[inline]
    pub fn contains(&self, id: TweenId) -> bool {
        self.get(id).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live handles in slot order. Slot order is stable, which gives a
    /// deterministic update order run to run.
    pub fn ids(&self) -> Vec<TweenId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.value.is_some())
            .map(|(i, s)| TweenId::new(i as u32, s.generation))
            .collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TweenId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.value
                .as_mut()
                .map(|v| (TweenId::new(i as u32, generation), v))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TweenId, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value
                .as_ref()
                .map(|v| (TweenId::new(i as u32, s.generation), v))
        })
    }
}
