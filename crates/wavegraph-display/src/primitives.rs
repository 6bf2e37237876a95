//! Drawable primitives and their grow-only pools
//!
//! Segments and ticks are the only objects crossing the engine/renderer
//! boundary. Allocating fresh primitives every frame is the dominant cost at
//! interactive rates, so each projector keeps a pool of slots that only ever
//! grows; per frame, every slot is hidden up front and the projector unhides
//! the prefix it actually filled. Renderers must skip hidden slots.

/// Vertical line segment, one per visible pixel column
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Segment {
    /// Pixel column (logical units)
    pub x: f32,
    /// Top of the segment
    pub y_top: f32,
    /// Bottom of the segment
    pub y_bottom: f32,
    /// Hidden slots carry stale geometry and must not be drawn
    pub hidden: bool,
}

/// Time-ruler tick mark
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tick {
    /// Pixel column (logical units)
    pub x: f32,
    /// Tick height in logical units
    pub height: f32,
    /// Major ticks mark whole seconds, minor ticks tenth-seconds
    pub is_major: bool,
    /// Hidden slots carry stale geometry and must not be drawn
    pub hidden: bool,
}

/// A primitive that can be parked in a pool between frames
pub trait Primitive: Default {
    fn set_hidden(&mut self, hidden: bool);
    fn hidden(&self) -> bool;
}

impl Primitive for Segment {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    fn hidden(&self) -> bool {
        self.hidden
    }
}

impl Primitive for Tick {
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    fn hidden(&self) -> bool {
        self.hidden
    }
}

/// Grow-only arena of primitive slots
///
/// `ensure()` never shrinks: slots created for the widest layout seen so far
/// stay allocated, and frames that need fewer simply leave the tail hidden.
#[derive(Debug, Default)]
pub struct Pool<T: Primitive> {
    slots: Vec<T>,
}

impl<T: Primitive> Pool<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Grow the pool to at least `count` slots; new slots start hidden
    pub fn ensure(&mut self, count: usize) {
        while self.slots.len() < count {
            let mut slot = T::default();
            slot.set_hidden(true);
            self.slots.push(slot);
        }
    }

    /// Current slot count
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hide every slot; projectors call this at the top of each frame
    pub fn hide_all(&mut self) {
        for slot in &mut self.slots {
            slot.set_hidden(true);
        }
    }

    /// Mutable access for the projector filling slots
    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Shared view of the first `count` slots
    pub fn prefix(&self, count: usize) -> &[T] {
        &self.slots[..count.min(self.slots.len())]
    }
}
