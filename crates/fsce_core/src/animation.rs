//! Global animation-frame counter.
//!
//! Every animated block picks its current frame from this shared counter, so
//! all animations step together once per rendered frame. The counter wraps
//! back to zero when it reaches `max`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    pub counter: u32,
    pub max: u32,
}

impl AnimationFrame {
    /// `max` is clamped to at least one so the counter always has a valid range.
    pub fn new(max: u32) -> Self {
        Self {
            counter: 0,
            max: max.max(1),
        }
    }

    /// Step to the next frame. Returns the new counter value.
    pub fn advance(&mut self) -> u32 {
        self.counter = (self.counter + 1) % self.max;
        self.counter
    }

    /// Index into a frame list of length `len`. Returns `None` for an empty list.
    pub fn index_for(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.counter as usize % len)
        }
    }
}

impl Default for AnimationFrame {
    fn default() -> Self {
        Self::new(8)
    }
}
