//! Queue of discrete input actions.
//!
//! An external listener (window shell, test, script) appends actions as they
//! happen. The queue keeps them in arrival order until somebody drains it;
//! interpreting actions is left to game code.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    KeyDown,
    KeyUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    /// Physical key code as reported by the host, e.g. `"ArrowLeft"` or `"KeyW"`.
    pub code: String,
}

impl Action {
    pub fn key_up(code: &str) -> Self {
        Self {
            kind: ActionKind::KeyUp,
            code: code.to_string(),
        }
    }

    pub fn key_down(code: &str) -> Self {
        Self {
            kind: ActionKind::KeyDown,
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ActionQueue {
    pending: VecDeque<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    /// Take every queued action in arrival order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Action> {
        self.pending.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
