//! Block behaviors keyed by kind.
//!
//! A block carries at most one behavior of each kind. When behaviors come in as
//! an ordered list (scene files, callers porting list-shaped data) the first
//! entry of each kind wins and later duplicates are ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorKind {
    Visibility,
    CollisionBox,
    ForceField,
    Controller,
    GameController,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    #[serde(rename = "x+")]
    XPos,
    #[serde(rename = "x-")]
    XNeg,
    #[serde(rename = "y+")]
    YPos,
    #[serde(rename = "y-")]
    YNeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Behavior {
    pub enabled: bool,
    pub direction: Option<Direction>,
    pub force: f32,
}

impl Behavior {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction, force: f32) -> Self {
        self.direction = Some(direction);
        self.force = force;
        self
    }
}

/// List-shaped behavior as it appears in scene files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BehaviorEntry {
    #[serde(rename = "type")]
    pub kind: BehaviorKind,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub force: f32,
}

impl BehaviorEntry {
    pub fn new(kind: BehaviorKind, enabled: bool) -> Self {
        Self {
            kind,
            enabled,
            direction: None,
            force: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Behaviors {
    entries: BTreeMap<BehaviorKind, Behavior>,
}

impl Behaviors {
    /// No behaviors at all. A block built with this is hidden.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = BehaviorEntry>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            map.entry(entry.kind).or_insert(Behavior {
                enabled: entry.enabled,
                direction: entry.direction,
                force: entry.force,
            });
        }
        Self { entries: map }
    }

    pub fn with(mut self, kind: BehaviorKind, behavior: Behavior) -> Self {
        self.set(kind, behavior);
        self
    }

    pub fn set(&mut self, kind: BehaviorKind, behavior: Behavior) {
        self.entries.insert(kind, behavior);
    }

    pub fn get(&self, kind: BehaviorKind) -> Option<&Behavior> {
        self.entries.get(&kind)
    }

    pub fn remove(&mut self, kind: BehaviorKind) -> Option<Behavior> {
        self.entries.remove(&kind)
    }

    pub fn is_enabled(&self, kind: BehaviorKind) -> bool {
        self.get(kind).is_some_and(|b| b.enabled)
    }

    /// Visible only with an enabled visibility entry; a missing entry means hidden.
    pub fn is_visible(&self) -> bool {
        self.is_enabled(BehaviorKind::Visibility)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BehaviorKind, &Behavior)> {
        self.entries.iter().map(|(kind, b)| (*kind, b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Behaviors {
    fn default() -> Self {
        Self::empty().with(BehaviorKind::Visibility, Behavior::enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_visible() {
        let behaviors = Behaviors::default();
        assert!(behaviors.is_visible());
        assert_eq!(behaviors.len(), 1);
    }

    #[test]
    fn missing_visibility_means_hidden() {
        let behaviors = Behaviors::from_entries([BehaviorEntry::new(BehaviorKind::CollisionBox, true)]);
        assert!(!behaviors.is_visible());
        assert!(behaviors.is_enabled(BehaviorKind::CollisionBox));
    }

    #[test]
    fn first_entry_of_a_kind_wins() {
        let behaviors = Behaviors::from_entries([
            BehaviorEntry::new(BehaviorKind::Visibility, false),
            BehaviorEntry::new(BehaviorKind::Visibility, true),
        ]);
        assert!(!behaviors.is_visible());
        assert_eq!(behaviors.len(), 1);
    }

    #[test]
    fn deserializes_list_entries() {
        let json = r#"[
            { "type": "visibility", "enabled": true },
            { "type": "force-field", "enabled": true, "direction": "y-", "force": 2.5 }
        ]"#;
        let entries: Vec<BehaviorEntry> = serde_json::from_str(json).expect("entries should parse");
        let behaviors = Behaviors::from_entries(entries);

        assert!(behaviors.is_visible());
        let field = behaviors.get(BehaviorKind::ForceField).expect("force field entry");
        assert_eq!(field.direction, Some(Direction::YNeg));
        assert_eq!(field.force, 2.5);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{ "type": "gravity", "enabled": true }"#;
        assert!(serde_json::from_str::<BehaviorEntry>(json).is_err());
    }

    #[test]
    fn set_replaces_existing_kind() {
        let mut behaviors = Behaviors::default();
        behaviors.set(BehaviorKind::Visibility, Behavior::disabled());
        assert!(!behaviors.is_visible());
        assert!(behaviors.remove(BehaviorKind::Visibility).is_some());
        assert!(behaviors.is_empty());
    }
}
