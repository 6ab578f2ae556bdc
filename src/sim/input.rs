//! Held-key tracking
//!
//! Key events mutate an [`InputSampler`]; each tick reads a [`ControlSet`]
//! snapshot by value, so a tick never observes a half-applied event.

use serde::{Deserialize, Serialize};

/// Logical driving controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKey {
    Forward,
    Back,
    Left,
    Right,
    Brake,
}

impl ControlKey {
    pub const ALL: [ControlKey; 5] = [
        ControlKey::Forward,
        ControlKey::Back,
        ControlKey::Left,
        ControlKey::Right,
        ControlKey::Brake,
    ];

    /// Map a browser `KeyboardEvent.key` identifier
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(ControlKey::Forward),
            "ArrowDown" => Some(ControlKey::Back),
            "ArrowLeft" => Some(ControlKey::Left),
            "ArrowRight" => Some(ControlKey::Right),
            " " | "Spacebar" => Some(ControlKey::Brake),
            _ => None,
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            ControlKey::Forward => 1 << 0,
            ControlKey::Back => 1 << 1,
            ControlKey::Left => 1 << 2,
            ControlKey::Right => 1 << 3,
            ControlKey::Brake => 1 << 4,
        }
    }
}

/// Set of currently held controls (each key present at most once)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlSet {
    bits: u8,
}

impl ControlSet {
    pub const EMPTY: ControlSet = ControlSet { bits: 0 };

    pub fn with(mut self, key: ControlKey) -> Self {
        self.insert(key);
        self
    }

    pub fn insert(&mut self, key: ControlKey) {
        self.bits |= key.bit();
    }

    pub fn remove(&mut self, key: ControlKey) {
        self.bits &= !key.bit();
    }

    #[inline]
    pub fn contains(&self, key: ControlKey) -> bool {
        self.bits & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlKey> + '_ {
        ControlKey::ALL.into_iter().filter(|k| self.contains(*k))
    }

    #[inline]
    pub fn forward(&self) -> bool {
        self.contains(ControlKey::Forward)
    }

    #[inline]
    pub fn back(&self) -> bool {
        self.contains(ControlKey::Back)
    }

    #[inline]
    pub fn left(&self) -> bool {
        self.contains(ControlKey::Left)
    }

    #[inline]
    pub fn right(&self) -> bool {
        self.contains(ControlKey::Right)
    }

    #[inline]
    pub fn brake(&self) -> bool {
        self.contains(ControlKey::Brake)
    }
}

impl FromIterator<ControlKey> for ControlSet {
    fn from_iter<I: IntoIterator<Item = ControlKey>>(iter: I) -> Self {
        iter.into_iter().fold(ControlSet::EMPTY, ControlSet::with)
    }
}

/// Latest observed key state; last write wins, nothing is queued
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: ControlSet,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: ControlKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: ControlKey) {
        self.held.remove(key);
    }

    /// Handle a raw key-down; returns whether the key is a driving control
    pub fn key_down(&mut self, key: &str) -> bool {
        match ControlKey::from_key(key) {
            Some(control) => {
                self.press(control);
                true
            }
            None => false,
        }
    }

    /// Handle a raw key-up; returns whether the key is a driving control
    pub fn key_up(&mut self, key: &str) -> bool {
        match ControlKey::from_key(key) {
            Some(control) => {
                self.release(control);
                true
            }
            None => false,
        }
    }

    /// Drop every held key (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.held = ControlSet::EMPTY;
    }

    /// Value snapshot for one tick
    pub fn snapshot(&self) -> ControlSet {
        self.held
    }
}
