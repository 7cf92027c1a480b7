//! Per-state key bindings.
//!
//! Each state owns a `KeyMap` from keys to its own action enum and drains the
//! pending keys once per tick.

use std::collections::HashMap;

use arrayvec::ArrayVec;

use crate::types::Key;

/// Upper bound on keys consumed in one tick; the rest wait for the next one.
pub const MAX_KEYS_PER_TICK: usize = 8;

/// Key → action table.
#[derive(Debug, Clone)]
pub struct KeyMap<A> {
    bindings: HashMap<Key, A>,
}

impl<A> Default for KeyMap<A> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<A: Copy> KeyMap<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`KeyMap::bind`].
    pub fn with(mut self, key: Key, action: A) -> Self {
        self.bind(key, action);
        self
    }

    /// Bind `key`, replacing any previous binding.
    pub fn bind(&mut self, key: Key, action: A) {
        self.bindings.insert(key, action);
    }

    pub fn get(&self, key: Key) -> Option<A> {
        self.bindings.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drain pending keys from `poll` and translate the bound ones.
    ///
    /// Stops at the first `Ok(None)` or after [`MAX_KEYS_PER_TICK`] keys.
    /// Unbound keys are consumed and dropped.
    pub fn collect<E, F>(&self, mut poll: F) -> Result<ArrayVec<A, MAX_KEYS_PER_TICK>, E>
    where
        F: FnMut() -> Result<Option<Key>, E>,
    {
        let mut actions = ArrayVec::new();
        for _ in 0..MAX_KEYS_PER_TICK {
            match poll()? {
                Some(key) => {
                    if let Some(action) = self.get(key) {
                        actions.push(action);
                    }
                }
                None => break,
            }
        }
        Ok(actions)
    }
}
