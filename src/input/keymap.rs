use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::keys::Key;

/// Maps a platform key code to an engine `Key`
pub trait KeyTranslator<C> {
    fn translate(&self, code: &C) -> Option<Key>;
}

/// Lookup table from platform key codes to engine keys
///
/// Owned by the platform that produces the codes; there is no global table.
#[derive(Debug, Clone)]
pub struct KeyMap<C> {
    map: HashMap<C, Key>,
}

impl<C: Eq + Hash> Default for KeyMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Eq + Hash> KeyMap<C> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind `code` to `key`, returning the previous binding
    pub fn insert(&mut self, code: C, key: Key) -> Option<Key> {
        self.map.insert(code, key)
    }

    pub fn remove(&mut self, code: &C) -> Option<Key> {
        self.map.remove(code)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<C: Eq + Hash> KeyTranslator<C> for KeyMap<C> {
    fn translate(&self, code: &C) -> Option<Key> {
        self.map.get(code).copied()
    }
}

impl<C: Eq + Hash> FromIterator<(C, Key)> for KeyMap<C> {
    fn from_iter<I: IntoIterator<Item = (C, Key)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl<C: Eq + Hash> Extend<(C, Key)> for KeyMap<C> {
    fn extend<I: IntoIterator<Item = (C, Key)>>(&mut self, iter: I) {
        self.map.extend(iter);
    }
}

/// Physical key state on top of a `KeyMap`
///
/// Several codes may share one `Key` (left and right Shift). The key goes
/// down with the first of its codes and up only when the last one is
/// released, so releasing one side while the other is held reports nothing.
#[derive(Debug, Clone)]
pub struct KeyTracker<C> {
    map: KeyMap<C>,
    held: HashSet<C>,
    down: [u8; Key::COUNT],
}

impl<C: Eq + Hash + Clone> KeyTracker<C> {
    pub fn new(map: KeyMap<C>) -> Self {
        Self {
            map,
            held: HashSet::new(),
            down: [0; Key::COUNT],
        }
    }

    /// Key to report pressed, if `code` is the first of its key to go down
    pub fn press(&mut self, code: C) -> Option<Key> {
        let key = self.map.translate(&code)?;
        if !self.held.insert(code) {
            return None;
        }
        let count = &mut self.down[key.index()];
        *count = count.saturating_add(1);
        (*count == 1).then_some(key)
    }

    /// Key to report released, if no other code of the same key is down
    pub fn release(&mut self, code: &C) -> Option<Key> {
        let key = self.map.translate(code)?;
        let count = &mut self.down[key.index()];
        if self.held.remove(code) {
            *count = count.saturating_sub(1);
        }
        (*count == 0).then_some(key)
    }

    /// Forget every held code, e.g. after keyboard focus is lost
    pub fn reset(&mut self) {
        self.held.clear();
        self.down = [0; Key::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_uses_instance_table() {
        let a: KeyMap<u32> = [(65, Key::A), (27, Key::Escape)].into_iter().collect();
        let mut b = KeyMap::new();
        b.insert(65u32, Key::Z);

        assert_eq!(a.translate(&65), Some(Key::A));
        assert_eq!(a.translate(&27), Some(Key::Escape));
        assert_eq!(a.translate(&1), None);
        assert_eq!(b.translate(&65), Some(Key::Z));
    }

    #[test]
    fn test_insert_replaces_binding() {
        let mut map = KeyMap::new();
        assert_eq!(map.insert("space", Key::Space), None);
        assert_eq!(map.insert("space", Key::Enter), Some(Key::Space));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(&"space"), Some(Key::Enter));
        assert!(map.is_empty());
    }

    #[test]
    fn test_shared_key_stays_down_until_last_code_released() {
        let map: KeyMap<&str> = [("lshift", Key::Shift), ("rshift", Key::Shift)]
            .into_iter()
            .collect();
        let mut keys = KeyTracker::new(map);

        assert_eq!(keys.press("lshift"), Some(Key::Shift));
        assert_eq!(keys.press("rshift"), None);
        assert_eq!(keys.release(&"lshift"), None);
        assert_eq!(keys.release(&"rshift"), Some(Key::Shift));
    }

    #[test]
    fn test_tracker_ignores_repeats_and_unbound_codes() {
        let map: KeyMap<u32> = [(32, Key::Space)].into_iter().collect();
        let mut keys = KeyTracker::new(map);

        assert_eq!(keys.press(32), Some(Key::Space));
        assert_eq!(keys.press(32), None);
        assert_eq!(keys.press(7), None);
        assert_eq!(keys.release(&7), None);
        assert_eq!(keys.release(&32), Some(Key::Space));
        // A release seen without its press still lets the key go
        assert_eq!(keys.release(&32), Some(Key::Space));
    }

    #[test]
    fn test_reset_forgets_held_codes() {
        let map: KeyMap<u8> = [(1, Key::Ctrl), (2, Key::Ctrl)].into_iter().collect();
        let mut keys = KeyTracker::new(map);
        keys.press(1);
        keys.reset();
        assert_eq!(keys.press(2), Some(Key::Ctrl));
        assert_eq!(keys.release(&2), Some(Key::Ctrl));
    }
}
