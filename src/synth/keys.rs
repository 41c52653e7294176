use std::collections::HashMap;
use std::hash::Hash;

use crate::synth::allocator::VoiceHandle;

/// Held-key guard.
///
/// Keyboards auto-repeat while a key is down; without a guard every repeat
/// would stack another voice. A key triggers once per press and remembers
/// the voice it started so the key-up can release it.
#[derive(Debug)]
pub struct HeldKeys<K> {
    held: HashMap<K, Option<VoiceHandle>>,
}

impl<K: Eq + Hash> Default for HeldKeys<K> {
    fn default() -> Self {
        Self {
            held: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> HeldKeys<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as down. False when it already was (auto-repeat).
    pub fn press(&mut self, key: K) -> bool {
        if self.held.contains_key(&key) {
            return false;
        }
        self.held.insert(key, None);
        true
    }

    /// Remember the voice a pressed key started.
    pub fn attach(&mut self, key: &K, handle: VoiceHandle) {
        if let Some(slot) = self.held.get_mut(key) {
            *slot = Some(handle);
        }
    }

    /// Mark `key` as up and hand back the voice it was holding, if any.
    pub fn lift(&mut self, key: &K) -> Option<VoiceHandle> {
        self.held.remove(key).flatten()
    }

    pub fn is_held(&self, key: &K) -> bool {
        self.held.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_press_is_rejected() {
        let mut keys = HeldKeys::new();
        assert!(keys.press('z'));
        assert!(!keys.press('z'));
        assert!(keys.is_held(&'z'));
    }

    #[test]
    fn test_lift_without_voice() {
        let mut keys = HeldKeys::new();
        keys.press('x');
        assert_eq!(keys.lift(&'x'), None);
        assert!(keys.press('x'));
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut keys = HeldKeys::new();
        keys.press('a');
        keys.press('b');
        keys.clear();
        assert!(keys.is_empty());
        assert_eq!(keys.lift(&'a'), None);
    }
}
