//! Process-wide API key rotation for the ad-network adapter. A single
//! index guarded by a mutex; quota exhaustion rotates to the next key, and
//! a full cycle back to the starting key means every key is spent.

use parking_lot::Mutex;

pub struct KeyRing {
    keys: Vec<String>,
    index: Mutex<usize>,
}

impl KeyRing {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            index: Mutex::new(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The current key and its position.
    pub fn current(&self) -> Option<(usize, String)> {
        let index = *self.index.lock();
        self.keys.get(index).map(|k| (index, k.clone()))
    }

    /// Rotate past a key observed to be over quota. If another caller
    /// already rotated, the current position wins and no extra rotation
    /// happens. Returns the position now current.
    pub fn rotate_from(&self, observed: usize) -> usize {
        let mut index = self.index.lock();
        if *index == observed {
            *index = (*index + 1) % self.keys.len().max(1);
        }
        *index
    }
}
