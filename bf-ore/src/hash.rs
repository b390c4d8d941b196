//! Hashing utilities.

use bf_types::ContentHash;

/// Incremental xxh3 hasher producing a [`ContentHash`].
pub struct ContentHasher {
    inner: xxhash_rust::xxh3::Xxh3,
}

impl ContentHasher {
    /// Create a new [`ContentHasher`].
    pub fn new() -> Self {
        ContentHasher {
            inner: xxhash_rust::xxh3::Xxh3::new(),
        }
    }

    pub fn update(&mut self, input: &[u8]) -> &mut Self {
        self.inner.update(input);
        self
    }

    pub fn update_u64(&mut self, val: u64) -> &mut Self {
        self.update(&val.to_le_bytes())
    }

    pub fn finish(&self) -> ContentHash {
        ContentHash::new(self.inner.digest128())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        ContentHasher::new()
    }
}

/// Hash a complete piece of text.
pub fn hash_str(text: &str) -> ContentHash {
    ContentHash::new(xxhash_rust::xxh3::xxh3_128(text.as_bytes()))
}
