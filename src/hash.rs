use std::hash::Hasher;

/// Multiplicative string hash, `h = h * 33 + byte`, over 32 bits.
#[derive(Default, Clone, Copy)]
pub struct Times33 {
    hash: u32,
}

impl Times33 {
    #[inline]
    pub fn roll(&mut self, byte: u8) {
        self.hash = self.hash.wrapping_mul(33).wrapping_add(byte as u32);
    }

    #[inline]
    pub fn get(&self) -> u32 {
        self.hash
    }
}

impl Hasher for Times33 {
    fn finish(&self) -> u64 {
        self.hash as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.roll(byte);
        }
    }
}

pub fn key_hash(key: &[u8]) -> u32 {
    let mut hasher = Times33::default();
    hasher.write(key);
    hasher.get()
}

#[cfg(test)]
mod tests {
    use super::key_hash;

    #[test]
    fn known_values() {
        assert_eq!(key_hash(b""), 0);
        assert_eq!(key_hash(b"a"), 97);
        assert_eq!(key_hash(b"ab"), 97 * 33 + 98);
        assert_eq!(key_hash(b"foo"), (102 * 33 + 111) * 33 + 111);
    }

    #[test]
    fn wraps_on_long_keys() {
        let key = vec![0xffu8; 64];
        let expected = key
            .iter()
            .fold(0u32, |h, &b| h.wrapping_mul(33).wrapping_add(b as u32));
        assert_eq!(key_hash(&key), expected);
    }
}
