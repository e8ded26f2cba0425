use crate::hash::key_hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub key: &'a [u8],
    pub hash: u32,
    pub sum: u64,
}

/// Chained hash table of running sums keyed by byte strings borrowed from
/// the input buffer.
///
/// The bucket count is a power of two so that a bucket index is
/// `hash & (bucket_count - 1)`. Tables built with the same bucket count place
/// a key in the same bucket, which lets the merge fold them bucket by bucket.
#[derive(Debug)]
pub struct Table<'a> {
    buckets: Vec<Vec<Entry<'a>>>,
    mask: u32,
    len: usize,
}

impl<'a> Table<'a> {
    /// Panics if `bucket_count` is not a power of two that fits in `u32`.
    pub fn new(bucket_count: usize) -> Self {
        assert!(
            bucket_count.is_power_of_two() && bucket_count <= 1 << 31,
            "bucket count must be a power of two, got {bucket_count}"
        );
        Self {
            buckets: vec![Vec::new(); bucket_count],
            mask: (bucket_count - 1) as u32,
            len: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_index(&self, hash: u32) -> usize {
        (hash & self.mask) as usize
    }

    /// Adds `count` to the sum of `key` and returns the updated sum.
    /// `hash` must be `key_hash(key)`.
    #[inline]
    pub fn add(&mut self, hash: u32, key: &'a [u8], count: u64) -> u64 {
        let index = self.bucket_index(hash);
        let bucket = &mut self.buckets[index];
        if let Some(entry) = bucket
            .iter_mut()
            .find(|entry| entry.hash == hash && entry.key == key)
        {
            entry.sum = entry.sum.wrapping_add(count);
            return entry.sum;
        }
        bucket.push(Entry {
            key,
            hash,
            sum: count,
        });
        self.len += 1;
        count
    }

    pub fn get(&self, key: &[u8]) -> Option<u64> {
        let hash = key_hash(key);
        self.buckets[self.bucket_index(hash)]
            .iter()
            .find(|entry| entry.hash == hash && entry.key == key)
            .map(|entry| entry.sum)
    }

    /// Entries in bucket order, then insertion order within a bucket.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.buckets.iter().flatten()
    }

    pub fn into_entries(self) -> impl Iterator<Item = Entry<'a>> {
        self.buckets.into_iter().flatten()
    }
}
