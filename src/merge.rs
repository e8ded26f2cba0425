use std::{
    fmt,
    io::{self, Write},
};

use crate::{table::Table, worker::Local};

/// Printed in place of a key when the input held no records.
pub const NO_KEY: &str = "<none>";

/// Outcome of a run: the key with the largest sum, or no key and a sum of 0
/// when there were no records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub key: Option<Vec<u8>>,
    pub sum: u64,
    pub records: u64,
    pub distinct_keys: usize,
}

impl Summary {
    /// Writes `max_key: <key> sum: <sum>` with the key bytes as they are.
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"max_key: ")?;
        out.write_all(self.key.as_deref().unwrap_or(NO_KEY.as_bytes()))?;
        writeln!(out, " sum: {}", self.sum)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(
                f,
                "max_key: {} sum: {}",
                String::from_utf8_lossy(key),
                self.sum
            ),
            None => write!(f, "max_key: {NO_KEY} sum: {}", self.sum),
        }
    }
}

/// The global table together with its largest entry.
pub struct Merged<'a> {
    pub table: Table<'a>,
    pub key: Option<&'a [u8]>,
    pub sum: u64,
    pub records: u64,
}

impl Merged<'_> {
    pub fn summary(&self) -> Summary {
        Summary {
            key: self.key.map(<[u8]>::to_vec),
            sum: self.sum,
            records: self.records,
            distinct_keys: self.table.len(),
        }
    }
}

/// Folds worker tables into `seed`, the first worker's table.
///
/// The seed's entries are visited first, then every other table in order,
/// each in bucket order and insertion order within a bucket. All tables must
/// share the seed's bucket count.
pub fn merge<'a>(seed: Local<'a>, rest: impl IntoIterator<Item = Local<'a>>) -> Merged<'a> {
    let mut max = Max::default();
    for entry in seed.table.entries() {
        max.offer(entry.key, entry.sum);
    }
    let mut merged = Merged {
        table: seed.table,
        key: None,
        sum: 0,
        records: seed.records,
    };
    for local in rest {
        debug_assert_eq!(local.table.bucket_count(), merged.table.bucket_count());
        merged.records += local.records;
        for entry in local.table.into_entries() {
            let sum = merged.table.add(entry.hash, entry.key, entry.sum);
            max.offer(entry.key, sum);
        }
    }
    merged.key = max.key;
    merged.sum = max.sum;
    merged
}

/// Running maximum. Only a strictly larger sum displaces the current key,
/// so the first key to reach a value keeps it.
#[derive(Default)]
struct Max<'a> {
    key: Option<&'a [u8]>,
    sum: u64,
}

impl<'a> Max<'a> {
    #[inline]
    fn offer(&mut self, key: &'a [u8], sum: u64) {
        if self.key.is_none() || sum > self.sum {
            self.key = Some(key);
            self.sum = sum;
        }
    }
}
