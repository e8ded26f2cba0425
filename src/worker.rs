use memchr::{memchr, memchr2};

use crate::{
    error::{Error, Result},
    hash::Times33,
    partition::Region,
    table::Table,
};

/// Positions of the key and count among a record's tab-separated fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub key: usize,
    pub value: usize,
}

impl Default for Fields {
    fn default() -> Self {
        Self { key: 1, value: 2 }
    }
}

/// What one worker hands back to the merge.
pub struct Local<'a> {
    pub table: Table<'a>,
    pub records: u64,
}

pub fn run<'a>(
    data: &'a [u8],
    region: Region,
    fields: Fields,
    buckets: usize,
) -> Result<Local<'a>> {
    let mut table = Table::new(buckets);
    let records = scan(data, region, fields, &mut table)?;
    Ok(Local { table, records })
}

fn parse_err<T>(offset: usize, reason: &'static str) -> Result<T> {
    Err(Error::Parse { offset, reason })
}

/// Parses every record of `region` into `table` and returns the record count.
///
/// Each record is read field by field up to the later of the key and count
/// fields; the remainder of the line is skipped. Fields end at a tab, a
/// newline, or the end of the region, which stands in for a missing final
/// newline. Keys are stored as spans of `data`.
pub fn scan<'a>(
    data: &'a [u8],
    region: Region,
    fields: Fields,
    table: &mut Table<'a>,
) -> Result<u64> {
    let end = region.end;
    let last = fields.key.max(fields.value);
    let mut cur = region.begin;
    let mut records = 0;
    while cur < end {
        let record = cur;
        let mut key = None;
        let mut count = None;
        let mut field = 0;
        loop {
            if field == fields.key {
                let start = cur;
                let mut hasher = Times33::default();
                while cur < end && data[cur] != b'\t' && data[cur] != b'\n' {
                    hasher.roll(data[cur]);
                    cur += 1;
                }
                key = Some((&data[start..cur], hasher.get()));
            } else if field == fields.value {
                let start = cur;
                let mut value = 0u64;
                while cur < end && data[cur] != b'\t' && data[cur] != b'\n' {
                    let digit = data[cur].wrapping_sub(b'0');
                    if digit > 9 {
                        return parse_err(cur, "count is not a decimal number");
                    }
                    value = value.wrapping_mul(10).wrapping_add(digit as u64);
                    cur += 1;
                }
                if cur == start {
                    return parse_err(start, "empty count");
                }
                count = Some(value);
            } else {
                cur = memchr2(b'\t', b'\n', &data[cur..end]).map_or(end, |i| cur + i);
            }
            if field == last {
                break;
            }
            if cur >= end || data[cur] != b'\t' {
                return parse_err(record, "record has too few fields");
            }
            cur += 1;
            field += 1;
        }
        let (Some((key, hash)), Some(count)) = (key, count) else {
            return parse_err(record, "record has too few fields");
        };
        table.add(hash, key, count);
        records += 1;
        cur = memchr(b'\n', &data[cur..end]).map_or(end, |i| cur + i + 1);
    }
    Ok(records)
}
