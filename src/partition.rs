use std::num::NonZeroUsize;

use memchr::{memchr, memrchr};

use crate::error::{Error, Result};

/// Half-open byte range `[begin, end)` of the input handled by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub begin: usize,
    pub end: usize,
}

impl Region {
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Splits `data` into exactly `workers` line-aligned regions.
///
/// Cuts are tried at multiples of `data.len() / workers` and moved back to the
/// byte after the closest preceding newline. When a whole chunk holds no
/// newline the cut moves forward to the end of the line instead, and the end
/// of the buffer counts as a line end. Regions may be empty.
pub fn partition(data: &[u8], workers: NonZeroUsize) -> Vec<Region> {
    let workers = workers.get();
    let chunk = data.len() / workers;
    let mut regions = Vec::with_capacity(workers);
    let mut begin = 0;
    for i in 1..=workers {
        let end = if i == workers {
            data.len()
        } else {
            line_boundary(data, begin, i * chunk)
        };
        regions.push(Region { begin, end });
        begin = end;
    }
    regions
}

fn line_boundary(data: &[u8], begin: usize, cut: usize) -> usize {
    if cut >= data.len() {
        return data.len();
    }
    if cut <= begin {
        return begin;
    }
    if let Some(nl) = memrchr(b'\n', &data[begin..cut]) {
        return begin + nl + 1;
    }
    match memchr(b'\n', &data[cut..]) {
        Some(nl) => cut + nl + 1,
        None => data.len(),
    }
}

/// Checks that `regions` tile `data` exactly and that every interior boundary
/// starts a line.
pub fn verify(regions: &[Region], data: &[u8]) -> Result<()> {
    let layout_err = |offset, reason| Err(Error::Layout { offset, reason });
    if regions.is_empty() {
        return layout_err(0, "no regions");
    }
    let mut expected = 0;
    for region in regions {
        if region.begin != expected {
            return layout_err(region.begin, "regions are not contiguous");
        }
        if region.end < region.begin {
            return layout_err(region.end, "region ends before it begins");
        }
        if region.end > data.len() {
            return layout_err(region.end, "region extends past the buffer");
        }
        let begin = region.begin;
        if begin != 0 && begin != data.len() && data[begin - 1] != b'\n' {
            return layout_err(begin, "boundary splits a line");
        }
        expected = region.end;
    }
    if expected != data.len() {
        return layout_err(expected, "regions stop short of the buffer end");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{partition, verify, Region};
    use crate::error::Error;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::num::NonZeroUsize;

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn lines(data: &[u8], regions: &[Region]) -> usize {
        regions
            .iter()
            .map(|r| {
                data[r.begin..r.end]
                    .split(|&b| b == b'\n')
                    .filter(|l| !l.is_empty())
                    .count()
            })
            .sum()
    }

    #[test]
    fn covers_buffer_for_many_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut data = Vec::new();
            for _ in 0..rng.gen_range(0..60) {
                let len = rng.gen_range(1..40);
                data.extend((0..len).map(|_| rng.gen_range(b'a'..=b'z')));
                data.push(b'\n');
            }
            let total = lines(&data, &[Region { begin: 0, end: data.len() }]);
            for n in 1..=20 {
                let regions = partition(&data, workers(n));
                assert_eq!(regions.len(), n);
                verify(&regions, &data).unwrap();
                assert_eq!(lines(&data, &regions), total);
            }
        }
    }

    #[test]
    fn uneven_size_keeps_every_record() {
        let data = b"a\tfoo\t5\nbb\tbar\t10\nccc\tfoo\t5\nd\tbaz\t12\n";
        assert_ne!(data.len() % 3, 0);
        let regions = partition(data, workers(3));
        verify(&regions, data).unwrap();
        assert_eq!(lines(data, &regions), 4);
    }

    #[test]
    fn long_line_moves_cut_forward() {
        let data = b"xxxxxxxxxxxxxxxxxxxxxxxx\ny\n";
        let regions = partition(data, workers(4));
        verify(&regions, data).unwrap();
        assert_eq!(regions[0], Region { begin: 0, end: 25 });
        assert!(regions[1..].iter().map(|r| r.len()).sum::<usize>() == 2);
    }

    #[test]
    fn more_workers_than_bytes() {
        let data = b"a\tfoo\t5\n";
        let regions = partition(data, workers(14));
        verify(&regions, data).unwrap();
        assert_eq!(regions.iter().filter(|r| !r.is_empty()).count(), 1);
    }

    #[test]
    fn empty_buffer() {
        let regions = partition(b"", workers(4));
        verify(&regions, b"").unwrap();
        assert!(regions.iter().all(Region::is_empty));
    }

    #[test]
    fn missing_final_newline_ends_at_eof() {
        let data = b"a\tfoo\t5\nb\tbar\t6";
        let regions = partition(data, workers(2));
        verify(&regions, data).unwrap();
        assert_eq!(regions[1].end, data.len());
    }

    #[test]
    fn verify_rejects_bad_layouts() {
        let data = b"ab\ncd\n";
        let split_line = [Region { begin: 0, end: 4 }, Region { begin: 4, end: 6 }];
        let gap = [Region { begin: 0, end: 3 }, Region { begin: 4, end: 6 }];
        let short = [Region { begin: 0, end: 3 }];
        for regions in [&split_line[..], &gap[..], &short[..], &[][..]] {
            assert!(matches!(verify(regions, data), Err(Error::Layout { .. })));
        }
    }
}
