use std::{num::NonZeroUsize, thread};

use crate::{
    error::{Error, Result},
    worker::Fields,
};

pub const DEFAULT_BUCKETS: usize = 2048;

/// Tuning for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of regions, and of worker threads.
    pub workers: NonZeroUsize,
    /// Buckets per table. Must be a power of two.
    pub buckets: usize,
    /// 0-based tab-separated field holding the key.
    pub key_field: usize,
    /// 0-based tab-separated field holding the count.
    pub value_field: usize,
}

impl Default for Config {
    fn default() -> Self {
        let fields = Fields::default();
        Self {
            workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            buckets: DEFAULT_BUCKETS,
            key_field: fields.key,
            value_field: fields.value,
        }
    }
}

impl Config {
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.buckets.is_power_of_two() || self.buckets > 1 << 31 {
            return Err(Error::Usage(format!(
                "bucket count must be a power of two no larger than 2^31, got {}",
                self.buckets
            )));
        }
        if self.key_field == self.value_field {
            return Err(Error::Usage(format!(
                "key field and value field are both {}",
                self.key_field
            )));
        }
        Ok(())
    }

    pub fn fields(&self) -> Fields {
        Fields {
            key: self.key_field,
            value: self.value_field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_BUCKETS};
    use crate::error::Error;

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.buckets, DEFAULT_BUCKETS);
        assert_eq!((config.key_field, config.value_field), (1, 2));
    }

    #[test]
    fn rejects_bad_bucket_counts() {
        for buckets in [0, 3, 2000, usize::MAX] {
            let config = Config {
                buckets,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(Error::Usage(_))));
        }
    }

    #[test]
    fn rejects_same_key_and_value_field() {
        let config = Config {
            key_field: 2,
            value_field: 2,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Usage(_))));
    }
}
