use std::sync::Arc;
use std::time::{Duration, Instant};

use super::model::FoodTable;
use super::source::{DataSource, Fetch};
use crate::error::LoadError;

/// How long a loaded snapshot is reused before the source is read again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// DatasetCache – time-bounded memo around DataSource::load
// ---------------------------------------------------------------------------

/// Memoizes the last successful load for `ttl`.
///
/// Failed loads are never memoized, so the next call retries.
pub struct DatasetCache<F> {
    source: DataSource,
    fetcher: F,
    ttl: Duration,
    entry: Option<(Instant, Arc<FoodTable>)>,
}

impl<F: Fetch> DatasetCache<F> {
    pub fn new(source: DataSource, fetcher: F) -> Self {
        Self::with_ttl(source, fetcher, DEFAULT_TTL)
    }

    pub fn with_ttl(source: DataSource, fetcher: F, ttl: Duration) -> Self {
        Self {
            source,
            fetcher,
            ttl,
            entry: None,
        }
    }

    /// Return the cached snapshot, or load a fresh one when expired.
    pub fn load(&mut self) -> Result<Arc<FoodTable>, LoadError> {
        if let Some((loaded_at, table)) = &self.entry {
            if loaded_at.elapsed() < self.ttl {
                log::debug!("cache hit for {} ({} items)", self.source, table.len());
                return Ok(Arc::clone(table));
            }
            log::debug!("cache expired for {}", self.source);
        }

        let table = Arc::new(self.source.load(&self.fetcher)?);
        self.entry = Some((Instant::now(), Arc::clone(&table)));
        Ok(table)
    }

    /// Drop the memo; the next [`load`](Self::load) reads the source again.
    pub fn reset(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("cache cleared for {}", self.source);
        }
    }

    /// Whether a snapshot is held and still within the window.
    pub fn is_fresh(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(loaded_at, _)| loaded_at.elapsed() < self.ttl)
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::FetchError;

    /// Serves a fixed CSV and counts requests; fails once `fail` is set.
    #[derive(Default)]
    struct Counting {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl Fetch for Counting {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            Ok(b"Food,Price,Park,Priority\nChurro,5.75,Disneyland,1\n".to_vec())
        }
    }

    fn remote() -> DataSource {
        DataSource::Remote {
            url: "https://example.invalid/export?format=csv".to_string(),
        }
    }

    #[test]
    fn loads_within_window_fetch_once() {
        let mut cache = DatasetCache::new(remote(), Counting::default());
        let first = cache.load().unwrap();
        let second = cache.load().unwrap();

        assert_eq!(cache.fetcher().calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_fresh());
    }

    #[test]
    fn reset_forces_refetch() {
        let mut cache = DatasetCache::new(remote(), Counting::default());
        cache.load().unwrap();
        cache.reset();
        assert!(!cache.is_fresh());
        cache.load().unwrap();

        assert_eq!(cache.fetcher().calls.get(), 2);
    }

    #[test]
    fn zero_ttl_always_refetches() {
        let mut cache = DatasetCache::with_ttl(remote(), Counting::default(), Duration::ZERO);
        cache.load().unwrap();
        cache.load().unwrap();

        assert_eq!(cache.fetcher().calls.get(), 2);
    }

    #[test]
    fn failures_are_not_memoized() {
        let mut cache = DatasetCache::new(remote(), Counting::default());
        cache.fetcher().fail.set(true);
        assert!(cache.load().is_err());
        assert!(!cache.is_fresh());

        cache.fetcher().fail.set(false);
        assert_eq!(cache.load().unwrap().len(), 1);
        assert_eq!(cache.fetcher().calls.get(), 2);
    }
}
