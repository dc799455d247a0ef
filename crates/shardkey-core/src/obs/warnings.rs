use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, LazyLock, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

///
/// UnknownTableRegistry
///
/// Per-table warning counters for mutations that reference tables
/// missing from the schema. The map supports concurrent insert and the
/// counters are atomic fetch-adds, so encoders on many worker threads
/// share one registry without holding a lock across an encode call.
///
/// Counters live for the process; `reset` exists for test harnesses.
///

#[derive(Debug, Default)]
pub struct UnknownTableRegistry {
    counters: RwLock<HashMap<String, Arc<AtomicU64>>>,
}

impl UnknownTableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent handle for one table's counter, created atomically on
    /// first use.
    #[must_use]
    pub fn counter(&self, table: &str) -> Arc<AtomicU64> {
        {
            let counters = self
                .counters
                .read()
                .expect("warnings RwLock poisoned while acquiring read lock");
            if let Some(counter) = counters.get(table) {
                return Arc::clone(counter);
            }
        }

        let mut counters = self
            .counters
            .write()
            .expect("warnings RwLock poisoned while acquiring write lock");
        Arc::clone(counters.entry(table.to_string()).or_default())
    }

    /// Bump the table's counter and return the new value.
    pub fn increment_and_get(&self, table: &str) -> u64 {
        self.counter(table).fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Copy of the current counters for inspection.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        let counters = self
            .counters
            .read()
            .expect("warnings RwLock poisoned while acquiring read lock");
        counters
            .iter()
            .map(|(table, counter)| (table.clone(), counter.load(Ordering::Relaxed)))
            .collect()
    }

    /// Clear all counters (useful in tests).
    pub fn reset(&self) {
        let mut counters = self
            .counters
            .write()
            .expect("warnings RwLock poisoned while acquiring write lock");
        counters.clear();
    }
}

static GLOBAL: LazyLock<Arc<UnknownTableRegistry>> =
    LazyLock::new(|| Arc::new(UnknownTableRegistry::new()));

/// Process-wide default registry shared by every encoder that is not
/// constructed with an injected one.
#[must_use]
pub fn global() -> Arc<UnknownTableRegistry> {
    Arc::clone(&GLOBAL)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn increments_count_per_table() {
        let registry = UnknownTableRegistry::new();
        assert_eq!(registry.increment_and_get("alpha"), 1);
        assert_eq!(registry.increment_and_get("alpha"), 2);
        assert_eq!(registry.increment_and_get("beta"), 1);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.get("alpha"), Some(&2));
        assert_eq!(snapshot.get("beta"), Some(&1));
    }

    #[test]
    fn counter_handles_are_idempotent() {
        let registry = UnknownTableRegistry::new();
        let first = registry.counter("alpha");
        let second = registry.counter("alpha");
        first.fetch_add(1, Ordering::Relaxed);
        assert_eq!(second.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn reset_clears_state() {
        let registry = UnknownTableRegistry::new();
        registry.increment_and_get("alpha");
        registry.reset();
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let registry = Arc::new(UnknownTableRegistry::new());

        thread::scope(|scope| {
            for _ in 0..8 {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    for _ in 0..100 {
                        registry.increment_and_get("alpha");
                    }
                });
            }
        });

        assert_eq!(registry.snapshot().get("alpha"), Some(&800));
    }
}
