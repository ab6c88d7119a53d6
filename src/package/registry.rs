// src/package/registry.rs

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::package::metadata::ExistingPackageRecord;
use crate::tools::{Comparison, EvrComparator};

/// What the target repository already contains, keyed by package name.
///
/// Built once from a repository scan and read-only afterwards. When the same
/// name shows up more than once, the newest build wins as decided by the
/// [`EvrComparator`]; scan order plays no part in the choice.
#[derive(Debug, Clone, Default)]
pub struct ExistingRegistry {
    records: HashMap<String, ExistingPackageRecord>,
}

impl ExistingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry, resolving duplicate names through `comparator`.
    ///
    /// The comparator is only consulted for names seen more than once; any
    /// error from it aborts the build of the registry.
    pub fn from_records(
        records: impl IntoIterator<Item = ExistingPackageRecord>,
        comparator: &dyn EvrComparator,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record, comparator)?;
        }
        Ok(registry)
    }

    fn insert(
        &mut self,
        record: ExistingPackageRecord,
        comparator: &dyn EvrComparator,
    ) -> Result<()> {
        debug!(
            package = %record.name,
            evr = %record.evr(),
            "registering existing artifact"
        );
        match self.records.entry(record.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                let kept = slot.get().evr();
                let candidate = record.evr();
                // Older means the kept build is older than the candidate.
                let answer = comparator.compare(&record.name, &candidate, &kept)?;
                let (winner, loser) = match answer {
                    Comparison::Older => {
                        slot.insert(record);
                        (candidate, kept)
                    }
                    Comparison::NotOlder => (kept, candidate),
                };
                warn!(
                    package = %slot.key(),
                    kept = %winner,
                    ignored = %loser,
                    "several artifacts for the same package; keeping the newest"
                );
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ExistingPackageRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
