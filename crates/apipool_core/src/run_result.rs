use indexmap::IndexMap;

use crate::{Endpoint, FetchOutcome};

/// Outcomes of a single run, keyed by endpoint in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResult {
    entries: IndexMap<Endpoint, FetchOutcome>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `outcome` for `endpoint`. A repeated endpoint keeps its
    /// original position and takes the newer outcome.
    pub fn insert(&mut self, endpoint: Endpoint, outcome: FetchOutcome) {
        self.entries.insert(endpoint, outcome);
    }

    pub fn get(&self, endpoint: &str) -> Option<&FetchOutcome> {
        self.entries.get(endpoint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Endpoint, &FetchOutcome)> {
        self.entries.iter()
    }

    pub fn failures(&self) -> usize {
        self.entries
            .values()
            .filter(|outcome| !outcome.is_success())
            .count()
    }
}

impl IntoIterator for RunResult {
    type Item = (Endpoint, FetchOutcome);
    type IntoIter = indexmap::map::IntoIter<Endpoint, FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
