use super::filing;
use crate::error::Result;
use crate::types::{Individual, SimulationResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Exact-match key over the bit patterns of a rounded parameter vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey(Vec<u64>);

impl CacheKey {
    fn new(parameters: &[f64]) -> Self {
        // 0.0 and -0.0 compare equal, so they must hash equal too
        CacheKey(
            parameters
                .iter()
                .map(|&x| if x == 0.0 { 0u64 } else { x.to_bits() })
                .collect(),
        )
    }
}

/// Append-only history of every simulated design.
///
/// Lookups are exact equality on the rounded parameter vector; there is no
/// eviction. When backed by a file, each new entry is appended to it before
/// `insert` returns, and `open` replays the file so a restarted run never
/// re-simulates a design it has already paid for.
pub struct MemoizationStore {
    index: HashMap<CacheKey, usize>,
    entries: Vec<Individual>,
    log_path: Option<PathBuf>,
}

impl MemoizationStore {
    pub fn in_memory() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            log_path: None,
        }
    }

    /// Loads the explored log at `path` and appends to it from then on.
    /// Unparseable lines and entries whose result fails validation are ignored.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut store = Self::in_memory();
        for entry in filing::read_lines::<Individual, _>(path) {
            match entry.result.as_ref().map(SimulationResult::validate) {
                Some(Ok(())) => store.remember(entry),
                Some(Err(e)) => log::debug!("Skipping explored entry {:?}: {}", entry.parameters, e),
                None => {}
            }
        }
        log::info!("Loaded {} explored designs from {}", store.len(), path.display());
        store.log_path = Some(path.to_path_buf());
        store
    }

    pub fn lookup(&self, parameters: &[f64]) -> Option<&SimulationResult> {
        self.index
            .get(&CacheKey::new(parameters))
            .and_then(|&i| self.entries[i].result.as_ref())
    }

    /// Records a simulated design. A vector already present keeps its first result.
    pub fn insert(&mut self, parameters: &[f64], result: &SimulationResult) -> Result<()> {
        if self.lookup(parameters).is_some() {
            return Ok(());
        }
        let entry = Individual::evaluated(parameters.to_vec(), result.clone());
        if let Some(path) = &self.log_path {
            filing::append_line(path, &entry)?;
        }
        self.remember(entry);
        Ok(())
    }

    fn remember(&mut self, entry: Individual) {
        let key = CacheKey::new(&entry.parameters);
        if !self.index.contains_key(&key) {
            self.index.insert(key, self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every explored design in insertion order.
    pub fn entries(&self) -> &[Individual] {
        &self.entries
    }
}
