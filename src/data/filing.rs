//! Line-oriented persistence for the resumable search state.
//!
//! Every record is a JSON array literal on its own line. Snapshot files are
//! rewritten in full with `"<index> = <literal>"` lines; logs are appended to
//! with bare literals. Readers start each record at its first `[` and skip
//! lines that do not parse, so a torn or hand-edited file degrades to "absent"
//! rather than failing the run.

use crate::config::StorageConfig;
use crate::error::Result;
use crate::types::Individual;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const POPULATION_FILE: &str = "Best.txt";
pub const OFFSPRING_FILE: &str = "Offspring.txt";
pub const EXPLORED_FILE: &str = "Explored.txt";
pub const FITNESS_FILE: &str = "Fitness.txt";

/// Locations of the four files a run reads and writes.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFiles {
    pub population: PathBuf,
    pub offspring: PathBuf,
    pub explored: PathBuf,
    pub fitness: PathBuf,
}

impl SnapshotFiles {
    pub fn in_directory<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            population: root.join(POPULATION_FILE),
            offspring: root.join(OFFSPRING_FILE),
            explored: root.join(EXPLORED_FILE),
            fitness: root.join(FITNESS_FILE),
        }
    }

    /// Resolves the storage root and makes sure it exists.
    pub fn prepare(storage: &StorageConfig) -> Result<Self> {
        let root = storage.root();
        fs::create_dir_all(&root)?;
        Ok(Self::in_directory(root))
    }
}

fn parse_record<T: DeserializeOwned>(line: &str) -> Option<T> {
    let start = line.find('[')?;
    serde_json::from_str(line[start..].trim_end()).ok()
}

/// Reads every parseable record. A missing or unreadable file yields nothing.
pub fn read_lines<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Vec<T> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::debug!("{} not readable: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line) {
            Some(record) => records.push(record),
            None => log::debug!("{}:{}: skipping malformed record", path.display(), number + 1),
        }
    }
    records
}

/// Reads a population or offspring snapshot; `None` when absent or empty.
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Option<Vec<Individual>> {
    let individuals: Vec<Individual> = read_lines(path);
    if individuals.is_empty() {
        None
    } else {
        Some(individuals)
    }
}

/// Rewrites a snapshot through a sibling temp file so a crash mid-write
/// leaves the previous snapshot intact.
pub fn save_snapshot<P: AsRef<Path>>(path: P, individuals: &[Individual]) -> Result<()> {
    let path = path.as_ref();
    let mut buffer = String::new();
    for (i, individual) in individuals.iter().enumerate() {
        buffer.push_str(&format!("{} = {}\n", i, serde_json::to_string(individual)?));
    }

    let tmp_path = path.with_extension("tmp");
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp_path)?;
    f.write_all(buffer.as_bytes())?;
    f.sync_all()?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

pub fn append_line<T: Serialize, P: AsRef<Path>>(path: P, record: &T) -> Result<()> {
    let line = serde_json::to_string(record)?;
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{}", line)?;
    Ok(())
}
