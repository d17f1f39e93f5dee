use super::traits::{invalid, ConfigSection};
use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub directory: PathBuf,
    /// Per-design subdirectory under `directory`.
    pub name: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("SSO"),
            name: None,
        }
    }
}

impl StorageConfig {
    pub fn root(&self) -> PathBuf {
        match &self.name {
            Some(name) => self.directory.join(name),
            None => self.directory.clone(),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn section_name() -> &'static str {
        "storage"
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.directory.as_os_str().is_empty() {
            return Err(invalid::<Self>("Storage directory must not be empty"));
        }
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(invalid::<Self>("Storage name must not be blank"));
        }
        Ok(())
    }
}
