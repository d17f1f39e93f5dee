use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), SearchError>;
}

/// Builds the `Configuration` error for a section, prefixed with its name.
pub(crate) fn invalid<S: ConfigSection>(message: impl Into<String>) -> SearchError {
    SearchError::Configuration(format!("[{}] {}", S::section_name(), message.into()))
}
