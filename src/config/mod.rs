pub mod traits;
pub mod search;
pub mod objectives;
pub mod geometry;
pub mod storage;
pub mod manager;

pub use manager::AppConfig;
pub use search::SearchConfig;
pub use objectives::{BandObjective, ObjectivesConfig};
pub use geometry::{GeometryConfig, LinearConstraint, ParameterRange};
pub use storage::StorageConfig;
pub use traits::ConfigSection;
