pub mod cache;
pub mod filing;

pub use cache::MemoizationStore;
pub use filing::SnapshotFiles;
