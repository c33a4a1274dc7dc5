//! Incremental sync state

pub mod manager;
pub mod watermark;

pub use manager::StateManager;
pub use watermark::{Watermark, INDEX_UPDATED_FIELD};
