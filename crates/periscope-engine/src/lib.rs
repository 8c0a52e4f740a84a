pub mod blob;
pub mod commands;
pub mod cursor;
pub mod engine;
pub mod state;

pub use crate::blob::{BlobStore, MemoryBlobStore};
pub use crate::commands::render_transcript;
pub use crate::engine::{DEFAULT_POLL_INTERVAL, SyncEngine};
pub use crate::state::EngineState;
