//! Resolution result store
//!
//! Persists a whole resolved graph, one selection reason per component, so a
//! later resolution in the same process (or a later process) can reuse it
//! without walking the graph again.
//!
//! # Design Principles
//!
//! - One file per result, written atomically
//! - Checksum-verified before any decoding
//! - Explicit format version; mismatches are rejected, never migrated
//! - A damaged cache is discarded and recomputed, never repaired

mod checksum;
mod component;
mod errors;
mod format;
mod result_store;

pub use checksum::compute_checksum;
pub use component::{ComponentId, ResolutionResult, ResolvedComponent};
pub use errors::{StoreError, StoreResult};
pub use format::{decode_file, encode_file, StoreHeader, FORMAT_VERSION, MAGIC};
pub use result_store::{LoadedResult, ResultStore};
