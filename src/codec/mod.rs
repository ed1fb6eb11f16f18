//! Binary codec for selection reasons
//!
//! Persists one [`SelectionReason`](crate::selection::SelectionReason) per
//! resolved component. Description texts repeat heavily across a resolved
//! graph, so each text is written in full once per run and referenced by
//! index afterwards.
//!
//! # Failure policy
//!
//! - Fail fast on the first malformed byte
//! - No partial reasons
//! - I/O errors are surfaced unchanged

mod dictionary;
mod errors;
mod reason_codec;
pub mod wire;

pub use dictionary::TextDictionary;
pub use errors::{CodecError, CodecResult};
pub use reason_codec::{CodecLimits, CodecStats, Direction, ReasonCodec};
