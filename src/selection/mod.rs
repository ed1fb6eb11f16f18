//! Selection-reason model
//!
//! Records why a component version won selection. A component's reason can
//! accumulate several causes while the resolver adjudicates; the last one
//! added is the primary cause shown to users.
//!
//! # Usage
//!
//! ```
//! use selection_ledger::selection::{SelectionCause, SelectionReason};
//!
//! let mut reason = SelectionReason::requested();
//! reason.add_cause(SelectionCause::Forced, "forced to 1.2");
//! assert!(reason.is_forced());
//! assert!(!reason.is_expected());
//! assert_eq!(reason.primary_text(), "forced to 1.2");
//! ```

mod cause;
mod description;
mod errors;
mod reason;

pub use cause::SelectionCause;
pub use description::SelectionDescription;
pub use errors::{SelectionError, SelectionResult};
pub use reason::SelectionReason;
