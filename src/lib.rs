//! selection-ledger - why each component version won dependency resolution
//!
//! - [`selection`]: the per-component selection reason model
//! - [`codec`]: binary codec for reasons with per-run text interning
//! - [`store`]: checksum-verified, versioned result files
//! - [`config`], [`observability`], [`cli`]: configuration, logging and the binary

pub mod cli;
pub mod codec;
pub mod config;
pub mod observability;
pub mod selection;
pub mod store;
