//! Shared building blocks for extracting key material from a finished phase-2 ceremony.
//!
//! - [`group_structures`]: the identity capability for curve points and the
//!   infinity-compaction routine shared by G1 and G2.
//! - [`iotools`]: transcript header and evaluation basis readers, the artifact
//!   naming contract, staged (all-or-nothing) file writes and the Solidity word split.
//! - [`errors`]: the stream / decode / validation error taxonomy.
//! - [`utils`]: logging setup for the command-line tools.

pub mod errors;
pub mod group_structures;
pub mod iotools;
pub mod utils;

pub use errors::*;
