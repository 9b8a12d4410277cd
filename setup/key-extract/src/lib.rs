//! Commitment key extraction for a finished phase-2 ceremony.
//!
//! ## Pipeline
//!
//! - **Transcript header**: read from the phase-2 transcript (nothing else is consumed)
//! - **Evaluation basis**: the G1 points stored in the `evals` file
//! - **Pedersen setup**: derives one proving key per basis and a single verifying key
//! - **Materialization**: writes `vk` and `pk0..pkN-1` as one all-or-nothing batch

pub mod errors;
pub mod pedersen;
pub mod materialize;
pub mod extract;

pub use errors::*;
pub use pedersen::*;
pub use materialize::*;
pub use extract::*;
