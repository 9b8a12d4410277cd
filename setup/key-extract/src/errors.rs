use libs::errors::ArtifactError;
use thiserror::Error;

/// Failures reported by the Pedersen commitment setup
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Commitment setup needs at least one basis")]
    NoBasis,

    #[error("Basis {shard} is empty")]
    EmptyBasis { shard: usize },

    #[error("Basis {shard} is degenerate: {identities} identity element(s), first at position {first}")]
    DegenerateBasis { shard: usize, first: usize, identities: u64 },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Commitment key setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Proving key {shard} is inconsistent with the verifying key")]
    KeyCheck { shard: usize },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
