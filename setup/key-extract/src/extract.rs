use crate::errors::{ExtractError, Result};
use crate::materialize::KeyMaterializer;
use crate::pedersen::{setup_with_rng, verify_key_pair, CommitmentKeyPair};
use libs::errors::ArtifactError;
use libs::group_structures::G1Affine;
use libs::iotools::{
    read_evaluation_basis, read_transcript_header, ArtifactLayout, TranscriptHeader, EVALUATIONS_FILE,
};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::path::PathBuf;
use tracing::info;

/// Inputs and switches of one extraction run.
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Phase-2 transcript; only its header is read.
    pub transcript: PathBuf,
    pub evaluations: PathBuf,
    pub output_dir: PathBuf,
    /// Require `len(basis) == header.domain`.
    pub check_domain: bool,
    /// Pairing check of every derived proving key before anything is written.
    pub verify_keys: bool,
}

impl ExtractConfig {
    pub fn new<P: Into<PathBuf>>(transcript: P) -> Self {
        ExtractConfig {
            transcript: transcript.into(),
            evaluations: PathBuf::from(EVALUATIONS_FILE),
            output_dir: PathBuf::from("."),
            check_domain: true,
            verify_keys: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExtractionSummary {
    pub header: TranscriptHeader,
    pub basis_len: usize,
    /// `vk` first, then `pk0..pkN-1`.
    pub written: Vec<PathBuf>,
}

impl ExtractionSummary {
    pub fn proving_key_count(&self) -> usize {
        self.written.len().saturating_sub(1)
    }
}

/// Runs the extraction pipeline with keys drawn from fresh randomness.
pub fn extract_keys(config: &ExtractConfig) -> Result<ExtractionSummary> {
    let mut rng = ChaCha20Rng::from_entropy();
    extract_keys_with_rng(config, &mut rng)
}

/// Header, basis, setup, then materialization; any failure stops the run before
/// a single key file exists.
pub fn extract_keys_with_rng<R: RngCore + CryptoRng>(
    config: &ExtractConfig,
    rng: &mut R,
) -> Result<ExtractionSummary> {
    info!(transcript = ?config.transcript, "Extracting keys");

    let header = read_transcript_header(&config.transcript)?;
    info!(
        domain = header.domain,
        constraints = header.constraints,
        contributions = header.contributions,
        "Transcript header loaded"
    );

    let basis = read_evaluation_basis(&config.evaluations)?;
    info!(points = basis.len(), evaluations = ?config.evaluations, "Evaluation basis loaded");
    if config.check_domain {
        check_basis_shape(&header, &basis)?;
    }
    let basis_len = basis.len();

    let pair = setup_with_rng(vec![basis], rng)?;
    if config.verify_keys {
        check_key_pair(&pair, rng)?;
    }

    let written = KeyMaterializer::new(ArtifactLayout::new(&config.output_dir)).materialize(&pair)?;
    Ok(ExtractionSummary { header, basis_len, written })
}

fn check_basis_shape(header: &TranscriptHeader, basis: &[G1Affine]) -> Result<()> {
    if basis.is_empty() {
        return Err(ArtifactError::Validation("evaluation basis is empty".to_string()).into());
    }
    if basis.len() != header.domain as usize {
        return Err(ArtifactError::Validation(format!(
            "evaluation basis has {} points but the transcript domain size is {}",
            basis.len(),
            header.domain
        ))
        .into());
    }
    Ok(())
}

fn check_key_pair<R: RngCore>(pair: &CommitmentKeyPair, rng: &mut R) -> Result<()> {
    for (shard, pk) in pair.proving_keys.iter().enumerate() {
        if !verify_key_pair(pk, &pair.verifying_key, rng) {
            return Err(ExtractError::KeyCheck { shard });
        }
    }
    info!("Commitment key pair verified");
    Ok(())
}
