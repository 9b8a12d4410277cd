use crate::solidity::SolidityVerifierGenerator;
use ark_bls12_381::Bls12_381;
use ark_groth16::VerifyingKey;
use libs::errors::Result;
use libs::iotools::{decode_compressed, open_buffered, SessionArtifacts};
use std::path::{Path, PathBuf};
use tracing::info;

/// Decodes a Groth16 verifying key saved in canonical compressed form.
pub fn load_verifying_key(path: &Path) -> Result<VerifyingKey<Bls12_381>> {
    let reader = open_buffered(path)?;
    let vk: VerifyingKey<Bls12_381> = decode_compressed(reader, "groth16 verifying key")?;
    info!(?path, public_inputs = vk.gamma_abc_g1.len().saturating_sub(1), "Verifying key loaded");
    Ok(vk)
}

/// Renders `<session>.vk.save` into `<session>.sol` and returns the contract path.
///
/// Nothing is written unless the key decodes and the contract renders.
pub fn export_verifier(session: &str) -> Result<PathBuf> {
    let artifacts = SessionArtifacts::new(session);
    let target = artifacts.solidity();
    info!("Exporting {}", target.display());

    let vk = load_verifying_key(&artifacts.vk_save())?;
    let contract = SolidityVerifierGenerator::generate_verifier_contract(&vk)?;
    SolidityVerifierGenerator::save_verifier_contract(&contract, &target)?;

    info!("{} has been extracted successfully", target.display());
    Ok(target)
}
