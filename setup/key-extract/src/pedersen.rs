use crate::errors::SetupError;
use ark_bls12_381::{Bls12_381, Fr, G1Projective};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{Field, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use libs::group_structures::{compact_points, G1Affine, G2Affine};
use libs::{impl_read_from_binary, impl_write_into_binary};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::{debug, info};

/// Pedersen commitment proving key for one basis.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProvingKey {
    pub basis: Vec<G1Affine>,
    /// `σ·basis[j]` for every `j`
    pub basis_exp_sigma: Vec<G1Affine>,
}

/// Pedersen commitment verifying key, shared by every proving key of a setup.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey {
    pub g: G2Affine,
    /// `-σ⁻¹·g`
    pub g_root_sigma_neg: G2Affine,
}

impl_read_from_binary!(ProvingKey, "proving key");
impl_write_into_binary!(ProvingKey, "proving key");
impl_read_from_binary!(VerifyingKey, "verifying key");
impl_write_into_binary!(VerifyingKey, "verifying key");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentKeyPair {
    /// One key per basis, in input order.
    pub proving_keys: Vec<ProvingKey>,
    pub verifying_key: VerifyingKey,
}

/// Pedersen commitment setup over one or more bases, drawing fresh randomness.
///
/// Two calls on the same bases produce different keys. Use [`setup_with_rng`]
/// with a seeded generator for reproducible output.
pub fn setup(bases: Vec<Vec<G1Affine>>) -> Result<CommitmentKeyPair, SetupError> {
    let mut rng = ChaCha20Rng::from_entropy();
    setup_with_rng(bases, &mut rng)
}

pub fn setup_with_rng<R: RngCore + CryptoRng>(
    bases: Vec<Vec<G1Affine>>,
    rng: &mut R,
) -> Result<CommitmentKeyPair, SetupError> {
    check_bases(&bases)?;

    let (g_scalar, _) = random_invertible(rng);
    let g = (G2Affine::generator() * g_scalar).into_affine();
    let (sigma, sigma_inv) = random_invertible(rng);
    let g_root_sigma_neg = (g * (-sigma_inv)).into_affine();

    let proving_keys: Vec<ProvingKey> = bases
        .into_iter()
        .map(|basis| {
            let basis_exp_sigma = scale_basis(&basis, sigma);
            ProvingKey { basis, basis_exp_sigma }
        })
        .collect();

    info!(shards = proving_keys.len(), "Pedersen commitment keys derived");
    Ok(CommitmentKeyPair {
        proving_keys,
        verifying_key: VerifyingKey { g, g_root_sigma_neg },
    })
}

fn check_bases(bases: &[Vec<G1Affine>]) -> Result<(), SetupError> {
    if bases.is_empty() {
        return Err(SetupError::NoBasis);
    }
    for (shard, basis) in bases.iter().enumerate() {
        if basis.is_empty() {
            return Err(SetupError::EmptyBasis { shard });
        }
        let compacted = compact_points(basis);
        if let Some(first) = compacted.first_infinity() {
            return Err(SetupError::DegenerateBasis {
                shard,
                first,
                identities: compacted.infinity_count(),
            });
        }
        debug!(shard, points = basis.len(), "basis accepted");
    }
    Ok(())
}

fn random_invertible<R: RngCore + CryptoRng>(rng: &mut R) -> (Fr, Fr) {
    loop {
        let candidate = Fr::rand(rng);
        if let Some(inverse) = candidate.inverse() {
            return (candidate, inverse);
        }
    }
}

fn scale_basis(basis: &[G1Affine], sigma: Fr) -> Vec<G1Affine> {
    let scaled: Vec<G1Projective> = basis.par_iter().map(|point| *point * sigma).collect();
    G1Projective::normalize_batch(&scaled)
}

/// Checks `e(σ·B, -σ⁻¹·g) · e(B, g) == 1` on a random combination of the basis.
pub fn verify_key_pair<R: RngCore>(pk: &ProvingKey, vk: &VerifyingKey, rng: &mut R) -> bool {
    if pk.basis.is_empty() || pk.basis.len() != pk.basis_exp_sigma.len() {
        return false;
    }
    let coeffs: Vec<Fr> = (0..pk.basis.len()).map(|_| Fr::rand(rng)).collect();
    let (folded, folded_sigma) = match (
        G1Projective::msm(&pk.basis, &coeffs),
        G1Projective::msm(&pk.basis_exp_sigma, &coeffs),
    ) {
        (Ok(folded), Ok(folded_sigma)) => (folded, folded_sigma),
        _ => return false,
    };
    Bls12_381::multi_pairing(
        [folded_sigma.into_affine(), folded.into_affine()],
        [vk.g_root_sigma_neg, vk.g],
    )
    .is_zero()
}
