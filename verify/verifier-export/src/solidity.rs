use ark_bls12_381::{Bls12_381, Fr};
use ark_ff::{BigInteger, PrimeField};
use ark_groth16::VerifyingKey;
use libs::errors::{ArtifactError, Result};
use libs::iotools::{split_g1, split_g2, StagedWrites};
use std::path::Path;

/// Solidity verifier contract generator
pub struct SolidityVerifierGenerator;

impl SolidityVerifierGenerator {
    /// Generate a BLS12-381 Groth16 verifier contract (EIP-2537 precompiles) from a verifying key
    pub fn generate_verifier_contract(vk: &VerifyingKey<Bls12_381>) -> Result<String> {
        let public_inputs = match vk.gamma_abc_g1.len() {
            0 => {
                return Err(ArtifactError::Validation(
                    "verifying key has no gamma_abc_g1 points".to_string(),
                ))
            }
            len => len - 1,
        };

        let input_param = if public_inputs == 0 {
            String::new()
        } else {
            format!(", uint256[{}] calldata input", public_inputs)
        };
        let input_doc = if public_inputs == 0 {
            String::new()
        } else {
            "\n     * @param input Public inputs, each below the scalar field modulus".to_string()
        };

        let msm_lines = vk
            .gamma_abc_g1
            .iter()
            .enumerate()
            .map(|(j, point)| {
                let scalar = if j == 0 { "1".to_string() } else { format!("input[{}]", j - 1) };
                let mut words = split_g1(point).to_vec();
                words.push(scalar);
                format!("        // IC[{}]\n{}", j, assign_words("msmInput", 5 * j, &words))
            })
            .collect::<Vec<_>>()
            .join("\n");

        let alpha = assign_words("pairingInput", 12, &split_g1(&vk.alpha_g1));
        let beta_neg = assign_words("pairingInput", 16, &split_g2(&-vk.beta_g2));
        let gamma_neg = assign_words("pairingInput", 28, &split_g2(&-vk.gamma_g2));
        let delta_neg = assign_words("pairingInput", 40, &split_g2(&-vk.delta_g2));

        let msm_words = 5 * vk.gamma_abc_g1.len();
        let contract = format!(r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.24;

/**
 * @title Groth16Verifier
 * @dev Groth16 verifier over BLS12-381 using the EIP-2537 precompiles.
 * Generated automatically from verification key.
 * Every base field element is a pair of words: its high 16 bytes and its low 32 bytes.
 */
contract Groth16Verifier {{
    // BLS12-381 scalar field modulus
    uint256 constant R = {modulus};

    uint256 constant G1_MSM = 0x0c;
    uint256 constant PAIRING_CHECK = 0x0f;

    uint256 constant PUBLIC_INPUTS = {public_inputs};

    /**
     * @dev Checks e(A, B) * e(alpha, -beta) * e(vk_x, -gamma) * e(C, -delta) == 1
     * @param proof A (4 words), B (8 words: x.c0, x.c1, y.c0, y.c1), C (4 words){input_doc}
     * @return True if proof is valid
     */
    function verifyProof(uint256[16] calldata proof{input_param}) public view returns (bool) {{
        uint256[{msm_words}] memory msmInput;
{msm_lines}
        for (uint256 i = 4; i < {msm_words}; i += 5) {{
            require(msmInput[i] < R, "input not in scalar field");
        }}

        uint256[4] memory vkX;
        bool success;
        assembly {{
            success := staticcall(gas(), G1_MSM, msmInput, {msm_bytes}, vkX, 0x80)
        }}
        require(success, "G1 MSM failed");

        uint256[48] memory pairingInput;
        // (A, B)
        for (uint256 i = 0; i < 12; i++) {{
            pairingInput[i] = proof[i];
        }}
        // (alpha, -beta)
{alpha}
{beta_neg}
        // (vk_x, -gamma)
        for (uint256 i = 0; i < 4; i++) {{
            pairingInput[24 + i] = vkX[i];
        }}
{gamma_neg}
        // (C, -delta)
        for (uint256 i = 0; i < 4; i++) {{
            pairingInput[36 + i] = proof[12 + i];
        }}
{delta_neg}

        uint256[1] memory out;
        assembly {{
            success := staticcall(gas(), PAIRING_CHECK, pairingInput, 0x600, out, 0x20)
        }}
        require(success, "pairing check failed");
        return out[0] == 1;
    }}
}}
"#,
            modulus = scalar_modulus_hex(),
            public_inputs = public_inputs,
            input_doc = input_doc,
            input_param = input_param,
            msm_words = msm_words,
            msm_lines = msm_lines,
            msm_bytes = msm_words * 32,
            alpha = alpha,
            beta_neg = beta_neg,
            gamma_neg = gamma_neg,
            delta_neg = delta_neg,
        );

        Ok(contract)
    }

    /// Save verifier contract to file; the file appears only once fully written
    pub fn save_verifier_contract<P: AsRef<Path>>(contract: &str, path: P) -> Result<()> {
        let mut batch = StagedWrites::new();
        batch.stage(path.as_ref().to_path_buf(), contract.as_bytes())?;
        batch.commit()?;
        Ok(())
    }
}

fn assign_words(target: &str, start: usize, words: &[String]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| format!("        {}[{}] = {};", target, start + i, word))
        .collect::<Vec<_>>()
        .join("\n")
}

fn scalar_modulus_hex() -> String {
    format!("0x{}", hex::encode(Fr::MODULUS.to_bytes_be()))
}
