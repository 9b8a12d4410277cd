use crate::errors::Result;
use crate::pedersen::{CommitmentKeyPair, ProvingKey, VerifyingKey};
use libs::errors::ArtifactError;
use libs::iotools::{ArtifactLayout, StagedWrites};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes a commitment key pair as `vk` plus `pk0..pkN-1` inside one directory.
#[derive(Clone, Debug)]
pub struct KeyMaterializer {
    layout: ArtifactLayout,
}

impl KeyMaterializer {
    pub fn new(layout: ArtifactLayout) -> Self {
        KeyMaterializer { layout }
    }

    /// Returns the written paths: the verifying key first, then the proving keys by index.
    ///
    /// Every key is encoded before anything touches the disk, and the files are
    /// renamed into place only once all of them were staged, so a failure leaves
    /// no new artifact behind.
    pub fn materialize(&self, pair: &CommitmentKeyPair) -> Result<Vec<PathBuf>> {
        let vk_bytes = pair.verifying_key.to_binary()?;
        let pk_bytes = pair
            .proving_keys
            .iter()
            .map(ProvingKey::to_binary)
            .collect::<std::result::Result<Vec<_>, ArtifactError>>()?;

        let mut batch = StagedWrites::new();
        batch.stage(self.layout.verifying_key(), &vk_bytes)?;
        for (index, bytes) in pk_bytes.iter().enumerate() {
            batch.stage(self.layout.proving_key(index), bytes)?;
        }
        let written = batch.commit()?;

        info!(
            dir = ?self.layout.dir(),
            proving_keys = pair.proving_keys.len(),
            "Commitment keys written"
        );
        Ok(written)
    }

    pub fn load_verifying_key(&self) -> Result<VerifyingKey> {
        Ok(VerifyingKey::read_from_binary(self.layout.verifying_key())?)
    }

    pub fn load_proving_key(&self, index: usize) -> Result<ProvingKey> {
        Ok(ProvingKey::read_from_binary(self.layout.proving_key(index))?)
    }
}

pub fn materialize(pair: &CommitmentKeyPair, output_dir: &Path) -> Result<Vec<PathBuf>> {
    KeyMaterializer::new(ArtifactLayout::new(output_dir)).materialize(pair)
}
