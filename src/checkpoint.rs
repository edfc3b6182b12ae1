//! Persisting networks to disk

use std::path::Path;

use burn::module::Module;
use burn::prelude::*;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder};

use crate::error::{NetworkError, Result};

fn recorder() -> NamedMpkFileRecorder<FullPrecisionSettings> {
    NamedMpkFileRecorder::<FullPrecisionSettings>::new()
}

/// Save a network's weights. The recorder appends the `.mpk` extension.
pub fn save_network<B: Backend, M: Module<B>>(network: M, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    network
        .save_file(path.to_path_buf(), &recorder())
        .map_err(|err| NetworkError::Checkpoint {
            path: path.to_path_buf(),
            reason: format!("{:?}", err),
        })?;
    tracing::info!("Saved network to {}", path.display());
    Ok(())
}

/// Load weights saved by [`save_network`] into a network of the same architecture.
pub fn load_network<B: Backend, M: Module<B>>(
    network: M,
    path: impl AsRef<Path>,
    device: &B::Device,
) -> Result<M> {
    let path = path.as_ref();
    let network = network
        .load_file(path.to_path_buf(), &recorder(), device)
        .map_err(|err| NetworkError::Checkpoint {
            path: path.to_path_buf(),
            reason: format!("{:?}", err),
        })?;
    tracing::info!("Loaded network from {}", path.display());
    Ok(network)
}
