//! Input-shape descriptor and sequence length arithmetic

use burn::prelude::*;

use crate::error::{self, non_zero};

/// Shape of a single observation, `[timesteps, features]`, channels last.
#[derive(Config, Debug, PartialEq, Eq, Copy)]
pub struct InputShape {
    pub timesteps: usize,
    pub features: usize,
}

impl InputShape {
    pub fn validate(&self) -> error::Result<Self> {
        non_zero("timesteps", self.timesteps)?;
        non_zero("features", self.features)?;
        Ok(*self)
    }
}

impl From<(usize, usize)> for InputShape {
    fn from((timesteps, features): (usize, usize)) -> Self {
        Self::new(timesteps, features)
    }
}

/// Output length of an unpadded, stride-1 convolution.
pub fn conv_valid_len(len: usize, kernel_size: usize) -> Option<usize> {
    len.checked_sub(kernel_size.saturating_sub(1))
        .filter(|&out| out > 0)
}

/// Output length of an unpadded pooling window.
pub fn pool_valid_len(len: usize, pool_size: usize, stride: usize) -> Option<usize> {
    if pool_size == 0 || stride == 0 || len < pool_size {
        return None;
    }
    Some((len - pool_size) / stride + 1)
}

/// Sequence lengths after each stage of the three-block conv stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvLengths {
    pub conv1: usize,
    pub pool1: usize,
    pub conv2: usize,
    pub pool2: usize,
    pub conv3: usize,
}

impl ConvLengths {
    pub fn compute(timesteps: usize, kernel_size: usize, pool_size: usize) -> Option<Self> {
        let conv1 = conv_valid_len(timesteps, kernel_size)?;
        let pool1 = pool_valid_len(conv1, pool_size, pool_size)?;
        let conv2 = conv_valid_len(pool1, kernel_size)?;
        let pool2 = pool_valid_len(conv2, pool_size, pool_size)?;
        let conv3 = conv_valid_len(pool2, kernel_size)?;
        Some(Self {
            conv1,
            pool1,
            conv2,
            pool2,
            conv3,
        })
    }

    /// Smallest number of timesteps that leaves one step after the last conv.
    pub fn min_timesteps(kernel_size: usize, pool_size: usize) -> usize {
        let grow = kernel_size.saturating_sub(1);
        ((1 + grow) * pool_size + grow) * pool_size + grow
    }
}
