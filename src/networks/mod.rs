//! Policy and value network architectures
//!
//! ```text
//! observation [batch, timesteps, features]
//!     │
//!     ├── cnn:  3 x (Conv1D → BatchNorm → MaxPool1D) → Flatten → 2 x (Dense → Dropout)
//!     │
//!     └── lstm: LSTM(seq) → Dropout → LSTM(last) → Dropout → Dense(25, L2)
//!     │
//!     ▼
//! head: Dense(units) + activation
//! ```

use burn::nn::Linear;
use burn::prelude::*;

use crate::error::{self, non_zero};
use crate::init::{Activation, KernelInit};
use crate::summary::LayerSummary;

pub mod cnn;
pub mod lstm;

pub use cnn::{CnnNetwork, ConvNetConfig};
pub use lstm::{LstmNetConfig, LstmNetwork};

/// Output layer of a network
#[derive(Config, Debug, PartialEq)]
pub struct HeadConfig {
    pub units: usize,
    pub activation: Activation,
    pub init: KernelInit,
}

impl HeadConfig {
    /// Continuous actions squashed into `[-1, 1]`
    pub fn tanh_policy(units: usize) -> Self {
        Self::new(units, Activation::Tanh, KernelInit::GlorotUniform)
    }

    /// Action probabilities in `[0, 1]`
    pub fn sigmoid_policy(units: usize) -> Self {
        Self::new(units, Activation::Sigmoid, KernelInit::GlorotUniform)
    }

    /// Single unbounded state-value estimate
    pub fn value(init: KernelInit) -> Self {
        Self::new(1, Activation::Linear, init)
    }

    pub(crate) fn init<B: Backend>(&self, d_in: usize, device: &B::Device) -> error::Result<Linear<B>> {
        non_zero("output units", self.units)?;
        Ok(self.init.linear(d_in, self.units, device))
    }

    pub(crate) fn summary(&self, d_in: usize) -> LayerSummary {
        LayerSummary::dense(d_in, self.units, self.activation, self.init)
    }

    pub(crate) fn forward<B: Backend>(&self, head: &Linear<B>, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.activation.apply(head.forward(x))
    }
}
