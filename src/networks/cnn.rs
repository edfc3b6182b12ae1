//! One-dimensional convolutional policy and value networks

use burn::module::Ignored;
use burn::nn::conv::Conv1d;
use burn::nn::pool::{MaxPool1d, MaxPool1dConfig};
use burn::nn::{BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, Relu};
use burn::prelude::*;

use super::HeadConfig;
use crate::error::{self, NetworkError, non_zero};
use crate::init::{Activation, KernelInit};
use crate::shape::{ConvLengths, InputShape};
use crate::summary::{LayerSummary, NetworkSummary};

/// Number of continuous actions produced by the CNN policy
pub const CNN_POLICY_OUTPUT_UNITS: usize = 2;

/// Configuration for the convolutional networks
#[derive(Config, Debug)]
pub struct ConvNetConfig {
    pub name: String,
    pub input: InputShape,
    pub head: HeadConfig,
    /// Initializer for every conv and hidden dense kernel
    #[config(default = "KernelInit::HeUniform")]
    pub kernel_init: KernelInit,
    #[config(default = "[64, 128, 256]")]
    pub conv_filters: [usize; 3],
    #[config(default = 3)]
    pub kernel_size: usize,
    /// Pool window, also used as the pool stride
    #[config(default = 2)]
    pub pool_size: usize,
    #[config(default = "[256, 128]")]
    pub dense_units: [usize; 2],
    #[config(default = 0.2)]
    pub dropout: f64,
    /// Weight of the current batch in the running statistics
    #[config(default = 0.01)]
    pub norm_momentum: f64,
    #[config(default = 1e-3)]
    pub norm_epsilon: f64,
}

impl ConvNetConfig {
    fn lengths(&self) -> error::Result<ConvLengths> {
        let input = self.input.validate()?;
        non_zero("kernel size", self.kernel_size)?;
        non_zero("pool size", self.pool_size)?;
        for filters in self.conv_filters {
            non_zero("conv filters", filters)?;
        }
        for units in self.dense_units {
            non_zero("dense units", units)?;
        }
        non_zero("output units", self.head.units)?;

        ConvLengths::compute(input.timesteps, self.kernel_size, self.pool_size).ok_or(
            NetworkError::SequenceTooShort {
                timesteps: input.timesteps,
                minimum: ConvLengths::min_timesteps(self.kernel_size, self.pool_size),
            },
        )
    }

    /// Width of the flattened feature map fed to the dense layers
    pub fn flatten_width(&self) -> error::Result<usize> {
        Ok(self.lengths()?.conv3 * self.conv_filters[2])
    }

    pub fn summary(&self) -> error::Result<NetworkSummary> {
        let lengths = self.lengths()?;
        let [f1, f2, f3] = self.conv_filters;
        let [d1, d2] = self.dense_units;
        let k = self.kernel_size;
        let init = self.kernel_init;
        let relu = Activation::Relu;
        let flat = lengths.conv3 * f3;

        let mut summary = NetworkSummary::new(self.name.clone(), self.input);
        summary.push(LayerSummary::conv1d(self.input.features, f1, k, lengths.conv1, relu, init));
        summary.push(LayerSummary::batch_norm(lengths.conv1, f1));
        summary.push(LayerSummary::max_pool1d(self.pool_size, lengths.pool1, f1));
        summary.push(LayerSummary::conv1d(f1, f2, k, lengths.conv2, relu, init));
        summary.push(LayerSummary::batch_norm(lengths.conv2, f2));
        summary.push(LayerSummary::max_pool1d(self.pool_size, lengths.pool2, f2));
        summary.push(LayerSummary::conv1d(f2, f3, k, lengths.conv3, relu, init));
        summary.push(LayerSummary::batch_norm(lengths.conv3, f3));
        summary.push(LayerSummary::flatten(flat));
        summary.push(LayerSummary::dense(flat, d1, relu, init));
        summary.push(LayerSummary::dropout(self.dropout, vec![d1]));
        summary.push(LayerSummary::dense(d1, d2, relu, init));
        summary.push(LayerSummary::dropout(self.dropout, vec![d2]));
        summary.push(self.head.summary(d2));
        Ok(summary)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<CnnNetwork<B>> {
        let summary = self.summary()?;
        let flat = self.flatten_width()?;
        let [f1, f2, f3] = self.conv_filters;
        let channels = [self.input.features, f1, f2, f3];

        // The last block feeds Flatten directly, without pooling
        let blocks = (0..3)
            .map(|i| ConvBlock::new(channels[i], channels[i + 1], i < 2, self, device))
            .collect();

        let [d1, d2] = self.dense_units;
        let dense = [(flat, d1), (d1, d2)]
            .into_iter()
            .map(|(d_in, d_out)| self.kernel_init.linear(d_in, d_out, device))
            .collect();

        let head = self.head.init(d2, device)?;

        tracing::debug!(
            "Assembled {}: input {}x{}, {} layers, {} params",
            self.name,
            self.input.timesteps,
            self.input.features,
            summary.len(),
            summary.total_params()
        );

        Ok(CnnNetwork {
            blocks,
            dense,
            head,
            dropout: DropoutConfig::new(self.dropout).init(),
            activation: Relu::new(),
            config: Ignored(self.clone()),
            summary: Ignored(summary),
        })
    }
}

/// Conv1D (ReLU) → BatchNorm → optional MaxPool1D
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv: Conv1d<B>,
    norm: BatchNorm<B, 1>,
    pool: Option<MaxPool1d>,
    activation: Relu,
}

impl<B: Backend> ConvBlock<B> {
    fn new(
        channels_in: usize,
        channels_out: usize,
        pooled: bool,
        config: &ConvNetConfig,
        device: &B::Device,
    ) -> Self {
        let conv = config
            .kernel_init
            .conv1d(channels_in, channels_out, config.kernel_size, device);
        let norm = BatchNormConfig::new(channels_out)
            .with_momentum(config.norm_momentum)
            .with_epsilon(config.norm_epsilon)
            .init(device);
        let pool = pooled.then(|| {
            MaxPool1dConfig::new(config.pool_size)
                .with_stride(config.pool_size)
                .init()
        });

        Self {
            conv,
            norm,
            pool,
            activation: Relu::new(),
        }
    }

    /// `[batch, channels_in, length]` → `[batch, channels_out, length_out]`
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self.activation.forward(self.conv.forward(x));
        let x = self.norm.forward(x);
        match &self.pool {
            Some(pool) => pool.forward(x),
            None => x,
        }
    }
}

/// Convolutional policy or value network
#[derive(Module, Debug)]
pub struct CnnNetwork<B: Backend> {
    blocks: Vec<ConvBlock<B>>,
    dense: Vec<Linear<B>>,
    head: Linear<B>,
    dropout: Dropout,
    activation: Relu,
    config: Ignored<ConvNetConfig>,
    summary: Ignored<NetworkSummary>,
}

impl<B: Backend> CnnNetwork<B> {
    /// `[batch, timesteps, features]` → `[batch, head units]`
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        // Conv1d expects channels first
        let mut x = input.swap_dims(1, 2);
        for block in &self.blocks {
            x = block.forward(x);
        }

        // Flatten in channels-last order
        let mut x = x.swap_dims(1, 2).flatten::<2>(1, 2);
        for layer in &self.dense {
            x = self
                .dropout
                .forward(self.activation.forward(layer.forward(x)));
        }

        self.config.0.head.forward(&self.head, x)
    }

    pub fn config(&self) -> &ConvNetConfig {
        &self.config.0
    }

    pub fn summary(&self) -> &NetworkSummary {
        &self.summary.0
    }
}

/// Policy network: three conv blocks, two dense layers, and a 2-unit tanh
/// head. Hidden kernels use He uniform initialization.
pub fn create_cnn_attention_policy_network<B: Backend>(
    input_shape: impl Into<InputShape>,
    device: &B::Device,
) -> error::Result<CnnNetwork<B>> {
    ConvNetConfig::new(
        "cnn_policy".to_string(),
        input_shape.into(),
        HeadConfig::tanh_policy(CNN_POLICY_OUTPUT_UNITS),
    )
    .with_kernel_init(KernelInit::HeUniform)
    .init(device)
}

/// Value network: the policy trunk with He normal hidden kernels and a single
/// linear unit.
pub fn create_cnn_attention_value_network<B: Backend>(
    input_shape: impl Into<InputShape>,
    device: &B::Device,
) -> error::Result<CnnNetwork<B>> {
    ConvNetConfig::new(
        "cnn_value".to_string(),
        input_shape.into(),
        HeadConfig::value(KernelInit::HeUniform),
    )
    .with_kernel_init(KernelInit::HeNormal)
    .init(device)
}
