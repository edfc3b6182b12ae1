//! Kernel initializers and output activations used by the network heads

use burn::module::Param;
use burn::nn::conv::{Conv1d, Conv1dConfig};
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::{relu, sigmoid, tanh};

/// Kernel initialization schemes for conv and dense kernels.
#[derive(Config, Debug, PartialEq, Eq, Copy)]
pub enum KernelInit {
    /// `U(-sqrt(6 / fan_in), sqrt(6 / fan_in))`
    HeUniform,
    /// `N(0, sqrt(2 / fan_in))`
    HeNormal,
    /// `U(-sqrt(6 / (fan_in + fan_out)), sqrt(6 / (fan_in + fan_out)))`
    GlorotUniform,
}

impl KernelInit {
    pub fn initializer(self) -> Initializer {
        match self {
            // burn scales Kaiming uniform bounds by sqrt(3) * gain
            KernelInit::HeUniform => Initializer::KaimingUniform {
                gain: std::f64::consts::SQRT_2,
                fan_out_only: false,
            },
            KernelInit::HeNormal => Initializer::KaimingNormal {
                gain: std::f64::consts::SQRT_2,
                fan_out_only: false,
            },
            KernelInit::GlorotUniform => Initializer::XavierUniform { gain: 1.0 },
        }
    }

    /// Dense layer with this kernel initializer and a zero bias.
    pub fn linear<B: Backend>(self, d_in: usize, d_out: usize, device: &B::Device) -> Linear<B> {
        let mut linear = LinearConfig::new(d_in, d_out)
            .with_initializer(self.initializer())
            .init(device);
        linear.bias = linear.bias.map(zeroed);
        linear
    }

    /// Unpadded conv layer with this kernel initializer and a zero bias.
    pub fn conv1d<B: Backend>(
        self,
        channels_in: usize,
        channels_out: usize,
        kernel_size: usize,
        device: &B::Device,
    ) -> Conv1d<B> {
        let mut conv = Conv1dConfig::new(channels_in, channels_out, kernel_size)
            .with_initializer(self.initializer())
            .init(device);
        conv.bias = conv.bias.map(zeroed);
        conv
    }

    pub fn name(self) -> &'static str {
        match self {
            KernelInit::HeUniform => "he_uniform",
            KernelInit::HeNormal => "he_normal",
            KernelInit::GlorotUniform => "glorot_uniform",
        }
    }
}

// burn draws biases from the kernel distribution; biases start at zero here
fn zeroed<B: Backend>(bias: Param<Tensor<B, 1>>) -> Param<Tensor<B, 1>> {
    let bias = bias.val();
    Param::from_tensor(Tensor::zeros(bias.shape(), &bias.device()))
}

/// Activation applied after a dense or convolutional layer.
#[derive(Config, Debug, PartialEq, Eq, Copy)]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Activation {
    pub fn apply<B: Backend, const D: usize>(self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Activation::Linear => x,
            Activation::Relu => relu(x),
            Activation::Tanh => tanh(x),
            Activation::Sigmoid => sigmoid(x),
        }
    }

    /// Closed interval every output of this activation lies in, if bounded.
    pub fn range(self) -> Option<(f32, f32)> {
        match self {
            Activation::Linear => None,
            Activation::Relu => Some((0.0, f32::INFINITY)),
            Activation::Tanh => Some((-1.0, 1.0)),
            Activation::Sigmoid => Some((0.0, 1.0)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
        }
    }
}
