//! Recurrent policy and value networks, kept for experimentation alongside
//! the convolutional ones

use burn::module::Ignored;
use burn::nn::{Dropout, DropoutConfig, Linear, Lstm, LstmConfig, Relu};
use burn::prelude::*;

use super::HeadConfig;
use crate::error::{self, non_zero};
use crate::init::{Activation, KernelInit};
use crate::shape::InputShape;
use crate::summary::{LayerSummary, NetworkSummary};

pub const DEFAULT_LSTM_UNITS: usize = 64;
pub const DEFAULT_POLICY_OUTPUT_UNITS: usize = 2;

/// Configuration for the LSTM networks
#[derive(Config, Debug)]
pub struct LstmNetConfig {
    pub name: String,
    pub input: InputShape,
    pub head: HeadConfig,
    #[config(default = 64)]
    pub lstm_units: usize,
    /// Width of the dense layer between the recurrent stack and the head
    #[config(default = 25)]
    pub hidden_units: usize,
    #[config(default = "KernelInit::HeNormal")]
    pub hidden_init: KernelInit,
    /// L2 coefficient on the hidden dense kernel
    #[config(default = 0.01)]
    pub l2_penalty: f64,
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl LstmNetConfig {
    fn validate(&self) -> error::Result<()> {
        self.input.validate()?;
        non_zero("lstm units", self.lstm_units)?;
        non_zero("hidden units", self.hidden_units)?;
        non_zero("output units", self.head.units)?;
        Ok(())
    }

    pub fn summary(&self) -> error::Result<NetworkSummary> {
        self.validate()?;
        let units = self.lstm_units;
        let timesteps = self.input.timesteps;

        let mut summary = NetworkSummary::new(self.name.clone(), self.input);
        summary.push(LayerSummary::lstm(self.input.features, units, timesteps, true));
        summary.push(LayerSummary::dropout(self.dropout, vec![timesteps, units]));
        summary.push(LayerSummary::lstm(units, units, timesteps, false));
        summary.push(LayerSummary::dropout(self.dropout, vec![units]));
        summary.push(LayerSummary::dense(
            units,
            self.hidden_units,
            Activation::Relu,
            self.hidden_init,
        ));
        summary.push(self.head.summary(self.hidden_units));
        Ok(summary)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> error::Result<LstmNetwork<B>> {
        let summary = self.summary()?;
        let recurrent_init = KernelInit::GlorotUniform.initializer();

        let sequence = LstmConfig::new(self.input.features, self.lstm_units, true)
            .with_initializer(recurrent_init.clone())
            .init(device);
        let last = LstmConfig::new(self.lstm_units, self.lstm_units, true)
            .with_initializer(recurrent_init)
            .init(device);
        let hidden = self
            .hidden_init
            .linear(self.lstm_units, self.hidden_units, device);
        let head = self.head.init(self.hidden_units, device)?;

        tracing::debug!(
            "Assembled {}: input {}x{}, {} lstm units, {} params",
            self.name,
            self.input.timesteps,
            self.input.features,
            self.lstm_units,
            summary.total_params()
        );

        Ok(LstmNetwork {
            sequence,
            last,
            hidden,
            head,
            dropout: DropoutConfig::new(self.dropout).init(),
            activation: Relu::new(),
            config: Ignored(self.clone()),
            summary: Ignored(summary),
        })
    }
}

/// Two stacked LSTMs followed by a small dense layer and the head
#[derive(Module, Debug)]
pub struct LstmNetwork<B: Backend> {
    /// Returns the full sequence
    sequence: Lstm<B>,
    /// Only its final hidden state is used
    last: Lstm<B>,
    hidden: Linear<B>,
    head: Linear<B>,
    dropout: Dropout,
    activation: Relu,
    config: Ignored<LstmNetConfig>,
    summary: Ignored<NetworkSummary>,
}

impl<B: Backend> LstmNetwork<B> {
    /// `[batch, timesteps, features]` → `[batch, head units]`. Any number of
    /// timesteps is accepted.
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let (x, _) = self.sequence.forward(input, None);
        let x = self.dropout.forward(x);

        let (_, state) = self.last.forward(x, None);
        let x = self.dropout.forward(state.hidden);

        let x = self.activation.forward(self.hidden.forward(x));
        self.config.0.head.forward(&self.head, x)
    }

    /// `l2 * sum(W^2)` over the hidden dense kernel. Add it to the training
    /// loss to reproduce the kernel regularizer.
    pub fn regularization_loss(&self) -> Tensor<B, 1> {
        self.hidden
            .weight
            .val()
            .powf_scalar(2.0)
            .sum()
            .mul_scalar(self.config.0.l2_penalty)
    }

    pub fn config(&self) -> &LstmNetConfig {
        &self.config.0
    }

    pub fn summary(&self) -> &NetworkSummary {
        &self.summary.0
    }
}

/// Policy network with `output_units` sigmoid outputs.
///
/// Use [`DEFAULT_LSTM_UNITS`] and [`DEFAULT_POLICY_OUTPUT_UNITS`] for the
/// stock configuration.
pub fn create_lstm_policy_network<B: Backend>(
    input_shape: impl Into<InputShape>,
    lstm_units: usize,
    output_units: usize,
    device: &B::Device,
) -> error::Result<LstmNetwork<B>> {
    LstmNetConfig::new(
        "lstm_policy".to_string(),
        input_shape.into(),
        HeadConfig::sigmoid_policy(output_units),
    )
    .with_lstm_units(lstm_units)
    .init(device)
}

/// Value network with a single linear output.
pub fn create_lstm_value_network<B: Backend>(
    input_shape: impl Into<InputShape>,
    lstm_units: usize,
    device: &B::Device,
) -> error::Result<LstmNetwork<B>> {
    LstmNetConfig::new(
        "lstm_value".to_string(),
        input_shape.into(),
        HeadConfig::value(KernelInit::GlorotUniform),
    )
    .with_lstm_units(lstm_units)
    .init(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::summary::LayerKind;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    #[test]
    fn test_policy_layer_sequence() {
        let device = Default::default();
        let network = create_lstm_policy_network::<TestBackend>(
            (10, 6),
            DEFAULT_LSTM_UNITS,
            DEFAULT_POLICY_OUTPUT_UNITS,
            &device,
        )
        .unwrap();
        let summary = network.summary();

        assert_eq!(
            summary.layer_names(),
            vec!["LSTM", "Dropout", "LSTM", "Dropout", "Dense", "Dense"]
        );
        assert_eq!(summary.layers[0].output_shape, vec![10, 64]);
        assert_eq!(summary.layers[2].output_shape, vec![64]);
        assert_eq!(
            summary.layers[4].kind,
            LayerKind::Dense {
                units: 25,
                activation: Activation::Relu,
                init: KernelInit::HeNormal,
            }
        );
        assert_eq!(summary.output_units(), Some(2));
        assert_eq!(summary.output_activation(), Some(Activation::Sigmoid));
    }

    #[test]
    fn test_policy_output_matches_requested_size() {
        let device = Default::default();
        let network = create_lstm_policy_network::<TestBackend>((12, 4), 16, 7, &device).unwrap();

        let input = Tensor::random([3, 12, 4], Distribution::Normal(0.0, 1.0), &device);
        let output = network.forward(input);
        assert_eq!(output.dims(), [3, 7]);

        let values: Vec<f32> = output.into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_value_network() {
        let device = Default::default();
        let network = create_lstm_value_network::<TestBackend>((12, 4), 32, &device).unwrap();
        assert_eq!(network.summary().output_units(), Some(1));
        assert_eq!(network.summary().output_activation(), Some(Activation::Linear));

        // sequence length is not fixed by the input shape
        let output = network.forward(Tensor::ones([2, 1, 4], &device));
        assert_eq!(output.dims(), [2, 1]);
    }

    #[test]
    fn test_dense_biases_start_at_zero() {
        let device = Default::default();
        let network = create_lstm_value_network::<TestBackend>((5, 3), 8, &device).unwrap();

        for layer in [&network.hidden, &network.head] {
            let bias: Vec<f32> = layer.bias.as_ref().unwrap().val().into_data().to_vec().unwrap();
            assert!(bias.iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn test_regularization_loss() {
        let device = Default::default();
        let network = create_lstm_value_network::<TestBackend>((5, 3), 8, &device).unwrap();
        let penalty = network.regularization_loss().into_scalar().elem::<f32>();
        assert!(penalty > 0.0);

        let unregularized = LstmNetConfig::new(
            "plain".to_string(),
            InputShape::new(5, 3),
            HeadConfig::value(KernelInit::GlorotUniform),
        )
        .with_l2_penalty(0.0)
        .init::<TestBackend>(&device)
        .unwrap();
        let penalty = unregularized.regularization_loss().into_scalar().elem::<f32>();
        assert_eq!(penalty, 0.0);
    }

    #[test]
    fn test_rejects_zero_units() {
        let device = Default::default();
        let err = create_lstm_policy_network::<TestBackend>((5, 3), 0, 2, &device).unwrap_err();
        assert_eq!(err, NetworkError::EmptyDimension { name: "lstm units" });

        let err = create_lstm_policy_network::<TestBackend>((5, 3), 8, 0, &device).unwrap_err();
        assert_eq!(err, NetworkError::EmptyDimension { name: "output units" });
    }
}
