//! Layer-by-layer architecture summaries

use std::fmt;

use crate::init::{Activation, KernelInit};
use crate::shape::InputShape;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    Conv1d {
        filters: usize,
        kernel_size: usize,
        activation: Activation,
        init: KernelInit,
    },
    BatchNorm,
    MaxPool1d {
        pool_size: usize,
    },
    Flatten,
    Dense {
        units: usize,
        activation: Activation,
        init: KernelInit,
    },
    Dropout {
        rate: f64,
    },
    Lstm {
        units: usize,
        return_sequences: bool,
    },
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Conv1d { .. } => "Conv1D",
            LayerKind::BatchNorm => "BatchNorm",
            LayerKind::MaxPool1d { .. } => "MaxPool1D",
            LayerKind::Flatten => "Flatten",
            LayerKind::Dense { .. } => "Dense",
            LayerKind::Dropout { .. } => "Dropout",
            LayerKind::Lstm { .. } => "LSTM",
        }
    }
}

/// One row of a [`NetworkSummary`]. `output_shape` excludes the batch axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSummary {
    pub kind: LayerKind,
    pub output_shape: Vec<usize>,
    pub params: usize,
}

impl LayerSummary {
    pub fn conv1d(
        channels_in: usize,
        filters: usize,
        kernel_size: usize,
        length_out: usize,
        activation: Activation,
        init: KernelInit,
    ) -> Self {
        Self {
            kind: LayerKind::Conv1d {
                filters,
                kernel_size,
                activation,
                init,
            },
            output_shape: vec![length_out, filters],
            params: kernel_size * channels_in * filters + filters,
        }
    }

    /// Counts gamma, beta and both running statistics.
    pub fn batch_norm(length: usize, channels: usize) -> Self {
        Self {
            kind: LayerKind::BatchNorm,
            output_shape: vec![length, channels],
            params: 4 * channels,
        }
    }

    pub fn max_pool1d(pool_size: usize, length_out: usize, channels: usize) -> Self {
        Self {
            kind: LayerKind::MaxPool1d { pool_size },
            output_shape: vec![length_out, channels],
            params: 0,
        }
    }

    pub fn flatten(width: usize) -> Self {
        Self {
            kind: LayerKind::Flatten,
            output_shape: vec![width],
            params: 0,
        }
    }

    pub fn dense(d_in: usize, units: usize, activation: Activation, init: KernelInit) -> Self {
        Self {
            kind: LayerKind::Dense {
                units,
                activation,
                init,
            },
            output_shape: vec![units],
            params: d_in * units + units,
        }
    }

    pub fn dropout(rate: f64, output_shape: Vec<usize>) -> Self {
        Self {
            kind: LayerKind::Dropout { rate },
            output_shape,
            params: 0,
        }
    }

    /// Four gates, each with biased input and hidden projections.
    pub fn lstm(d_in: usize, units: usize, timesteps: usize, return_sequences: bool) -> Self {
        let output_shape = if return_sequences {
            vec![timesteps, units]
        } else {
            vec![units]
        };
        Self {
            kind: LayerKind::Lstm {
                units,
                return_sequences,
            },
            output_shape,
            params: 4 * units * (d_in + units + 2),
        }
    }
}

/// Ordered, layer-by-layer description of a network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSummary {
    pub name: String,
    pub input: InputShape,
    pub layers: Vec<LayerSummary>,
}

impl NetworkSummary {
    pub fn new(name: impl Into<String>, input: InputShape) -> Self {
        Self {
            name: name.into(),
            input,
            layers: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: LayerSummary) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn total_params(&self) -> usize {
        self.layers.iter().map(|layer| layer.params).sum()
    }

    /// Width of the last layer's output.
    pub fn output_units(&self) -> Option<usize> {
        self.layers
            .last()
            .and_then(|layer| layer.output_shape.last().copied())
    }

    /// Activation of the final layer, if it is a dense or conv layer.
    pub fn output_activation(&self) -> Option<Activation> {
        match self.layers.last().map(|layer| layer.kind) {
            Some(LayerKind::Dense { activation, .. }) | Some(LayerKind::Conv1d { activation, .. }) => {
                Some(activation)
            }
            _ => None,
        }
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.kind.name()).collect()
    }
}

impl fmt::Display for NetworkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (input: {} x {})",
            self.name, self.input.timesteps, self.input.features
        )?;
        writeln!(f, "{:<4}{:<12}{:<16}{:<18}{:>10}", "#", "layer", "output", "detail", "params")?;
        for (index, layer) in self.layers.iter().enumerate() {
            let shape = layer
                .output_shape
                .iter()
                .map(|dim| dim.to_string())
                .collect::<Vec<_>>()
                .join(" x ");
            let detail = match layer.kind {
                LayerKind::Conv1d {
                    kernel_size,
                    activation,
                    ..
                } => format!("k={} {}", kernel_size, activation.name()),
                LayerKind::MaxPool1d { pool_size } => format!("pool={}", pool_size),
                LayerKind::Dense { activation, init, .. } => {
                    format!("{} {}", activation.name(), init.name())
                }
                LayerKind::Dropout { rate } => format!("rate={}", rate),
                LayerKind::Lstm {
                    return_sequences, ..
                } => String::from(if return_sequences { "sequences" } else { "last" }),
                LayerKind::BatchNorm | LayerKind::Flatten => String::new(),
            };
            writeln!(
                f,
                "{:<4}{:<12}{:<16}{:<18}{:>10}",
                index + 1,
                layer.kind.name(),
                shape,
                detail,
                layer.params
            )?;
        }
        write!(f, "total params: {}", self.total_params())
    }
}
