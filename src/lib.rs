//! Policy and value network factories for a reinforcement-learning agent.
//!
//! Every factory takes an observation shape (`[timesteps, features]`) and
//! returns an untrained burn [`Module`](burn::module::Module), ready to be
//! handed to a training loop:
//!
//! - [`create_cnn_attention_policy_network`] / [`create_cnn_attention_value_network`]
//! - [`create_lstm_policy_network`] / [`create_lstm_value_network`]

pub mod checkpoint;
pub mod error;
pub mod init;
pub mod networks;
pub mod shape;
pub mod summary;

pub use checkpoint::{load_network, save_network};
pub use error::{NetworkError, Result};
pub use init::{Activation, KernelInit};
pub use networks::cnn::{
    CNN_POLICY_OUTPUT_UNITS, create_cnn_attention_policy_network,
    create_cnn_attention_value_network,
};
pub use networks::lstm::{
    DEFAULT_LSTM_UNITS, DEFAULT_POLICY_OUTPUT_UNITS, create_lstm_policy_network,
    create_lstm_value_network,
};
pub use networks::{CnnNetwork, ConvNetConfig, HeadConfig, LstmNetConfig, LstmNetwork};
pub use shape::InputShape;
pub use summary::{LayerKind, LayerSummary, NetworkSummary};
