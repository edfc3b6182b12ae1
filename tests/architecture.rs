use burn::backend::{Autodiff, NdArray};
use burn::prelude::*;
use burn::tensor::Distribution;
use rlnets::{
    Activation, ConvNetConfig, HeadConfig, InputShape, KernelInit, LayerKind, LstmNetConfig,
    create_cnn_attention_policy_network, create_cnn_attention_value_network,
    create_lstm_policy_network, create_lstm_value_network,
};

type TestBackend = NdArray;
type TrainBackend = Autodiff<NdArray>;

#[test]
fn test_every_network_output_matches_its_summary() {
    let device = Default::default();
    let shape = InputShape::new(24, 6);
    let input = Tensor::<TestBackend, 3>::random([5, 24, 6], Distribution::Default, &device);

    let cnn = [
        create_cnn_attention_policy_network::<TestBackend>(shape, &device).unwrap(),
        create_cnn_attention_value_network::<TestBackend>(shape, &device).unwrap(),
    ];
    for network in &cnn {
        let units = network.summary().output_units().unwrap();
        assert_eq!(network.forward(input.clone()).dims(), [5, units]);
    }

    let lstm = [
        create_lstm_policy_network::<TestBackend>(shape, 32, 3, &device).unwrap(),
        create_lstm_value_network::<TestBackend>(shape, 32, &device).unwrap(),
    ];
    for network in &lstm {
        let units = network.summary().output_units().unwrap();
        assert_eq!(network.forward(input.clone()).dims(), [5, units]);
    }
}

#[test]
fn test_cnn_summary_parameter_counts() {
    let device = Default::default();
    let network = create_cnn_attention_value_network::<TestBackend>((32, 8), &device).unwrap();
    let params: Vec<usize> = network
        .summary()
        .layers
        .iter()
        .map(|layer| layer.params)
        .collect();

    assert_eq!(
        params,
        vec![
            3 * 8 * 64 + 64,
            4 * 64,
            0,
            3 * 64 * 128 + 128,
            4 * 128,
            0,
            3 * 128 * 256 + 256,
            4 * 256,
            0,
            1024 * 256 + 256,
            0,
            256 * 128 + 128,
            0,
            128 + 1,
        ]
    );
}

#[test]
fn test_dropout_rates() {
    let device = Default::default();
    let network = create_lstm_value_network::<TestBackend>((8, 2), 16, &device).unwrap();
    let rates: Vec<f64> = network
        .summary()
        .layers
        .iter()
        .filter_map(|layer| match layer.kind {
            LayerKind::Dropout { rate } => Some(rate),
            _ => None,
        })
        .collect();
    assert_eq!(rates, vec![0.2, 0.2]);
}

#[test]
fn test_gradients_reach_the_input() {
    let device = Default::default();

    let network = create_cnn_attention_policy_network::<TrainBackend>((20, 4), &device).unwrap();
    let input =
        Tensor::<TrainBackend, 3>::random([2, 20, 4], Distribution::Default, &device).require_grad();
    let grads = network.forward(input.clone()).sum().backward();
    let grad = input.grad(&grads).expect("input gradient");
    assert_eq!(grad.dims(), [2, 20, 4]);

    let network = create_lstm_policy_network::<TrainBackend>((20, 4), 8, 2, &device).unwrap();
    let input =
        Tensor::<TrainBackend, 3>::random([2, 20, 4], Distribution::Default, &device).require_grad();
    let loss = network.forward(input.clone()).sum() + network.regularization_loss();
    let grads = loss.backward();
    assert!(input.grad(&grads).is_some());
}

#[test]
fn test_config_serializes() {
    let config = ConvNetConfig::new(
        "cnn_policy".to_string(),
        InputShape::new(32, 8),
        HeadConfig::tanh_policy(2),
    );
    let json = config.to_string();
    assert!(json.contains("\"conv_filters\""));
    assert_eq!(config.head.activation, Activation::Tanh);
}

#[test]
fn test_config_reloads_from_json() {
    let config = ConvNetConfig::new(
        "cnn_value".to_string(),
        InputShape::new(40, 5),
        HeadConfig::value(KernelInit::HeUniform),
    )
    .with_conv_filters([8, 16, 32])
    .with_dropout(0.1);
    let reloaded = ConvNetConfig::load_binary(config.to_string().as_bytes()).unwrap();
    assert_eq!(reloaded.input, config.input);
    assert_eq!(reloaded.head, config.head);
    assert_eq!(reloaded.conv_filters, [8, 16, 32]);
    assert_eq!(reloaded.kernel_init, KernelInit::HeUniform);

    let config = LstmNetConfig::new(
        "lstm_policy".to_string(),
        InputShape::new(12, 3),
        HeadConfig::sigmoid_policy(4),
    )
    .with_lstm_units(16);
    let reloaded = LstmNetConfig::load_binary(config.to_string().as_bytes()).unwrap();
    assert_eq!(reloaded.lstm_units, 16);
    assert_eq!(reloaded.hidden_init, KernelInit::HeNormal);
    assert_eq!(reloaded.head, config.head);
}
