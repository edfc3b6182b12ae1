use std::env;
use std::path::PathBuf;

use burn::backend::NdArray;
use burn::module::Module;
use dotenv::dotenv;
use rlnets::{
    CnnNetwork, InputShape, LstmNetwork, NetworkSummary, create_cnn_attention_policy_network,
    create_cnn_attention_value_network, create_lstm_policy_network, create_lstm_value_network,
    save_network,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

type SummaryBackend = NdArray;

fn get_env_var_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|val| val.parse::<usize>().ok())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rlnets=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn report(summary: &NetworkSummary, num_params: usize) {
    tracing::info!("{} ({} parameters allocated)\n{}", summary.name, num_params, summary);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let timesteps = get_env_var_usize("RLNETS_TIMESTEPS").unwrap_or(32);
    let features = get_env_var_usize("RLNETS_FEATURES").unwrap_or(8);
    let lstm_units =
        get_env_var_usize("RLNETS_LSTM_UNITS").unwrap_or(rlnets::DEFAULT_LSTM_UNITS);
    let output_units =
        get_env_var_usize("RLNETS_OUTPUT_UNITS").unwrap_or(rlnets::DEFAULT_POLICY_OUTPUT_UNITS);
    let save_dir = env::var("RLNETS_SAVE_DIR").ok().map(PathBuf::from);

    let shape = InputShape::new(timesteps, features);
    let device = Default::default();

    let cnn: Vec<CnnNetwork<SummaryBackend>> = vec![
        create_cnn_attention_policy_network(shape, &device)?,
        create_cnn_attention_value_network(shape, &device)?,
    ];
    let lstm: Vec<LstmNetwork<SummaryBackend>> = vec![
        create_lstm_policy_network(shape, lstm_units, output_units, &device)?,
        create_lstm_value_network(shape, lstm_units, &device)?,
    ];

    for network in &cnn {
        report(network.summary(), network.num_params());
    }
    for network in &lstm {
        report(network.summary(), network.num_params());
    }

    if let Some(dir) = save_dir {
        std::fs::create_dir_all(&dir)?;
        for network in cnn {
            let path = dir.join(&network.summary().name);
            save_network(network, path)?;
        }
        for network in lstm {
            let path = dir.join(&network.summary().name);
            save_network(network, path)?;
        }
    }

    Ok(())
}
