use std::fs::File;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod bank;
mod config;
mod message;

use bank::{Chaincode, ChaincodeError, Invocation, LedgerGateway, Node};
use config::{Config, ConfigError};

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Chaincode(#[from] ChaincodeError),
    #[error("Failed to join the node task: {0}")]
    Join(#[from] tokio::task::JoinError),
}

async fn run(config: Config) -> Result<(), AppError> {
    let accounts = File::open(&config.accounts_path)?;
    let users = File::open(&config.users_path)?;
    let chaincode = Chaincode::init(&[config.store_id.clone()], |store_id| {
        bank::open_seeded(store_id, accounts, users)
    })?;

    let (sender, receiver) = mpsc::channel(config.channel_size);
    let mut node = Node::new(chaincode, receiver);

    let handle = tokio::spawn(async move {
        let result = node.run().await;
        (node, result)
    });

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(&config.requests_path)?;

    for invocation in reader.deserialize::<Invocation>() {
        match invocation {
            Ok(invocation) => {
                // The node closes the channel on a fatal error, reported below.
                if sender.send(invocation).await.is_err() {
                    break;
                }
            }
            Err(err) => error!("Skipping malformed request: {err}"),
        }
    }

    drop(sender); // Close the sender to signal no more invocations will be sent
    let (node, result) = handle.await?;

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for response in node.get_responses() {
        writer.serialize(response)?;
    }
    writer.flush()?;
    info!(
        store = node.get_chaincode().gateway().store_id(),
        processed = node.get_responses().len(),
        "done"
    );

    Ok(result?)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(config).await {
        error!("{err}");
        std::process::exit(1);
    }
}
