use anyhow::{Context, Result};
use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use register_client::cli_args::{Cli, Commands};
use register_client::configuration::ClientConfiguration;
use register_client::register_client::{register_account, RegistrationClient};
use register_client::reqwest_helpers::create_client;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args {
        Cli { command } => match command {
            Commands::Register { .. } => {
                tracing_subscriber::registry()
                    .with(fmt::layer())
                    .with(EnvFilter::from_default_env())
                    .init();

                let cfg = ClientConfiguration::new(command)?;

                let reqwest_client_with_middleware =
                    create_client().context("Failed to build http client")?;

                let registration_client =
                    RegistrationClient::new(reqwest_client_with_middleware, cfg.base_url.clone());

                event!(Level::DEBUG, "registering against {}", cfg.base_url);

                let response = register_account(&registration_client, &cfg.registration)
                    .await
                    .context("Registration failed")?;

                println!("{}", serde_json::to_string_pretty(&response)?);

                Ok(())
            }
        },
    }
}
