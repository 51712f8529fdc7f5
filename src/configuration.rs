use crate::api_model::RegistrationRequest;
use crate::cli_args::Commands;
use anyhow::{Context, Result};
use reqwest::Url;

#[derive(Debug)]
pub struct ClientConfiguration {
    pub base_url: Url,
    pub registration: RegistrationRequest,
}

impl ClientConfiguration {
    pub fn new(commands: Commands) -> Result<Self> {
        match commands {
            Commands::Register {
                base_url,
                login,
                email,
                password,
                lang_key,
                first_name,
                last_name,
            } => Ok(Self {
                base_url: Url::parse(&base_url)
                    .with_context(|| format!("Invalid base url '{}'", base_url))?,
                registration: RegistrationRequest {
                    login,
                    email,
                    password,
                    lang_key,
                    first_name,
                    last_name,
                },
            }),
        }
    }
}
