pub mod api_model;
pub mod cli_args;
pub mod configuration;
pub mod error;
pub mod register_client;
pub mod reqwest_helpers;
pub mod resource;

pub use error::ResourceError;
pub use register_client::{register_account, RegistrationApi, RegistrationClient, REGISTER_PATH};
pub use resource::{Action, Params, Resource};
