use crate::api_model::RegistrationRequest;
use crate::error::{ResourceError, Result};
use crate::resource::{Actions, Params, Resource};
use async_trait::async_trait;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{event, info, warn, Level};

pub const REGISTER_PATH: &str = "api/register";

/// The `api/register` resource with the default action set and nothing else.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    resource: Resource,
}

impl RegistrationClient {
    pub fn new(client: ClientWithMiddleware, base_url: Url) -> Self {
        RegistrationClient {
            resource: Resource::new(client, base_url, REGISTER_PATH, Params::new(), Actions::new()),
        }
    }

    pub fn path(&self) -> &str {
        self.resource.path()
    }

    /// POSTs `payload` unchanged as the JSON body.
    pub async fn save<B, T>(&self, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.resource.save(&Params::new(), payload).await
    }

    pub async fn get<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        self.resource.get(params).await
    }

    pub async fn query<T: DeserializeOwned>(&self, params: &Params) -> Result<Vec<T>> {
        self.resource.query(params).await
    }

    pub async fn remove<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        self.resource.remove(params).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        self.resource.delete(params).await
    }
}

#[async_trait]
pub trait RegistrationApi: Send + Sync {
    async fn register(&self, payload: Value) -> Result<Value>;
}

#[async_trait]
impl RegistrationApi for RegistrationClient {
    async fn register(&self, payload: Value) -> Result<Value> {
        self.save(&payload).await
    }
}

/// Registers one account. Failures are logged and handed back untouched.
pub async fn register_account(api: &dyn RegistrationApi, request: &RegistrationRequest) -> Result<Value> {
    let payload = serde_json::to_value(request).map_err(ResourceError::Encode)?;

    event!(Level::INFO, "registering account '{}'", request.login);

    match api.register(payload).await {
        Ok(response) => {
            info!("account '{}' registered", request.login);
            Ok(response)
        }
        Err(e) => {
            warn!("registration of '{}' failed: {}", request.login, e);
            Err(e)
        }
    }
}
