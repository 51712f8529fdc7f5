//! Generic REST resource: a path template plus a table of named actions,
//! each of which maps onto one HTTP request.

use crate::error::{ResourceError, Result};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, event, Level};

pub mod action;
pub mod route;

pub use action::{default_actions, Action, Actions};

pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct Resource {
    client: ClientWithMiddleware,
    base_url: Url,
    path: String,
    default_params: Params,
    actions: Actions,
}

impl Resource {
    /// Binds `path` (relative to `base_url`) to the default action set plus
    /// `custom_actions`. Does not touch the network.
    pub fn new(
        client: ClientWithMiddleware,
        base_url: Url,
        path: impl Into<String>,
        default_params: Params,
        custom_actions: Actions,
    ) -> Self {
        Resource {
            client,
            base_url,
            path: path.into(),
            default_params,
            actions: action::merge_actions(custom_actions),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runs the named action once.
    ///
    /// The payload is sent as the JSON body only for POST, PUT and PATCH
    /// actions, but it always feeds `@field` default params.
    pub async fn invoke<B, T>(&self, action_name: &str, params: &Params, payload: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let action = self
            .actions
            .get(action_name)
            .ok_or_else(|| ResourceError::UnknownAction(action_name.to_string()))?;

        let body = payload
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ResourceError::Encode)?;

        let params = self.resolve_params(params, body.as_deref())?;
        let url = route::build_url(&self.base_url, &self.path, &params)?;

        event!(Level::DEBUG, "invoking action '{}': {} {}", action_name, action.method, url);

        let mut request = self.client.request(action.method.clone(), url);
        if action.has_body() {
            if let Some(bytes) = body {
                request = request
                    .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .body(bytes);
            }
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ResourceError::HttpStatus { status, body });
        }

        Self::decode(action_name, action, body)
    }

    pub async fn get<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        self.invoke("get", params, None::<&()>).await
    }

    pub async fn save<B, T>(&self, params: &Params, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.invoke("save", params, Some(payload)).await
    }

    pub async fn query<T: DeserializeOwned>(&self, params: &Params) -> Result<Vec<T>> {
        self.invoke("query", params, None::<&()>).await
    }

    pub async fn remove<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        self.invoke("remove", params, None::<&()>).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, params: &Params) -> Result<T> {
        self.invoke("delete", params, None::<&()>).await
    }

    /// Call params override defaults. A default of the form `@field` is looked
    /// up in the payload and dropped when the payload has no such field.
    fn resolve_params(&self, params: &Params, body: Option<&[u8]>) -> Result<Params> {
        let needs_payload = self.default_params.values().any(|v| v.starts_with('@'));
        let payload: Option<Value> = match body {
            Some(bytes) if needs_payload => {
                Some(serde_json::from_slice(bytes).map_err(ResourceError::Encode)?)
            }
            _ => None,
        };

        let mut resolved = Params::new();
        for (key, value) in &self.default_params {
            match value.strip_prefix('@') {
                Some(field) => {
                    if let Some(found) = payload.as_ref().and_then(|p| lookup_field(p, field)) {
                        resolved.insert(key.clone(), found);
                    }
                }
                None => {
                    resolved.insert(key.clone(), value.clone());
                }
            }
        }

        resolved.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(resolved)
    }

    fn decode<T: DeserializeOwned>(action_name: &str, action: &Action, body: String) -> Result<T> {
        let value = if body.trim().is_empty() {
            debug!("action '{}' returned an empty body", action_name);
            if action.is_array {
                Value::Array(vec![])
            } else {
                Value::Null
            }
        } else {
            match serde_json::from_str::<Value>(&body) {
                Ok(value) => value,
                Err(source) => return Err(ResourceError::Decode { source, body }),
            }
        };

        if !value.is_null() && value.is_array() != action.is_array {
            return Err(ResourceError::ShapeMismatch {
                action: action_name.to_string(),
                expected_array: action.is_array,
            });
        }

        serde_json::from_value(value).map_err(|source| ResourceError::Decode { source, body })
    }
}

/// Dotted lookup (`user.login`) of a scalar in a JSON payload.
fn lookup_field(payload: &Value, field: &str) -> Option<String> {
    let found = field
        .split('.')
        .try_fold(payload, |current, key| current.get(key))?;

    match found {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqwest_helpers::create_client;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn users_resource(server: &MockServer, default_params: Params, custom_actions: Actions) -> Resource {
        Resource::new(
            create_client().unwrap(),
            Url::parse(&server.uri()).unwrap(),
            "api/users/:login",
            default_params,
            custom_actions,
        )
    }

    #[test]
    fn test_lookup_field() {
        let payload = json!({"login": "alice", "meta": {"age": 42, "admin": false}, "tags": ["a"]});

        assert_eq!(lookup_field(&payload, "login"), Some("alice".to_string()));
        assert_eq!(lookup_field(&payload, "meta.age"), Some("42".to_string()));
        assert_eq!(lookup_field(&payload, "meta.admin"), Some("false".to_string()));
        assert_eq!(lookup_field(&payload, "tags"), None);
        assert_eq!(lookup_field(&payload, "missing"), None);
    }

    #[tokio::test]
    async fn test_get_substitutes_placeholder_and_decodes_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "alice"})))
            .expect(1)
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let user: Value = resource
            .get(&Params::from([("login".to_string(), "alice".to_string())]))
            .await
            .unwrap();

        assert_eq!(user, json!({"login": "alice"}));
    }

    #[tokio::test]
    async fn test_query_sends_extra_params_and_expects_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"login": "a"}, {"login": "b"}])))
            .expect(1)
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let users: Vec<Value> = resource
            .query(&Params::from([("page".to_string(), "2".to_string())]))
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_query_rejects_object_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "a"})))
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let result: Result<Vec<Value>> = resource.query(&Params::new()).await;

        assert!(matches!(
            result,
            Err(ResourceError::ShapeMismatch { expected_array: true, .. })
        ));
    }

    #[tokio::test]
    async fn test_get_rejects_array_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let result: Result<Value> = resource.get(&Params::new()).await;

        assert!(matches!(
            result,
            Err(ResourceError::ShapeMismatch { expected_array: false, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null_or_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());

        let removed: Option<Value> = resource.remove(&Params::new()).await.unwrap();
        assert_eq!(removed, None);

        let listed: Vec<Value> = resource.query(&Params::new()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let result: Result<Value> = resource.get(&Params::new()).await;

        match result {
            Err(ResourceError::Decode { body, .. }) => assert_eq!(body, "<html>"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let err = resource.get::<Value>(&Params::new()).await.unwrap_err();

        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
        match err {
            ResourceError::HttpStatus { body, .. } => assert_eq!(body, "no such user"),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_action_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let resource = users_resource(&server, Params::new(), Actions::new());
        let result: Result<Value> = resource.invoke("activate", &Params::new(), None::<&()>).await;

        assert!(matches!(result, Err(ResourceError::UnknownAction(name)) if name == "activate"));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_custom_action_and_payload_default_param() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": true})))
            .expect(1)
            .mount(&server)
            .await;

        let resource = users_resource(
            &server,
            Params::from([("login".to_string(), "@login".to_string())]),
            Actions::from([("update".to_string(), Action::new(Method::PUT))]),
        );

        let result: Value = resource
            .invoke("update", &Params::new(), Some(&json!({"login": "alice", "email": "a@example.org"})))
            .await
            .unwrap();

        assert_eq!(result, json!({"updated": true}));
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_network_error() {
        let resource = Resource::new(
            create_client().unwrap(),
            Url::parse("http://127.0.0.1:1").unwrap(),
            "api/register",
            Params::new(),
            Actions::new(),
        );

        let err = resource.get::<Value>(&Params::new()).await.unwrap_err();
        assert!(err.is_network());
    }
}
