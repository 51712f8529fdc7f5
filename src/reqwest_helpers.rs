use http::Extensions;
use reqwest::{Client, Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use std::time::Instant;
use tracing::{debug, error};

pub fn create_client() -> reqwest::Result<ClientWithMiddleware> {
    let reqwest_client = Client::builder().build()?;

    let client = ClientBuilder::new(reqwest_client)
        .with(ErrorLoggingMiddleware)
        .build();

    Ok(client)
}

pub struct ErrorLoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for ErrorLoggingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let start = Instant::now();
        let method = req.method().clone();
        let url = req.url().clone();

        let result = next.run(req, extensions).await;

        let duration = start.elapsed();

        match &result {
            Ok(resp) if !resp.status().is_success() => {
                error!(
                    "Request failed: {} {} - Status: {}, Duration: {:?}",
                    method,
                    url,
                    resp.status(),
                    duration
                );
            }
            Err(e) => {
                error!(
                    "Request error: {} {} - Error: {}, Duration: {:?}",
                    method, url, e, duration
                );
            }
            _ => {
                debug!(
                    "Request succeeded: {} {} - Duration: {:?}",
                    method, url, duration
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    #[traced_test]
    async fn test_failed_request_is_logged_and_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("login already used"))
            .mount(&server)
            .await;

        let client = create_client().unwrap();
        let resp = client
            .post(format!("{}/api/register", server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(resp.text().await.unwrap(), "login already used");
        assert!(logs_contain("Request failed: POST"));
        assert!(logs_contain("Status: 400 Bad Request"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_successful_request_is_logged_at_debug() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = create_client().unwrap();
        client.get(server.uri()).send().await.unwrap();

        assert!(logs_contain("Request succeeded: GET"));
        assert!(!logs_contain("Request failed"));
    }
}
