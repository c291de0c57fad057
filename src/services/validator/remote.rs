use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use reqwest::Client;
use url::Url;

use super::{TokenValidator, ValidatorError};

const ROUTE_HEADER: HeaderName = HeaderName::from_static("route");
const METHOD_HEADER: HeaderName = HeaderName::from_static("method");

/// Inbound headers that describe the inbound connection rather than the caller.
const HOP_HEADERS: [HeaderName; 5] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::CONTENT_TYPE,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
];

/// reqwest client for the token validator service.
#[derive(Debug, Clone)]
pub struct RemoteValidator {
    client: Client,
    base: String,
}

impl RemoteValidator {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, ValidatorError> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .build()
            .map_err(|err| ValidatorError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn forwarded(headers: &HeaderMap) -> HeaderMap {
        let mut forwarded = headers.clone();
        for name in &HOP_HEADERS {
            forwarded.remove(name);
        }
        forwarded
    }

    async fn check(&self, path: &str, headers: HeaderMap) -> Result<(), ValidatorError> {
        let response = self
            .client
            .get(format!("{}{}", self.base, path))
            .headers(headers)
            .send()
            .await
            .map_err(|err| ValidatorError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(ValidatorError::Rejected {
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl TokenValidator for RemoteValidator {
    async fn validate_route(
        &self,
        headers: &HeaderMap,
        route: &str,
        method: &Method,
    ) -> Result<(), ValidatorError> {
        let mut headers = Self::forwarded(headers);
        let route = HeaderValue::from_str(route)
            .map_err(|_| ValidatorError::Transport(format!("invalid route header: {route}")))?;
        let method = HeaderValue::from_str(method.as_str())
            .map_err(|_| ValidatorError::Transport(format!("invalid method header: {method}")))?;
        headers.insert(ROUTE_HEADER, route);
        headers.insert(METHOD_HEADER, method);

        self.check("/validate-token-permissions", headers).await
    }

    async fn validate_token(&self, headers: &HeaderMap) -> Result<(), ValidatorError> {
        self.check("/validate-token", Self::forwarded(headers)).await
    }
}
