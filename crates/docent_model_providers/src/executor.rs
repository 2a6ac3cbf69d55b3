//! reqwest-backed [`Transport`].

use crate::stream::LineDelimitedAssembler;
use async_trait::async_trait;
use docent_models::{
    HttpMethod, HttpRequest, LlmError, ProviderIdentity, ResponseMode, Transport,
    TransportResponse,
};
use futures::StreamExt;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Executes vendor requests over HTTP.
///
/// Every request carries its own timeout. Error statuses become
/// [`LlmError::Api`] with the status code and a best-effort body; connection,
/// DNS and timeout failures become [`LlmError::Api`] without a status.
#[derive(Debug, Clone, Default)]
pub struct HttpExecutor {
    client: reqwest::Client,
}

impl HttpExecutor {
    /// Creates an executor with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse, LlmError> {
        let provider = request.provider;
        let url = build_url(&request)?;
        let headers = build_header_map(&request)?;

        let builder = match request.method {
            HttpMethod::Post => self.client.post(url).json(&request.body),
            HttpMethod::Get => self.client.get(url),
        };

        tracing::debug!(
            provider = %provider,
            url = %request.url,
            timeout = ?request.timeout,
            mode = ?request.mode,
            "sending request"
        );

        let response = builder
            .headers(headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|err| transport_error(provider, &request, &err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().and_then(|raw| render_body(&raw));
            tracing::error!(
                provider = %provider,
                status = status.as_u16(),
                body = body.as_deref().unwrap_or_default(),
                "API returned an error status"
            );
            let error = LlmError::api(provider, "API call failed").with_status(status.as_u16());
            return Err(match body {
                Some(body) => error.with_body(body),
                None => error,
            });
        }

        match request.mode {
            ResponseMode::Buffered => {
                let raw = response
                    .text()
                    .await
                    .map_err(|err| transport_error(provider, &request, &err))?;
                serde_json::from_str(&raw)
                    .map(TransportResponse::Json)
                    .map_err(|err| {
                        LlmError::api(provider, format!("response was not valid JSON: {err}"))
                            .with_body(raw)
                    })
            }
            ResponseMode::LineDelimited => {
                let mut assembler = LineDelimitedAssembler::new(provider);
                let mut chunks = response.bytes_stream();
                while let Some(chunk) = chunks.next().await {
                    let chunk = chunk.map_err(|err| transport_error(provider, &request, &err))?;
                    assembler.push(&chunk)?;
                }
                assembler.finish().map(TransportResponse::Text)
            }
        }
    }
}

fn build_url(request: &HttpRequest) -> Result<Url, LlmError> {
    let mut url = Url::parse(&request.url).map_err(|err| {
        LlmError::configuration(format!(
            "invalid endpoint URL '{}' for provider '{}': {err}",
            request.url, request.provider
        ))
    })?;
    if !request.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&request.query);
    }
    Ok(url)
}

fn build_header_map(request: &HttpRequest) -> Result<HeaderMap, LlmError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            LlmError::configuration(format!("invalid header name '{name}': {err}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            LlmError::configuration(format!("invalid value for header '{name}': {err}"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn transport_error(provider: ProviderIdentity, request: &HttpRequest, err: &reqwest::Error) -> LlmError {
    let message = if err.is_timeout() {
        format!("request timed out after {:?}", request.timeout)
    } else if err.is_connect() {
        format!("could not connect to the API: {err}")
    } else {
        format!("request to the API failed: {err}")
    };
    tracing::error!(provider = %provider, url = %request.url, %message, "API connection error");
    LlmError::api(provider, message)
}

/// Renders an error body: decoded JSON if possible, the raw text otherwise,
/// nothing if empty.
fn render_body(raw: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<Value>(raw) {
        return Some(json.to_string());
    }
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use docent_models::Headers;
    use serde_json::json;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            provider: ProviderIdentity::Gemini,
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: Headers::new(),
            query: vec![("key".to_string(), "a b&c".to_string())],
            body: json!({}),
            timeout: Duration::from_secs(1),
            mode: ResponseMode::Buffered,
        }
    }

    #[test]
    fn query_is_encoded_onto_url() {
        let url = build_url(&request("https://example.com/v1/models/x:generateContent")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/v1/models/x:generateContent?key=a+b%26c"
        );
    }

    #[test]
    fn malformed_url_is_configuration_error() {
        let err = build_url(&request("not a url")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn invalid_header_value_is_configuration_error() {
        let mut req = request("https://example.com");
        req.headers
            .insert("Authorization".to_string(), "Bearer bad\nkey".to_string());
        assert!(build_header_map(&req).unwrap_err().is_configuration());
    }

    #[test]
    fn body_rendering_prefers_json() {
        assert_eq!(
            render_body("{ \"error\" : \"nope\" }").as_deref(),
            Some("{\"error\":\"nope\"}")
        );
        assert_eq!(render_body("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(render_body("   "), None);
    }
}
