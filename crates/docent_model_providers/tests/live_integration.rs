//! Live tests against real vendor endpoints.
//!
//! These tests are ignored by default because they require:
//! - a running Ollama server on `localhost:11434`, or
//! - `OPENAI_API_KEY` environment variable (or in `.env` file)
//!
//! To run these tests:
//! ```sh
//! cargo test -p docent_model_providers --test live_integration -- --ignored
//! ```

use docent_model_providers::{HttpExecutor, builtin_registry};
use docent_models::config::ProcessEnv;
use docent_models::{
    EffectiveConfig, GenerationOptions, HttpRequest, ProviderIdentity, Settings, Transport,
    TransportResponse,
};
use serde_json::Value;

async fn ask(provider: ProviderIdentity, options: &GenerationOptions) -> String {
    let _ = dotenvy::dotenv();

    let adapter = builtin_registry()
        .create_provider(provider.as_str())
        .expect("builtin provider should be registered");
    let config = EffectiveConfig::resolve(provider, options, &Settings::builtin(), &ProcessEnv)
        .expect("configuration should resolve");

    let request = HttpRequest {
        provider,
        method: Default::default(),
        url: adapter.endpoint(&config).unwrap(),
        headers: adapter.build_headers(&config).unwrap(),
        query: adapter.query_params(&config),
        body: adapter
            .build_request_body(
                "What colour is the sky on a clear day?",
                Some("On a clear day the sky is blue."),
                &config,
            )
            .unwrap()
            .into_json(),
        timeout: config.timeout(),
        mode: adapter.response_mode(&config),
    };

    let body = match HttpExecutor::new().execute(request).await.unwrap() {
        TransportResponse::Json(json) => json,
        TransportResponse::Text(text) => Value::String(text),
    };
    adapter.parse_response(body).unwrap()
}

#[tokio::test]
#[ignore = "requires a local Ollama server"]
async fn test_ollama_buffered() {
    let answer = ask(ProviderIdentity::Ollama, &GenerationOptions::default()).await;
    assert!(answer.to_lowercase().contains("blue"));
}

#[tokio::test]
#[ignore = "requires a local Ollama server"]
async fn test_ollama_streamed() {
    let answer = ask(
        ProviderIdentity::Ollama,
        &GenerationOptions::default().stream(true),
    )
    .await;
    assert!(answer.to_lowercase().contains("blue"));
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY"]
async fn test_openai_basic() {
    let answer = ask(ProviderIdentity::OpenAi, &GenerationOptions::default()).await;
    assert!(answer.to_lowercase().contains("blue"));
}
