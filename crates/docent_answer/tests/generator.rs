//! Answer generator behaviour for every built-in provider.

use docent_answer::AnswerGenerator;
use docent_model_providers::builtin_registry;
use docent_models::testing::ScriptedTransport;
use docent_models::{GenerationOptions, ProviderIdentity, ResponseMode, Settings};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn generator(
    provider: ProviderIdentity,
    transport: Arc<ScriptedTransport>,
    settings: Settings,
) -> AnswerGenerator {
    let env: HashMap<String, String> = HashMap::new();
    AnswerGenerator::from_registry(
        &builtin_registry(),
        provider.as_str(),
        transport,
        Arc::new(settings),
    )
    .unwrap()
    .with_env(Arc::new(env))
}

#[tokio::test]
async fn missing_endpoint_never_reaches_the_network() {
    for provider in ProviderIdentity::ALL {
        let transport = Arc::new(ScriptedTransport::new());
        let mut settings = Settings::builtin();
        settings.api_urls.clear();

        let err = generator(provider, transport.clone(), settings)
            .generate_answer(
                "Q?",
                Some("context"),
                &GenerationOptions::default().api_key("k").model("m"),
            )
            .await
            .unwrap_err();

        assert!(err.is_configuration(), "{provider}: {err}");
        assert!(err.to_string().contains("api_url"), "{provider}");
        assert_eq!(transport.call_count(), 0, "{provider}");
    }
}

#[tokio::test]
async fn override_endpoint_wins_over_settings() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_json(json!({"choices": [{"message": {"content": "An answer long enough."}}]})),
    );
    let answer = generator(ProviderIdentity::OpenAi, transport.clone(), Settings::builtin())
        .generate_answer(
            "Q?",
            None,
            &GenerationOptions::default()
                .api_key("sk-1")
                .api_url("https://proxy.internal/v1/chat/completions"),
        )
        .await
        .unwrap();

    assert_eq!(answer, "An answer long enough.");
    let request = &transport.requests()[0];
    assert_eq!(request.url, "https://proxy.internal/v1/chat/completions");
    assert_eq!(request.headers["Authorization"], "Bearer sk-1");
}

#[tokio::test]
async fn gemini_key_travels_in_query() {
    let transport = Arc::new(ScriptedTransport::new().with_json(json!({
        "candidates": [{"content": {"parts": [{"text": "Gemini says hello."}]}}]
    })));
    generator(ProviderIdentity::Gemini, transport.clone(), Settings::builtin())
        .generate_answer("Q?", None, &GenerationOptions::default().api_key("g-1"))
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.query, vec![("key".to_string(), "g-1".to_string())]);
    assert!(!request.headers.values().any(|value| value.contains("g-1")));
}

#[tokio::test]
async fn huggingface_endpoint_includes_model() {
    let transport = Arc::new(
        ScriptedTransport::new().with_json(json!([{"generated_text": "A generated reply."}])),
    );
    generator(ProviderIdentity::HuggingFace, transport.clone(), Settings::builtin())
        .generate_answer("Q?", None, &GenerationOptions::default().api_key("hf"))
        .await
        .unwrap();

    assert_eq!(
        transport.requests()[0].url,
        "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3"
    );
}

#[tokio::test]
async fn ollama_streaming_selects_line_delimited_mode() {
    let transport = Arc::new(ScriptedTransport::new().with_text("ABC streamed answer"));
    let answer = generator(ProviderIdentity::Ollama, transport.clone(), Settings::builtin())
        .generate_answer("Q?", None, &GenerationOptions::default().stream(true))
        .await
        .unwrap();

    assert_eq!(answer, "ABC streamed answer");
    let request = &transport.requests()[0];
    assert_eq!(request.mode, ResponseMode::LineDelimited);
    assert_eq!(request.timeout, core::time::Duration::from_secs(150));
    assert!(!request.headers.contains_key("Authorization"));
}
