//! Docent command-line front end.
//!
//! Answers a question from a similarity-search ranking of documentation pages.
//!
//! # Usage
//!
//! ```bash
//! docent [--text] <ranking.json> <question>
//! ```
//!
//! `ranking.json` holds `{"distances": [...], "metadatas": [{"url", "title", "text", "html"}, ...]}`.
//! Page markup is sent as context unless `--text` is given.
//!
//! # Environment
//!
//! - `DOCENT_PROVIDER`: provider identifier (defaults to the settings' `default_provider`)
//! - `DOCENT_CONFIG`: path to a JSON settings file overlaid on the built-ins
//! - `DOCENT_LOG`, `DOCENT_LOG_FORMAT`: log filter and `pretty|compact|json`
//! - `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, `HUGGINGFACE_API_KEY`
//!
//! # Example
//!
//! ```bash
//! DOCENT_PROVIDER=ollama docent ./ranking.json "How do I reset my password?"
//! ```

#![expect(clippy::print_stdout, clippy::print_stderr, reason = "command-line output")]

mod logging;

use docent_answer::{
    AnswerResult, CandidateContext, CandidateController, ContextSource, GENERIC_ERROR_MESSAGE,
    NOT_FOUND_ANSWER, Ranking,
};
use docent_model_providers::{HttpExecutor, builtin_registry};
use docent_models::{GenerationOptions, Settings};
use std::path::Path;
use std::sync::Arc;

/// Candidates below this similarity are not offered to the model.
const RELEVANCE_THRESHOLD: f32 = 0.5;

/// How many near misses are listed when nothing was relevant.
const CLOSEST_SHOWN: usize = 3;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let context_source = match args.iter().position(|arg| arg == "--text") {
        Some(index) => {
            args.remove(index);
            ContextSource::Text
        }
        None => ContextSource::Markup,
    };
    if args.len() < 2 {
        eprintln!("Usage: docent [--text] <ranking.json> <question>");
        eprintln!("Example: docent ./ranking.json \"How do I reset my password?\"");
        std::process::exit(1);
    }
    let question = args[1..].join(" ");

    let Some(settings) = load_settings() else {
        println!("{GENERIC_ERROR_MESSAGE}");
        std::process::exit(1);
    };
    let Some(ranking) = load_ranking(Path::new(&args[0])) else {
        println!("{GENERIC_ERROR_MESSAGE}");
        std::process::exit(1);
    };

    let provider = std::env::var("DOCENT_PROVIDER")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| settings.default_provider.clone());
    let options = GenerationOptions::default().provider(provider.clone());

    let candidates = ranking.candidates();
    let relevant = ranking.relevant(RELEVANCE_THRESHOLD);
    tracing::info!(
        candidates = candidates.len(),
        relevant = relevant.len(),
        provider = %provider,
        "ranking loaded"
    );

    let controller = CandidateController::new(
        Arc::new(builtin_registry()),
        Arc::new(HttpExecutor::new()),
        Arc::new(settings),
    )
    .with_context_source(context_source);

    match controller
        .try_candidates(&question, &relevant, &provider, &options)
        .await
    {
        Ok(result) => print_result(&result, &candidates),
        Err(err) => {
            tracing::error!(error = %err, "cannot answer");
            println!("{GENERIC_ERROR_MESSAGE}");
            std::process::exit(1);
        }
    }
}

fn load_settings() -> Option<Settings> {
    let Ok(path) = std::env::var("DOCENT_CONFIG") else {
        return Some(Settings::builtin());
    };
    match Settings::from_path(&path) {
        Ok(settings) => {
            tracing::info!(path = %path, "loaded settings");
            Some(settings)
        }
        Err(err) => {
            tracing::error!(path = %path, error = %err, "failed to load settings");
            None
        }
    }
}

fn load_ranking(path: &Path) -> Option<Ranking> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| tracing::error!(path = %path.display(), error = %err, "cannot read ranking"))
        .ok()?;
    serde_json::from_str(&raw)
        .map_err(|err| tracing::error!(path = %path.display(), error = %err, "invalid ranking JSON"))
        .ok()
}

fn print_result(result: &AnswerResult, candidates: &[CandidateContext]) {
    for attempt in result.attempts() {
        tracing::debug!(
            source = %attempt.source,
            similarity = attempt.similarity,
            outcome = %attempt.outcome,
            "attempt"
        );
    }

    match result.source() {
        Some(source) => {
            println!("Answer: {}", result.answer());
            println!();
            println!("Source: {}", source.source);
            println!("Similarity: {:.2}%", source.similarity * 100.0);
            if !result.is_valid() {
                println!("(no candidate gave a confident answer)");
            }
        }
        None => {
            println!("{NOT_FOUND_ANSWER}");
            if !candidates.is_empty() {
                println!();
                println!("Closest pages (no match):");
                for candidate in candidates.iter().take(CLOSEST_SHOWN) {
                    println!(
                        "- {} (similarity: {:.2}%)",
                        candidate.source,
                        candidate.similarity * 100.0
                    );
                }
            }
        }
    }
}
