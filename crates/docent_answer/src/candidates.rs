//! Candidate pages proposed as context.

use serde::{Deserialize, Serialize};

/// A crawled page as stored alongside its embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRecord {
    /// Page URL.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Extracted plain text.
    pub text: String,
    /// Raw HTML markup, if kept.
    pub html: Option<String>,
    /// Position of the page in crawl order.
    pub ordinal_index: Option<usize>,
}

/// Similarity-search output for one query.
///
/// `distances[i]` belongs to `metadatas[i]`; similarity is `1 - distance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Embedding distances, one per page.
    pub distances: Vec<f32>,
    /// Page records, in the same order as `distances`.
    pub metadatas: Vec<PageRecord>,
}

impl Ranking {
    /// Converts the ranking into candidates sorted by descending similarity.
    ///
    /// Ties keep their ranking order. Unpaired trailing entries are dropped.
    #[must_use]
    pub fn candidates(&self) -> Vec<CandidateContext> {
        if self.distances.len() != self.metadatas.len() {
            tracing::warn!(
                distances = self.distances.len(),
                metadatas = self.metadatas.len(),
                "ranking columns differ in length; extra entries ignored"
            );
        }

        let mut candidates: Vec<_> = self
            .distances
            .iter()
            .zip(&self.metadatas)
            .enumerate()
            .map(|(rank, (distance, page))| CandidateContext {
                source: page.url.clone(),
                text: page.text.clone(),
                markup: page.html.clone().filter(|html| !html.trim().is_empty()),
                similarity: 1.0 - distance,
                ordinal: page.ordinal_index.unwrap_or(rank),
            })
            .collect();
        candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        candidates
    }

    /// Candidates whose similarity is at least `threshold`.
    #[must_use]
    pub fn relevant(&self, threshold: f32) -> Vec<CandidateContext> {
        self.candidates()
            .into_iter()
            .filter(|candidate| candidate.similarity >= threshold)
            .collect()
    }
}

/// A page offered as context for one answer attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateContext {
    /// Where the text came from, usually a URL.
    pub source: String,
    /// Plain-text content.
    pub text: String,
    /// Raw markup, when available.
    pub markup: Option<String>,
    /// Similarity to the question, `1 - distance`.
    pub similarity: f32,
    /// Position in the original ranking.
    pub ordinal: usize,
}

impl CandidateContext {
    /// Creates a text-only candidate.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        text: impl Into<String>,
        similarity: f32,
        ordinal: usize,
    ) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            markup: None,
            similarity,
            ordinal,
        }
    }

    /// Attaches raw markup.
    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    /// The context sent to the model for `source`.
    ///
    /// Falls back to the plain text when markup is requested but absent.
    #[must_use]
    pub fn context(&self, source: ContextSource) -> &str {
        match (source, &self.markup) {
            (ContextSource::Markup, Some(markup)) => markup,
            _ => &self.text,
        }
    }
}

/// Which candidate field is sent as context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSource {
    /// Extracted plain text.
    #[default]
    Text,
    /// Raw HTML markup, falling back to text.
    Markup,
}
