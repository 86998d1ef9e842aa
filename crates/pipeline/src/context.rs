//! Context assembly: search response in, bounded context and citations out.
//!
//! # Algorithm
//!
//! 1. The first `top_k` results, in index order, become [`Source`]s.
//! 2. Base text is the index's combined relevance text when non-empty.
//!    Otherwise each of those `top_k` results contributes its suggested
//!    text, or the first `excerpt_chars` characters of its full text,
//!    joined by a blank line.
//! 3. Base text longer than `max_context_chars` is cut at that many
//!    characters. Combined text gets [`TRUNCATION_MARKER`], joined results
//!    get [`RESULTS_TRUNCATION_MARKER`].
//!
//! Assembly is pure: identical inputs always produce identical outputs.
//! Lengths are counted in `char`s, never bytes, so cuts land on character
//! boundaries.

use groundrag_config::RagConfig;
use groundrag_core::index::{SearchResponse, SearchResult};

/// Appended whenever retrieved text is cut at a size limit.
pub const TRUNCATION_MARKER: &str = "\n...[TRUNCATED CONTEXT]...\n";

/// Appended when context joined from individual results is cut.
pub const RESULTS_TRUNCATION_MARKER: &str = "\n...[TRUNCATED]...\n";

const PIECE_SEPARATOR: &str = "\n\n";

/// A citation derived 1:1 from a search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub title: Option<String>,
    pub source_url: Option<String>,
    pub score: f64,
    pub suggested_text: Option<String>,
    pub text: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Source {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("(no title)")
    }

    pub fn display_url(&self) -> &str {
        self.source_url.as_deref().filter(|u| !u.is_empty()).unwrap_or("(no url)")
    }
}

impl From<&SearchResult> for Source {
    fn from(result: &SearchResult) -> Self {
        Source {
            title: result.title().map(String::from),
            source_url: result.source_url().map(String::from),
            score: result.score,
            suggested_text: result.suggested_text.clone(),
            text: result.text.clone(),
            metadata: result.metadata.clone(),
        }
    }
}

/// The context for one query, owned by that query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledContext {
    pub text: String,
    pub sources: Vec<Source>,
    /// Whether `text` was cut and ends with a truncation marker.
    pub truncated: bool,
}

/// Builds [`AssembledContext`] values. Holds no per-query state.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_context_chars: usize,
    excerpt_chars: usize,
}

impl ContextAssembler {
    pub fn new(max_context_chars: usize) -> Self {
        Self {
            max_context_chars,
            excerpt_chars: 3_000,
        }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.max_context_chars).with_excerpt_chars(config.excerpt_chars)
    }

    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    pub fn max_context_chars(&self) -> usize {
        self.max_context_chars
    }

    pub fn assemble(&self, response: &SearchResponse, top_k: usize) -> AssembledContext {
        let cited = &response.results[..top_k.min(response.results.len())];

        let (base, marker) = match response.text.as_deref() {
            Some(text) if !text.is_empty() => (text.to_string(), TRUNCATION_MARKER),
            _ => (self.join_results(cited), RESULTS_TRUNCATION_MARKER),
        };

        let (text, truncated) = truncate_with_marker(&base, self.max_context_chars, marker);

        let sources = cited.iter().map(Source::from).collect();

        AssembledContext {
            text,
            sources,
            truncated,
        }
    }

    fn join_results(&self, results: &[SearchResult]) -> String {
        let pieces: Vec<&str> = results
            .iter()
            .filter_map(|r| match r.suggested_text.as_deref() {
                Some(suggested) if !suggested.is_empty() => Some(suggested),
                _ if !r.text.is_empty() => Some(char_prefix(&r.text, self.excerpt_chars)),
                _ => None,
            })
            .collect();
        pieces.join(PIECE_SEPARATOR)
    }
}

/// The first `max_chars` characters of `text` (all of it if shorter).
pub(crate) fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Cut `text` to `max_chars` characters and append `marker` if anything was
/// removed. Returns the result and whether a cut happened.
pub(crate) fn truncate_with_marker(text: &str, max_chars: usize, marker: &str) -> (String, bool) {
    let prefix = char_prefix(text, max_chars);
    if prefix.len() == text.len() {
        (text.to_string(), false)
    } else {
        (format!("{prefix}{marker}"), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(score: f64, text: &str, suggested: Option<&str>, title: Option<&str>) -> SearchResult {
        let mut metadata = serde_json::Map::new();
        if let Some(t) = title {
            metadata.insert("title".into(), json!(t));
            metadata.insert("url".into(), json!(format!("https://example.com/{t}")));
        }
        SearchResult {
            score,
            text: text.into(),
            suggested_text: suggested.map(String::from),
            metadata,
        }
    }

    #[test]
    fn combined_text_within_limit_is_unchanged() {
        let response = SearchResponse {
            text: Some("alpha beta gamma".into()),
            results: vec![result(0.9, "ignored", None, Some("a"))],
        };
        let ctx = ContextAssembler::new(100).assemble(&response, 3);
        assert_eq!(ctx.text, "alpha beta gamma");
        assert!(!ctx.truncated);
        assert!(!ctx.text.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn text_exactly_at_limit_is_not_truncated() {
        let response = SearchResponse {
            text: Some("x".repeat(50)),
            results: vec![],
        };
        let ctx = ContextAssembler::new(50).assemble(&response, 3);
        assert_eq!(ctx.text.len(), 50);
        assert!(!ctx.truncated);
    }

    #[test]
    fn long_text_is_cut_to_limit_plus_marker() {
        let response = SearchResponse {
            text: Some("y".repeat(120)),
            results: vec![],
        };
        let ctx = ContextAssembler::new(100).assemble(&response, 3);
        assert!(ctx.truncated);
        assert_eq!(ctx.text.chars().count(), 100 + TRUNCATION_MARKER.chars().count());
        assert!(ctx.text.ends_with(TRUNCATION_MARKER));
        assert!(ctx.text.starts_with(&"y".repeat(100)));
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let response = SearchResponse {
            text: Some("é".repeat(10)),
            results: vec![],
        };
        let ctx = ContextAssembler::new(4).assemble(&response, 1);
        assert_eq!(ctx.text, format!("éééé{TRUNCATION_MARKER}"));
    }

    #[test]
    fn joined_context_uses_only_cited_results() {
        let response = SearchResponse {
            text: None,
            results: ["one", "two", "three", "four", "five"]
                .iter()
                .map(|t| result(0.5, t, None, Some(t)))
                .collect(),
        };
        let ctx = ContextAssembler::new(1_000).assemble(&response, 3);
        assert_eq!(ctx.text, "one\n\ntwo\n\nthree");
        assert_eq!(ctx.sources.len(), 3);
        assert!(!ctx.text.contains("four"));
    }

    #[test]
    fn long_joined_results_get_their_own_marker() {
        let response = SearchResponse {
            text: None,
            results: vec![result(0.9, &"w".repeat(80), None, None)],
        };
        let ctx = ContextAssembler::new(50).assemble(&response, 3);
        assert!(ctx.truncated);
        assert_eq!(ctx.text, format!("{}{RESULTS_TRUNCATION_MARKER}", "w".repeat(50)));
        assert!(!ctx.text.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn joined_results_prefer_suggested_text() {
        let response = SearchResponse {
            text: None,
            results: vec![
                result(0.9, "full one", Some("short one"), Some("a")),
                result(0.8, "full two", None, Some("b")),
                result(0.7, "full three", Some(""), Some("c")),
            ],
        };
        let ctx = ContextAssembler::new(1_000).assemble(&response, 3);
        assert_eq!(ctx.text, "short one\n\nfull two\n\nfull three");
    }

    #[test]
    fn empty_combined_text_falls_back_to_results() {
        let response = SearchResponse {
            text: Some(String::new()),
            results: vec![result(0.9, "body", None, None)],
        };
        let ctx = ContextAssembler::new(1_000).assemble(&response, 3);
        assert_eq!(ctx.text, "body");
    }

    #[test]
    fn full_text_is_excerpted() {
        let response = SearchResponse {
            text: None,
            results: vec![result(0.9, &"z".repeat(5_000), None, None)],
        };
        let ctx = ContextAssembler::new(100_000).assemble(&response, 3);
        assert_eq!(ctx.text.len(), 3_000);
        assert!(!ctx.truncated);

        let short = ContextAssembler::new(100_000)
            .with_excerpt_chars(10)
            .assemble(&response, 3);
        assert_eq!(short.text.len(), 10);
    }

    #[test]
    fn results_without_text_are_skipped() {
        let response = SearchResponse {
            text: None,
            results: vec![
                result(0.9, "", None, Some("empty")),
                result(0.8, "kept", None, Some("kept")),
            ],
        };
        let ctx = ContextAssembler::new(100).assemble(&response, 3);
        assert_eq!(ctx.text, "kept");
        assert_eq!(ctx.sources.len(), 2);
    }

    #[test]
    fn sources_are_top_k_in_response_order() {
        let response = SearchResponse {
            text: None,
            results: vec![
                result(0.2, "a", None, Some("low-first")),
                result(0.9, "b", None, Some("high-second")),
                result(0.5, "c", None, Some("third")),
                result(0.4, "d", None, Some("fourth")),
            ],
        };
        let ctx = ContextAssembler::new(100).assemble(&response, 3);
        let titles: Vec<_> = ctx.sources.iter().map(|s| s.display_title()).collect();
        assert_eq!(titles, vec!["low-first", "high-second", "third"]);
    }

    #[test]
    fn healthcare_scenario_three_results() {
        let response = SearchResponse {
            text: None,
            results: vec![
                result(0.91, "Sovereign cloud hosting.", Some("Sovereign cloud for hospitals."), Some("cloud")),
                result(0.84, "Managed Kubernetes for clinics.", None, Some("k8s")),
                result(0.80, "Backup services.", Some("Encrypted backups for patient data."), Some("backup")),
            ],
        };
        let ctx = ContextAssembler::new(100_000).assemble(&response, 3);
        assert_eq!(
            ctx.text,
            "Sovereign cloud for hospitals.\n\nManaged Kubernetes for clinics.\n\nEncrypted backups for patient data."
        );
        assert_eq!(ctx.sources.len(), 3);
        assert_eq!(ctx.sources[0].score, 0.91);
        assert_eq!(ctx.sources[2].display_url(), "https://example.com/backup");
    }

    #[test]
    fn empty_response_yields_empty_context() {
        let ctx = ContextAssembler::new(100).assemble(&SearchResponse::default(), 3);
        assert_eq!(ctx, AssembledContext::default());
    }

    #[test]
    fn missing_title_and_url_resolve_to_placeholders_only_at_display() {
        let response = SearchResponse {
            text: None,
            results: vec![result(0.5, "t", None, None)],
        };
        let ctx = ContextAssembler::new(100).assemble(&response, 1);
        let source = &ctx.sources[0];
        assert!(source.title.is_none());
        assert!(source.source_url.is_none());
        assert_eq!(source.display_title(), "(no title)");
        assert_eq!(source.display_url(), "(no url)");
    }
}
