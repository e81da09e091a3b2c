//! Listing enrichment — address heuristic and DuckDuckGo Instant Answer
//! lookups.
//!
//! Hal's persona gets its outbound payload augmented with a few web-search
//! snippets about the property the user mentioned.  The whole path is
//! best-effort: empty results and transport failures both collapse to "no
//! enrichment" at the call site, never failing the chat turn.

use std::time::Duration;

use anyhow::{Context as _, Result};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::constants::{DDG_API_URL, LISTING_QUERY_SUFFIX, MAX_SEARCH_RESULTS, MIN_LOOKUP_LEN};

/// Outcome of an enrichment attempt.
///
/// `NotEnriched` and `Failed` are treated the same by the turn handler; the
/// distinction exists so the failure reason can be logged instead of being
/// swallowed.
#[derive(Clone, Debug)]
pub enum Enrichment {
    Enriched(String),
    NotEnriched,
    Failed(String),
}

/// A single search snippet.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub title: String,
    pub body: String,
}

// ── Address heuristic ────────────────────────────────────────────────

/// Keywords suggesting the text contains a property address.  The short
/// abbreviations are matched as whole words so prose like "striking" or
/// "dream" does not trip them.
const ADDRESS_KEYWORDS: &[&str] = &[
    "avenue", "road", "st", "street", "dr", "drive", "lane", "blvd", "home", "house", "address",
];

/// Whether `text` looks like it mentions a listing address.
///
/// Intentionally coarse: a word-level keyword scan plus a minimum length.
/// False positives cost one wasted search; false negatives cost nothing.
pub fn wants_listing_lookup(text: &str) -> bool {
    // Character count, not byte length: accented text must not reach the
    // threshold early.
    if text.chars().count() <= MIN_LOOKUP_LEN {
        return false;
    }
    if text.contains('#') {
        return true;
    }
    let lower = text.to_lowercase();
    lower
        .split(|ch: char| !ch.is_alphanumeric())
        .any(|word| ADDRESS_KEYWORDS.contains(&word))
}

// ── Snippet formatting ───────────────────────────────────────────────

/// Render hits as `- {title}: {body}` lines, one per hit.
pub fn format_snippets(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| {
            if hit.body.is_empty() {
                format!("- {}", hit.title)
            } else {
                format!("- {}: {}", hit.title, hit.body)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── DuckDuckGo client ────────────────────────────────────────────────

#[derive(Deserialize)]
struct DdgResponse {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

#[derive(Deserialize)]
struct DdgTopic {
    #[serde(rename = "Text")]
    text: Option<String>,
    /// Category groups nest their entries one level down.
    #[serde(rename = "Topics", default)]
    topics: Vec<DdgTopic>,
}

/// Keyless search client over the DuckDuckGo Instant Answer API.
#[derive(Clone)]
pub struct SearchClient {
    http_client: HttpClient,
}

impl SearchClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build search HTTP client")?;
        Ok(SearchClient { http_client })
    }

    /// Try to enrich `raw_text` with listing snippets.
    ///
    /// Returns `NotEnriched` when the heuristic does not fire or the search
    /// comes back empty, and `Failed` on any transport or decode error.
    pub async fn enrich(&self, raw_text: &str) -> Enrichment {
        if !wants_listing_lookup(raw_text) {
            return Enrichment::NotEnriched;
        }

        let query = format!("{raw_text}{LISTING_QUERY_SUFFIX}");
        match self.search(&query, MAX_SEARCH_RESULTS).await {
            Ok(hits) if hits.is_empty() => Enrichment::NotEnriched,
            Ok(hits) => Enrichment::Enriched(format_snippets(&hits)),
            Err(err) => Enrichment::Failed(format!("{err:#}")),
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .http_client
            .get(DDG_API_URL)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
            ])
            .send()
            .await
            .context("send search request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("search error {status}");
        }

        let body: DdgResponse = response.json().await.context("decode search response")?;
        Ok(collect_hits(body, limit))
    }
}

/// Flatten the topic tree into at most `limit` hits.
fn collect_hits(response: DdgResponse, limit: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    flatten_topics(response.related_topics, &mut hits, limit);
    hits
}

fn flatten_topics(topics: Vec<DdgTopic>, hits: &mut Vec<SearchHit>, limit: usize) {
    for topic in topics {
        if hits.len() >= limit {
            return;
        }
        if let Some(text) = topic.text {
            hits.push(split_hit(&text));
        } else if !topic.topics.is_empty() {
            flatten_topics(topic.topics, hits, limit);
        }
    }
}

/// DDG packs `Title - description` into one string; split it back apart.
fn split_hit(text: &str) -> SearchHit {
    match text.split_once(" - ") {
        Some((title, body)) => SearchHit {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        },
        None => SearchHit {
            title: text.trim().to_string(),
            body: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn heuristic_fires_on_street_mention() {
        assert!(wants_listing_lookup("123 Main Street, wonderful house"));
        assert!(wants_listing_lookup("unit #4 on the corner lot"));
        assert!(wants_listing_lookup("450 Elm St with a new roof"));
    }

    #[test]
    fn heuristic_never_fires_below_length_threshold() {
        assert!(!wants_listing_lookup("hi"));
        assert!(!wants_listing_lookup("street")); // keyword alone, too short
    }

    #[test]
    fn length_threshold_counts_characters_not_bytes() {
        // 10 chars but 11 bytes; must stay below the >10-character bar.
        assert!(!wants_listing_lookup("cuál: #42?"));
        assert!(wants_listing_lookup("cuál es la house?"));
    }

    #[test]
    fn heuristic_requires_whole_word_abbreviations() {
        assert!(!wants_listing_lookup("a striking sunset over the hills"));
        assert!(!wants_listing_lookup("what a dreadful market this year"));
    }

    #[test]
    fn snippets_render_title_and_body() {
        let hits = vec![
            SearchHit {
                title: "X".to_string(),
                body: "Y".to_string(),
            },
            SearchHit {
                title: "Solo".to_string(),
                body: String::new(),
            },
        ];
        assert_eq!(format_snippets(&hits), "- X: Y\n- Solo");
    }

    #[test]
    fn collect_hits_flattens_nested_topics_and_caps() {
        let body: DdgResponse = serde_json::from_value(json!({
            "RelatedTopics": [
                {"Text": "First - one"},
                {"Topics": [{"Text": "Second - two"}, {"Text": "Third - three"}]},
                {"Text": "Fourth - four"}
            ]
        }))
        .unwrap();
        let hits = collect_hits(body, 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "First");
        assert_eq!(hits[1].body, "two");
        assert_eq!(hits[2].title, "Third");
    }

    #[test]
    fn split_hit_without_separator_keeps_full_text_as_title() {
        let hit = split_hit("plain snippet text");
        assert_eq!(hit.title, "plain snippet text");
        assert!(hit.body.is_empty());
    }
}
