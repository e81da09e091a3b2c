//! Compile-time constants and tunables shared across the crate.

/// Application name shown in the header caption.
pub const APP_NAME: &str = "coachdesk";
/// Application version injected from `Cargo.toml` at compile time.
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables checked (in order) for the Gemini API key.
pub const API_KEY_VARS: &[&str] = &["GOOGLE_API_KEY", "GEMINI_API_KEY"];
/// Environment variable overriding the HTTP timeout, in seconds.
pub const HTTP_TIMEOUT_VAR: &str = "COACHDESK_HTTP_TIMEOUT_SECS";

/// Gemini REST API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// DuckDuckGo Instant Answer API endpoint (keyless).
pub const DDG_API_URL: &str = "https://api.duckduckgo.com/";

/// Bounded per-call HTTP timeout, in seconds. The upstream service imposes
/// none of its own, so a hung call would otherwise block the turn forever.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Search suffix appended to the user text for listing lookups.
pub const LISTING_QUERY_SUFFIX: &str = " real estate listing features";
/// Maximum number of search results folded into an enrichment block.
pub const MAX_SEARCH_RESULTS: usize = 4;
/// Minimum user-text length before the address heuristic may fire.
pub const MIN_LOOKUP_LEN: usize = 10;

/// Maximum number of entries kept in the activity log panel.
pub const MAX_LOGS: usize = 200;
