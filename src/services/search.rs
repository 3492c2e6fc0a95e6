//! Handbook content search
//!
//! A linear scan over the published tree with case-insensitive substring
//! matching. No index and no ranking: results come back in document order,
//! policies first, then categories.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};
use ts_rs::TS;

use crate::content::{CATEGORY_KIND, ContentNode, ContentSource, POLICY_KIND, fields, flatten};
use crate::errors::Result;
use crate::utils::{contains_ignore_case, strip_html, take_words};

use super::TS_EXPORT_PATH;

pub const DEFAULT_TAKE: i64 = 20;
pub const MAX_TAKE: i64 = 50;
pub const MIN_QUERY_CHARS: usize = 2;
/// Word budget for descriptions built from the full policy text
pub const DESCRIPTION_WORDS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultType {
    Policy,
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct PolicyHit {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Parent category page, or the policy itself when it has no parent
    pub url: String,
    /// Parent URL for `#fragment` deep links; `null` without a parent
    pub category_url: Option<String>,
    pub category: String,
    #[serde(rename = "type")]
    pub result_type: SearchResultType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHit {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub category: String,
    #[serde(rename = "type")]
    pub result_type: SearchResultType,
}

/// One search hit; serialized without a tag, the `type` field tells them apart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(untagged)]
pub enum SearchResult {
    Policy(PolicyHit),
    Category(CategoryHit),
}

impl SearchResult {
    pub fn result_type(&self) -> SearchResultType {
        match self {
            SearchResult::Policy(hit) => hit.result_type,
            SearchResult::Category(hit) => hit.result_type,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchResult::Policy(hit) => &hit.title,
            SearchResult::Category(hit) => &hit.title,
        }
    }
}

/// Clamp a requested result count into `[1, MAX_TAKE]`
pub fn clamp_take(take: i64) -> usize {
    take.clamp(1, MAX_TAKE) as usize
}

/// Trimmed query, or `None` when it is too short to search
pub fn normalize_query(query: Option<&str>) -> Option<&str> {
    let query = query?.trim();
    (query.chars().count() >= MIN_QUERY_CHARS).then_some(query)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn policy_hit<N: ContentNode>(node: &N, query: &str) -> Option<PolicyHit> {
    let title = non_blank(node.field(fields::POLICY_TITLE)).unwrap_or_else(|| node.name().to_string());
    let summary = node.field(fields::SUMMARY);
    let full_text = node.field(fields::FULL_POLICY_TEXT);

    let stripped_summary = strip_html(summary.as_deref());
    let stripped_text = strip_html(full_text.as_deref());

    let matched = contains_ignore_case(&title, query)
        || (!stripped_summary.is_empty() && contains_ignore_case(&stripped_summary, query))
        || (!stripped_text.is_empty() && contains_ignore_case(&stripped_text, query));
    if !matched {
        return None;
    }

    let description = if summary.as_deref().is_none_or(|s| s.trim().is_empty()) {
        take_words(&stripped_text, DESCRIPTION_WORDS)
    } else {
        stripped_summary
    };

    let category_url = node.parent().map(|p| p.url());
    Some(PolicyHit {
        id: node.id(),
        title,
        description,
        url: category_url.clone().unwrap_or_else(|| node.url()),
        category_url,
        category: "Policy".to_string(),
        result_type: SearchResultType::Policy,
    })
}

fn category_hit<N: ContentNode>(node: &N, query: &str) -> Option<CategoryHit> {
    let title =
        non_blank(node.field(fields::CATEGORY_TITLE)).unwrap_or_else(|| node.name().to_string());
    let description = node.field(fields::CATEGORY_DESCRIPTION);

    let matched = contains_ignore_case(&title, query)
        || description
            .as_deref()
            .is_some_and(|d| contains_ignore_case(d, query));
    if !matched {
        return None;
    }

    Some(CategoryHit {
        title,
        description,
        url: node.url(),
        category: "Category".to_string(),
        result_type: SearchResultType::Category,
    })
}

/// Search a content tree
///
/// `query` must already be trimmed; `take` must already be clamped.
pub fn search_nodes<N: ContentNode>(roots: &[N], query: &str, take: usize) -> Vec<SearchResult> {
    let nodes = flatten(roots);

    let policies = nodes
        .iter()
        .filter(|n| n.kind() == POLICY_KIND)
        .filter_map(|n| policy_hit(n, query))
        .take(take)
        .map(SearchResult::Policy);

    let categories = nodes
        .iter()
        .filter(|n| n.kind() == CATEGORY_KIND)
        .filter_map(|n| category_hit(n, query))
        .take(take)
        .map(SearchResult::Category);

    policies.chain(categories).take(take).collect()
}

pub struct SearchService {
    source: Arc<dyn ContentSource>,
}

impl SearchService {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Run a search against the current published snapshot
    ///
    /// Short queries return nothing without touching the content source.
    /// An unavailable content cache yields an empty list, not an error.
    pub async fn search(&self, query: Option<&str>, take: i64) -> Result<Vec<SearchResult>> {
        let Some(query) = normalize_query(query) else {
            return Ok(Vec::new());
        };
        let take = clamp_take(take);

        let snapshot = self.source.published().await.inspect_err(|e| {
            error!("Error executing search for query {:?}: {}", query, e);
        })?;
        let Some(snapshot) = snapshot else {
            debug!("Content cache unavailable, returning no search results");
            return Ok(Vec::new());
        };

        let results = search_nodes(&snapshot.roots(), query, take);
        debug!("Search {:?} matched {} results", query, results.len());
        Ok(results)
    }
}
