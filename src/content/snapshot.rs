//! In-memory published content tree
//!
//! Nodes live in one arena; parent and child links are indices, so a
//! [`NodeRef`] is just `(&snapshot, index)` and can walk both directions.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ContentNode;
use crate::errors::{HandbookError, Result};

/// One node as it appears in the JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: i64,
    pub name: String,
    #[serde(alias = "contentType")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    roots: Vec<RawNode>,
}

#[derive(Debug)]
struct Entry {
    id: i64,
    name: String,
    kind: String,
    url: String,
    fields: HashMap<String, Value>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Immutable snapshot of the published tree
#[derive(Debug, Default)]
pub struct ContentSnapshot {
    nodes: Vec<Entry>,
    roots: Vec<usize>,
}

impl ContentSnapshot {
    /// Parse a `{ "roots": [...] }` document
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RawDocument = serde_json::from_str(json)
            .map_err(|e| HandbookError::content_load(format!("Invalid content snapshot: {}", e)))?;
        Ok(Self::from_roots(doc.roots))
    }

    pub fn from_roots(roots: Vec<RawNode>) -> Self {
        let mut snapshot = ContentSnapshot::default();
        for raw in roots {
            let index = snapshot.push(raw, None);
            snapshot.roots.push(index);
        }
        snapshot
    }

    fn push(&mut self, raw: RawNode, parent: Option<usize>) -> usize {
        let url = match (raw.url, parent) {
            (Some(url), _) => url,
            (None, None) => "/".to_string(),
            (None, Some(p)) => {
                let base = &self.nodes[p].url;
                let sep = if base.ends_with('/') { "" } else { "/" };
                format!("{}{}{}/", base, sep, slugify(&raw.name))
            }
        };

        let index = self.nodes.len();
        self.nodes.push(Entry {
            id: raw.id,
            name: raw.name,
            kind: raw.kind,
            url,
            fields: raw.fields.into_iter().collect(),
            parent,
            children: Vec::with_capacity(raw.children.len()),
        });

        for child in raw.children {
            let child_index = self.push(child, Some(index));
            self.nodes[index].children.push(child_index);
        }

        index
    }

    pub fn roots(&self) -> Vec<NodeRef<'_>> {
        self.roots.iter().map(|&index| self.node(index)).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, index: usize) -> NodeRef<'_> {
        NodeRef {
            snapshot: self,
            index,
        }
    }
}

/// Borrowed handle to one node of a [`ContentSnapshot`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    snapshot: &'a ContentSnapshot,
    index: usize,
}

impl<'a> NodeRef<'a> {
    fn entry(&self) -> &'a Entry {
        &self.snapshot.nodes[self.index]
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entry = self.entry();
        f.debug_struct("NodeRef")
            .field("id", &entry.id)
            .field("kind", &entry.kind)
            .field("url", &entry.url)
            .finish()
    }
}

impl ContentNode for NodeRef<'_> {
    fn id(&self) -> i64 {
        self.entry().id
    }

    fn name(&self) -> &str {
        &self.entry().name
    }

    fn kind(&self) -> &str {
        &self.entry().kind
    }

    fn field(&self, alias: &str) -> Option<String> {
        match self.entry().fields.get(alias)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn children(&self) -> Vec<Self> {
        self.entry()
            .children
            .iter()
            .map(|&index| self.snapshot.node(index))
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.entry().parent.map(|index| self.snapshot.node(index))
    }

    fn url(&self) -> String {
        self.entry().url.clone()
    }
}

static NON_SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("valid slug pattern"));

/// URL segment for a node name: lowercase alphanumerics joined by `-`
pub fn slugify(name: &str) -> String {
    NON_SLUG_REGEX
        .replace_all(name, "-")
        .trim_matches('-')
        .to_lowercase()
}
