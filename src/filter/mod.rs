//! Tag filter engine
//!
//! Holds the set of active tags, computes the filtered view of the item
//! list, and maps the set to and from the `tags` query parameter.

mod url_state;

pub use url_state::{state_from_url, state_to_url, TAGS_PARAM};

use crate::{is_reserved_tag, WorkItem, CLOSED_SOURCE_TAG};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Preset value that clears every filter
pub const SHOW_ALL: &str = "all";

/// How active tags combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Item must carry every active tag
    #[default]
    #[serde(alias = "and")]
    All,
    /// Radio-style: at most one tag is active at a time, and an item
    /// passes when it carries any of them
    Single,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::Single => write!(f, "single"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "and" => Ok(FilterMode::All),
            "single" => Ok(FilterMode::Single),
            other => Err(format!("unknown filter mode '{}' (expected all or single)", other)),
        }
    }
}

/// Active tag filters; empty means show everything. Tags are stored
/// trimmed and never blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    tags: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self::new();
        for tag in tags {
            state.insert(tag);
        }
        state
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Add a tag, trimmed. Blank tags are ignored.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.tags.insert(tag.to_string())
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Preset button: replaces the whole set with `tag` (`all` just clears)
    pub fn select_preset(&mut self, tag: &str) {
        self.tags.clear();
        if tag.trim() != SHOW_ALL {
            self.insert(tag);
        }
    }

    /// Custom filter control: replaces the whole set with `value`, blank clears
    pub fn select_custom(&mut self, value: &str) {
        self.tags.clear();
        self.insert(value);
    }

    /// Add or remove one tag. In single mode adding replaces the set.
    pub fn toggle(&mut self, tag: &str, mode: FilterMode) {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.remove(tag) {
            return;
        }
        if mode == FilterMode::Single {
            self.tags.clear();
        }
        self.tags.insert(tag.to_string());
    }

    /// Comma-joined form used in the query string
    pub fn to_query_value(&self) -> String {
        self.tags.iter().cloned().collect::<Vec<_>>().join(",")
    }

    /// Whether an item passes this filter
    pub fn matches(&self, item: &WorkItem, mode: FilterMode) -> bool {
        match mode {
            FilterMode::All => self.tags.iter().all(|t| item.carries_tag(t)),
            FilterMode::Single => self.is_empty() || self.tags.iter().any(|t| item.carries_tag(t)),
        }
    }
}

/// Items passing the filter, with their positions in `items`, in order
pub fn filter_items<'a>(
    items: &'a [WorkItem],
    state: &FilterState,
    mode: FilterMode,
) -> Vec<(usize, &'a WorkItem)> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| state.matches(item, mode))
        .collect()
}

/// A filterable tag and how many items carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFacet {
    pub tag: String,
    pub count: usize,
}

/// Facet tags across all items, in order of first appearance
pub fn tag_facets(items: &[WorkItem]) -> Vec<TagFacet> {
    let mut facets: Vec<TagFacet> = Vec::new();
    for item in items {
        let mut seen: Vec<&str> = Vec::new();
        for tag in &item.tags {
            if is_reserved_tag(tag) || tag == CLOSED_SOURCE_TAG || seen.contains(&tag.as_str()) {
                continue;
            }
            seen.push(tag.as_str());
            match facets.iter_mut().find(|f| &f.tag == tag) {
                Some(f) => f.count += 1,
                None => facets.push(TagFacet {
                    tag: tag.clone(),
                    count: 1,
                }),
            }
        }
    }
    facets
}

/// Options for the custom filter select: facets without a preset button
pub fn custom_filter_options(items: &[WorkItem], presets: &[String]) -> Vec<String> {
    tag_facets(items)
        .into_iter()
        .map(|f| f.tag)
        .filter(|t| !presets.contains(t))
        .collect()
}
