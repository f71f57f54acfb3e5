//! Folio: portfolio page renderer
//!
//! This library turns a JSON content document (a biography plus a list of
//! work items) into a rendered page model, with tag filtering mirrored into
//! the URL query string and a per-section show-more disclosure.

pub mod app;
pub mod config;
pub mod content;
pub mod filter;
pub mod markup;
pub mod site;
pub mod view;
pub mod watcher;

use serde::{Deserialize, Serialize};

/// Tag marking an item whose source is not public
pub const CLOSED_SOURCE_TAG: &str = "closed-source";

/// Tags that encode a category rather than a facet
pub const RESERVED_TAGS: [&str; 3] = ["paper", "project", "contribution"];

/// The whole content document after ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkContent {
    pub bio: Bio,
    pub items: Vec<WorkItem>,
}

/// Biography shown at the top of the page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bio {
    pub name: String,
    pub description: String,
}

/// Category of a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "publication")]
    Paper,
    Project,
    Contribution,
}

impl Category {
    /// All categories in section order
    pub const ALL: [Category; 3] = [Category::Paper, Category::Project, Category::Contribution];

    /// Map a reserved tag to its category
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "paper" => Some(Category::Paper),
            "project" => Some(Category::Project),
            "contribution" => Some(Category::Contribution),
            _ => None,
        }
    }

    /// Reserved tag carrying this category
    pub fn tag(self) -> &'static str {
        match self {
            Category::Paper => "paper",
            Category::Project => "project",
            Category::Contribution => "contribution",
        }
    }

    /// CSS class of a card in this category
    pub fn css_class(self) -> &'static str {
        match self {
            Category::Paper => "publication",
            Category::Project => "project",
            Category::Contribution => "contribution",
        }
    }

    /// Section id used by the per-category layout
    pub fn section_id(self) -> &'static str {
        match self {
            Category::Paper => "publications",
            Category::Project => "projects",
            Category::Contribution => "contributions",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Paper => write!(f, "Publication"),
            Category::Project => write!(f, "Project"),
            Category::Contribution => write!(f, "Contribution"),
        }
    }
}

/// A person credited on a work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ContributorRepr")]
pub struct Contributor {
    pub name: String,
    /// Render emphasised among the contributor list
    #[serde(default)]
    pub highlight: bool,
}

impl Contributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }
}

/// Contributors are either bare names or `{ name, highlight }` entries
#[derive(Deserialize)]
#[serde(untagged)]
enum ContributorRepr {
    Name(String),
    Entry {
        name: String,
        #[serde(default)]
        highlight: bool,
    },
}

impl From<ContributorRepr> for Contributor {
    fn from(repr: ContributorRepr) -> Self {
        match repr {
            ContributorRepr::Name(name) => Contributor::new(name),
            ContributorRepr::Entry { name, highlight } => Contributor { name, highlight },
        }
    }
}

/// A labelled external link rendered as a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Links are an ordered `label -> url` object, or the older `[{ label, url }]` list
#[derive(Deserialize)]
#[serde(untagged)]
enum LinksRepr {
    List(Vec<Link>),
    Map(serde_json::Map<String, serde_json::Value>),
}

fn deserialize_links<'de, D>(deserializer: D) -> Result<Vec<Link>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let repr = Option::<LinksRepr>::deserialize(deserializer)?;
    Ok(match repr {
        None => Vec::new(),
        Some(LinksRepr::List(links)) => links,
        Some(LinksRepr::Map(map)) => map
            .into_iter()
            .filter_map(|(label, value)| match value {
                serde_json::Value::String(url) => Some(Link { label, url }),
                _ => None,
            })
            .collect(),
    })
}

/// How a thumbnail path is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumbnail<'a> {
    /// Looping, muted, autoplaying video
    Video(&'a str),
    /// Lazily loaded image
    Image(&'a str),
}

impl<'a> Thumbnail<'a> {
    pub fn classify(path: &'a str) -> Self {
        let is_video = path.len() >= 4
            && path.is_char_boundary(path.len() - 4)
            && path[path.len() - 4..].eq_ignore_ascii_case(".mp4");
        if is_video {
            Thumbnail::Video(path)
        } else {
            Thumbnail::Image(path)
        }
    }

    pub fn path(&self) -> &'a str {
        match self {
            Thumbnail::Video(p) | Thumbnail::Image(p) => p,
        }
    }
}

/// A publication, project or contribution rendered as one card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub title: String,
    /// Explicit category; otherwise inferred from reserved tags
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Publication venue and year, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<Contributor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_links",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<Link>,
}

impl WorkItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Explicit `type` first, then the first reserved tag
    pub fn category(&self) -> Option<Category> {
        self.kind
            .or_else(|| self.tags.iter().find_map(|t| Category::from_tag(t)))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `has_tag`, plus the reserved tag of the item's category. An item
    /// typed by `type` or by a legacy array carries its category tag.
    pub fn carries_tag(&self, tag: &str) -> bool {
        self.has_tag(tag) || self.category().is_some_and(|c| c.tag() == tag)
    }

    /// Every tag `carries_tag` accepts: the category tag, then the item's
    /// own tags, without repeats
    pub fn filter_tags(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        let category: Option<&str> = self.category().map(Category::tag);
        for tag in category.into_iter().chain(self.tags.iter().map(String::as_str)) {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
        out
    }

    pub fn is_closed_source(&self) -> bool {
        self.has_tag(CLOSED_SOURCE_TAG)
    }

    /// Facet tags shown as tag spans: no reserved tags, no sentinel, no repeats
    pub fn display_tags(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for tag in &self.tags {
            let tag = tag.as_str();
            if is_reserved_tag(tag) || tag == CLOSED_SOURCE_TAG || seen.contains(&tag) {
                continue;
            }
            seen.push(tag);
        }
        seen
    }

    pub fn thumbnail(&self) -> Option<Thumbnail<'_>> {
        self.thumbnail
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Thumbnail::classify)
    }
}

/// Whether a tag encodes a category
pub fn is_reserved_tag(tag: &str) -> bool {
    RESERVED_TAGS.contains(&tag)
}
