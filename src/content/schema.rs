//! On-disk content schemas and their merge into `WorkContent`

use crate::{Bio, Category, WorkContent, WorkItem};
use serde::Deserialize;

/// Content document as written by hand.
///
/// The canonical form carries a single `items` array. Older documents split
/// items into `publications` (or `papers`), `projects` and `contributions`;
/// those arrays are accepted too and appended after `items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    pub bio: Bio,
    #[serde(default)]
    pub items: Vec<WorkItem>,
    #[serde(default)]
    pub publications: Vec<WorkItem>,
    #[serde(default)]
    pub papers: Vec<WorkItem>,
    #[serde(default)]
    pub projects: Vec<WorkItem>,
    #[serde(default)]
    pub contributions: Vec<WorkItem>,
}

impl RawContent {
    /// True when any of the split arrays is present
    pub fn is_legacy(&self) -> bool {
        !(self.publications.is_empty()
            && self.papers.is_empty()
            && self.projects.is_empty()
            && self.contributions.is_empty())
    }

    /// Merge every array into one list, synthesising `type` for split arrays
    pub fn into_content(self) -> WorkContent {
        let RawContent {
            bio,
            mut items,
            publications,
            papers,
            projects,
            contributions,
        } = self;

        let legacy = [
            (publications, Category::Paper),
            (papers, Category::Paper),
            (projects, Category::Project),
            (contributions, Category::Contribution),
        ];
        for (group, category) in legacy {
            items.extend(group.into_iter().map(|mut item| {
                item.kind.get_or_insert(category);
                item
            }));
        }

        WorkContent { bio, items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_items_untouched() {
        let raw: RawContent = serde_json::from_str(
            r#"{"bio":{"name":"A","description":"d"},"items":[{"title":"T","tags":["project"]}]}"#,
        )
        .unwrap();
        assert!(!raw.is_legacy());
        let content = raw.into_content();
        assert_eq!(content.items.len(), 1);
        assert_eq!(content.items[0].kind, None);
        assert_eq!(content.items[0].category(), Some(Category::Project));
    }

    #[test]
    fn test_legacy_arrays_get_types() {
        let raw: RawContent = serde_json::from_str(
            r#"{
                "bio": {"name": "A", "description": "d"},
                "contributions": [{"title": "C"}],
                "publications": [{"title": "P"}],
                "projects": [{"title": "R", "type": "contribution"}]
            }"#,
        )
        .unwrap();
        assert!(raw.is_legacy());
        let content = raw.into_content();
        let got: Vec<(&str, Option<Category>)> = content
            .items
            .iter()
            .map(|i| (i.title.as_str(), i.kind))
            .collect();
        assert_eq!(
            got,
            vec![
                ("P", Some(Category::Paper)),
                ("R", Some(Category::Contribution)),
                ("C", Some(Category::Contribution)),
            ]
        );
    }

    #[test]
    fn test_papers_alias_array() {
        let raw: RawContent = serde_json::from_str(
            r#"{"bio":{"name":"A","description":"d"},"papers":[{"title":"P"}]}"#,
        )
        .unwrap();
        let content = raw.into_content();
        assert_eq!(content.items[0].category(), Some(Category::Paper));
    }
}
