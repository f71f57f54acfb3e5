//! Config schema and deserialization

use crate::app::{Layout, RenderOptions};
use crate::filter::{FilterMode, SHOW_ALL};
use crate::markup::Templates;
use crate::site::PageMeta;
use crate::view::ITEM_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root config structure for .foliorc.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Content document: a path relative to the config, or an http(s) URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Where the written page goes. Stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Document title. Defaults to the bio name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Address the page is published at; the query string is applied to it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// Cards per section before "Show more". 0 disables the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_limit: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_mode: Option<FilterMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,

    /// Preset filter buttons, in order. `all` is the clear-all button.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<String>,

    /// Contributor names rendered in bold
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight_contributors: Vec<String>,

    /// Note shown on closed-source items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_source_note: Option<String>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_content: Option<&str>,
        cli_output: Option<&str>,
        cli_mode: Option<FilterMode>,
    ) -> Self {
        if let Some(content) = cli_content {
            self.content = Some(content.to_string());
        }
        if let Some(output) = cli_output {
            self.output = Some(output.to_string());
        }
        if cli_mode.is_some() {
            self.filter_mode = cli_mode;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.content.is_none() {
            self.content = base.content;
        }
        if self.output.is_none() {
            self.output = base.output;
        }
        if self.title.is_none() {
            self.title = base.title;
        }
        if self.site_url.is_none() {
            self.site_url = base.site_url;
        }
        if self.item_limit.is_none() {
            self.item_limit = base.item_limit;
        }
        if self.filter_mode.is_none() {
            self.filter_mode = base.filter_mode;
        }
        if self.layout.is_none() {
            self.layout = base.layout;
        }
        if self.closed_source_note.is_none() {
            self.closed_source_note = base.closed_source_note;
        }

        // Lists: base entries first, no duplicates
        self.presets = merge_lists(base.presets, std::mem::take(&mut self.presets));
        self.highlight_contributors = merge_lists(
            base.highlight_contributors,
            std::mem::take(&mut self.highlight_contributors),
        );
    }

    /// Disclosure limit, `None` when disabled
    pub fn item_limit(&self) -> Option<usize> {
        match self.item_limit {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(ITEM_LIMIT),
        }
    }

    /// Preset buttons, defaulting to a lone `all`
    pub fn presets(&self) -> Vec<String> {
        if self.presets.is_empty() {
            vec![SHOW_ALL.to_string()]
        } else {
            self.presets.clone()
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let mut templates = Templates::new().with_highlight(self.highlight_contributors.iter());
        if let Some(note) = &self.closed_source_note {
            templates = templates.with_closed_source_note(note.as_str());
        }
        RenderOptions {
            mode: self.filter_mode.unwrap_or_default(),
            layout: self.layout.unwrap_or_default(),
            item_limit: self.item_limit(),
            presets: self.presets(),
            templates,
        }
    }

    /// Document settings; `fallback_title` is used when no title is configured
    pub fn page_meta(&self, fallback_title: &str) -> PageMeta {
        let title = match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ if !fallback_title.trim().is_empty() => fallback_title.to_string(),
            _ => PageMeta::default().title,
        };
        PageMeta {
            title,
            site_url: self.site_url.clone(),
            ..Default::default()
        }
    }

    /// Output path, if configured
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.as_ref().map(PathBuf::from)
    }
}

fn merge_lists(base: Vec<String>, own: Vec<String>) -> Vec<String> {
    let mut merged = base;
    for entry in own {
        if !merged.contains(&entry) {
            merged.push(entry);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case() {
        let config: Config = serde_json::from_str(
            r#"{
                "content": "data/content.json",
                "siteUrl": "https://ada.dev/",
                "itemLimit": 5,
                "filterMode": "single",
                "layout": "sections",
                "presets": ["all", "rust"],
                "highlightContributors": ["Ada Lovelace"],
                "closedSourceNote": "Private code"
            }"#,
        )
        .unwrap();
        assert_eq!(config.site_url.as_deref(), Some("https://ada.dev/"));
        assert_eq!(config.item_limit(), Some(5));

        let options = config.render_options();
        assert_eq!(options.mode, FilterMode::Single);
        assert_eq!(options.layout, Layout::Sections);
        assert_eq!(options.presets, vec!["all", "rust"]);
    }

    #[test]
    fn test_and_mode_alias() {
        let config: Config = serde_json::from_str(r#"{ "filterMode": "and" }"#).unwrap();
        assert_eq!(config.filter_mode, Some(FilterMode::All));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let options = config.render_options();
        assert_eq!(options.item_limit, Some(ITEM_LIMIT));
        assert_eq!(options.mode, FilterMode::All);
        assert_eq!(options.layout, Layout::Combined);
        assert_eq!(options.presets, vec![SHOW_ALL]);
        assert!(config.output_path().is_none());
    }

    #[test]
    fn test_zero_limit_disables_disclosure() {
        let config: Config = serde_json::from_str(r#"{ "itemLimit": 0 }"#).unwrap();
        assert_eq!(config.item_limit(), None);
    }

    #[test]
    fn test_merge_from_child_wins_lists_merge() {
        let mut child: Config = serde_json::from_str(
            r#"{ "title": "Child", "presets": ["rust", "web"], "highlightContributors": ["B"] }"#,
        )
        .unwrap();
        let base: Config = serde_json::from_str(
            r#"{ "title": "Base", "itemLimit": 4, "presets": ["all", "rust"], "highlightContributors": ["A"] }"#,
        )
        .unwrap();
        child.merge_from(base);
        assert_eq!(child.title.as_deref(), Some("Child"));
        assert_eq!(child.item_limit, Some(4));
        assert_eq!(child.presets, vec!["all", "rust", "web"]);
        assert_eq!(child.highlight_contributors, vec!["A", "B"]);
    }

    #[test]
    fn test_merge_with_cli() {
        let config: Config =
            serde_json::from_str(r#"{ "content": "a.json", "filterMode": "all" }"#).unwrap();
        let config = config.merge_with_cli(Some("b.json"), Some("out.html"), Some(FilterMode::Single));
        assert_eq!(config.content.as_deref(), Some("b.json"));
        assert_eq!(config.output_path(), Some(PathBuf::from("out.html")));
        assert_eq!(config.filter_mode, Some(FilterMode::Single));

        let config = config.merge_with_cli(None, None, None);
        assert_eq!(config.content.as_deref(), Some("b.json"));
    }

    #[test]
    fn test_page_meta_title_fallback() {
        let config = Config::default();
        assert_eq!(config.page_meta("Ada").title, "Ada");
        assert_eq!(config.page_meta("  ").title, "Portfolio");

        let config: Config = serde_json::from_str(r#"{ "title": "Work" }"#).unwrap();
        assert_eq!(config.page_meta("Ada").title, "Work");
    }

    #[test]
    fn test_serialize_skips_unset() {
        let config = Config {
            content: Some("content.json".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"content":"content.json"}"#);
    }
}
