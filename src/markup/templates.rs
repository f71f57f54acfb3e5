//! Card and bio templates
//!
//! Pure mapping from content records to typed nodes. Nothing here touches
//! the page; committing the nodes is the view's job.

use super::escape::{escape_html, is_markup_significant, tag_class};
use super::node::{Element, Node};
use crate::{Bio, Thumbnail, WorkItem};
use tracing::warn;

/// Note appended to cards tagged `closed-source`
pub const DEFAULT_CLOSED_SOURCE_NOTE: &str =
    "This project is closed source; code and data are not publicly available.";

/// Bio slots: name as markup, description as plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioView {
    pub name_html: String,
    pub description: String,
}

pub fn render_bio(bio: &Bio) -> BioView {
    BioView {
        name_html: Node::from(Element::new("strong").text(bio.name.as_str())).to_html(),
        description: bio.description.clone(),
    }
}

/// URLs opened by a card's buttons, in button order
pub fn link_targets(item: &WorkItem) -> Vec<String> {
    let mut targets = Vec::new();
    if let (Some(_), Some(url)) = (&item.doi, &item.url) {
        targets.push(url.clone());
    }
    targets.extend(item.links.iter().map(|l| l.url.clone()));
    targets
}

/// Inline handler for a link button: open in a new context without
/// letting the click reach the card
fn open_handler(url: &str) -> String {
    format!(
        "event.stopPropagation(); event.preventDefault(); window.open('{}', '_blank');",
        url
    )
}

/// Card templates with their rendering options
#[derive(Debug, Clone)]
pub struct Templates {
    highlight: Vec<String>,
    closed_source_note: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates {
    pub fn new() -> Self {
        Self {
            highlight: Vec::new(),
            closed_source_note: DEFAULT_CLOSED_SOURCE_NOTE.to_string(),
        }
    }

    /// Contributor names to emphasise even without a `highlight` flag
    pub fn with_highlight<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_closed_source_note(mut self, note: impl Into<String>) -> Self {
        self.closed_source_note = note.into();
        self
    }

    pub fn item_to_html(&self, item: &WorkItem, index: usize) -> String {
        self.item_to_node(item, index).to_html()
    }

    pub fn item_to_node(&self, item: &WorkItem, index: usize) -> Node {
        self.card_element(item, index).into()
    }

    /// Build the card for one item. `index` is the item's position in the
    /// unfiltered list and identifies it for click dispatch.
    pub fn card_element(&self, item: &WorkItem, index: usize) -> Element {
        let category = item.category();
        let mut class = String::from("work-item");
        if let Some(c) = category {
            class.push(' ');
            class.push_str(c.css_class());
        }

        let mut card = Element::new("article")
            .class(class)
            .attr("data-index", index.to_string());
        if let Some(url) = &item.url {
            self.check_trusted(item, url);
            card = card.trusted_attr("data-url", url.clone());
        }
        let filter_tags = item.filter_tags();
        if !filter_tags.is_empty() {
            card = card.attr("data-tags", filter_tags.join(","));
        }

        if let Some(thumb) = item.thumbnail() {
            card = card.child(thumbnail_node(thumb, &item.title));
        }

        let mut body = Element::new("div").class("work-content");
        if let Some(c) = category {
            body = body.child(Element::new("div").class("work-category").text(c.to_string()));
        }
        body = body.child(self.title_node(item));

        for (class, value) in [
            ("work-subtitle", &item.subtitle),
            ("work-meta", &item.meta),
            ("work-desc", &item.description),
        ] {
            if let Some(v) = value {
                body = body.child(Element::new("div").class(class).text(v.as_str()));
            }
        }

        if !item.contributors.is_empty() {
            body = body.child(self.contributors_node(item));
        }

        if let Some(links) = self.links_node(item) {
            body = body.child(links);
        }

        let tags = tags_node(item);
        if !tags.children.is_empty() {
            body = body.child(tags);
        }

        if item.is_closed_source() {
            body = body.child(
                Element::new("div")
                    .class("closed-source-note")
                    .text(self.closed_source_note.as_str()),
            );
        }

        card.child(body)
    }

    fn title_node(&self, item: &WorkItem) -> Element {
        let title = Element::new("div").class("work-title");
        match &item.url {
            Some(url) => title.child(
                Element::new("a")
                    .trusted_attr("href", url.clone())
                    .attr("target", "_blank")
                    .attr("rel", "noopener")
                    .text(item.title.as_str()),
            ),
            None => title.text(item.title.as_str()),
        }
    }

    fn is_highlighted(&self, name: &str, flagged: bool) -> bool {
        flagged || self.highlight.iter().any(|h| h == name)
    }

    fn contributors_node(&self, item: &WorkItem) -> Element {
        let mut el = Element::new("div")
            .class("work-contributors")
            .text("Contributors: ");
        for (i, c) in item.contributors.iter().enumerate() {
            if i > 0 {
                el = el.text("; ");
            }
            el = if self.is_highlighted(&c.name, c.highlight) {
                el.child(Element::new("strong").text(c.name.as_str()))
            } else {
                el.text(c.name.as_str())
            };
        }
        el
    }

    fn links_node(&self, item: &WorkItem) -> Option<Element> {
        let mut buttons = Vec::new();
        if let Some(doi) = &item.doi {
            let label = format!("DOI: {}", doi);
            match &item.url {
                Some(url) => buttons.push(self.link_button(item, "work-link work-doi", url, label)),
                None => buttons.push(Element::new("span").class("work-doi").text(label)),
            }
        }
        for link in &item.links {
            buttons.push(self.link_button(item, "work-link", &link.url, link.label.clone()));
        }

        if buttons.is_empty() {
            None
        } else {
            Some(Element::new("div").class("work-links").children(buttons))
        }
    }

    fn link_button(&self, item: &WorkItem, class: &str, url: &str, label: String) -> Element {
        self.check_trusted(item, url);
        Element::new("button")
            .attr("type", "button")
            .class(class)
            .trusted_attr("data-href", url)
            .trusted_attr("onclick", open_handler(url))
            .text(label)
    }

    /// URLs are first-party and written unescaped; say so when one would break out
    fn check_trusted(&self, item: &WorkItem, value: &str) {
        if is_markup_significant(value) {
            warn!(
                item = %item.title,
                "URL {} contains markup characters and is written unescaped",
                escape_html(value)
            );
        }
    }
}

fn thumbnail_node(thumb: Thumbnail<'_>, title: &str) -> Element {
    let media = match thumb {
        Thumbnail::Video(src) => Element::new("video")
            .trusted_attr("src", src)
            .flag("autoplay")
            .flag("loop")
            .flag("muted")
            .flag("playsinline"),
        Thumbnail::Image(src) => Element::new("img")
            .trusted_attr("src", src)
            .attr("alt", title)
            .attr("loading", "lazy"),
    };
    Element::new("div").class("work-thumbnail").child(media)
}

fn tags_node(item: &WorkItem) -> Element {
    let mut spans = Vec::new();
    if let Some(c) = item.category() {
        spans.push(tag_span(c.tag()));
    }
    spans.extend(item.display_tags().into_iter().map(tag_span));
    Element::new("div").class("work-tags").children(spans)
}

fn tag_span(tag: &str) -> Element {
    Element::new("span")
        .class(format!("tag {}", tag_class(tag)))
        .text(tag)
}
