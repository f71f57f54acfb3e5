//! Committing cards to containers, and click dispatch over them

use super::host::Host;
use super::page::{Card, Page};
use super::SectionView;
use crate::markup::Templates;
use crate::WorkItem;
use tracing::debug;

/// Clear a section's container and fill it with one card per item, in order
pub fn render(section: &mut SectionView, items: &[(usize, &WorkItem)], templates: &Templates) {
    section.cards.clear();
    section
        .cards
        .extend(items.iter().map(|(index, item)| Card::new(*index, item, templates)));
    debug!(section = %section.id, cards = section.cards.len(), "section rendered");
}

/// What inside a card received the click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Anywhere on the card that is not a link or button
    Card,
    /// The title anchor; it navigates by itself
    Anchor,
    /// The nth link button of the card
    LinkButton(usize),
}

/// One listener per container, registered once and kept across re-renders.
///
/// Dispatch looks the clicked card up by item in the live container, so
/// replacing the cards never needs a new listener.
#[derive(Debug, Clone, Default)]
pub struct ClickDelegate {
    containers: Vec<String>,
}

impl ClickDelegate {
    /// Register on every section of the page
    pub fn attach(page: &Page) -> Self {
        Self {
            containers: page.sections.iter().map(|s| s.container_id.clone()).collect(),
        }
    }

    /// False for containers of a page this delegate was not attached to.
    /// `resolve` accepts any `Page`, and such clicks never reach a listener.
    pub fn listens_on(&self, container_id: &str) -> bool {
        self.containers.iter().any(|c| c == container_id)
    }

    /// URL a click resolves to, if any. `None` when the section's container
    /// has no listener from this delegate.
    pub fn resolve(
        &self,
        page: &Page,
        section_id: &str,
        item_index: usize,
        target: ClickTarget,
    ) -> Option<String> {
        let section = page.section(section_id)?;
        if !self.listens_on(&section.container_id) {
            return None;
        }
        let card = section.card_for(item_index)?;
        match target {
            ClickTarget::Card => card.url.clone(),
            ClickTarget::Anchor => None,
            ClickTarget::LinkButton(n) => card.buttons.get(n).cloned(),
        }
    }

    /// Resolve a click and open the result in a new context
    pub fn dispatch<H: Host>(
        &self,
        page: &Page,
        host: &mut H,
        section_id: &str,
        item_index: usize,
        target: ClickTarget,
    ) -> Option<String> {
        let url = self.resolve(page, section_id, item_index, target)?;
        host.open_in_new_context(&url);
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RecordingHost;
    use crate::Link;
    use url::Url;

    fn page_with(items: &[WorkItem]) -> Page {
        let mut section = SectionView::new("work", "Work");
        let indexed: Vec<(usize, &WorkItem)> = items.iter().enumerate().collect();
        render(&mut section, &indexed, &Templates::new());
        Page {
            sections: vec![section],
            ..Default::default()
        }
    }

    fn host() -> RecordingHost {
        RecordingHost::new(Url::parse("https://me.dev/").unwrap())
    }

    #[test]
    fn test_render_replaces_cards_in_order() {
        let items = vec![WorkItem::new("A"), WorkItem::new("B"), WorkItem::new("C")];
        let mut section = SectionView::new("work", "Work");
        let all: Vec<(usize, &WorkItem)> = items.iter().enumerate().collect();
        render(&mut section, &all, &Templates::new());
        assert_eq!(section.cards.len(), 3);

        let subset = vec![(2, &items[2]), (0, &items[0])];
        render(&mut section, &subset, &Templates::new());
        let order: Vec<usize> = section.cards.iter().map(|c| c.item_index).collect();
        assert_eq!(order, vec![2, 0]);
    }

    #[test]
    fn test_card_click_opens_url() {
        let items = vec![WorkItem::new("A").with_url("https://a")];
        let page = page_with(&items);
        let delegate = ClickDelegate::attach(&page);
        let mut host = host();
        let opened = delegate.dispatch(&page, &mut host, "work", 0, ClickTarget::Card);
        assert_eq!(opened.as_deref(), Some("https://a"));
        assert_eq!(host.opened(), ["https://a".to_string()]);
    }

    #[test]
    fn test_card_without_url_is_noop() {
        let items = vec![WorkItem::new("A")];
        let page = page_with(&items);
        let delegate = ClickDelegate::attach(&page);
        let mut host = host();
        assert!(delegate.dispatch(&page, &mut host, "work", 0, ClickTarget::Card).is_none());
        assert!(host.opened().is_empty());
    }

    #[test]
    fn test_anchor_and_button_clicks_do_not_open_card() {
        let mut item = WorkItem::new("A").with_url("https://a");
        item.links = vec![Link {
            label: "Code".into(),
            url: "https://code".into(),
        }];
        let page = page_with(&[item]);
        let delegate = ClickDelegate::attach(&page);
        let mut host = host();

        assert!(delegate.dispatch(&page, &mut host, "work", 0, ClickTarget::Anchor).is_none());
        let opened = delegate.dispatch(&page, &mut host, "work", 0, ClickTarget::LinkButton(0));
        assert_eq!(opened.as_deref(), Some("https://code"));
        assert_eq!(host.opened(), ["https://code".to_string()]);
        assert!(delegate.dispatch(&page, &mut host, "work", 0, ClickTarget::LinkButton(5)).is_none());
    }

    #[test]
    fn test_delegate_survives_rerender() {
        let items = vec![
            WorkItem::new("A").with_url("https://a"),
            WorkItem::new("B").with_url("https://b"),
        ];
        let mut page = page_with(&items);
        let delegate = ClickDelegate::attach(&page);

        let only_b = vec![(1, &items[1])];
        render(&mut page.sections[0], &only_b, &Templates::new());

        assert!(delegate.resolve(&page, "work", 0, ClickTarget::Card).is_none());
        assert_eq!(
            delegate.resolve(&page, "work", 1, ClickTarget::Card).as_deref(),
            Some("https://b")
        );
    }

    #[test]
    fn test_unknown_section() {
        let page = page_with(&[WorkItem::new("A").with_url("https://a")]);
        let delegate = ClickDelegate::attach(&page);
        assert!(delegate.resolve(&page, "nope", 0, ClickTarget::Card).is_none());
    }

    #[test]
    fn test_container_without_listener() {
        let items = [WorkItem::new("A").with_url("https://a")];
        let combined = page_with(&items);
        let delegate = ClickDelegate::attach(&combined);

        let mut section = SectionView::new("projects", "Projects");
        let indexed: Vec<(usize, &WorkItem)> = items.iter().enumerate().collect();
        render(&mut section, &indexed, &Templates::new());
        let other = Page {
            sections: vec![section],
            ..Default::default()
        };

        assert!(delegate.listens_on("work-container"));
        assert!(!delegate.listens_on("projects-container"));
        assert!(other.section("projects").unwrap().card_for(0).is_some());
        assert!(delegate.resolve(&other, "projects", 0, ClickTarget::Card).is_none());

        let mut host = host();
        assert!(delegate
            .dispatch(&other, &mut host, "projects", 0, ClickTarget::Card)
            .is_none());
        assert!(host.opened().is_empty());
        assert_eq!(
            delegate.resolve(&combined, "work", 0, ClickTarget::Card).as_deref(),
            Some("https://a")
        );
    }
}
