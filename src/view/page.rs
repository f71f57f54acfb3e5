//! In-memory page model: the slots, containers and controls a portfolio
//! page exposes

use crate::filter::FilterMode;
use crate::markup::{link_targets, Element, Node, Templates};
use crate::WorkItem;

/// Class marking a card collapsed by the disclosure
pub const HIDDEN_CLASS: &str = "hidden-item";

/// One rendered work item inside a container
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Position of the item in the unfiltered list
    pub item_index: usize,
    pub url: Option<String>,
    /// URLs behind the card's link buttons, in button order
    pub buttons: Vec<String>,
    pub element: Element,
}

impl Card {
    pub fn new(item_index: usize, item: &WorkItem, templates: &Templates) -> Self {
        Self {
            item_index,
            url: item.url.clone(),
            buttons: link_targets(item),
            element: templates.card_element(item, item_index),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.element.has_class(HIDDEN_CLASS)
    }

    pub fn hide(&mut self) {
        self.element.add_class(HIDDEN_CLASS);
    }

    pub fn show(&mut self) {
        self.element.remove_class(HIDDEN_CLASS);
    }

    pub fn to_html(&self) -> String {
        Node::Element(self.element.clone()).to_html()
    }
}

/// A section's show-more/less control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowMoreControl {
    pub section: String,
    /// Selector for the section's cards
    pub selector: String,
    pub limit: usize,
    pub label: String,
    pub aria_label: String,
    pub visible: bool,
}

/// A titled container of cards
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub id: String,
    pub title: String,
    pub container_id: String,
    pub cards: Vec<Card>,
    pub show_more: Option<ShowMoreControl>,
}

impl SectionView {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            container_id: format!("{}-container", id),
            id,
            title: title.into(),
            cards: Vec::new(),
            show_more: None,
        }
    }

    /// Attach a show-more control for this section
    pub fn with_show_more(mut self, selector: impl Into<String>, limit: usize) -> Self {
        self.show_more = Some(ShowMoreControl {
            section: self.id.clone(),
            selector: selector.into(),
            limit,
            label: super::disclosure::SHOW_MORE.to_string(),
            aria_label: super::disclosure::SHOW_MORE.to_string(),
            visible: true,
        });
        self
    }

    pub fn hidden_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_hidden()).count()
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| !c.is_hidden())
    }

    /// Live card for an item, if the item is currently rendered here
    pub fn card_for(&self, item_index: usize) -> Option<&Card> {
        self.cards.iter().find(|c| c.item_index == item_index)
    }
}

/// A preset filter button (`data-filter`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub filter: String,
    pub label: String,
    pub active: bool,
}

/// Select for tags without a preset button
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFilter {
    pub options: Vec<String>,
    /// Currently selected value, empty when none
    pub value: String,
}

/// The whole page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// `bio-name` slot, as markup
    pub bio_name_html: String,
    /// `bio-description` slot, as text
    pub bio_description: String,
    pub sections: Vec<SectionView>,
    pub filter_buttons: Vec<FilterButton>,
    pub custom_filter: Option<CustomFilter>,
    pub filter_mode: FilterMode,
    /// Active filter tags, sorted
    pub active_tags: Vec<String>,
}

impl Page {
    pub fn section(&self, id: &str) -> Option<&SectionView> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut SectionView> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Item indices of the visible cards, in page order
    pub fn visible_item_indices(&self) -> Vec<usize> {
        self.sections
            .iter()
            .flat_map(|s| s.visible_cards().map(|c| c.item_index))
            .collect()
    }

    pub fn rendered_item_indices(&self) -> Vec<usize> {
        self.sections
            .iter()
            .flat_map(|s| s.cards.iter().map(|c| c.item_index))
            .collect()
    }
}
