//! Show-more / show-less disclosure
//!
//! A section is collapsed when any of its cards carries the hidden class.
//! That class is the only state: every toggle re-reads it from the cards.

use super::page::SectionView;
use tracing::debug;

/// Cards shown before the rest are collapsed
pub const ITEM_LIMIT: usize = 3;

pub const SHOW_MORE: &str = "Show more";
pub const SHOW_LESS: &str = "Show less";

/// Collapse a freshly rendered section to its first `limit` cards.
///
/// With `limit` or fewer cards the control is hidden and nothing collapses.
pub fn init_show_more(section: &mut SectionView, limit: usize) {
    if section.cards.len() <= limit {
        if let Some(control) = section.show_more.as_mut() {
            control.visible = false;
        }
        return;
    }

    for card in section.cards.iter_mut().skip(limit) {
        card.hide();
    }

    if let Some(control) = section.show_more.as_mut() {
        control.limit = limit;
        control.visible = true;
        set_label(control, SHOW_MORE);
    }
    debug!(section = %section.id, hidden = section.hidden_count(), "section collapsed");
}

/// Flip a section between collapsed and expanded. No-op without a control.
pub fn toggle_show_more(section: &mut SectionView) {
    let Some(limit) = section.show_more.as_ref().map(|c| c.limit) else {
        return;
    };

    let label = if section.hidden_count() > 0 {
        for card in section.cards.iter_mut().filter(|c| c.is_hidden()) {
            card.show();
        }
        SHOW_LESS
    } else {
        for card in section.cards.iter_mut().skip(limit) {
            card.hide();
        }
        SHOW_MORE
    };

    if let Some(control) = section.show_more.as_mut() {
        set_label(control, label);
    }
}

fn set_label(control: &mut super::page::ShowMoreControl, label: &str) {
    control.label = label.to_string();
    control.aria_label = label.to_string();
}
