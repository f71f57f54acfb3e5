//! Application state and the driver that commits it to a page
//!
//! `update` is a pure function over `AppState`. `App` owns the state, the
//! page model and the host, and re-renders after every event.

use crate::filter::{
    custom_filter_options, filter_items, state_from_url, state_to_url, FilterMode, FilterState,
    SHOW_ALL,
};
use crate::markup::{render_bio, Templates};
use crate::view::{
    init_show_more, render, toggle_show_more, ClickDelegate, ClickTarget, CustomFilter,
    FilterButton, Host, Page, SectionView, ITEM_LIMIT,
};
use crate::{Category, WorkContent, WorkItem};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How items are grouped into sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One `work` section holding every item
    #[default]
    Combined,
    /// One section per category: publications, projects, contributions
    Sections,
}

/// Everything that shapes a render besides the content itself
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: FilterMode,
    pub layout: Layout,
    /// Cards shown per section before collapsing; `None` disables the disclosure
    pub item_limit: Option<usize>,
    /// Preset filter buttons, in order; `all` is the clear-all button
    pub presets: Vec<String>,
    pub templates: Templates,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: FilterMode::default(),
            layout: Layout::default(),
            item_limit: Some(ITEM_LIMIT),
            presets: Vec::new(),
            templates: Templates::new(),
        }
    }
}

/// Application state: the item list and the active filter
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub items: Vec<WorkItem>,
    pub filter: FilterState,
    pub mode: FilterMode,
}

/// User interactions that change the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A preset button (`data-filter`) was clicked
    SelectPreset(String),
    /// A value was chosen in the custom filter control
    SelectCustom(String),
    /// Add or remove a single tag
    ToggleTag(String),
    ClearFilters,
}

/// Next state after an event
pub fn update(mut state: AppState, event: &Event) -> AppState {
    match event {
        Event::SelectPreset(tag) => state.filter.select_preset(tag),
        Event::SelectCustom(value) => state.filter.select_custom(value),
        Event::ToggleTag(tag) => state.filter.toggle(tag, state.mode),
        Event::ClearFilters => state.filter.clear(),
    }
    state
}

impl AppState {
    /// Items passing the current filter, with their indices
    pub fn visible_items(&self) -> Vec<(usize, &WorkItem)> {
        filter_items(&self.items, &self.filter, self.mode)
    }
}

/// A running page: state, page model, and the host it talks to
pub struct App<H: Host> {
    state: AppState,
    page: Page,
    options: RenderOptions,
    delegate: ClickDelegate,
    host: H,
}

impl<H: Host> App<H> {
    /// Initial render. `None` content renders nothing and yields no app.
    pub fn start(content: Option<WorkContent>, options: RenderOptions, host: H) -> Option<Self> {
        let content = content?;

        let filter = state_from_url(host.location(), options.mode);
        debug!(tags = %filter.to_query_value(), "filter hydrated from location");

        let bio = render_bio(&content.bio);
        let mut page = Page {
            bio_name_html: bio.name_html,
            bio_description: bio.description,
            sections: build_sections(&options),
            filter_buttons: options
                .presets
                .iter()
                .map(|p| FilterButton {
                    filter: p.clone(),
                    label: preset_label(p),
                    active: false,
                })
                .collect(),
            custom_filter: None,
            filter_mode: options.mode,
            active_tags: Vec::new(),
        };

        let custom_options = custom_filter_options(&content.items, &options.presets);
        if !custom_options.is_empty() {
            page.custom_filter = Some(CustomFilter {
                options: custom_options,
                value: String::new(),
            });
        }

        if options.layout == Layout::Sections {
            let uncategorised = content.items.iter().filter(|i| i.category().is_none()).count();
            if uncategorised > 0 {
                warn!(uncategorised, "items without a category are not shown in the sections layout");
            }
        }

        let delegate = ClickDelegate::attach(&page);
        let mut app = Self {
            state: AppState {
                items: content.items,
                filter,
                mode: options.mode,
            },
            page,
            options,
            delegate,
            host,
        };
        app.refresh();
        Some(app)
    }

    /// Apply an event, mirror the filter into the location, re-render
    pub fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = update(state, &event);

        let next = state_to_url(self.host.location(), &self.state.filter);
        self.host.replace_url(&next);
        debug!(?event, location = %next, "filter changed");

        self.refresh();
    }

    /// Activate a section's show-more control. False when the section has none.
    pub fn toggle_show_more(&mut self, section_id: &str) -> bool {
        match self.page.section_mut(section_id) {
            Some(section) if section.show_more.is_some() => {
                toggle_show_more(section);
                true
            }
            _ => false,
        }
    }

    /// A click inside a rendered card
    pub fn click(&mut self, section_id: &str, item_index: usize, target: ClickTarget) -> Option<String> {
        self.delegate
            .dispatch(&self.page, &mut self.host, section_id, item_index, target)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Re-render every section from the current state
    fn refresh(&mut self) {
        let visible = self.state.visible_items();
        for section in self.page.sections.iter_mut() {
            let items: Vec<(usize, &WorkItem)> = match section_category(&section.id) {
                Some(category) => visible
                    .iter()
                    .filter(|(_, item)| item.category() == Some(category))
                    .copied()
                    .collect(),
                None => visible.clone(),
            };
            render(section, &items, &self.options.templates);
            if let Some(limit) = self.options.item_limit {
                init_show_more(section, limit);
            }
        }

        let filter = &self.state.filter;
        self.page.active_tags = filter.iter().map(str::to_string).collect();
        for button in self.page.filter_buttons.iter_mut() {
            button.active = if button.filter == SHOW_ALL {
                filter.is_empty()
            } else {
                filter.contains(&button.filter)
            };
        }

        if let Some(custom) = self.page.custom_filter.as_mut() {
            custom.value = match (filter.len(), filter.iter().next()) {
                (1, Some(tag)) if custom.options.iter().any(|o| o == tag) => tag.to_string(),
                _ => String::new(),
            };
        }
    }
}

fn preset_label(preset: &str) -> String {
    if preset == SHOW_ALL {
        "All".to_string()
    } else {
        preset.to_string()
    }
}

fn build_sections(options: &RenderOptions) -> Vec<SectionView> {
    let with_control = |section: SectionView, selector: String| match options.item_limit {
        Some(limit) => section.with_show_more(selector, limit),
        None => section,
    };
    match options.layout {
        Layout::Combined => vec![with_control(
            SectionView::new("work", "Work"),
            ".work-item".to_string(),
        )],
        Layout::Sections => Category::ALL
            .iter()
            .map(|c| {
                let title = match c {
                    Category::Paper => "Publications",
                    Category::Project => "Projects",
                    Category::Contribution => "Contributions",
                };
                with_control(
                    SectionView::new(c.section_id(), title),
                    format!(".{}", c.css_class()),
                )
            })
            .collect(),
    }
}

fn section_category(section_id: &str) -> Option<Category> {
    Category::ALL.into_iter().find(|c| c.section_id() == section_id)
}
