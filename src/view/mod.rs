//! View: the page model, rendering into it, click dispatch, disclosure,
//! and the host environment

pub mod disclosure;
pub mod host;
pub mod page;
pub mod render;

pub use disclosure::{init_show_more, toggle_show_more, ITEM_LIMIT, SHOW_LESS, SHOW_MORE};
pub use host::{Host, RecordingHost};
pub use page::{Card, CustomFilter, FilterButton, Page, SectionView, ShowMoreControl, HIDDEN_CLASS};
pub use render::{render, ClickDelegate, ClickTarget};
