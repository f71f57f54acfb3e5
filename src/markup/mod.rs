//! HTML templating: typed nodes, escaping, and the card/bio templates

pub mod escape;
pub mod node;
pub mod templates;

pub use escape::{escape_html, tag_class};
pub use node::{AttrValue, Element, Node};
pub use templates::{link_targets, render_bio, BioView, Templates, DEFAULT_CLOSED_SOURCE_NOTE};
