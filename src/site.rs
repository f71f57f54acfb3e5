//! Static page writer: serialises a rendered page model into a standalone
//! HTML document
//!
//! The page is written with the filter already applied. The inline script
//! then filters the written cards by their `data-tags`, driven by the preset
//! buttons, the custom select and the `tags` parameter of the browser location.
//! It mirrors the filter back with `history.replaceState` and re-collapses
//! each show-more section over the cards still shown. A page written with an
//! active filter only carries the matching cards.
//!
//! `HIDDEN` in the style and script templates stands for the hidden class.

use crate::markup::{escape_html, Element, Node};
use crate::view::{Page, SectionView, HIDDEN_CLASS};

/// Document-level settings for the written page
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub title: String,
    pub lang: String,
    /// Canonical address of the published page
    pub site_url: Option<String>,
}

impl PageMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            lang: "en".to_string(),
            site_url: None,
        }
    }
}

/// Write the full document for `page`
pub fn write_page(page: &Page, meta: &PageMeta) -> String {
    let mut html = String::with_capacity(16_384);
    html.push_str("<!DOCTYPE html>\n<html lang=\"");
    html.push_str(&escape_html(&meta.lang));
    html.push_str("\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>");
    html.push_str(&escape_html(&meta.title));
    html.push_str("</title>\n");
    if let Some(url) = &meta.site_url {
        html.push_str("<link rel=\"canonical\" href=\"");
        html.push_str(&escape_html(url));
        html.push_str("\">\n");
    }
    html.push_str(&template_style().replace("HIDDEN", HIDDEN_CLASS));
    html.push_str("</head>\n<body>\n");

    // bio-name is already markup
    html.push_str("<header class=\"bio\">\n<h1 id=\"bio-name\">");
    html.push_str(&page.bio_name_html);
    html.push_str("</h1>\n");
    let description = Element::new("p")
        .attr("id", "bio-description")
        .text(page.bio_description.as_str());
    html.push_str(&Node::from(description).to_html());
    html.push_str("\n</header>\n");

    html.push_str(&filter_controls(page).to_html());
    html.push('\n');

    html.push_str("<main>\n");
    for section in &page.sections {
        html.push_str(&section_node(section).to_html());
        html.push('\n');
    }
    html.push_str("</main>\n");

    html.push_str(&template_script().replace("HIDDEN", HIDDEN_CLASS));
    html.push_str("</body>\n</html>\n");
    html
}

fn filter_controls(page: &Page) -> Node {
    let buttons = page.filter_buttons.iter().map(|b| {
        let class = if b.active {
            "filter-btn active"
        } else {
            "filter-btn"
        };
        Element::new("button")
            .class(class)
            .attr("type", "button")
            .attr("data-filter", b.filter.as_str())
            .text(b.label.as_str())
    });

    let mut nav = Element::new("nav")
        .class("filters")
        .attr("data-mode", page.filter_mode.to_string())
        .attr("data-active", page.active_tags.join(","))
        .children(buttons);

    if let Some(custom) = &page.custom_filter {
        let placeholder = Element::new("option").attr("value", "").text("More tags");
        let options = custom.options.iter().map(|o| {
            let option = Element::new("option").attr("value", o.as_str());
            let option = if *o == custom.value {
                option.flag("selected")
            } else {
                option
            };
            option.text(o.as_str())
        });
        nav = nav.child(
            Element::new("select")
                .attr("id", "custom-filter")
                .child(placeholder)
                .children(options),
        );
    }
    nav.into()
}

fn section_node(section: &SectionView) -> Node {
    let container = Element::new("div")
        .attr("id", section.container_id.as_str())
        .class("work-grid")
        .children(section.cards.iter().map(|c| c.element.clone()));

    let mut el = Element::new("section")
        .attr("id", section.id.as_str())
        .child(Element::new("h2").text(section.title.as_str()))
        .child(container);

    if let Some(control) = &section.show_more {
        let button = Element::new("button")
            .class("show-more-btn")
            .attr("type", "button")
            .attr("data-section", control.section.as_str())
            .attr("data-selector", control.selector.as_str())
            .attr("data-limit", control.limit.to_string())
            .attr("aria-label", control.aria_label.as_str());
        let button = if control.visible {
            button
        } else {
            button.flag("hidden")
        };
        el = el.child(button.text(control.label.as_str()));
    }
    el.into()
}

fn template_style() -> &'static str {
    r##"<style>
body{font-family:system-ui,sans-serif;max-width:960px;margin:0 auto;padding:2rem 1rem;color:#1f2328}
.filters{display:flex;flex-wrap:wrap;gap:.5rem;margin:1.5rem 0}
.filter-btn{border:1px solid #d0d7de;background:#fff;border-radius:999px;padding:.25rem .8rem;cursor:pointer}
.filter-btn.active{background:#1f2328;color:#fff}
.work-grid{display:grid;gap:1rem}
.work-item{border:1px solid #d0d7de;border-radius:8px;padding:1rem;cursor:pointer;display:flex;gap:1rem}
.work-thumbnail img,.work-thumbnail video{width:160px;border-radius:4px}
.work-category{font-size:.75rem;text-transform:uppercase;color:#656d76}
.work-link{margin-right:.4rem}
.tag{display:inline-block;font-size:.75rem;background:#eaeef2;border-radius:4px;padding:0 .4rem;margin-right:.3rem}
.closed-source-note{font-size:.8rem;color:#656d76}
.HIDDEN,.filtered-out{display:none}
</style>
"##
}

fn template_script() -> &'static str {
    r##"<script>
(function(){
"use strict";
var nav=document.querySelector('.filters');
var select=document.getElementById('custom-filter');
var mode=nav?nav.dataset.mode:'all';
function parse(value){
  var tags=[];
  (value||'').split(',').forEach(function(t){
    t=t.trim();
    if(t&&tags.indexOf(t)<0)tags.push(t);
  });
  if(mode==='single')tags=tags.slice(0,1);
  return tags.sort();
}
var active=parse(nav?nav.dataset.active:'');
function carries(card,tag){
  return (card.dataset.tags||'').split(',').indexOf(tag)>=0;
}
function passes(card){
  if(!active.length)return true;
  if(mode==='single')return active.some(function(t){return carries(card,t);});
  return active.every(function(t){return carries(card,t);});
}
function shown(btn){
  var section=document.getElementById(btn.dataset.section);
  return Array.prototype.filter.call(section.querySelectorAll(btn.dataset.selector),function(c){
    return !c.classList.contains('filtered-out');
  });
}
function label(btn,text){
  btn.textContent=text;
  btn.setAttribute('aria-label',text);
}
function collapse(btn){
  var limit=parseInt(btn.dataset.limit,10);
  var cards=shown(btn);
  cards.forEach(function(c,i){c.classList.toggle('HIDDEN',i>=limit);});
  btn.hidden=cards.length<=limit;
  label(btn,'Show more');
}
function syncUrl(){
  var url=new URL(window.location.href);
  url.searchParams.delete('tags');
  if(active.length)url.searchParams.append('tags',active.join(','));
  try{history.replaceState(history.state,'',url.toString());}catch(e){}
}
function apply(){
  document.querySelectorAll('.work-item').forEach(function(c){
    var out=!passes(c);
    c.classList.toggle('filtered-out',out);
    if(out)c.classList.remove('HIDDEN');
  });
  document.querySelectorAll('.show-more-btn').forEach(collapse);
  document.querySelectorAll('.filter-btn').forEach(function(b){
    var f=b.dataset.filter;
    b.classList.toggle('active',f==='all'?!active.length:active.indexOf(f)>=0);
  });
  if(select){
    select.value=active.length===1?active[0]:'';
    if(select.selectedIndex<0)select.value='';
  }
}
function choose(tag){
  tag=(tag||'').trim();
  active=tag&&tag!=='all'?[tag]:[];
  apply();
  syncUrl();
}
var query=new URLSearchParams(window.location.search);
if(query.has('tags')){
  active=parse(query.get('tags'));
  apply();
}
document.querySelectorAll('.filter-btn').forEach(function(b){
  b.addEventListener('click',function(){choose(b.dataset.filter);});
});
if(select)select.addEventListener('change',function(){choose(select.value);});
document.querySelectorAll('.work-grid').forEach(function(grid){
  grid.addEventListener('click',function(e){
    if(e.target.closest('a,button'))return;
    var card=e.target.closest('.work-item');
    if(card&&card.dataset.url)window.open(card.dataset.url,'_blank');
  });
});
document.querySelectorAll('.show-more-btn').forEach(function(btn){
  btn.addEventListener('click',function(){
    var cards=shown(btn);
    var limit=parseInt(btn.dataset.limit,10);
    var collapsed=cards.some(function(c){return c.classList.contains('HIDDEN');});
    cards.forEach(function(c,i){
      if(collapsed)c.classList.remove('HIDDEN');
      else if(i>=limit)c.classList.add('HIDDEN');
    });
    label(btn,collapsed?'Show less':'Show more');
  });
});
})();
</script>
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{App, RenderOptions};
    use crate::filter::FilterMode;
    use crate::view::RecordingHost;
    use crate::{Bio, WorkContent, WorkItem};
    use url::Url;

    fn page(query: &str) -> Page {
        let content = WorkContent {
            bio: Bio {
                name: "Ada <L>".into(),
                description: "Writes & ships".into(),
            },
            items: (0..5)
                .map(|i| {
                    WorkItem::new(format!("Item {}", i))
                        .with_url(format!("https://x/{}", i))
                        .with_tags(["project", if i % 2 == 0 { "rust" } else { "web" }])
                })
                .collect(),
        };
        let options = RenderOptions {
            presets: vec!["all".into(), "rust".into()],
            ..Default::default()
        };
        let host = RecordingHost::new(Url::parse(&format!("https://me.dev/{}", query)).unwrap());
        App::start(Some(content), options, host).unwrap().page().clone()
    }

    #[test]
    fn test_document_structure() {
        let html = write_page(&page(""), &PageMeta::new("Ada's work"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ada&#39;s work</title>"));
        assert!(html.contains("<h1 id=\"bio-name\"><strong>Ada &lt;L&gt;</strong></h1>"));
        assert!(html.contains("<p id=\"bio-description\">Writes &amp; ships</p>"));
        assert!(html.contains("id=\"work-container\""));
        assert_eq!(html.matches("class=\"work-item").count(), 5);
        assert_eq!(html.matches(" hidden-item\"").count(), 2);
        assert!(html.contains(".hidden-item{display:none}"));
        assert!(!html.contains("HIDDEN"));
        assert!(html.contains("data-limit=\"3\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_active_filter_button_and_filtered_cards() {
        let html = write_page(&page("?tags=rust"), &PageMeta::default());
        assert!(html.contains("class=\"filter-btn active\" type=\"button\" data-filter=\"rust\""));
        assert!(html.contains("class=\"filter-btn\" type=\"button\" data-filter=\"all\""));
        assert_eq!(html.matches("class=\"work-item").count(), 3);
        // three cards fit under the limit, so the control is hidden
        assert!(html.contains("aria-label=\"Show more\" hidden>"));
    }

    #[test]
    fn test_custom_select_marks_selection() {
        let html = write_page(&page("?tags=web"), &PageMeta::default());
        assert!(html.contains("<select id=\"custom-filter\">"));
        assert!(html.contains("<option value=\"web\" selected>web</option>"));
    }

    #[test]
    fn test_controls_are_wired_for_client_filtering() {
        let html = write_page(&page("?tags=rust"), &PageMeta::default());
        assert!(html.contains(r#"<nav class="filters" data-mode="all" data-active="rust">"#));
        assert!(html.contains(r#"data-tags="project,rust""#));
        assert!(html.contains(".hidden-item,.filtered-out{display:none}"));
        for hook in [
            "querySelectorAll('.filter-btn')",
            "getElementById('custom-filter')",
            "addEventListener('change'",
            "new URLSearchParams(window.location.search)",
            "searchParams.append('tags'",
            "history.replaceState",
            "dataset.tags",
            "btn.dataset.limit",
            "classList.toggle('hidden-item',i>=limit)",
        ] {
            assert!(html.contains(hook), "script is missing {}", hook);
        }
    }

    #[test]
    fn test_single_mode_on_nav() {
        let content = WorkContent {
            bio: Bio::default(),
            items: vec![WorkItem::new("A").with_tags(["rust"])],
        };
        let options = RenderOptions {
            mode: FilterMode::Single,
            ..Default::default()
        };
        let host = RecordingHost::new(Url::parse("https://me.dev/").unwrap());
        let app = App::start(Some(content), options, host).unwrap();
        let html = write_page(app.page(), &PageMeta::default());
        assert!(html.contains(r#"<nav class="filters" data-mode="single" data-active="">"#));
    }

    #[test]
    fn test_canonical_link() {
        let meta = PageMeta {
            site_url: Some("https://ada.dev/".into()),
            ..Default::default()
        };
        let html = write_page(&Page::default(), &meta);
        assert!(html.contains("<link rel=\"canonical\" href=\"https://ada.dev/\">"));
        assert!(!html.contains("<section"));
    }
}
