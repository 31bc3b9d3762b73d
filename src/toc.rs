use maud::{Markup, html};
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlAnchorElement};

use crate::dom;

/// Class of the sidebar container the links are rendered into.
pub const SIDEBAR_CLASS: &str = "pagetoc";

/// Class carried by the anchor inside every rendered heading.
pub const HEADING_CLASS: &str = "header";

const ACTIVE_CLASS: &str = "active";
const INDENT_STEP_PX: u32 = 20;

/// One heading anchor of the rendered page, in document order.
#[derive(Debug, Clone)]
struct Heading {
    level: u8,
    href: String,
    text: String,
}

/// Build the sidebar for the current page and keep its highlight in sync
/// with the scroll position. A page without headings or without a sidebar
/// container is left alone.
pub fn init(document: &Document) -> anyhow::Result<()> {
    let Some(sidebar) = document.get_elements_by_class_name(SIDEBAR_CLASS).item(0) else {
        return Ok(());
    };

    let headings = collect_headings(document);
    sidebar.set_inner_html(&links_markup(&headings).into_string());
    wire_link_clicks(document, &sidebar)?;
    refresh_active(document);

    let doc = document.clone();
    dom::on(&dom::window()?, "scroll", move |_| refresh_active(&doc))
}

/// Indent shows hierarchy: chapter-level headings sit flush, each deeper
/// level steps right, clamped at two steps.
fn indent_px(level: u8) -> u32 {
    match level {
        0..=2 => 0,
        3 => INDENT_STEP_PX,
        _ => 2 * INDENT_STEP_PX,
    }
}

fn indent_style(level: u8) -> Option<String> {
    match indent_px(level) {
        0 => None,
        px => Some(format!("padding-left:{px}px")),
    }
}

/// Render one link per heading, skipping the page title itself.
fn links_markup(headings: &[Heading]) -> Markup {
    html! {
        @for heading in headings {
            @if heading.level != 1 {
                a href=(heading.href) style=[indent_style(heading.level)] {
                    (heading.text)
                }
            }
        }
    }
}

/// The deepest heading already scrolled past, if any.
fn active_href<'a, I>(positions: I, scroll_y: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = (f64, &'a str)>,
{
    let mut current = None;
    for (top, href) in positions {
        if scroll_y >= top {
            current = Some(href);
        }
    }
    current
}

fn collect_headings(document: &Document) -> Vec<Heading> {
    let anchors = document.get_elements_by_class_name(HEADING_CLASS);
    let mut headings = Vec::with_capacity(anchors.length() as usize);
    for index in 0..anchors.length() {
        let Some(element) = anchors.item(index) else {
            continue;
        };
        let Ok(anchor) = element.dyn_into::<HtmlAnchorElement>() else {
            continue;
        };
        headings.push(Heading {
            level: heading_level(&anchor),
            href: anchor.href(),
            text: anchor.text_content().unwrap_or_default(),
        });
    }
    headings
}

/// Nesting level comes from the enclosing tag, `H2` -> 2. Anchors outside a
/// heading tag count as level 0 and render unindented.
fn heading_level(anchor: &HtmlAnchorElement) -> u8 {
    anchor
        .parent_element()
        .and_then(|parent| parent.tag_name().strip_prefix('H')?.parse().ok())
        .unwrap_or(0)
}

/// Re-derive the highlight from the current scroll position: clear it
/// everywhere, then mark the link matching the deepest heading scrolled
/// past. Headings without a sidebar link (the page title) match nothing.
fn refresh_active(document: &Document) {
    let scroll_y = web_sys::window()
        .and_then(|window| window.page_y_offset().ok())
        .unwrap_or(0.0);

    let anchors = document.get_elements_by_class_name(HEADING_CLASS);
    let mut positions = Vec::with_capacity(anchors.length() as usize);
    for index in 0..anchors.length() {
        let Some(element) = anchors.item(index) else {
            continue;
        };
        let Ok(anchor) = element.dyn_into::<HtmlAnchorElement>() else {
            continue;
        };
        positions.push((f64::from(anchor.offset_top()), anchor.href()));
    }

    let target = active_href(
        positions.iter().map(|(top, href)| (*top, href.as_str())),
        scroll_y,
    )
    .map(str::to_owned);
    set_active(document, target.as_deref());
}

fn set_active(document: &Document, href: Option<&str>) {
    for link in sidebar_links(document) {
        let _ = link.class_list().remove_1(ACTIVE_CLASS);
    }
    let Some(href) = href else { return };
    for link in sidebar_links(document) {
        if link.href() == href {
            let _ = link.class_list().add_1(ACTIVE_CLASS);
        }
    }
}

/// Clicking a link highlights it right away instead of waiting for the
/// scroll handler to catch up.
fn wire_link_clicks(document: &Document, sidebar: &Element) -> anyhow::Result<()> {
    let links = sidebar.children();
    for index in 0..links.length() {
        let Some(link) = links.item(index) else {
            continue;
        };
        let doc = document.clone();
        let clicked = link.clone();
        dom::on(&link, "click", move |_| {
            for other in sidebar_links(&doc) {
                let _ = other.class_list().remove_1(ACTIVE_CLASS);
            }
            let _ = clicked.class_list().add_1(ACTIVE_CLASS);
        })?;
    }
    Ok(())
}

fn sidebar_links(document: &Document) -> Vec<HtmlAnchorElement> {
    let Some(sidebar) = document.get_elements_by_class_name(SIDEBAR_CLASS).item(0) else {
        return Vec::new();
    };
    let children = sidebar.children();
    (0..children.length())
        .filter_map(|index| children.item(index)?.dyn_into().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use kuchiki::traits::TendrilSink as _;

    use super::*;

    fn heading(level: u8, href: &str, text: &str) -> Heading {
        Heading {
            level,
            href: href.to_string(),
            text: text.to_string(),
        }
    }

    fn rendered_links(headings: &[Heading]) -> Vec<(String, Option<String>, String)> {
        let document = kuchiki::parse_html().one(links_markup(headings).into_string());
        let mut links = Vec::new();
        for node in document.select("a").unwrap() {
            let attributes = node.attributes.borrow();
            links.push((
                attributes.get("href").unwrap_or_default().to_string(),
                attributes.get("style").map(str::to_string),
                node.text_contents(),
            ));
        }
        links
    }

    #[test]
    fn indent_steps_with_level() {
        assert_eq!(indent_px(2), 0);
        assert_eq!(indent_px(3), 20);
        assert_eq!(indent_px(4), 40);
        assert_eq!(indent_px(6), 40);
        assert_eq!(indent_px(0), 0);
    }

    #[test]
    fn one_link_per_heading_below_the_title() {
        let headings = [
            heading(1, "#title", "Title"),
            heading(2, "#first", "First"),
            heading(3, "#first-a", "First A"),
            heading(4, "#first-a-1", "Deep"),
            heading(2, "#second", "Second"),
        ];
        let links = rendered_links(&headings);
        assert_eq!(links.len(), 4);
        assert_eq!(links[0], ("#first".into(), None, "First".into()));
        assert_eq!(
            links[1],
            (
                "#first-a".into(),
                Some("padding-left:20px".into()),
                "First A".into()
            )
        );
        assert_eq!(
            links[2],
            (
                "#first-a-1".into(),
                Some("padding-left:40px".into()),
                "Deep".into()
            )
        );
        assert_eq!(links[3], ("#second".into(), None, "Second".into()));
    }

    #[test]
    fn no_headings_render_nothing() {
        assert!(rendered_links(&[]).is_empty());
    }

    #[test]
    fn markup_escapes_heading_text() {
        let links = rendered_links(&[heading(2, "#x", "a < b & c")]);
        assert_eq!(links[0].2, "a < b & c");
        assert!(
            links_markup(&[heading(2, "#x", "a < b & c")])
                .into_string()
                .contains("a &lt; b &amp; c")
        );
    }

    #[test]
    fn deepest_scrolled_past_heading_wins() {
        let positions = [(0.0, "#a"), (100.0, "#b"), (250.0, "#c")];
        assert_eq!(active_href(positions, 0.0), Some("#a"));
        assert_eq!(active_href(positions, 99.0), Some("#a"));
        assert_eq!(active_href(positions, 100.0), Some("#b"));
        assert_eq!(active_href(positions, 9000.0), Some("#c"));
    }

    #[test]
    fn nothing_active_above_the_first_heading() {
        let positions = [(80.0, "#a"), (200.0, "#b")];
        assert_eq!(active_href(positions, 10.0), None);
        assert_eq!(active_href(std::iter::empty::<(f64, &str)>(), 10.0), None);
    }
}
