use anyhow::anyhow;
use serde::Serialize;
use url::Url;
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, HtmlIFrameElement};

use crate::dom;
use crate::page;
use crate::theme::{self, WidgetTheme};

/// Element id of the container the widget script is appended to.
pub const CONTAINER_ID: &str = "giscus-container";

/// Class of the iframe the widget installs once its script has run.
pub const FRAME_CLASS: &str = "giscus-frame";

const DEFAULT_CLIENT_SCRIPT: &str = "https://giscus.app/client.js";

/// Identity of the discussion backend, fixed per book.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo: String,
    pub repo_id: String,
    pub category: String,
    pub category_id: String,
    pub lang: String,
    pub script_url: Url,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: "chai2010/advanced-go-programming-book".to_string(),
            repo_id: "MDEwOlJlcG9zaXRvcnkxMTU4NTc5NTQ=".to_string(),
            category: "General".to_string(),
            category_id: "DIC_kwDOBufaIs4CAwFi".to_string(),
            lang: "zh-CN".to_string(),
            script_url: Url::parse(DEFAULT_CLIENT_SCRIPT).expect("default widget script url"),
        }
    }
}

impl Config {
    /// Origin the widget frame answers from; `postMessage` is scoped to it.
    pub fn widget_origin(&self) -> String {
        self.script_url.origin().ascii_serialization()
    }

    /// The recognized `data-*` options, in the order the embed docs list them.
    fn attributes(&self, term: &str, theme: WidgetTheme) -> Vec<(&'static str, String)> {
        vec![
            ("data-repo", self.repo.clone()),
            ("data-repo-id", self.repo_id.clone()),
            ("data-category", self.category.clone()),
            ("data-category-id", self.category_id.clone()),
            ("data-mapping", "specific".to_string()),
            ("data-term", term.to_string()),
            ("data-reactions-enabled", "1".to_string()),
            ("data-emit-metadata", "0".to_string()),
            ("data-input-position", "top".to_string()),
            ("data-theme", theme.as_str().to_string()),
            ("data-lang", self.lang.clone()),
            ("data-loading", "lazy".to_string()),
        ]
    }
}

/// `{ "giscus": { "setConfig": { "theme": … } } }`, the shape the widget
/// frame accepts for runtime reconfiguration.
#[derive(Debug, Serialize)]
struct WidgetMessage {
    giscus: WidgetCommand,
}

#[derive(Debug, Serialize)]
struct WidgetCommand {
    #[serde(rename = "setConfig")]
    set_config: SetConfig,
}

#[derive(Debug, Serialize)]
struct SetConfig {
    theme: WidgetTheme,
}

impl WidgetMessage {
    fn set_theme(theme: WidgetTheme) -> Self {
        Self {
            giscus: WidgetCommand {
                set_config: SetConfig { theme },
            },
        }
    }
}

/// Inject the widget script for the page at `path` and start relaying theme
/// switches to it. A page without the widget container is left alone.
pub fn init(document: &Document, config: &Config, path: &str) -> anyhow::Result<()> {
    let Some(container) = document.get_element_by_id(CONTAINER_ID) else {
        return Ok(());
    };

    let term = page::discussion_term(path);
    let theme = WidgetTheme::from_theme_name(&theme::page_theme_name(document));
    let script = build_script(document, config, &term, theme)?;
    container.append_child(&script).map_err(dom::js_error)?;

    wire_theme_switcher(document, config)
}

/// The script element carries the whole widget configuration; the browser
/// fetches and runs it on its own, nothing here waits for it.
fn build_script(
    document: &Document,
    config: &Config,
    term: &str,
    theme: WidgetTheme,
) -> anyhow::Result<Element> {
    let script = document.create_element("script").map_err(dom::js_error)?;
    script
        .set_attribute("type", "text/javascript")
        .map_err(dom::js_error)?;
    script
        .set_attribute("src", config.script_url.as_str())
        .map_err(dom::js_error)?;
    // Boolean attribute, presence alone enables it.
    script.set_attribute("async", "").map_err(dom::js_error)?;
    script
        .set_attribute("crossorigin", "anonymous")
        .map_err(dom::js_error)?;
    for (name, value) in config.attributes(term, theme) {
        script.set_attribute(name, &value).map_err(dom::js_error)?;
    }
    Ok(script)
}

/// Watch the theme switcher and hand every theme change on to the widget.
/// Pages without a switcher (custom shells, print output) skip the relay.
fn wire_theme_switcher(document: &Document, config: &Config) -> anyhow::Result<()> {
    let Some(switcher) = document.get_element_by_id(theme::SWITCHER_ID) else {
        return Ok(());
    };

    let doc = document.clone();
    let origin = config.widget_origin();
    dom::on(&switcher, "click", move |event| {
        let Some(name) = clicked_theme_name(&event) else {
            return;
        };
        let theme = WidgetTheme::from_theme_name(&name);
        if let Err(error) = relay_theme(&doc, &origin, theme) {
            log::warn!("theme relay to comment widget failed: {error:#}");
        }
    })
}

/// The switcher popup contains more than theme buttons; only elements with
/// the theme class name a theme, via their element id.
fn clicked_theme_name(event: &web_sys::Event) -> Option<String> {
    let element = event.target()?.dyn_into::<Element>().ok()?;
    (element.class_name() == theme::SWITCH_CLASS).then(|| element.id())
}

/// Post the new theme into the widget frame. No frame yet (script still
/// loading, or it failed) means there is nothing to update.
fn relay_theme(document: &Document, origin: &str, theme: WidgetTheme) -> anyhow::Result<()> {
    let frame = document
        .query_selector(&format!(".{FRAME_CLASS}"))
        .map_err(dom::js_error)?;
    let Some(frame) = frame else {
        return Ok(());
    };
    let Ok(frame) = frame.dyn_into::<HtmlIFrameElement>() else {
        return Ok(());
    };
    let Some(target) = frame.content_window() else {
        return Ok(());
    };

    let payload = serde_wasm_bindgen::to_value(&WidgetMessage::set_theme(theme))
        .map_err(|error| anyhow!("serialize theme change: {error}"))?;
    target.post_message(&payload, origin).map_err(dom::js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_the_book() {
        let config = Config::default();
        assert_eq!(config.repo, "chai2010/advanced-go-programming-book");
        assert_eq!(config.widget_origin(), "https://giscus.app");
    }

    #[test]
    fn attribute_set_matches_the_embed_contract() {
        let config = Config::default();
        let attributes = config.attributes("/ch1/readme", WidgetTheme::TransparentDark);
        let expect = [
            ("data-repo", "chai2010/advanced-go-programming-book"),
            ("data-repo-id", "MDEwOlJlcG9zaXRvcnkxMTU4NTc5NTQ="),
            ("data-category", "General"),
            ("data-category-id", "DIC_kwDOBufaIs4CAwFi"),
            ("data-mapping", "specific"),
            ("data-term", "/ch1/readme"),
            ("data-reactions-enabled", "1"),
            ("data-emit-metadata", "0"),
            ("data-input-position", "top"),
            ("data-theme", "transparent_dark"),
            ("data-lang", "zh-CN"),
            ("data-loading", "lazy"),
        ];
        assert_eq!(attributes.len(), expect.len());
        for ((name, value), (expect_name, expect_value)) in attributes.iter().zip(expect) {
            assert_eq!(*name, expect_name);
            assert_eq!(value, expect_value);
        }
    }

    #[test]
    fn light_theme_attribute_value() {
        let config = Config::default();
        let attributes = config.attributes("index", WidgetTheme::Light);
        assert!(
            attributes
                .iter()
                .any(|(name, value)| *name == "data-theme" && value == "light")
        );
    }

    #[test]
    fn set_theme_message_shape() {
        let message = WidgetMessage::set_theme(WidgetTheme::TransparentDark);
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"giscus":{"setConfig":{"theme":"transparent_dark"}}}"#
        );
    }
}
