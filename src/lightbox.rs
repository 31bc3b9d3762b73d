use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Element};

use crate::dom;

/// Name of the overlay function the book's theme puts on `window`.
const OVERLAY_GLOBAL: &str = "BigPicture";

#[wasm_bindgen]
extern "C" {
    /// The page-global BigPicture overlay, `BigPicture({ el })`.
    #[wasm_bindgen(js_name = BigPicture, catch)]
    fn big_picture(options: &JsValue) -> Result<(), JsValue>;
}

/// Open every content image in the overlay on click. When the page ships
/// without the overlay script, nothing is wired at all.
pub fn init(document: &Document) -> anyhow::Result<()> {
    if !overlay_available(&dom::window()?) {
        return Ok(());
    }

    let images = document
        .query_selector_all("main img")
        .map_err(dom::js_error)?;
    for index in 0..images.length() {
        let Some(node) = images.get(index) else {
            continue;
        };
        let Ok(image) = node.dyn_into::<Element>() else {
            continue;
        };
        let clicked = image.clone();
        dom::on(&image, "click", move |_| open_overlay(&clicked))?;
    }
    Ok(())
}

fn overlay_available(window: &web_sys::Window) -> bool {
    js_sys::Reflect::get(window, &JsValue::from_str(OVERLAY_GLOBAL))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

fn open_overlay(image: &Element) {
    let options = js_sys::Object::new();
    if js_sys::Reflect::set(&options, &JsValue::from_str("el"), image).is_err() {
        return;
    }
    if let Err(error) = big_picture(&options) {
        log::warn!("image overlay failed: {error:?}");
    }
}
