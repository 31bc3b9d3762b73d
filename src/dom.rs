use anyhow::anyhow;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

pub fn window() -> anyhow::Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| anyhow!("no window in this context"))
}

pub fn document() -> anyhow::Result<web_sys::Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("window carries no document"))
}

/// Fold a thrown `JsValue` into an error we can thread through `?`.
pub fn js_error(value: JsValue) -> anyhow::Error {
    match value.as_string() {
        Some(message) => anyhow!(message),
        None => anyhow!("{value:?}"),
    }
}

/// Register `handler` for `kind` events on `target`.
///
/// The closure is leaked on purpose: every handler registered here lives for
/// the rest of the page.
pub fn on<F>(target: &web_sys::EventTarget, kind: &str, handler: F) -> anyhow::Result<()>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .map_err(js_error)?;
    callback.forget();
    Ok(())
}
