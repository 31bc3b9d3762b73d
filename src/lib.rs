pub mod comments;
mod dom;
mod lightbox;
pub mod page;
pub mod theme;
pub mod toc;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;

pub use comments::Config as CommentsConfig;
pub use theme::WidgetTheme;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(error) = schedule() {
        log::warn!("page extras disabled: {error:#}");
    }
}

/// Run the enhancement pass once the page has finished loading. Heading
/// offsets depend on final layout, so a still-loading document defers to the
/// window load event.
fn schedule() -> anyhow::Result<()> {
    let window = dom::window()?;
    if dom::document()?.ready_state() == "complete" {
        run_with_defaults();
        return Ok(());
    }

    let once = Closure::once_into_js(run_with_defaults);
    window
        .add_event_listener_with_callback("load", once.unchecked_ref())
        .map_err(dom::js_error)
}

fn run_with_defaults() {
    enhance_page(&comments::Config::default());
}

/// One synchronous pass over the rendered page: sidebar contents, image
/// overlay, comment widget. Each feature degrades on its own; a failure is
/// logged and never blocks the others or the page.
pub fn enhance_page(config: &comments::Config) {
    let document = match dom::document() {
        Ok(document) => document,
        Err(error) => {
            log::warn!("page extras skipped: {error:#}");
            return;
        }
    };

    let path = dom::window()
        .and_then(|window| window.location().pathname().map_err(dom::js_error))
        .unwrap_or_default();
    if page::is_print_view(&path) {
        return;
    }

    if let Err(error) = toc::init(&document) {
        log::warn!("page toc skipped: {error:#}");
    }
    if let Err(error) = lightbox::init(&document) {
        log::warn!("image overlay skipped: {error:#}");
    }
    if let Err(error) = comments::init(&document, config, &path) {
        log::warn!("comment widget skipped: {error:#}");
    }
}
