//! pageguard - client-side route guard and session-token manager
//!
//! Decides on every page load whether the route needs a session, verifies or
//! refreshes the bearer token against the backend, and reflects the session
//! into the navbar. Built as a WebAssembly module with the `browser` feature
//! and as a native library and probe with `native`.

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "browser")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen_futures::spawn_local;

    console_error_panic_hook::set_once();
    ui::console::init_logging();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    // Wait for the navbar elements if the document is still parsing
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(|| spawn_local(ui::entry::run_page_load()));
        if let Err(e) =
            document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        {
            tracing::error!("Failed to wait for DOMContentLoaded: {:?}", e);
        }
    } else {
        spawn_local(ui::entry::run_page_load());
    }
}
