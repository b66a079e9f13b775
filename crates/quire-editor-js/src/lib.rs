//! WASM bindings for the quire rich-text editor.
//!
//! Hosts render the editor markup themselves and hand the mount element's
//! id to `initialize`. Every other export addresses the instance by the
//! same id.

mod editor;

pub use editor::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);

    let _ = set_global_default(reg);
}
