//! Browser binding for the door invitation.
//!
//! Compiled to wasm and loaded by the host page, which supplies the screens,
//! the book markup and (optionally) jQuery with the turn.js plugin.

pub mod app;
/// Sound cues.
pub mod audio;
pub mod dom;
/// Startup errors.
pub mod error;
pub mod logging;
/// Image cache warming.
pub mod preload;
/// Injected turn styles.
pub mod style;
pub mod turn;

use wasm_bindgen::prelude::*;

pub use error::{WebError, WebResult};

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::INFO);
    app::mount().map_err(|e| {
        tracing::error!(error = %e, "invitation failed to mount");
        JsValue::from(e)
    })
}
