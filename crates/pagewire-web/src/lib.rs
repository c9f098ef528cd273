//! # Pagewire Web
//!
//! Runs pagewire applications in the browser:
//! - [`BrowserPlatform`]: the live document, history, timers and tasks
//! - [`WebCanvas`]: `pagewire-graphs` charts on a `<canvas>`
//! - [`init`]: panic hook and console logging
//! - [`export_exit`]: lets `exit()` in the JavaScript console stop an application
//!
//! ```ignore
//! use pagewire::Application;
//! use pagewire_web::BrowserPlatform;
//!
//! #[wasm_bindgen(start)]
//! pub fn start() -> Result<(), JsValue> {
//!     pagewire_web::init("info").map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     let platform = BrowserPlatform::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     let app = Application::new(platform.clone(), "#app")
//!         .map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     app.register("home", "/", |app, _, _| {
//!         app.render_text("Hello from pagewire");
//!         Ok(())
//!     }).map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     pagewire_web::export_exit(app.exit_signal());
//!     wasm_bindgen_futures::spawn_local(async move {
//!         let _ = app.run().await;
//!     });
//!     Ok(())
//! }
//! ```

#[cfg(target_arch = "wasm32")]
mod canvas;
mod export;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod node;
#[cfg(target_arch = "wasm32")]
mod platform;

#[cfg(target_arch = "wasm32")]
pub use canvas::{draw_graph, WebCanvas};
pub use export::{export_exit, fire_exit};
#[cfg(target_arch = "wasm32")]
pub use console::{init_logging, ConsoleWriter, MakeConsoleWriter};
#[cfg(target_arch = "wasm32")]
pub use node::{web_node, BrowserNode};
#[cfg(target_arch = "wasm32")]
pub use platform::BrowserPlatform;

/// Installs the panic hook and console logging at `level`
#[cfg(target_arch = "wasm32")]
pub fn init(level: &str) -> anyhow::Result<()> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging(level)
}

/// Native builds log to stderr
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: &str) -> anyhow::Result<()> {
    pagewire::logging::init(level)
}
