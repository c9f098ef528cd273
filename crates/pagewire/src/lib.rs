//! # Pagewire
//!
//! Single-page applications for the browser, driven by a client-side router:
//! - [`Application`]: mount node, navbar and footer, router-driven pages
//! - [`ScrollApp`]: full-screen pages navigated by keys, wheel and `#hash` links
//! - [`Loader`] and [`ApiClient`]: loading overlay around HTTP calls
//! - [`PagewireConfig`]: `pagewire.toml` settings
//!
//! The document is reached through the [`dom::Platform`] seam. The
//! `pagewire-web` crate implements it on `web-sys`; [`dom::MemoryPlatform`]
//! implements it in memory with caller-driven timers and tasks.
//!
//! ## Example
//!
//! ```
//! use pagewire::dom::{MemoryPlatform, Platform};
//! use pagewire::Application;
//! use url::Url;
//!
//! let platform = MemoryPlatform::new(Url::parse("https://app.test/hello/world").unwrap());
//! let app = Application::new(platform.clone(), "").unwrap();
//! app.register("greet", "/hello/:name", |app, vars, _| {
//!     app.render_text(&format!("Hello, {}!", vars.get("name").unwrap_or("stranger")));
//!     Ok(())
//! })
//! .unwrap();
//!
//! let runner = app.clone();
//! platform.spawn_local(Box::pin(async move {
//!     let _ = runner.run().await;
//! }));
//! platform.run_until_stalled();
//! assert_eq!(platform.body().text(), "Hello, world!");
//! assert_eq!(platform.title(), "greet");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod app;
pub mod client;
pub mod component;
pub mod config;
pub mod dom;
mod error;
pub mod exit;
pub mod loader;
pub mod logging;
pub mod scroll;

// ============================================================================
// Public API Exports
// ============================================================================

pub use app::{Application, NOT_FOUND_TEXT};
pub use client::{ApiClient, ClientFactory};
pub use component::{Component, Renderable};
pub use config::PagewireConfig;
pub use dom::{Element, Event, EventKind, Platform};
pub use error::AppError;
pub use exit::ExitSignal;
pub use loader::Loader;
pub use scroll::{
    Axis, Background, EdgePolicy, Gradient, Page, PageDirection, ScrollApp, ScrollOptions,
};

// Re-exported so applications need a single dependency
pub use pagewire_router as router;
pub use pagewire_router::{Router, RouterOptions, Vars};
