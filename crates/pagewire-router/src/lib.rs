//! # Pagewire Router
//!
//! Client-side routing for pagewire applications:
//! - Named path routes (`/users/:id`) and hash routes (`#/docs/:page`, `#about`)
//! - Trailing wildcards (`/files/*path`)
//! - Specificity ordering: static segments before variables before wildcards
//! - Lifecycle hooks around every navigation
//! - An ordered, case-insensitive registry of navigation links
//!
//! The crate is DOM-free. Locations are `url::Url` values and links are
//! reached through the [`urls::LinkElement`] trait, so everything here runs
//! natively as well as in the browser.
//!
//! ## Example
//!
//! ```
//! use pagewire_router::Router;
//! use url::Url;
//!
//! let router = Router::new();
//! router.register("user", "/users/:id", |_, _| Ok(())).unwrap();
//! router.register("new-user", "/users/new", |_, _| Ok(())).unwrap();
//!
//! let url = Url::parse("https://app.test/users/new").unwrap();
//! let (route, _) = router.resolve(&url).unwrap();
//! assert_eq!(route.name, "new-user");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod error;
pub mod path;
pub mod route;
mod router;
pub mod slug;
pub mod urls;
mod vars;

pub use error::{HandlerError, RegistryError, RouteError};
pub use route::{Handler, MatchOptions, PatternTarget, Route};
pub use router::{
    ErrorHook, LoadHook, LocationHook, NavigationHook, Router, RouterOptions, TitleSink,
    EXTERNAL_PREFIX, ROUTE_PREFIX,
};
pub use urls::{LinkElement, LinkOptions, UrlRegistry};
pub use vars::Vars;
