use thiserror::Error;

/// Error type returned by route handlers.
pub type HandlerError = anyhow::Error;

/// Errors raised while registering or resolving routes
#[derive(Debug, Error)]
pub enum RouteError {
    /// No registered pattern matches the location
    #[error("no route matches {url}")]
    NotFound { url: String },

    /// A route with this name already exists
    #[error("route {name:?} is already registered")]
    DuplicateRoute { name: String },

    /// The pattern could not be parsed
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No route carries this name
    #[error("unknown route {name:?}")]
    UnknownRoute { name: String },

    /// A redirect target could not be joined onto the current location
    #[error("cannot resolve {target:?} against the current location: {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },

    /// `redirect` was called before the router resolved its first location
    #[error("router has not been started")]
    NotRunning,

    /// The matched handler returned an error
    #[error("handler for route {name:?} failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: HandlerError,
    },
}

impl RouteError {
    /// True for resolution misses, which are recoverable at runtime.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::NotFound { .. })
    }
}

/// Errors raised by the ordered URL registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("url {key:?} is already registered")]
    DuplicateKey { key: String },

    #[error("url {key:?} is not registered")]
    NotFound { key: String },

    #[error("link entry {index}: field {field:?} must be {expected}")]
    InvalidFieldType {
        index: usize,
        field: String,
        expected: &'static str,
    },

    #[error("link entry {index}: unknown field {field:?}")]
    UnknownField { index: usize, field: String },

    #[error("link entry {index}: neither a name nor a text was given")]
    MissingKey { index: usize },
}
