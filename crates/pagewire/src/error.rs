use pagewire_router::{RegistryError, RouteError};
use thiserror::Error;

/// Errors raised by the application shells
#[derive(Debug, Error)]
pub enum AppError {
    /// The mount selector matched nothing
    #[error("no element matches root selector {selector:?}")]
    RootNotFound { selector: String },

    /// `exit` or `close` was called a second time
    #[error("exit has already been signalled")]
    AlreadySignalled,

    /// `run` was called on an application that is already running
    #[error("application is already running")]
    AlreadyRunning,

    /// Two pages slugify to the same hash
    #[error("a page with hash {hash:?} already exists")]
    DuplicatePage { hash: String },

    /// Pages are frozen once the application runs
    #[error("pages cannot be added after run")]
    PagesFrozen,

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("configuration error: {source}")]
    Config {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(source: anyhow::Error) -> Self {
        AppError::Config { source }
    }
}
