//! Crate-wide error aliases for bootstrap and file I/O.
//!
//! REST failures have their own typed error in [`crate::api::ApiError`].
//! Config files, terminal setup and the log file flow through the boxed
//! [`DynError`], optionally wrapped with a short note on what was being done.

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, DynError>;

/// Attach a lazily built context message to a fallible operation.
pub trait Context<T> {
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

/// A failure plus what the console was attempting when it happened.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct ContextError {
    pub context: String,
    #[source]
    pub source: DynError,
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_ctx<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let err: DynError = Box::new(ContextError {
                context: f(),
                source: Box::new(e),
            });
            err
        })
    }
}

/// Startup refusal with nothing underneath, e.g. a missing base URL.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ConsoleError(pub String);

pub fn simple_error(msg: impl Into<String>) -> DynError {
    Box::new(ConsoleError(msg.into()))
}
