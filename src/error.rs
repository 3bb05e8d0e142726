use thiserror::Error;

use crate::dom::DomError;

/// Startup failures. None of these are recoverable; the host document is
/// malformed and the process should exit.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("mount point `#{0}` not found in host document")]
    MissingMountPoint(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Failures raised while rendering a component. Contained by the nearest
/// `ErrorBoundary`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("`{0}` rendered outside of a store provider")]
    MissingProvider(&'static str),

    #[error("{0}")]
    Failed(String),
}
