//! Auxiliary services
//!
//! Services do the background work of a page (requests, storage). They
//! never throw errors back at their caller; failures go out on the
//! service's `error` stream, which `Page::create_service` wires to the
//! host.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use crate::{Callbacks, Fired, SharedError};

/// A service a page can create
pub trait PageService: 'static {
    /// Construct a fresh instance
    fn create() -> Self
    where
        Self: Sized;

    /// Stream the service raises its errors on
    fn error(&self) -> &Callbacks<Self, SharedError>;
}

/// Default service
#[derive(Default)]
pub struct Service {
    error: Callbacks<Service, SharedError>,
}

impl Service {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise an error on the `error` stream
    pub fn raise(&self, error: impl Into<anyhow::Error>) -> Fired {
        let error: SharedError = Rc::new(error.into());
        tracing::debug!(error = %error, "service error raised");
        self.error.fire(self, &error)
    }

    /// Await `work`; on failure raise the error and yield `None`
    pub async fn run<T, F>(&self, work: F) -> Option<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match work.await {
            Ok(value) => Some(value),
            Err(e) => {
                if let Err(listener) = self.raise(e).wait().await {
                    tracing::warn!(error = %listener, "service error listener failed");
                }
                None
            }
        }
    }
}

impl PageService for Service {
    fn create() -> Self {
        Self::new()
    }

    fn error(&self) -> &Callbacks<Self, SharedError> {
        &self.error
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("error", &self.error)
            .finish()
    }
}
