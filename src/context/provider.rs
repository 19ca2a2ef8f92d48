//! Context providers.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type MakeFn<C> = dyn Fn() -> Result<Option<C>, BoxError> + Send + Sync;

/// Produces context instances: once at bootstrap and once per request.
///
/// `Ok(None)` stands for an absent context.
pub struct Provider<C> {
    make: Arc<MakeFn<C>>,
}

impl<C: Context> Provider<C> {
    pub fn new<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<Option<C>, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            make: Arc::new(move || f().map_err(Into::into)),
        }
    }

    /// Provider that never yields an absent context.
    pub fn from_fn<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<C, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::new(move || f().map(Some))
    }

    pub fn provide(&self) -> Result<Option<C>, BoxError> {
        (self.make)()
    }
}

impl<C: Context + Default> Default for Provider<C> {
    fn default() -> Self {
        Self::from_fn(|| Ok::<_, Infallible>(C::default()))
    }
}

impl<C> Clone for Provider<C> {
    fn clone(&self) -> Self {
        Self {
            make: Arc::clone(&self.make),
        }
    }
}

impl<C> fmt::Debug for Provider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("context", &std::any::type_name::<C>())
            .finish()
    }
}
