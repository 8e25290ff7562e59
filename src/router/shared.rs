//! Copy-on-write router snapshots for registering routes while serving.
//!
//! Readers load the current [`Router`] through an [`ArcSwap`] without taking
//! a lock. Writers clone the current router, apply their changes to the copy
//! and publish it atomically; a failed update publishes nothing. Writers are
//! serialized by a mutex so concurrent updates never lose each other's routes.

use arc_swap::{ArcSwap, Guard};
use std::sync::{Arc, Mutex};
use tracing::info;

use super::core::Router;
use crate::error::RouteError;

/// A [`Router`] behind an atomically swappable pointer.
///
/// ```rust
/// use brrtrie::router::{Router, SharedRouter};
///
/// let shared = SharedRouter::new(Router::<&'static str>::new());
/// shared.update(|r| r.get("/health", "health")).unwrap();
/// assert!(shared.load().find("GET", "/health").is_matched());
/// ```
pub struct SharedRouter<H> {
    current: ArcSwap<Router<H>>,
    writer: Mutex<()>,
}

impl<H> SharedRouter<H> {
    /// Wrap a fully built router.
    #[must_use]
    pub fn new(router: Router<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
            writer: Mutex::new(()),
        }
    }

    /// Cheap, lock-free access to the current snapshot for a single lookup.
    #[must_use]
    pub fn load(&self) -> Guard<Arc<Router<H>>> {
        self.current.load()
    }

    /// An owned handle on the current snapshot, for holding across many lookups.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Router<H>> {
        self.current.load_full()
    }

    /// Apply `f` to a copy of the current router and publish the copy if `f`
    /// succeeds. Lookups in flight keep using the snapshot they loaded.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns; the published router is left untouched.
    pub fn update<T, F>(&self, f: F) -> Result<T, RouteError>
    where
        F: FnOnce(&mut Router<H>) -> Result<T, RouteError>,
    {
        let _guard = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut next = Router::clone(&self.current.load());
        let value = f(&mut next)?;
        let routes_count = next.len();
        self.current.store(Arc::new(next));

        info!(routes_count, "Routing table updated");
        Ok(value)
    }

    /// Replace the whole router.
    pub fn replace(&self, router: Router<H>) {
        let _guard = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let routes_count = router.len();
        self.current.store(Arc::new(router));
        info!(routes_count, "Routing table replaced");
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}
