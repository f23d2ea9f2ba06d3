//! Navigation seam used by the session gateway.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::watch;

/// Views the session gateway can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Root,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the user to another view.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// [`Navigator`] that publishes the current route and counts navigations.
#[derive(Debug)]
pub struct RouteTracker {
    current: watch::Sender<Route>,
    navigations: AtomicUsize,
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}

impl RouteTracker {
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self {
            current,
            navigations: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Number of `navigate` calls so far, including ones to the current route.
    pub fn navigation_count(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

impl Navigator for RouteTracker {
    fn navigate(&self, route: Route) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        self.current.send_replace(route);
        tracing::debug!("navigated to {}", route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Root.path(), "/");
        assert_eq!(Route::Login.to_string(), "/login");
    }

    #[test]
    fn test_tracker_records_navigation() {
        let tracker = RouteTracker::new(Route::Login);
        assert_eq!(tracker.current(), Route::Login);
        assert_eq!(tracker.navigation_count(), 0);

        tracker.navigate(Route::Root);
        tracker.navigate(Route::Root);

        assert_eq!(tracker.current(), Route::Root);
        assert_eq!(tracker.navigation_count(), 2);
    }

    #[tokio::test]
    async fn test_tracker_publishes_every_navigation() {
        let tracker = RouteTracker::default();
        let mut rx = tracker.subscribe();

        tracker.navigate(Route::Root);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Route::Root);
    }

    #[test]
    fn test_mock_navigator_expectations() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|route| *route == Route::Login)
            .times(1)
            .return_const(());

        navigator.navigate(Route::Login);
    }
}
