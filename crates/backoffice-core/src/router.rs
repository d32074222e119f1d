// ── Routing helpers ──
//
// History-mode selection and the navigation loading guard. The guard keeps
// its visited-route set in a store owned by the guard itself, so it is
// cleared on teardown instead of living for the whole process.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::CoreError;

/// Environment variable that selects the history mode, read with
/// [`HistoryMode::from_env`].
pub const HISTORY_ENV: &str = "BACKOFFICE_HISTORY";

/// Delay between a navigation finishing and the page-loading flag clearing.
pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_millis(500);

// ── History mode ─────────────────────────────────────────────────────

/// Path-based (`web`) or fragment-based (`hash`) routing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HistoryMode {
    #[default]
    Web,
    Hash,
}

impl FromStr for HistoryMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(Self::Web),
            "hash" => Ok(Self::Hash),
            other => Err(CoreError::Config {
                message: format!("unknown history mode '{other}', expected 'web' or 'hash'"),
            }),
        }
    }
}

impl HistoryMode {
    /// Read the mode from `var`. An unset variable is an error.
    pub fn from_env(var: &str) -> Result<Self, CoreError> {
        let value = std::env::var(var).map_err(|_| CoreError::Config {
            message: format!("{var} is not set (expected 'web' or 'hash')"),
        })?;
        value.parse()
    }

    /// Link to `path` under `base` in this mode.
    pub fn href(self, base: &str, path: &str) -> String {
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        match self {
            Self::Web => format!("{base}/{path}"),
            Self::Hash => format!("{base}/#/{path}"),
        }
    }
}

// ── Routes ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteMeta {
    /// `Some(false)` opts the route out of the page-loading flag.
    pub loading: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path including query and fragment; the visited key.
    pub full_path: String,
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            meta: RouteMeta::default(),
        }
    }

    pub fn without_loading(mut self) -> Self {
        self.meta.loading = Some(false);
        self
    }
}

/// Routes whose first load has completed.
#[derive(Debug, Clone, Default)]
pub struct VisitedRoutes {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl VisitedRoutes {
    pub fn contains(&self, full_path: &str) -> bool {
        self.inner
            .lock()
            .is_ok_and(|set| set.contains(full_path))
    }

    fn insert(&self, full_path: String) {
        if let Ok(mut set) = self.inner.lock() {
            set.insert(full_path);
        }
    }

    fn clear(&self) {
        if let Ok(mut set) = self.inner.lock() {
            set.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map_or(0, |set| set.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Navigation guard ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardConfig {
    pub loading_delay: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            loading_delay: DEFAULT_LOADING_DELAY,
        }
    }
}

/// State carried from `before_each` to `after_each` for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationContext {
    pub full_path: String,
    /// The route had completed a load before this navigation started.
    pub visited: bool,
    /// This navigation raised the page-loading flag.
    pub raised_loading: bool,
}

/// Drives the progress and page-loading flags around navigations.
///
/// Hosts call [`before_each`](Self::before_each) when a navigation starts
/// and [`after_each`](Self::after_each) when it completes, and watch the
/// flags through [`subscribe_page_loading`](Self::subscribe_page_loading).
pub struct NavigationGuard {
    visited: VisitedRoutes,
    page_loading: Arc<watch::Sender<bool>>,
    progress: watch::Sender<bool>,
    cancel: CancellationToken,
    delay: Duration,
}

impl NavigationGuard {
    pub fn new(config: GuardConfig) -> Self {
        let (page_loading, _) = watch::channel(false);
        let (progress, _) = watch::channel(false);
        Self {
            visited: VisitedRoutes::default(),
            page_loading: Arc::new(page_loading),
            progress,
            cancel: CancellationToken::new(),
            delay: config.loading_delay,
        }
    }

    pub fn subscribe_page_loading(&self) -> watch::Receiver<bool> {
        self.page_loading.subscribe()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<bool> {
        self.progress.subscribe()
    }

    pub fn is_page_loading(&self) -> bool {
        *self.page_loading.borrow()
    }

    pub fn is_in_progress(&self) -> bool {
        *self.progress.borrow()
    }

    pub fn visited(&self) -> &VisitedRoutes {
        &self.visited
    }

    /// A navigation to `route` started.
    pub fn before_each(&self, route: &Route) -> NavigationContext {
        self.progress.send_replace(true);

        let visited = self.visited.contains(&route.full_path);
        let raised_loading = !visited && route.meta.loading != Some(false);
        if raised_loading {
            self.page_loading.send_replace(true);
        }
        trace!(path = %route.full_path, visited, raised_loading, "navigation started");

        NavigationContext {
            full_path: route.full_path.clone(),
            visited,
            raised_loading,
        }
    }

    /// A navigation finished. On a route's first visit, schedules the
    /// page-loading flag to clear after the delay and marks the route
    /// visited; the returned handle completes when that has happened (or
    /// the guard was torn down).
    ///
    /// Must be called from within a tokio runtime.
    pub fn after_each(&self, ctx: NavigationContext) -> Option<JoinHandle<()>> {
        self.progress.send_replace(false);
        if ctx.visited || self.visited.contains(&ctx.full_path) {
            return None;
        }

        let page_loading = Arc::clone(&self.page_loading);
        let visited = self.visited.clone();
        let cancel = self.cancel.clone();
        let delay = self.delay;

        Some(tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    trace!(path = %ctx.full_path, "pending loading reset cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    page_loading.send_replace(false);
                    debug!(path = %ctx.full_path, "route marked visited");
                    visited.insert(ctx.full_path);
                }
            }
        }))
    }

    /// Cancel pending resets, forget visited routes and lower both flags.
    /// The guard stays usable afterwards.
    pub fn teardown(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.visited.clear();
        self.page_loading.send_replace(false);
        self.progress.send_replace(false);
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl Drop for NavigationGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.visited.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_web_and_hash_are_accepted() {
        assert_eq!("web".parse::<HistoryMode>().unwrap(), HistoryMode::Web);
        assert_eq!("hash".parse::<HistoryMode>().unwrap(), HistoryMode::Hash);
        for bad in ["", "Web", "HASH", "memory", "history"] {
            assert!(matches!(bad.parse::<HistoryMode>(), Err(CoreError::Config { .. })), "{bad}");
        }
    }

    #[test]
    fn unset_history_variable_is_an_error() {
        assert!(HistoryMode::from_env("BACKOFFICE_TEST_HISTORY_NEVER_SET").is_err());
    }

    #[test]
    fn href_follows_the_mode() {
        assert_eq!(HistoryMode::Web.href("/admin/", "/users"), "/admin/users");
        assert_eq!(HistoryMode::Hash.href("/admin", "users"), "/admin/#/users");
    }

    #[tokio::test(start_paused = true)]
    async fn loading_clears_only_after_the_delay() {
        let guard = NavigationGuard::default();
        let mut loading = guard.subscribe_page_loading();

        let ctx = guard.before_each(&Route::new("/users"));
        assert!(ctx.raised_loading);
        assert!(guard.is_in_progress());
        assert!(*loading.borrow_and_update());

        let pending = guard.after_each(ctx).unwrap();
        assert!(!guard.is_in_progress());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(guard.is_page_loading());
        assert!(!guard.visited().contains("/users"));

        pending.await.unwrap();
        assert!(!guard.is_page_loading());
        assert!(guard.visited().contains("/users"));
        assert!(loading.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn visited_routes_do_not_toggle_loading() {
        let guard = NavigationGuard::default();
        let ctx = guard.before_each(&Route::new("/posts?page=2"));
        guard.after_each(ctx).unwrap().await.unwrap();

        let ctx = guard.before_each(&Route::new("/posts?page=2"));
        assert!(ctx.visited);
        assert!(!ctx.raised_loading);
        assert!(!guard.is_page_loading());
        assert!(guard.after_each(ctx).is_none());

        // A different full path is a different route.
        let ctx = guard.before_each(&Route::new("/posts?page=3"));
        assert!(ctx.raised_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn routes_can_opt_out_of_loading() {
        let guard = NavigationGuard::default();
        let ctx = guard.before_each(&Route::new("/login").without_loading());
        assert!(!ctx.raised_loading);
        assert!(!guard.is_page_loading());

        guard.after_each(ctx).unwrap().await.unwrap();
        assert!(guard.visited().contains("/login"));
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_resets() {
        let mut guard = NavigationGuard::default();
        let ctx = guard.before_each(&Route::new("/menus"));
        let pending = guard.after_each(ctx).unwrap();

        guard.teardown();
        pending.await.unwrap();

        assert!(guard.visited().is_empty());
        assert!(!guard.is_page_loading());

        // Still usable after teardown.
        let ctx = guard.before_each(&Route::new("/menus"));
        assert!(ctx.raised_loading);
    }
}
