use std::future::Future;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// What a screen renders for one slice of remote data.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Nothing fetched yet.
    Empty,
    /// First fetch in flight with nothing to show meanwhile.
    Loading,
    Ready(T),
    /// A fetch failed with nothing usable to keep on screen.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// Token tying an in-flight request to the fetch that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

struct Inner<T> {
    generation: u64,
    view: ViewState<T>,
}

/// One screen's synchronized slice of remote state. The repeated
/// fetch→check→parse→reconcile cycle runs through here instead of being
/// re-implemented per screen.
///
/// Each fetch captures a generation at issue time; `apply` discards the
/// result if another fetch has begun since, so a slow response can never
/// overwrite a newer one (last *issue* wins, not last arrival).
pub struct SyncState<T> {
    inner: Arc<RwLock<Inner<T>>>,
}

impl<T> Clone for SyncState<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Clone> Default for SyncState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> SyncState<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { generation: 0, view: ViewState::Empty })),
        }
    }

    /// Start a fetch. Existing Ready content stays visible while the
    /// refresh is in flight; only an Empty view switches to Loading.
    pub fn begin(&self) -> Generation {
        let mut inner = self.inner.write().unwrap();
        inner.generation += 1;
        if matches!(inner.view, ViewState::Empty | ViewState::Failed(_)) {
            inner.view = ViewState::Loading;
        }
        Generation(inner.generation)
    }

    /// Reconcile a completed request. Returns false when the result was
    /// stale (a newer fetch began after this one) and nothing changed.
    /// On success the slice is replaced, never merged. On failure prior
    /// Ready content is preserved; Loading becomes an explicit error view.
    pub fn apply(&self, generation: Generation, result: ClientResult<T>) -> bool {
        match result {
            Ok(value) => self.apply_ok(generation, value),
            Err(e) => self.apply_err(generation, &e),
        }
    }

    pub(crate) fn apply_ok(&self, generation: Generation, value: T) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.generation != generation.0 {
            debug!(issued = generation.0, current = inner.generation, "discarding stale response");
            return false;
        }
        inner.view = ViewState::Ready(value);
        true
    }

    pub(crate) fn apply_err(&self, generation: Generation, error: &ClientError) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.generation != generation.0 {
            debug!(issued = generation.0, current = inner.generation, "discarding stale error");
            return false;
        }
        if !inner.view.is_ready() {
            inner.view = ViewState::Failed(error.to_string());
        }
        true
    }

    pub fn view(&self) -> ViewState<T> {
        self.inner.read().unwrap().view.clone()
    }

    /// Mutate Ready content in place (optimistic updates after a confirmed
    /// mutation). No-op unless the view is Ready.
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let mut inner = self.inner.write().unwrap();
        if let ViewState::Ready(value) = &mut inner.view {
            f(value);
        }
    }

    /// Drop back to Empty so the next `begin` shows Loading (used when a
    /// screen is navigated away from; coming back always re-fetches).
    pub fn reset(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.generation += 1;
        inner.view = ViewState::Empty;
    }
}

/// Drive one request/response cycle end to end: capture a generation,
/// await the operation, reconcile. Returns the operation's own outcome
/// (Ok carries whether the result was applied or discarded as stale) so
/// the caller can still surface the error to the user.
pub async fn run<T, F>(state: &SyncState<T>, op: F) -> ClientResult<bool>
where
    T: Clone,
    F: Future<Output = ClientResult<T>>,
{
    let generation = state.begin();
    match op.await {
        Ok(value) => Ok(state.apply_ok(generation, value)),
        Err(e) => {
            state.apply_err(generation, &e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_ready_content() {
        let s: SyncState<Vec<u32>> = SyncState::new();
        let g = s.begin();
        assert_eq!(s.view(), ViewState::Loading);
        assert!(s.apply(g, Ok(vec![1, 2])));
        assert_eq!(s.view(), ViewState::Ready(vec![1, 2]));
        let g2 = s.begin();
        // Ready content stays visible during the refresh.
        assert_eq!(s.view(), ViewState::Ready(vec![1, 2]));
        assert!(s.apply(g2, Ok(vec![3])));
        assert_eq!(s.view(), ViewState::Ready(vec![3]));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let s: SyncState<&'static str> = SyncState::new();
        let older = s.begin();
        let newer = s.begin();
        assert!(s.apply(newer, Ok("B")));
        assert!(!s.apply(older, Ok("A")));
        assert_eq!(s.view(), ViewState::Ready("B"));
    }

    #[test]
    fn failure_preserves_prior_ready_content() {
        let s: SyncState<u32> = SyncState::new();
        let g = s.begin();
        s.apply(g, Ok(7));
        let g2 = s.begin();
        s.apply(g2, Err(ClientError::validation("boom")));
        assert_eq!(s.view(), ViewState::Ready(7));
    }

    #[test]
    fn failure_over_loading_shows_error_view() {
        let s: SyncState<u32> = SyncState::new();
        let g = s.begin();
        s.apply(g, Err(ClientError::NotFound));
        assert_eq!(s.view(), ViewState::Failed("not found".into()));
        // A later retry can recover.
        let g = s.begin();
        s.apply(g, Ok(1));
        assert_eq!(s.view(), ViewState::Ready(1));
    }

    #[test]
    fn reset_invalidates_in_flight_fetches() {
        let s: SyncState<u32> = SyncState::new();
        let g = s.begin();
        s.reset();
        assert!(!s.apply(g, Ok(9)));
        assert_eq!(s.view(), ViewState::Empty);
    }
}
