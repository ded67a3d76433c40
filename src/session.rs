use std::sync::{Arc, RwLock};

/// Process-wide holder for the opaque bearer credential. Written at login,
/// read before every authenticated request, cleared at logout or when the
/// server rejects the token. Handles are cheap clones of one shared slot.
///
/// Single-writer contract: only login/logout paths call `set`/`clear`; no
/// expiry is tracked client-side, expiry surfaces as a 401 on a later call.
#[derive(Clone, Default)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap() = Some(token.into());
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    pub fn clear(&self) {
        *self.token.write().unwrap() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap().is_some()
    }
}
