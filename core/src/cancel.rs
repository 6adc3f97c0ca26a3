//! Caller-driven cancellation.
//!
//! # Design
//! A `CancelToken` fires at most once. Listeners registered before the token
//! fires run when it fires; listeners registered afterwards run immediately
//! with the stored reason. The executor registers one listener per
//! execution, which makes cancellation effective even when it happens before
//! the transport has emitted anything, and unsubscribes it once the execution
//! settles so a long-lived token does not accumulate listeners.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

/// Reason carried by a fired `CancelToken`.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", .message.as_deref().unwrap_or("Request canceled"))]
pub struct Cancel {
    pub message: Option<String>,
}

impl Cancel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

type Listener = Box<dyn FnOnce(Cancel) + Send>;

/// Handle returned by `CancelToken::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

#[derive(Default)]
struct TokenState {
    reason: Option<Cancel>,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Single-fire, awaitable cancellation signal.
#[derive(Clone, Default)]
pub struct CancelToken {
    state: Arc<Mutex<TokenState>>,
}

impl CancelToken {
    /// Create a token together with the source that fires it.
    pub fn source() -> CancelTokenSource {
        let token = CancelToken::default();
        CancelTokenSource { token }
    }

    fn lock(&self) -> MutexGuard<'_, TokenState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The reason, if the token has fired.
    pub fn reason(&self) -> Option<Cancel> {
        self.lock().reason.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().reason.is_some()
    }

    /// Fail fast with the stored reason if the token has already fired.
    pub fn throw_if_requested(&self) -> Result<(), Cancel> {
        match self.reason() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Run `listener` once with the reason, now if already fired.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnOnce(Cancel) + Send + 'static,
    {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        match state.reason.clone() {
            Some(reason) => {
                drop(state);
                listener(reason);
            }
            None => state.listeners.push((id, Box::new(listener))),
        }
        Subscription(id)
    }

    /// Drop a listener that has not run yet. A no-op once the token fired.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.lock().listeners.retain(|(id, _)| *id != subscription.0);
    }

    /// Number of listeners waiting for the token to fire.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Resolves with the reason once the token fires.
    pub async fn cancelled(&self) -> Cancel {
        let (tx, rx) = oneshot::channel();
        let subscription = self.subscribe(move |reason| {
            let _ = tx.send(reason);
        });
        let _guard = Unsubscribe {
            token: self,
            subscription,
        };
        match rx.await {
            Ok(reason) => reason,
            // The sender lives in our own state, so this only happens if the
            // listener list was torn down without firing.
            Err(_) => std::future::pending().await,
        }
    }

    fn fire(&self, reason: Cancel) -> bool {
        let listeners = {
            let mut state = self.lock();
            if state.reason.is_some() {
                return false;
            }
            state.reason = Some(reason.clone());
            std::mem::take(&mut state.listeners)
        };
        for (_, listener) in listeners {
            listener(reason.clone());
        }
        true
    }
}

struct Unsubscribe<'a> {
    token: &'a CancelToken,
    subscription: Subscription,
}

impl Drop for Unsubscribe<'_> {
    fn drop(&mut self) {
        self.token.unsubscribe(self.subscription);
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("CancelToken")
            .field("reason", &state.reason)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

/// Owner side of a `CancelToken`.
#[derive(Debug, Clone)]
pub struct CancelTokenSource {
    token: CancelToken,
}

impl CancelTokenSource {
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Fire the token. Returns `false` if it had already fired; the first
    /// reason is kept.
    pub fn cancel(&self, message: impl Into<String>) -> bool {
        self.token.fire(Cancel::new(message))
    }

    pub fn cancel_with(&self, reason: Cancel) -> bool {
        self.token.fire(reason)
    }
}
