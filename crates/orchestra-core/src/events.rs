//! Synchronous named-topic event dispatcher
//!
//! Topics are plain strings such as `orchestra.started` or
//! `orchestra.saving: extension.acme/blog`. Each topic carries one payload
//! type, chosen by whoever fires it; listeners receive the payload by `&mut`
//! so they can amend it before the firing operation continues.
//!
//! Delivery is synchronous and in registration order. The first listener
//! error stops delivery and is returned to the caller.

use crate::error::{Error, Result};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Error returned by a listener to abort the firing operation
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Arc<dyn Fn(&mut dyn Any) -> HandlerOutcome + Send + Sync>;

enum HandlerOutcome {
    Handled(std::result::Result<(), ListenerError>),
    WrongPayload,
}

/// Handle for removing a single listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registered {
    id: ListenerId,
    handler: Handler,
}

/// Event dispatcher owned by the hosting application
#[derive(Default)]
pub struct Dispatcher {
    listeners: RwLock<HashMap<String, Vec<Registered>>>,
    next_id: AtomicU64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `topic`, to be called with a `&mut T` payload
    pub fn listen<T, F>(&self, topic: impl Into<String>, listener: F) -> ListenerId
    where
        T: Any,
        F: Fn(&mut T) -> std::result::Result<(), ListenerError> + Send + Sync + 'static,
    {
        let topic = topic.into();
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handler: Handler = Arc::new(move |payload: &mut dyn Any| {
            match payload.downcast_mut::<T>() {
                Some(payload) => HandlerOutcome::Handled(listener(payload)),
                None => HandlerOutcome::WrongPayload,
            }
        });

        debug!("Listening on '{}'", topic);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push(Registered { id, handler });
        id
    }

    /// Deliver `payload` to every listener of `topic`.
    ///
    /// Returns the number of listeners called.
    pub fn fire<T: Any>(&self, topic: &str, payload: &mut T) -> Result<usize> {
        // Snapshot so listeners may register or remove listeners while running
        let handlers: Vec<Handler> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .map(|registered| registered.iter().map(|r| Arc::clone(&r.handler)).collect())
            .unwrap_or_default();

        debug!("Firing '{}' to {} listener(s)", topic, handlers.len());

        for handler in &handlers {
            match handler(&mut *payload) {
                HandlerOutcome::Handled(Ok(())) => {}
                HandlerOutcome::Handled(Err(source)) => {
                    warn!("Listener for '{}' failed: {}", topic, source);
                    return Err(Error::Listener {
                        topic: topic.to_string(),
                        source,
                    });
                }
                HandlerOutcome::WrongPayload => {
                    return Err(Error::PayloadMismatch {
                        topic: topic.to_string(),
                        payload: type_name::<T>(),
                    });
                }
            }
        }

        Ok(handlers.len())
    }

    /// Whether anything listens on `topic`
    pub fn has_listeners(&self, topic: &str) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .is_some_and(|registered| !registered.is_empty())
    }

    /// Remove every listener of `topic`
    pub fn forget(&self, topic: &str) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(topic);
    }

    /// Remove a single listener. Returns false if it was already gone.
    pub fn unlisten(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        for registered in listeners.values_mut() {
            if let Some(index) = registered.iter().position(|r| r.id == id) {
                registered.remove(index);
                return true;
            }
        }
        false
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        let mut topics: Vec<(&String, usize)> =
            listeners.iter().map(|(topic, l)| (topic, l.len())).collect();
        topics.sort();
        f.debug_struct("Dispatcher").field("topics", &topics).finish()
    }
}
