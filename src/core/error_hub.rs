//! Error-handler subscription lists
//!
//! Transports, plugins and the logger each own an [`ErrorHub`]. A hub can be
//! linked to upstream hubs; an error reported to it is handed to its own
//! handlers and then forwarded upstream. An error nobody handles is returned
//! to the caller.

use super::error::{LoggerError, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with every escalated error
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

#[derive(Default)]
struct HubState {
    handlers: Vec<ErrorHandler>,
    upstream: Vec<ErrorHub>,
}

/// Shared, cheaply cloneable handler list
#[derive(Clone, Default)]
pub struct ErrorHub {
    state: Arc<RwLock<HubState>>,
}

impl ErrorHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.state.write().handlers.push(Arc::new(handler));
    }

    /// Forward every error reported here to `upstream` as well
    pub fn link(&self, upstream: &ErrorHub) {
        if self.same_hub(upstream) {
            return;
        }
        let mut state = self.state.write();
        if !state.upstream.iter().any(|hub| hub.same_hub(upstream)) {
            state.upstream.push(upstream.clone());
        }
    }

    pub fn unlink(&self, upstream: &ErrorHub) {
        self.state.write().upstream.retain(|hub| !hub.same_hub(upstream));
    }

    pub fn handler_count(&self) -> usize {
        self.state.read().handlers.len()
    }

    pub fn is_linked_to(&self, upstream: &ErrorHub) -> bool {
        self.state.read().upstream.iter().any(|hub| hub.same_hub(upstream))
    }

    /// Hand `error` to every handler here and upstream
    ///
    /// Returns whether the error was handled: this hub has handlers or
    /// upstream hubs, and every upstream hub handled it too.
    pub fn notify(&self, error: &LoggerError) -> bool {
        let (handlers, upstream) = {
            let state = self.state.read();
            (state.handlers.clone(), state.upstream.clone())
        };

        if handlers.is_empty() && upstream.is_empty() {
            return false;
        }

        for handler in &handlers {
            handler(error);
        }

        upstream
            .iter()
            .fold(true, |handled, hub| hub.notify(error) && handled)
    }

    /// Report `error`; it comes back as `Err` when nobody handled it
    pub fn emit(&self, error: LoggerError) -> Result<()> {
        if self.notify(&error) {
            Ok(())
        } else {
            Err(error)
        }
    }

    fn same_hub(&self, other: &ErrorHub) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ErrorHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ErrorHub")
            .field("handlers", &state.handlers.len())
            .field("upstream", &state.upstream.len())
            .finish()
    }
}
