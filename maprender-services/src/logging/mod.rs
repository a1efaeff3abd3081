// SPDX-License-Identifier: LGPL-3.0-only

//! Log event dispatch.
//!
//! A [LogDispatcher] fans `(level, message, error)` events out to explicitly
//! registered [LogListener]s. Nothing is hooked up globally: listeners are
//! registered and unregistered by whoever owns the dispatcher, and the
//! dispatcher only receives `log` facade records if the application installs
//! it as its logger.

use indexmap::IndexMap;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

mod buffer;

pub use buffer::{LogBuffer, PanelLayout, TextColors};

/// An error attached to a log event.
pub type SharedError = Arc<dyn Error + Send + Sync>;

/// A single log event.
#[derive(Clone)]
pub struct LogEvent {
    /// Severity.
    pub level: log::Level,
    /// Human readable message.
    pub message: String,
    /// Optional error the event is about.
    pub error: Option<SharedError>,
}

impl LogEvent {
    /// Create an event without an error.
    pub fn new(level: log::Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            error: None,
        }
    }

    /// Attach an error.
    pub fn with_error(mut self, error: SharedError) -> Self {
        self.error = Some(error);
        self
    }
}

impl fmt::Debug for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEvent")
            .field("level", &self.level)
            .field("message", &self.message)
            .field("error", &self.error.as_ref().map(|error| error.to_string()))
            .finish()
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;
        if let Some(error) = &self.error {
            write!(f, " ({})", error)?;
        }
        Ok(())
    }
}

/// Receives log events from a [LogDispatcher].
pub trait LogListener: Send + Sync {
    /// Handle an event.
    fn on_log(&self, event: &LogEvent);
}

impl<F> LogListener for F
where
    F: Fn(&LogEvent) + Send + Sync,
{
    fn on_log(&self, event: &LogEvent) {
        self(event)
    }
}

/// Handle of a registered listener, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Delivers log events to registered listeners in registration order.
pub struct LogDispatcher {
    listeners: RwLock<IndexMap<ListenerId, Arc<dyn LogListener>>>,
    next_id: AtomicU64,
}

impl LogDispatcher {
    /// Create a dispatcher without listeners.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(IndexMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a listener.
    pub fn register(&self, listener: Arc<dyn LogListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);
        id
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(&id)
            .is_some()
    }

    /// Get the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver an event to every listener.
    pub fn dispatch(&self, level: log::Level, message: impl Into<String>, error: Option<SharedError>) {
        let event = LogEvent {
            level,
            message: message.into(),
            error,
        };
        self.dispatch_event(&event);
    }

    /// Deliver a prepared event to every listener.
    pub fn dispatch_event(&self, event: &LogEvent) {
        // Listeners may register or unregister while being called.
        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener.on_log(event);
        }
    }
}

impl Default for LogDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl log::Log for LogDispatcher {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        self.listener_count() > 0
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.dispatch(record.level(), record.args().to_string(), None);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_listeners_run_in_registration_order() {
        let dispatcher = LogDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let seen = seen.clone();
            dispatcher.register(Arc::new(move |event: &LogEvent| {
                seen.lock().unwrap().push(format!("{name}:{}", event.message));
            }));
        }

        dispatcher.dispatch(log::Level::Warn, "tile missing", None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first:tile missing", "second:tile missing", "third:tile missing"]
        );
    }

    #[test]
    fn test_unregister() {
        let dispatcher = LogDispatcher::new();
        let count = Arc::new(Mutex::new(0));

        let counter = count.clone();
        let id = dispatcher.register(Arc::new(move |_: &LogEvent| {
            *counter.lock().unwrap() += 1;
        }));

        dispatcher.dispatch(log::Level::Info, "one", None);
        assert!(dispatcher.unregister(id));
        assert!(!dispatcher.unregister(id));
        dispatcher.dispatch(log::Level::Info, "two", None);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_event_display() {
        let error: SharedError = Arc::new(std::io::Error::other("disk full"));
        let event = LogEvent::new(log::Level::Error, "cannot save").with_error(error);

        assert_eq!(event.to_string(), "ERROR: cannot save (disk full)");
    }

    #[test]
    fn test_acts_as_logger() {
        use log::Log;

        let dispatcher = LogDispatcher::new();
        let metadata = log::Metadata::builder().level(log::Level::Debug).build();

        // Without listeners the record is dropped.
        assert!(!dispatcher.enabled(&metadata));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        dispatcher.register(Arc::new(move |event: &LogEvent| {
            sink.lock().unwrap().push(event.to_string());
        }));
        dispatcher.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("zoom {}", 3))
                .build(),
        );

        assert_eq!(*seen.lock().unwrap(), vec!["DEBUG: zoom 3"]);
    }
}
