//! Connectivity monitor
//!
//! Holds the current online/offline state and notifies subscribers once per
//! edge. The host environment reports edges; nothing here polls.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// An observed change in connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityTransition {
    WentOnline,
    WentOffline,
}

impl ConnectivityTransition {
    pub fn is_online(&self) -> bool {
        matches!(self, ConnectivityTransition::WentOnline)
    }
}

/// Handle returned by [`ConnectivityMonitor::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(ConnectivityTransition) + Send + Sync>;

/// Edge-triggered online/offline state
pub struct ConnectivityMonitor {
    online: AtomicBool,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
}

impl ConnectivityMonitor {
    /// Create a monitor with the state known at construction time
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: AtomicBool::new(initially_online),
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Report the current state. Listeners run only if the state changed.
    pub fn set_online(&self, online: bool) -> Option<ConnectivityTransition> {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous == online {
            return None;
        }

        let transition = if online {
            ConnectivityTransition::WentOnline
        } else {
            ConnectivityTransition::WentOffline
        };
        tracing::info!(?transition, "Connectivity changed");

        // Snapshot so listeners may subscribe or unsubscribe while running
        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(guard) => guard.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect(),
        };
        for listener in listeners {
            listener(transition);
        }

        Some(transition)
    }

    /// Register a listener for future transitions
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(ConnectivityTransition) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut listeners = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
        listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(|p| p.into_inner());
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|l| l.len())
            .unwrap_or_else(|p| p.into_inner().len())
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("online", &self.is_online())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_initial_state() {
        assert!(ConnectivityMonitor::new(true).is_online());
        assert!(!ConnectivityMonitor::new(false).is_online());
    }

    #[test]
    fn test_listener_called_once_per_edge() {
        let monitor = ConnectivityMonitor::new(true);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        monitor.subscribe(move |t| seen.lock().unwrap().push(t));

        monitor.set_online(false);
        monitor.set_online(false);
        monitor.set_online(true);
        monitor.set_online(true);

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                ConnectivityTransition::WentOffline,
                ConnectivityTransition::WentOnline
            ]
        );
    }

    #[test]
    fn test_same_state_returns_none() {
        let monitor = ConnectivityMonitor::new(false);
        assert_eq!(monitor.set_online(false), None);
        assert_eq!(
            monitor.set_online(true),
            Some(ConnectivityTransition::WentOnline)
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let monitor = ConnectivityMonitor::new(true);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let id = monitor.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        monitor.set_online(false);
        assert!(monitor.unsubscribe(id));
        assert!(!monitor.unsubscribe(id));
        monitor.set_online(true);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.subscriber_count(), 0);
    }

    #[test]
    fn test_listener_may_subscribe_during_notification() {
        let monitor = Arc::new(ConnectivityMonitor::new(true));
        let inner = Arc::clone(&monitor);
        monitor.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        monitor.set_online(false);
        assert_eq!(monitor.subscriber_count(), 2);
    }
}
