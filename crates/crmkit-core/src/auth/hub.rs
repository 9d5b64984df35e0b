//! Session change fan-out.
//!
//! [`SessionHub`] tracks the current identity and notifies subscribers on
//! every transition. Session providers embed one and call
//! [`SessionHub::set`] after signing in or out.
//!
//! Deliveries are serialized: every subscriber sees transitions in the order
//! they were applied, and the last notification matches [`SessionHub::current`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

use super::Identity;

/// Callback invoked with the current identity (or `None` when signed out).
pub type SessionCallback = Box<dyn Fn(Option<&Identity>) + Send + Sync>;

type SharedCallback = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

/// Current identity plus the subscribers watching it.
#[derive(Clone, Default)]
pub struct SessionHub {
    inner: Arc<Mutex<HubState>>,
    /// Held from a state change until its fan-out completes.
    delivery: Arc<Mutex<()>>,
}

#[derive(Default)]
struct HubState {
    current: Option<Identity>,
    next_id: u64,
    subscribers: BTreeMap<u64, SharedCallback>,
}

impl SessionHub {
    /// A hub with an initial identity.
    pub fn new(current: Option<Identity>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubState {
                current,
                ..HubState::default()
            })),
            delivery: Arc::default(),
        }
    }

    /// The identity currently signed in, if any.
    pub fn current(&self) -> Option<Identity> {
        self.state().current.clone()
    }

    /// Register a callback.
    ///
    /// The callback runs immediately with the current identity, then on
    /// every transition until the returned [`Subscription`] is dropped or
    /// unsubscribed.
    pub fn subscribe(&self, callback: SessionCallback) -> Subscription {
        let callback: SharedCallback = Arc::from(callback);
        let _delivery = self.deliver();

        let (id, current) = {
            let mut state = self.state();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.insert(id, Arc::clone(&callback));
            (id, state.current.clone())
        };

        trace!(subscriber = id, "session subscriber added");
        callback(current.as_ref());

        Subscription {
            hub: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Replace the current identity.
    ///
    /// Subscribers are notified only if the identity actually changed.
    /// Callbacks may read [`SessionHub::current`] but must not call `set` or
    /// `subscribe` on the same hub; both wait for the fan-out in progress.
    pub fn set(&self, identity: Option<Identity>) {
        let _delivery = self.deliver();
        let callbacks: Vec<SharedCallback> = {
            let mut state = self.state();
            if state.current == identity {
                return;
            }
            state.current = identity.clone();
            state.subscribers.values().cloned().collect()
        };

        trace!(subscribers = callbacks.len(), "session changed");
        for callback in callbacks {
            callback(identity.as_ref());
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state().subscribers.len()
    }

    fn state(&self) -> MutexGuard<'_, HubState> {
        lock(&self.inner)
    }

    fn deliver(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("SessionHub")
            .field("current", &state.current)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

fn lock(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    // Callbacks never run under the state lock, so poisoning carries no
    // broken invariant.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`SessionHub::subscribe`].
///
/// Dropping it detaches the callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    hub: Weak<Mutex<HubState>>,
    id: u64,
}

impl Subscription {
    /// Detach the callback.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            lock(&hub).subscribers.remove(&self.id);
            trace!(subscriber = self.id, "session subscriber removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<Option<String>>>>, SessionCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: SessionCallback = Box::new(move |identity: Option<&Identity>| {
            sink.lock()
                .unwrap()
                .push(identity.map(|i| i.email.clone()));
        });
        (seen, callback)
    }

    #[test]
    fn subscribe_reports_current_immediately() {
        let hub = SessionHub::new(Some(Identity::new("u1", "jane@x.com")));
        let (seen, callback) = recorder();

        let _subscription = hub.subscribe(callback);

        assert_eq!(*seen.lock().unwrap(), vec![Some("jane@x.com".to_string())]);
    }

    #[test]
    fn transitions_are_delivered() {
        let hub = SessionHub::default();
        let (seen, callback) = recorder();
        let _subscription = hub.subscribe(callback);

        hub.set(Some(Identity::new("u1", "jane@x.com")));
        hub.set(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("jane@x.com".to_string()), None]
        );
    }

    #[test]
    fn unchanged_identity_is_not_redelivered() {
        let hub = SessionHub::default();
        let (seen, callback) = recorder();
        let _subscription = hub.subscribe(callback);

        hub.set(None);
        hub.set(None);

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let hub = SessionHub::default();
        let (seen, callback) = recorder();
        let subscription = hub.subscribe(callback);
        assert_eq!(hub.subscriber_count(), 1);

        subscription.unsubscribe();
        hub.set(Some(Identity::new("u1", "jane@x.com")));

        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_transitions_end_on_current_state() {
        let hub = SessionHub::default();
        let (seen, callback) = recorder();
        let _subscription = hub.subscribe(callback);

        let writers: Vec<_> = (0..8)
            .map(|n| {
                let hub = hub.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let identity = (i % 2 == 0)
                            .then(|| Identity::new(format!("u{n}"), format!("user{n}@x.com")));
                        hub.set(identity);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let last = seen.lock().unwrap().last().cloned().flatten();
        assert_eq!(last, hub.current().map(|i| i.email));
    }

    #[test]
    fn subscription_outliving_hub_is_harmless() {
        let hub = SessionHub::default();
        let (_seen, callback) = recorder();
        let subscription = hub.subscribe(callback);
        drop(hub);
        drop(subscription);
    }
}
