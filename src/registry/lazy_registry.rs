use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::FutureExt;
use futures::future::{self, BoxFuture, Shared};
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::Registry;
use crate::error::{ChartError, ChartResult};

/// Deferred producer registered in place of a ready value.
pub type LoaderFn<V> = Arc<dyn Fn() -> BoxFuture<'static, ChartResult<V>> + Send + Sync>;

type InFlight<V> = Shared<BoxFuture<'static, ChartResult<V>>>;

enum Slot<V> {
    Value(V),
    Loader(LoaderFn<V>),
}

struct PendingLoad<V> {
    serial: u64,
    future: InFlight<V>,
}

struct RegistryState<V> {
    slots: IndexMap<String, Slot<V>>,
    in_flight: HashMap<String, PendingLoad<V>>,
    next_serial: u64,
}

/// Thread-safe registry holding eager values or deferred loaders per key.
///
/// A loader runs at most once while its load is in flight; every concurrent
/// `resolve` for the key awaits the same shared future. A successful load
/// replaces the loader with its value. A failed load is forgotten so a later
/// `resolve` starts a fresh attempt.
///
/// Loaders are invoked on the first poll of the shared future, never while the
/// registry lock is held, so a loader may resolve other keys of the same
/// registry.
pub struct LazyRegistry<V> {
    name: String,
    state: Arc<Mutex<RegistryState<V>>>,
}

impl<V> LazyRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(RegistryState {
                slots: IndexMap::new(),
                in_flight: HashMap::new(),
                next_serial: 0,
            })),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register_value(&self, key: impl Into<String>, value: V) -> &Self {
        self.insert(key.into(), Slot::Value(value));
        self
    }

    pub fn register_loader<F>(&self, key: impl Into<String>, loader: F) -> &Self
    where
        F: Fn() -> BoxFuture<'static, ChartResult<V>> + Send + Sync + 'static,
    {
        self.insert(key.into(), Slot::Loader(Arc::new(loader)));
        self
    }

    pub fn register_shared_loader(&self, key: impl Into<String>, loader: LoaderFn<V>) -> &Self {
        self.insert(key.into(), Slot::Loader(loader));
        self
    }

    /// Removes a key. Returns `true` when something was registered under it.
    pub fn remove(&self, key: &str) -> bool {
        let mut state = self.lock();
        state.in_flight.remove(key);
        state.slots.shift_remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.slots.clear();
        state.in_flight.clear();
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.lock().slots.contains_key(key)
    }

    /// Registered keys in registration order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().slots.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    /// Returns the value when it is already available without awaiting.
    #[must_use]
    pub fn get_ready(&self, key: &str) -> Option<V> {
        match self.lock().slots.get(key) {
            Some(Slot::Value(value)) => Some(value.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self, key: &str) -> bool {
        self.lock().in_flight.contains_key(key)
    }

    fn insert(&self, key: String, slot: Slot<V>) {
        let mut state = self.lock();
        // A pending load for the previous registration must not overwrite the new one.
        state.in_flight.remove(&key);
        state.slots.insert(key, slot);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_load(
        state: &mut RegistryState<V>,
        weak_state: Weak<Mutex<RegistryState<V>>>,
        key: &str,
        loader: LoaderFn<V>,
    ) -> InFlight<V> {
        let owned_key = key.to_owned();
        let serial = state.next_serial;
        state.next_serial = state.next_serial.wrapping_add(1);
        let shared = async move {
            let result = loader().await;
            if let Some(state) = weak_state.upgrade() {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                // A re-registration may have started a newer load under the same key.
                if state
                    .in_flight
                    .get(&owned_key)
                    .is_some_and(|pending| pending.serial == serial)
                {
                    state.in_flight.remove(&owned_key);
                }
                let still_registered = matches!(
                    state.slots.get(&owned_key),
                    Some(Slot::Loader(current)) if Arc::ptr_eq(current, &loader)
                );
                if let (Ok(value), true) = (&result, still_registered) {
                    state
                        .slots
                        .insert(owned_key.clone(), Slot::Value(value.clone()));
                    trace!(key = %owned_key, "memoized loaded registry value");
                }
            }
            result
        }
        .boxed()
        .shared();
        state.in_flight.insert(
            key.to_owned(),
            PendingLoad {
                serial,
                future: shared.clone(),
            },
        );
        shared
    }
}

impl<V> Registry<V> for LazyRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn resolve(&self, key: &str) -> BoxFuture<'static, ChartResult<V>> {
        let mut state = self.lock();
        let loader = match state.slots.get(key) {
            None => {
                debug!(registry = %self.name, key, "registry key not found");
                return future::ready(Err(ChartError::NotFound {
                    registry: self.name.clone(),
                    key: key.to_owned(),
                }))
                .boxed();
            }
            Some(Slot::Value(value)) => return future::ready(Ok(value.clone())).boxed(),
            Some(Slot::Loader(loader)) => loader.clone(),
        };

        if let Some(pending) = state.in_flight.get(key) {
            trace!(registry = %self.name, key, "joining in-flight load");
            return pending.future.clone().boxed();
        }

        debug!(registry = %self.name, key, "starting deferred load");
        Self::start_load(&mut state, Arc::downgrade(&self.state), key, loader).boxed()
    }
}

impl<V> std::fmt::Debug for LazyRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("LazyRegistry")
            .field("name", &self.name)
            .field("keys", &state.slots.keys().collect::<Vec<_>>())
            .field("in_flight", &state.in_flight.len())
            .finish()
    }
}
