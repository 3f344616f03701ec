#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Mutex;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use superchart::{ChartError, ChartResult, SuperChartProps};
use superchart::core::{ChartProps, TransformFn};
use superchart::registry::{LazyRegistry, Registry};

/// Registry wrapper recording every key passed to `resolve`.
pub struct CountingRegistry<V> {
    inner: LazyRegistry<V>,
    calls: Mutex<Vec<String>>,
}

impl<V> CountingRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &str) -> Self {
        Self {
            inner: LazyRegistry::new(name),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_value(self, key: &str, value: V) -> Self {
        self.inner.register_value(key, value);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl<V> Registry<V> for CountingRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn resolve(&self, key: &str) -> BoxFuture<'static, ChartResult<V>> {
        self.calls.lock().expect("calls lock").push(key.to_owned());
        self.inner.resolve(key)
    }
}

/// Registry whose futures settle only when the test releases them.
pub struct GatedRegistry<V> {
    pending: Mutex<HashMap<String, oneshot::Sender<ChartResult<V>>>>,
}

impl<V: Send + 'static> GatedRegistry<V> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Settles the pending resolve for `key`. Returns `false` if nothing waits.
    pub fn release(&self, key: &str, result: ChartResult<V>) -> bool {
        let sender = self.pending.lock().expect("pending lock").remove(key);
        sender.is_some_and(|tx| tx.send(result).is_ok())
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.lock().expect("pending lock").contains_key(key)
    }
}

impl<V: Send + 'static> Registry<V> for GatedRegistry<V> {
    fn resolve(&self, key: &str) -> BoxFuture<'static, ChartResult<V>> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending lock")
            .insert(key.to_owned(), tx);
        let key = key.to_owned();
        async move {
            rx.await
                .unwrap_or_else(|err| Err(ChartError::load_failed(key, err)))
        }
        .boxed()
    }
}

/// Transform that appends `label` to the `trail` array in form data.
pub fn trail_stage(label: &'static str) -> TransformFn {
    TransformFn::new(move |props: &ChartProps| {
        let mut trail = props
            .form_data()
            .get("trail")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        trail.push(json!(label));
        props
            .to_builder()
            .form_value("trail", Value::Array(trail))
            .build()
    })
}

pub fn trail(props: &ChartProps) -> Value {
    props.form_data().get("trail").cloned().unwrap_or(Value::Null)
}

#[derive(Default, Clone)]
pub struct HookCounts {
    pub successes: Rc<Cell<u32>>,
    pub failures: Rc<Cell<u32>>,
    pub last_error: Rc<std::cell::RefCell<Option<ChartError>>>,
}

impl HookCounts {
    pub fn attach(&self, props: SuperChartProps) -> SuperChartProps {
        let successes = self.successes.clone();
        let failures = self.failures.clone();
        let last_error = self.last_error.clone();
        props
            .on_render_success(move || successes.set(successes.get() + 1))
            .on_render_failure(move |err| {
                failures.set(failures.get() + 1);
                *last_error.borrow_mut() = Some(err.clone());
            })
    }
}
