use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use crate::core::TransformFn;
use crate::error::{ChartError, ChartResult};
use crate::registry::{ChartRegistries, LazyRegistry, LoaderFn};
use crate::render::SharedComponent;

/// Either a ready value or a deferred loader for it.
#[derive(Clone)]
pub enum PluginSource<V> {
    Value(V),
    Loader(LoaderFn<V>),
}

impl<V> PluginSource<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ChartResult<V>> + Send + Sync + 'static,
    {
        Self::Loader(Arc::new(loader))
    }

    fn register_into(&self, registry: &LazyRegistry<V>, key: &str) {
        match self {
            Self::Value(value) => {
                registry.register_value(key, value.clone());
            }
            Self::Loader(loader) => {
                registry.register_shared_loader(key, loader.clone());
            }
        }
    }
}

/// A chart implementation: a rendering component plus its transform.
///
/// Registering a plugin under a chart-type key makes it resolvable by every
/// orchestrator sharing the same [`ChartRegistries`].
#[derive(Clone)]
pub struct ChartPlugin {
    component: PluginSource<SharedComponent>,
    transform: Option<PluginSource<TransformFn>>,
}

impl ChartPlugin {
    #[must_use]
    pub fn new(component: SharedComponent) -> Self {
        Self {
            component: PluginSource::Value(component),
            transform: None,
        }
    }

    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ChartResult<SharedComponent>> + Send + Sync + 'static,
    {
        Self {
            component: PluginSource::lazy(loader),
            transform: None,
        }
    }

    #[must_use]
    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(PluginSource::Value(transform));
        self
    }

    pub fn with_lazy_transform<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ChartResult<TransformFn>> + Send + Sync + 'static,
    {
        self.transform = Some(PluginSource::lazy(loader));
        self
    }

    /// Registers the component and transform under `key`.
    ///
    /// A plugin without a transform registers the identity transform.
    pub fn register(&self, key: &str, registries: &ChartRegistries) -> ChartResult<()> {
        if key.is_empty() {
            return Err(ChartError::InvalidConfig(
                "chart plugin key must not be empty".to_owned(),
            ));
        }
        self.component.register_into(&registries.components, key);
        match &self.transform {
            Some(transform) => transform.register_into(&registries.transforms, key),
            None => {
                registries
                    .transforms
                    .register_value(key, TransformFn::identity());
            }
        }
        debug!(key, "registered chart plugin");
        Ok(())
    }

    /// Removes `key` from both registries. Returns `true` when anything was removed.
    pub fn unregister(key: &str, registries: &ChartRegistries) -> bool {
        let component = registries.components.remove(key);
        let transform = registries.transforms.remove(key);
        component || transform
    }
}
