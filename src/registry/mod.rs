//! Keyed, future-returning stores for chart components and transforms.
//!
//! The orchestrator only consumes the [`Registry`] contract; [`LazyRegistry`]
//! is the shipped implementation and [`ChartRegistries`] bundles the two
//! registries a host injects into a [`crate::api::ChartContext`].

mod lazy_registry;

use std::sync::Arc;

use futures::future::BoxFuture;

pub use lazy_registry::{LazyRegistry, LoaderFn};

use crate::core::TransformFn;
use crate::error::ChartResult;
use crate::render::SharedComponent;

pub const COMPONENT_REGISTRY_NAME: &str = "ChartComponentRegistry";
pub const TRANSFORM_REGISTRY_NAME: &str = "ChartTransformPropsRegistry";

/// Resolution contract consumed by the orchestrator.
///
/// Implementations own de-duplication: repeated calls for a key whose load
/// is still in flight must not start another underlying load. Unknown keys
/// fail the returned future with [`crate::ChartError::NotFound`].
pub trait Registry<V>: Send + Sync {
    fn resolve(&self, key: &str) -> BoxFuture<'static, ChartResult<V>>;
}

pub type ComponentRegistry = dyn Registry<SharedComponent>;
pub type TransformRegistry = dyn Registry<TransformFn>;

/// The two registries a host shares between orchestrators.
#[derive(Clone)]
pub struct ChartRegistries {
    pub components: Arc<LazyRegistry<SharedComponent>>,
    pub transforms: Arc<LazyRegistry<TransformFn>>,
}

impl ChartRegistries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: Arc::new(LazyRegistry::new(COMPONENT_REGISTRY_NAME)),
            transforms: Arc::new(LazyRegistry::new(TRANSFORM_REGISTRY_NAME)),
        }
    }

    #[must_use]
    pub fn component_registry(&self) -> Arc<ComponentRegistry> {
        self.components.clone()
    }

    #[must_use]
    pub fn transform_registry(&self) -> Arc<TransformRegistry> {
        self.transforms.clone()
    }
}

impl Default for ChartRegistries {
    fn default() -> Self {
        Self::new()
    }
}
