use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use futures::task::LocalSpawn;

use crate::registry::{ChartRegistries, ComponentRegistry, TransformRegistry};

/// Collaborators injected into a [`super::SuperChartCore`].
///
/// Registries are shared across orchestrators; the spawner drives the
/// resolution futures on the host's single-threaded event loop.
#[derive(Clone)]
pub struct ChartContext {
    pub(crate) components: Arc<ComponentRegistry>,
    pub(crate) transforms: Arc<TransformRegistry>,
    pub(crate) spawner: Rc<dyn LocalSpawn>,
}

impl ChartContext {
    #[must_use]
    pub fn new(
        components: Arc<ComponentRegistry>,
        transforms: Arc<TransformRegistry>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            components,
            transforms,
            spawner,
        }
    }

    #[must_use]
    pub fn from_registries(registries: &ChartRegistries, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self::new(
            registries.component_registry(),
            registries.transform_registry(),
            spawner,
        )
    }
}

impl fmt::Debug for ChartContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartContext").finish_non_exhaustive()
    }
}
