use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::{self, LocalBoxFuture};
use futures::task::{LocalSpawn, LocalSpawnExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ChartProps, TransformFn};
use crate::error::{ChartError, ChartResult};
use crate::render::{Element, SharedComponent};

/// Zero-argument producer of one resolved module.
pub type Loader<T> = Box<dyn Fn() -> LocalBoxFuture<'static, ChartResult<T>>>;

/// The two named loaders a renderer dispatches together.
pub struct Loaders {
    pub component: Loader<SharedComponent>,
    pub transform: Loader<TransformFn>,
}

/// Modules resolved for one loader set.
#[derive(Clone)]
pub struct LoadedModules {
    pub component: SharedComponent,
    pub transform: TransformFn,
}

impl fmt::Debug for LoadedModules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModules")
            .field("component", &self.component.name())
            .field("transform", &self.transform)
            .finish()
    }
}

/// Props supplied to the loading/error render function.
#[derive(Debug, Clone, Copy)]
pub struct LoadingProps<'a> {
    pub error: Option<&'a ChartError>,
}

/// Per-invocation inputs forwarded into the transform pipeline.
#[derive(Debug, Clone)]
pub struct RenderProps {
    pub chart_props: ChartProps,
    pub pre_transform: Option<TransformFn>,
    pub post_transform: Option<TransformFn>,
}

impl RenderProps {
    #[must_use]
    pub fn new(chart_props: ChartProps) -> Self {
        Self {
            chart_props,
            pre_transform: None,
            post_transform: None,
        }
    }
}

pub type SuccessHook = Rc<dyn Fn()>;
pub type FailureHook = Rc<dyn Fn(&ChartError)>;

/// Host notification callbacks. Unset hooks are no-ops.
#[derive(Clone, Default)]
pub struct RenderHooks {
    pub on_render_success: Option<SuccessHook>,
    pub on_render_failure: Option<FailureHook>,
}

impl RenderHooks {
    fn notify_success(&self) {
        if let Some(hook) = &self.on_render_success {
            hook();
        }
    }

    fn notify_failure(&self, error: &ChartError) {
        if let Some(hook) = &self.on_render_failure {
            hook(error);
        }
    }
}

impl fmt::Debug for RenderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHooks")
            .field("on_render_success", &self.on_render_success.is_some())
            .field("on_render_failure", &self.on_render_failure.is_some())
            .finish()
    }
}

pub type LoadingRenderFn = Box<dyn Fn(LoadingProps<'_>) -> Option<Element>>;
pub type SuccessRenderFn = Box<dyn Fn(&LoadedModules, &RenderProps) -> Element>;

/// Inputs to [`create_loadable_renderer`].
pub struct LoadableRendererConfig {
    /// Used in log events only.
    pub label: String,
    pub loaders: Loaders,
    pub loading: LoadingRenderFn,
    pub render: SuccessRenderFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadPhase {
    Init,
    Loading,
    Loaded,
    Error,
}

#[derive(Clone)]
enum LoadState {
    Init,
    Loading,
    Loaded(LoadedModules),
    Error(ChartError),
}

impl LoadState {
    fn phase(&self) -> LoadPhase {
        match self {
            Self::Init => LoadPhase::Init,
            Self::Loading => LoadPhase::Loading,
            Self::Loaded(_) => LoadPhase::Loaded,
            Self::Error(_) => LoadPhase::Error,
        }
    }
}

#[derive(Clone)]
struct Mounted {
    props: RenderProps,
    hooks: RenderHooks,
}

struct LoadableInner {
    label: String,
    loaders: Loaders,
    loading: LoadingRenderFn,
    render: SuccessRenderFn,
    spawner: Rc<dyn LocalSpawn>,
    alive: Cell<bool>,
    notified: Cell<bool>,
    invalidated: Cell<bool>,
    dispatches: Cell<u32>,
    state: RefCell<LoadState>,
    mounted: RefCell<Option<Mounted>>,
    output: RefCell<Option<Element>>,
}

/// Unit that resolves a component and transform asynchronously and renders
/// through a loading/error or success render function.
///
/// Lifecycle: `Init -> Loading -> Loaded | Error`. Loading is entered once;
/// a unit never retries. Settlement after [`LoadableRenderer::teardown`] is
/// discarded. Cloning yields another handle to the same unit.
#[derive(Clone)]
pub struct LoadableRenderer {
    inner: Rc<LoadableInner>,
}

/// Builds a loadable renderer whose futures run on `spawner`.
///
/// Nothing is dispatched until [`LoadableRenderer::preload`] or the first
/// [`LoadableRenderer::render`].
pub fn create_loadable_renderer(
    config: LoadableRendererConfig,
    spawner: Rc<dyn LocalSpawn>,
) -> LoadableRenderer {
    LoadableRenderer {
        inner: Rc::new(LoadableInner {
            label: config.label,
            loaders: config.loaders,
            loading: config.loading,
            render: config.render,
            spawner,
            alive: Cell::new(true),
            notified: Cell::new(false),
            invalidated: Cell::new(false),
            dispatches: Cell::new(0),
            state: RefCell::new(LoadState::Init),
            mounted: RefCell::new(None),
            output: RefCell::new(None),
        }),
    }
}

impl LoadableRenderer {
    /// Dispatches both loaders unless they were already dispatched.
    ///
    /// Safe to call repeatedly and independent of whether the unit is
    /// rendered.
    pub fn preload(&self) {
        let inner = &self.inner;
        if !inner.alive.get() || !matches!(*inner.state.borrow(), LoadState::Init) {
            return;
        }
        *inner.state.borrow_mut() = LoadState::Loading;
        inner.dispatches.set(inner.dispatches.get() + 1);
        debug!(label = %inner.label, "dispatching chart loaders");

        let component = (inner.loaders.component)();
        let transform = (inner.loaders.transform)();
        let weak: Weak<LoadableInner> = Rc::downgrade(inner);
        let task = async move {
            let result = future::try_join(component, transform).await;
            match weak.upgrade() {
                Some(inner) => inner.settle(result),
                None => trace!("chart loaders settled after renderer was dropped"),
            }
        };

        if let Err(err) = inner.spawner.spawn_local(task) {
            inner.settle(Err(ChartError::Spawn(err.to_string())));
        }
    }

    /// Renders the current state with `props`, remembering them so that a
    /// later settlement re-renders with the same inputs.
    pub fn render(&self, props: RenderProps, hooks: RenderHooks) -> Option<Element> {
        let inner = &self.inner;
        if !inner.alive.get() {
            return None;
        }
        self.preload();
        let mounted = Mounted { props, hooks };
        *inner.mounted.borrow_mut() = Some(mounted.clone());
        let output = inner.render_state(&mounted);
        *inner.output.borrow_mut() = output.clone();
        inner.invalidated.set(false);
        output
    }

    /// Forgets the mounted props and output while loading continues.
    ///
    /// A settlement after unmounting only records the new state; hooks wait
    /// for the next [`LoadableRenderer::render`].
    pub fn unmount(&self) {
        self.inner.mounted.borrow_mut().take();
        self.inner.output.borrow_mut().take();
        self.inner.invalidated.set(false);
    }

    /// Marks the unit dead. Pending settlements become no-ops.
    pub fn teardown(&self) {
        let inner = &self.inner;
        if !inner.alive.replace(false) {
            return;
        }
        trace!(label = %inner.label, phase = ?self.phase(), "tearing down loadable renderer");
        inner.mounted.borrow_mut().take();
        inner.output.borrow_mut().take();
        inner.invalidated.set(false);
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.inner.state.borrow().phase()
    }

    #[must_use]
    pub fn error(&self) -> Option<ChartError> {
        match &*self.inner.state.borrow() {
            LoadState::Error(err) => Some(err.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn loaded_modules(&self) -> Option<LoadedModules> {
        match &*self.inner.state.borrow() {
            LoadState::Loaded(modules) => Some(modules.clone()),
            _ => None,
        }
    }

    /// How many times the loader set was dispatched; at most one.
    #[must_use]
    pub fn dispatch_count(&self) -> u32 {
        self.inner.dispatches.get()
    }

    /// `true` when a settlement re-rendered a mounted unit since the last
    /// [`LoadableRenderer::render`] call.
    #[must_use]
    pub fn has_pending_invalidation(&self) -> bool {
        self.inner.invalidated.get()
    }

    #[must_use]
    pub fn last_output(&self) -> Option<Element> {
        self.inner.output.borrow().clone()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.get()
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LoadableRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadableRenderer")
            .field("label", &self.inner.label)
            .field("phase", &self.phase())
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl LoadableInner {
    fn settle(&self, result: ChartResult<(SharedComponent, TransformFn)>) {
        if !self.alive.get() {
            trace!(label = %self.label, "ignoring settlement after teardown");
            return;
        }
        let next = match result {
            Ok((component, transform)) => {
                debug!(label = %self.label, component = component.name(), "chart modules loaded");
                LoadState::Loaded(LoadedModules {
                    component,
                    transform,
                })
            }
            Err(err) => {
                warn!(label = %self.label, error = %err, "chart resolution failed");
                LoadState::Error(err)
            }
        };
        *self.state.borrow_mut() = next;

        let mounted = self.mounted.borrow().clone();
        if let Some(mounted) = mounted {
            let output = self.render_state(&mounted);
            if self.alive.get() {
                *self.output.borrow_mut() = output;
                self.invalidated.set(true);
            }
        }
    }

    fn render_state(&self, mounted: &Mounted) -> Option<Element> {
        // Clone out of the cell: render functions and hooks are host code.
        let state = self.state.borrow().clone();
        match state {
            LoadState::Init | LoadState::Loading => (self.loading)(LoadingProps { error: None }),
            LoadState::Loaded(modules) => {
                let output = (self.render)(&modules, &mounted.props);
                if !self.notified.replace(true) {
                    mounted.hooks.notify_success();
                }
                Some(output)
            }
            LoadState::Error(err) => {
                if !self.notified.replace(true) {
                    mounted.hooks.notify_failure(&err);
                }
                (self.loading)(LoadingProps { error: Some(&err) })
            }
        }
    }
}
