use std::rc::Rc;

use futures::FutureExt;
use futures::future;
use tracing::debug;

use crate::core::{ChartProps, TransformFn};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Container, ContainerHandle, ContainerRef, Diagnostic, Element, SharedComponent,
};

use super::chart_context::ChartContext;
use super::loadable_renderer::{
    FailureHook, Loader, LoadableRendererConfig, LoadedModules, Loaders, LoadingProps,
    RenderHooks, RenderProps, SuccessHook, create_loadable_renderer,
};
use super::memo::MemoStats;
use super::renderer_selector::{ActiveRenderer, RendererSelector};
use super::super_chart_config::SuperChartConfig;
use super::transform_pipeline::TransformPipeline;

/// Inputs for one orchestrator render cycle.
#[derive(Debug, Clone)]
pub struct SuperChartProps {
    pub id: Option<String>,
    pub class_name: Option<String>,
    /// `None` is an explicit null: nothing is rendered but loading continues.
    pub chart_props: Option<ChartProps>,
    pub chart_type: String,
    pub pre_transform: Option<TransformFn>,
    /// Replaces the registry-resolved transform when set.
    pub override_transform: Option<TransformFn>,
    pub post_transform: Option<TransformFn>,
    pub hooks: RenderHooks,
}

impl SuperChartProps {
    #[must_use]
    pub fn new(chart_type: impl Into<String>) -> Self {
        Self {
            id: None,
            class_name: None,
            chart_props: Some(ChartProps::blank()),
            chart_type: chart_type.into(),
            pre_transform: None,
            override_transform: None,
            post_transform: None,
            hooks: RenderHooks::default(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SuperChartConfig) -> Self {
        Self {
            id: config.id.clone(),
            class_name: config.class_name.clone(),
            ..Self::new(config.chart_type.clone())
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn with_chart_props(mut self, chart_props: ChartProps) -> Self {
        self.chart_props = Some(chart_props);
        self
    }

    #[must_use]
    pub fn without_chart_props(mut self) -> Self {
        self.chart_props = None;
        self
    }

    #[must_use]
    pub fn with_pre_transform(mut self, stage: TransformFn) -> Self {
        self.pre_transform = Some(stage);
        self
    }

    #[must_use]
    pub fn with_override_transform(mut self, stage: TransformFn) -> Self {
        self.override_transform = Some(stage);
        self
    }

    #[must_use]
    pub fn with_post_transform(mut self, stage: TransformFn) -> Self {
        self.post_transform = Some(stage);
        self
    }

    #[must_use]
    pub fn on_render_success(mut self, hook: impl Fn() + 'static) -> Self {
        self.hooks.on_render_success = Some(Rc::new(hook) as SuccessHook);
        self
    }

    #[must_use]
    pub fn on_render_failure(mut self, hook: impl Fn(&ChartError) + 'static) -> Self {
        self.hooks.on_render_failure = Some(Rc::new(hook) as FailureHook);
        self
    }
}

/// Resolves a chart type to a lazily loaded component and transform, then
/// renders host data through the memoized transform pipeline.
///
/// The renderer is cached per `(chart_type, override_transform)` and replaced
/// (tearing the previous one down) only when that pair changes. Selecting a
/// renderer starts loading even when nothing is rendered.
pub struct SuperChartCore {
    context: ChartContext,
    selector: RendererSelector,
    pipeline: Rc<TransformPipeline>,
    container: ContainerRef,
}

impl SuperChartCore {
    #[must_use]
    pub fn new(context: ChartContext) -> Self {
        Self {
            context,
            selector: RendererSelector::default(),
            pipeline: Rc::new(TransformPipeline::new()),
            container: ContainerRef::default(),
        }
    }

    /// Runs one render cycle.
    ///
    /// Returns `None` when `chart_props` is null. Resolution failures never
    /// surface here; they render a diagnostic inside the container and call
    /// `on_render_failure` once.
    pub fn render(&mut self, props: &SuperChartProps) -> Option<Element> {
        let renderer = self.select_renderer(&props.chart_type, props.override_transform.as_ref());

        let Some(chart_props) = props.chart_props.clone() else {
            renderer.unmount();
            self.container.unmount();
            return None;
        };

        let container = Container::new(props.id.as_deref(), props.class_name.as_deref());
        let child = renderer.render(
            RenderProps {
                chart_props,
                pre_transform: props.pre_transform.clone(),
                post_transform: props.post_transform.clone(),
            },
            props.hooks.clone(),
        );
        self.container
            .mount(container.id.clone(), container.class_name.clone());
        Some(Element::Container(container.with_child(child)))
    }

    /// Returns the memoized renderer for the pair, creating and preloading
    /// a new one when the pair changed.
    pub fn select_renderer(
        &mut self,
        chart_type: &str,
        override_transform: Option<&TransformFn>,
    ) -> ActiveRenderer {
        let context = &self.context;
        let pipeline = &self.pipeline;
        let (renderer, evicted) = self.selector.select(chart_type, override_transform, |ty, ov| {
            build_renderer(context, pipeline, ty, ov)
        });

        if let Some(previous) = evicted {
            previous.teardown();
            self.pipeline.clear();
        }
        renderer.preload();
        renderer
    }

    #[must_use]
    pub fn active_renderer(&self) -> Option<&ActiveRenderer> {
        self.selector.current()
    }

    /// `true` after a resolution settled into new output that the host has
    /// not rendered yet.
    #[must_use]
    pub fn has_pending_invalidation(&self) -> bool {
        self.selector
            .current()
            .is_some_and(ActiveRenderer::has_pending_invalidation)
    }

    #[must_use]
    pub fn container(&self) -> Option<ContainerHandle> {
        self.container.get()
    }

    #[must_use]
    pub fn container_ref(&self) -> ContainerRef {
        self.container.clone()
    }

    #[must_use]
    pub fn pipeline_stats(&self) -> MemoStats {
        self.pipeline.stats()
    }

    #[must_use]
    pub fn selector_stats(&self) -> MemoStats {
        self.selector.stats()
    }

    /// Drops the active renderer; its pending settlements become no-ops.
    pub fn teardown(&mut self) {
        if let Some(renderer) = self.selector.clear() {
            renderer.teardown();
        }
        self.pipeline.clear();
        self.container.unmount();
    }
}

impl Drop for SuperChartCore {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn build_renderer(
    context: &ChartContext,
    pipeline: &Rc<TransformPipeline>,
    chart_type: &str,
    override_transform: Option<&TransformFn>,
) -> ActiveRenderer {
    if chart_type.is_empty() {
        debug!("empty chart type selected; nothing to resolve");
        return ActiveRenderer::Empty;
    }
    debug!(
        chart_type,
        has_override = override_transform.is_some(),
        "creating loadable renderer"
    );

    let components = context.components.clone();
    let component_key = chart_type.to_owned();
    let component: Loader<SharedComponent> =
        Box::new(move || components.resolve(&component_key).boxed_local());

    let transform: Loader<TransformFn> = match override_transform.cloned() {
        Some(stage) => {
            Box::new(move || future::ready(ChartResult::Ok(stage.clone())).boxed_local())
        }
        None => {
            let transforms = context.transforms.clone();
            let transform_key = chart_type.to_owned();
            Box::new(move || transforms.resolve(&transform_key).boxed_local())
        }
    };

    let diagnostic_type = chart_type.to_owned();
    let pipeline = Rc::clone(pipeline);
    let renderer = create_loadable_renderer(
        LoadableRendererConfig {
            label: chart_type.to_owned(),
            loaders: Loaders {
                component,
                transform,
            },
            loading: Box::new(move |loading: LoadingProps<'_>| {
                loading
                    .error
                    .map(|err| Element::Diagnostic(Diagnostic::new(diagnostic_type.clone(), err)))
            }),
            render: Box::new(move |modules: &LoadedModules, props: &RenderProps| {
                let final_props = pipeline.compute(
                    props.pre_transform.as_ref(),
                    &modules.transform,
                    props.post_transform.as_ref(),
                    &props.chart_props,
                );
                modules.component.render(&final_props)
            }),
        },
        Rc::clone(&context.spawner),
    );
    ActiveRenderer::Loadable(renderer)
}
