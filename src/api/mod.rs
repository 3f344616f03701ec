//! Chart resolution and render orchestration.

mod chart_context;
mod invalidation_render_gate;
mod loadable_renderer;
pub mod memo;
mod renderer_selector;
mod super_chart;
mod super_chart_config;
mod transform_pipeline;

pub use chart_context::ChartContext;
pub use invalidation_render_gate::{RenderGate, render_if_invalidated};
pub use loadable_renderer::{
    FailureHook, LoadPhase, LoadableRenderer, LoadableRendererConfig, LoadedModules, Loader,
    Loaders, LoadingProps, LoadingRenderFn, RenderHooks, RenderProps, SuccessHook,
    SuccessRenderFn, create_loadable_renderer,
};
pub use memo::{Memo, MemoKey, MemoStats};
pub use renderer_selector::{ActiveRenderer, RendererSelector};
pub use super_chart::{SuperChartCore, SuperChartProps};
pub use super_chart_config::SuperChartConfig;
pub use transform_pipeline::{TransformPipeline, compose};
