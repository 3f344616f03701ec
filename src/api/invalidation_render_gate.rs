use crate::render::Element;

use super::{SuperChartCore, SuperChartProps};

/// Outcome of [`render_if_invalidated`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderGate {
    Skipped,
    Rendered(Option<Element>),
}

/// Re-renders only when a resolution settled since the last render.
///
/// Meant for the host's idle loop after driving the executor. Prop changes
/// should go through [`SuperChartCore::render`] directly.
pub fn render_if_invalidated(core: &mut SuperChartCore, props: &SuperChartProps) -> RenderGate {
    if !core.has_pending_invalidation() {
        return RenderGate::Skipped;
    }
    RenderGate::Rendered(core.render(props))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::Arc;

    use futures::executor::LocalPool;

    use super::{RenderGate, render_if_invalidated};
    use crate::api::{ChartContext, SuperChartCore, SuperChartProps};
    use crate::core::TransformFn;
    use crate::registry::ChartRegistries;
    use crate::render::NullChart;

    fn build_core(pool: &LocalPool) -> SuperChartCore {
        let registries = ChartRegistries::new();
        registries
            .components
            .register_value("line", Arc::new(NullChart::new("Line")));
        registries
            .transforms
            .register_value("line", TransformFn::identity());
        SuperChartCore::new(ChartContext::from_registries(
            &registries,
            Rc::new(pool.spawner()),
        ))
    }

    #[test]
    fn gate_skips_without_pending_invalidation() {
        let pool = LocalPool::new();
        let mut core = build_core(&pool);
        let props = SuperChartProps::new("line");
        assert_eq!(render_if_invalidated(&mut core, &props), RenderGate::Skipped);
    }

    #[test]
    fn gate_renders_once_after_settlement() {
        let mut pool = LocalPool::new();
        let mut core = build_core(&pool);
        let props = SuperChartProps::new("line");

        let loading = core.render(&props).expect("container");
        assert!(loading.find_chart().is_none());

        pool.run_until_stalled();
        assert!(core.has_pending_invalidation());

        let RenderGate::Rendered(Some(element)) = render_if_invalidated(&mut core, &props) else {
            panic!("expected a render after settlement");
        };
        assert!(element.find_chart().is_some());
        assert_eq!(render_if_invalidated(&mut core, &props), RenderGate::Skipped);
    }
}
